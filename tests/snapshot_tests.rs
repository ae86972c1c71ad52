//! Снэпшоты и проекции: round-trip без потерь, чистый reconstruct,
//! редактирование чужих рук, хранилище.

use durak_engine::domain::card::Card;
use durak_engine::engine::{EngineError, Game, RandomSource};
use durak_engine::infra::{GameStorage, InMemoryGameStorage};
use durak_engine::state::GameSnapshot;

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}

    fn pick_index(&mut self, _upper: usize) -> usize {
        0
    }
}

fn card(s: &str) -> Card {
    s.parse().expect("test card label")
}

fn mid_round_game() -> Game {
    let mut rng = DummyRng;
    let mut game = Game::new(&["A", "B"], &mut rng).expect("new game");
    // Партия в середине раунда: одна непокрытая атака на столе.
    game.attack("B", card("3c")).expect("attack");
    game
}

/// reconstruct(serialize(g)) наблюдаемо равен g: одинаковые проекции
/// для каждого игрока и одинаковые снэпшоты.
#[test]
fn snapshot_roundtrip_preserves_observable_state() {
    let game = mid_round_game();

    let json = serde_json::to_string(&game.snapshot()).expect("to json");
    let parsed: GameSnapshot = serde_json::from_str(&json).expect("from json");
    let restored = Game::reconstruct(parsed);

    for name in ["A", "B"] {
        assert_eq!(
            game.projection_for(name).expect("projection"),
            restored.projection_for(name).expect("projection")
        );
    }
    assert_eq!(game.snapshot(), restored.snapshot());

    // Сериализация детерминированна: одно состояние — один и тот же JSON.
    let json_again = serde_json::to_string(&restored.snapshot()).expect("to json");
    assert_eq!(json, json_again);
}

/// После round-trip-а совпадает и множество допустимых ходов:
/// один и тот же ход даёт одно и то же состояние, одна и та же
/// ошибка — один и тот же отказ.
#[test]
fn restored_game_accepts_and_rejects_same_moves() {
    let mut original = mid_round_game();
    let mut restored = Game::reconstruct(original.snapshot());

    // Нелегальный ход отвергается одинаково...
    let e1 = original.attack("B", card("5c")).unwrap_err();
    let e2 = restored.attack("B", card("5c")).unwrap_err();
    assert_eq!(e1, EngineError::CardRankMismatch);
    assert_eq!(e1, e2);

    // ...а легальный ведёт в одно и то же состояние.
    original.cover(card("4c"), 0).expect("cover original");
    restored.cover(card("4c"), 0).expect("cover restored");
    assert_eq!(original.snapshot(), restored.snapshot());

    // Дальше партии тоже не расходятся.
    original.attack("A", card("6c")).expect("attack original");
    restored.attack("A", card("6c")).expect("attack restored");
    assert_eq!(original.snapshot(), restored.snapshot());
}

/// reconstruct чистый: сам по себе он ничего не перетасовывает и
/// не пересдаёт, сколько бы раз его ни делали.
#[test]
fn reconstruct_is_pure() {
    let game = mid_round_game();
    let snapshot = game.snapshot();

    let once = Game::reconstruct(snapshot.clone()).snapshot();
    let twice = Game::reconstruct(Game::reconstruct(snapshot.clone()).snapshot()).snapshot();
    assert_eq!(once, snapshot);
    assert_eq!(twice, snapshot);
}

/// Проекция — анти-чит граница: своя рука целиком, чужие только
/// размером, колода только числом.
#[test]
fn projection_redacts_other_hands_and_deck() {
    let game = mid_round_game();

    let view = game.projection_for("A").expect("projection");
    assert_eq!(view.hero, "A");
    assert_eq!(view.hand.len(), 6);
    assert_eq!(view.deck_count, 40);
    assert_eq!(view.trump_card, card("Ac"));
    assert!(view.hand.contains(&card("2c")));

    // Чужая рука — только размер и флаги.
    let b = view
        .players
        .iter()
        .find(|p| p.name == "B")
        .expect("player view");
    assert_eq!(b.hand_size, 5);
    assert!(b.began_round);

    // В сериализованной проекции нет ни одной карты из руки B
    // (его ранги: Five, Seven, Nine, Jack, King).
    let json = serde_json::to_string(&view).expect("to json");
    for rank in ["Five", "Seven", "Nine", "Jack", "King"] {
        assert!(!json.contains(rank), "ранг {rank} утёк в проекцию");
    }

    let err = game.projection_for("Nobody").unwrap_err();
    assert_eq!(err, EngineError::PlayerNotFound("Nobody".to_string()));
}

/// Хранилище снэпшотов: save/load/remove.
#[test]
fn in_memory_storage_roundtrip() {
    let game = mid_round_game();
    let mut storage = InMemoryGameStorage::new();

    assert!(storage.load_game("g-1").is_none());

    storage.save_game("g-1", &game.snapshot());
    let loaded = storage.load_game("g-1").expect("stored snapshot");
    assert_eq!(loaded, game.snapshot());

    // Загруженная партия играет дальше как живая.
    let mut restored = Game::reconstruct(loaded);
    restored.cover(card("4c"), 0).expect("cover");
    assert!(restored.table_top().is_empty());

    storage.remove_game("g-1");
    assert!(storage.load_game("g-1").is_none());
}
