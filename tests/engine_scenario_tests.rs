//! Сценарные и свойство-тесты: форфейт, автозакрытие, вылет, победа,
//! сохранение числа карт и единственность защитника.

use std::collections::VecDeque;

use durak_engine::domain::card::Card;
use durak_engine::domain::deck::Deck;
use durak_engine::domain::player::Player;
use durak_engine::domain::table_top::TableTop;
use durak_engine::engine::history::{ActionRecord, GameHistory};
use durak_engine::engine::{ring, EngineError, Game, RandomSource};
use durak_engine::infra::DeterministicRng;
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

fn test_player(name: &str, seat: usize, cards: &[&str]) -> Player {
    let mut p = Player::new(name.to_string(), seat);
    p.hand = cards.iter().map(|s| card(s)).collect();
    p
}

fn total_cards(game: &Game) -> usize {
    game.deck_len()
        + game.players().iter().map(|p| p.hand.len()).sum::<usize>()
        + game.table_top().flat_cards().count()
}

fn assert_single_defender(game: &Game) {
    if game.victory() {
        return;
    }
    let defenders = game
        .players()
        .iter()
        .filter(|p| p.is_active() && p.is_defending)
        .count();
    assert_eq!(defenders, 1, "ровно один активный защитник");
}

//
// Сценарий D: форфейт
//

/// Защитник не кроет: после «бито» от всех стол уходит ему,
/// защита перескакивает на +2 (на двоих — остаётся у него же).
#[test]
fn forfeit_moves_table_into_defender_hand() {
    let mut rng = DummyRng;
    let mut game = Game::new(&["A", "B"], &mut rng).expect("new game");

    game.attack("B", card("3c")).expect("attack");

    // Защитник пасует, затем атакующий: (a) все активные сказали «бито».
    game.declare_turn_done("A").expect("defender done");
    assert!(!game.table_top().is_empty(), "раунд ещё открыт");
    game.declare_turn_done("B").expect("attacker done");

    // Раунд закрыт форфейтом.
    assert!(game.table_top().is_empty());
    assert!(game.players()[0].has_card(&card("3c")));
    assert_eq!(game.players()[0].hand.len(), 7);

    // Смещение +2 по кольцу из двух — защитник снова A.
    assert_eq!(game.defender().expect("defender").name, "A");
    assert!(game.players()[1].can_attack && game.players()[1].began_round);

    // Добор: только B (у A больше шести), с головы колоды.
    assert_eq!(game.players()[1].hand.len(), 6);
    assert!(game.players()[1].has_card(&card("2d")));
    assert_eq!(game.deck_len(), 39);

    // При форфейте ни одна карта не покидает игру.
    assert_eq!(total_cards(&game), 52);

    // В истории — запись о форфейте.
    let forfeited = game.history().nodes.iter().any(|n| {
        n.actions.iter().any(|a| {
            matches!(a, ActionRecord::CardsForfeited { defender, cards }
                if defender == "A" && cards.contains(&card("3c")))
        })
    });
    assert!(forfeited);
}

//
// Автозакрытие от защитника (условия (b))
//

/// Полный стол: «бито» защитника сразу закрывает раунд.
#[test]
fn defender_done_on_full_table_finalises() {
    let mut table = TableTop::new();
    for label in ["7c", "7d", "7h", "7s", "8c", "8d"] {
        table.place(card(label)).expect("place");
    }
    let snapshot = GameSnapshot {
        players: vec![
            {
                let mut p = test_player("A", 0, &["2h", "3h"]);
                p.is_defending = true;
                p
            },
            {
                let mut p = test_player("B", 1, &["9c"]);
                p.can_attack = true;
                p.began_round = true;
                p
            },
        ],
        table_top: table,
        deck: Deck {
            cards: VecDeque::from([card("Ts"), card("Js"), card("Qs"), card("Ks"), card("As")]),
        },
        trump_card: card("Ac"),
        victory: false,
        history: GameHistory::new(),
    };
    let mut game = Game::reconstruct(snapshot);

    game.declare_turn_done("A").expect("defender done");

    // Форфейт: шесть карт ушли защитнику, стол пуст.
    assert!(game.table_top().is_empty());
    assert_eq!(game.players()[0].hand.len(), 8);
    // Защита на двоих осталась у A, атакующий B добрал до шести.
    assert_eq!(game.defender().expect("defender").name, "A");
    assert_eq!(game.players()[1].hand.len(), 6);
    assert_eq!(game.deck_len(), 0);
}

/// Непокрытых столько же, сколько карт у защитника — крыть бессмысленно.
#[test]
fn defender_done_when_uncovered_equals_hand_finalises() {
    let snapshot = GameSnapshot {
        players: vec![
            {
                let mut p = test_player("A", 0, &["2h"]);
                p.is_defending = true;
                p
            },
            {
                let mut p = test_player("B", 1, &["9c", "9d"]);
                p.can_attack = true;
                p.began_round = true;
                p
            },
        ],
        table_top: {
            let mut t = TableTop::new();
            t.place(card("7c")).expect("place");
            t
        },
        deck: Deck {
            cards: VecDeque::new(),
        },
        trump_card: card("As"),
        victory: false,
        history: GameHistory::new(),
    };
    let mut game = Game::reconstruct(snapshot);

    game.declare_turn_done("A").expect("defender done");

    assert!(game.table_top().is_empty());
    assert_eq!(game.players()[0].hand.len(), 2);
    assert_eq!(game.defender().expect("defender").name, "A");
}

/// Ровно четыре непокрытых одного ранга — тоже безнадёжный стол.
#[test]
fn defender_done_on_four_same_rank_finalises() {
    let mut table = TableTop::new();
    for label in ["7c", "7d", "7h", "7s"] {
        table.place(card(label)).expect("place");
    }
    let snapshot = GameSnapshot {
        players: vec![
            {
                let mut p = test_player("A", 0, &["2h", "3h", "4h", "5h", "6h"]);
                p.is_defending = true;
                p
            },
            {
                let mut p = test_player("B", 1, &["9c"]);
                p.can_attack = true;
                p.began_round = true;
                p
            },
        ],
        table_top: table,
        deck: Deck {
            cards: VecDeque::from([card("Ts")]),
        },
        trump_card: card("As"),
        victory: false,
        history: GameHistory::new(),
    };
    let mut game = Game::reconstruct(snapshot);

    game.declare_turn_done("A").expect("defender done");

    assert!(game.table_top().is_empty());
    assert_eq!(game.players()[0].hand.len(), 9);
    assert_eq!(game.players()[1].hand.len(), 2); // добрал единственную карту
    assert_eq!(game.deck_len(), 0);
}

//
// Сценарий E: вылет и победа
//

fn endgame_snapshot() -> GameSnapshot {
    // Колода пуста; у B последняя карта, A защищается.
    GameSnapshot {
        players: vec![
            {
                let mut p = test_player("A", 0, &["6h", "8h"]);
                p.is_defending = true;
                p
            },
            {
                let mut p = test_player("B", 1, &["7s"]);
                p.can_attack = true;
                p.began_round = true;
                p
            },
        ],
        table_top: TableTop::new(),
        deck: Deck {
            cards: VecDeque::new(),
        },
        trump_card: card("Ac"),
        victory: false,
        history: GameHistory::new(),
    }
}

/// Последний не-защитник выкладывает последнюю карту при пустой колоде:
/// немедленный вылет и победа.
#[test]
fn last_attacker_emptying_hand_ends_game() {
    let mut game = Game::reconstruct(endgame_snapshot());

    game.attack("B", card("7s")).expect("final attack");

    assert!(game.victory());
    assert!(!game.players()[1].is_active());
    assert!(game.players()[0].is_active());

    // Вылет и победа зафиксированы в истории.
    let last = game.history().last_node().expect("node");
    assert!(last.finalized);
    let eliminated = game.history().nodes.iter().any(|n| {
        n.actions
            .iter()
            .any(|a| matches!(a, ActionRecord::PlayerEliminated { player } if player == "B"))
    });
    assert!(eliminated);
    let won = game
        .history()
        .nodes
        .iter()
        .any(|n| n.actions.iter().any(|a| matches!(a, ActionRecord::GameWon)));
    assert!(won);
}

/// Победа монотонна: после неё любой мутатор отвечает GameAlreadyWon.
#[test]
fn victory_is_terminal_and_absorbing() {
    let mut game = Game::reconstruct(endgame_snapshot());
    game.attack("B", card("7s")).expect("final attack");
    assert!(game.victory());

    let before = game.snapshot();

    assert_eq!(
        game.attack("A", card("6h")).unwrap_err(),
        EngineError::GameAlreadyWon
    );
    assert_eq!(
        game.cover(card("8h"), 0).unwrap_err(),
        EngineError::GameAlreadyWon
    );
    assert_eq!(
        game.declare_turn_done("A").unwrap_err(),
        EngineError::GameAlreadyWon
    );
    assert_eq!(game.finalise_round().unwrap_err(), EngineError::GameAlreadyWon);

    // И ничего не изменилось.
    assert_eq!(game.snapshot(), before);
    assert!(game.victory());
}

/// Вылет на границе раунда: пустая рука при пустой колоде после добора.
#[test]
fn round_sweep_eliminates_emptied_player() {
    // Трое. C кроет единственную карту и остаётся при своих; у B после
    // раунда пустая рука и пустая колода — он выходит при закрытии.
    let snapshot = GameSnapshot {
        players: vec![
            {
                let mut p = test_player("A", 0, &["9c", "Td"]);
                p.can_attack = true;
                p.began_round = true;
                p
            },
            test_player("B", 1, &[]),
            {
                let mut p = test_player("C", 2, &["8c", "Jd"]);
                p.is_defending = true;
                p
            },
        ],
        table_top: {
            let mut t = TableTop::new();
            t.place(card("7c")).expect("place");
            t
        },
        deck: Deck {
            cards: VecDeque::new(),
        },
        trump_card: card("Ad"),
        victory: false,
        history: GameHistory::new(),
    };
    let mut game = Game::reconstruct(snapshot);

    // Покрытие единственной карты закрывает раунд.
    game.cover(card("8c"), 0).expect("cover");

    assert!(game.table_top().is_empty());
    assert!(!game.players()[1].is_active(), "B вышел при закрытии раунда");
    assert!(!game.victory(), "активных ещё двое");

    // Кольцо теперь из A и C; защита ушла от C на +1 — к A.
    assert_eq!(game.defender().expect("defender").name, "A");
    assert!(game.players()[2].can_attack && game.players()[2].began_round);
    assert_single_defender(&game);
}

//
// Свойства на живой партии
//

/// Жадная партия до конца: после каждого вызова движка — ровно один
/// активный защитник, а карты либо сохраняются, либо парно уходят
/// из игры при чистом отбое.
#[test]
fn greedy_game_preserves_invariants_to_the_end() {
    let mut rng = DeterministicRng::from_seed(7);
    let mut game = Game::new(&["Alice", "Boris", "Vera"], &mut rng).expect("new game");

    assert_eq!(total_cards(&game), 52);
    assert_single_defender(&game);

    let trump = game.trump_card().suit;
    let mut guard = 0usize;

    while !game.victory() {
        guard += 1;
        assert!(guard < 10_000, "партия обязана завершаться");

        let total_before = total_cards(&game);
        let closed_before = closed_rounds(&game);

        let defender = game.defender().expect("defender").name.clone();
        let attacker_idx =
            ring::offset_from(game.players(), &defender, -1).expect("attacker in ring");

        if game.table_top().is_empty() {
            // Атакующий заходит младшей картой.
            let attacker = game.players()[attacker_idx].name.clone();
            let card = game.players()[attacker_idx]
                .hand
                .iter()
                .copied()
                .min_by_key(|c| (c.suit == trump, c.rank))
                .expect("attacker holds cards");
            game.attack(&attacker, card).expect("attack");
        } else if let Some((position, cover)) = cheapest_cover(&game, trump) {
            game.cover(cover, position).expect("cover");
        } else {
            // Крыть нечем: «бито» по кругу до закрытия раунда.
            let active: Vec<String> = game
                .players()
                .iter()
                .filter(|p| p.is_active())
                .map(|p| p.name.clone())
                .collect();
            for name in active {
                if game.victory() || game.table_top().is_empty() {
                    break;
                }
                game.declare_turn_done(&name).expect("declare");
            }
        }

        assert_single_defender(&game);

        // Карты не появляются из ниоткуда; убыль — только парой
        // (атака+покрытие) при чистом закрытии раунда.
        let total_after = total_cards(&game);
        assert!(total_after <= total_before);
        if total_after < total_before {
            let retired = total_before - total_after;
            assert_eq!(retired % 2, 0, "отбой уходит парами");
            assert!(closed_rounds(&game) > closed_before);
        }
    }

    // Победа: остался ровно один активный игрок (дурак).
    let active = ring::active_seats(game.players());
    assert_eq!(active.len(), 1);
}

fn cheapest_cover(game: &Game, trump: durak_engine::domain::card::Suit) -> Option<(usize, Card)> {
    let defender = game.defender()?;
    for (position, (placed, cover)) in game.table_top().entries().iter().enumerate() {
        if cover.is_some() {
            continue;
        }
        let best = defender
            .hand
            .iter()
            .copied()
            .filter(|c| c.beats(placed, trump))
            .min_by_key(|c| (c.suit == trump, c.rank));
        return best.map(|card| (position, card));
    }
    None
}

fn closed_rounds(game: &Game) -> usize {
    game.history()
        .nodes
        .iter()
        .filter(|n| {
            n.actions
                .iter()
                .any(|a| matches!(a, ActionRecord::RoundClosed { forfeit: false }))
        })
        .count()
}
