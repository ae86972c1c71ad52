// src/bin/durak_dev_cli.rs
//
// Dev-CLI: скриптованная партия дурака на троих с жадными ботами.
// Показывает полный цикл движка: атака, покрытие/перевод, «бито»,
// закрытие раундов, вылеты, победа — плюс snapshot round-trip через
// InMemoryGameStorage на каждом раунде.

use durak_engine::domain::card::Card;
use durak_engine::engine::ring;
use durak_engine::engine::{EngineError, Game};
use durak_engine::infra::{DeterministicRng, GameStorage, InMemoryGameStorage};

const GAME_ID: &str = "dev-game";
const MAX_ROUNDS: usize = 500;

fn main() {
    if let Err(e) = run() {
        eprintln!("durak_dev_cli: ошибка движка: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), EngineError> {
    println!("durak_dev_cli: стартуем скриптованную партию…");

    let mut rng = DeterministicRng::from_seed(42);
    let names = ["Alice", "Boris", "Vera"];
    let mut game = Game::new(&names, &mut rng)?;
    let mut storage = InMemoryGameStorage::new();

    println!("Козырь: {}", game.trump_card());
    debug_print_state(&game);

    let mut round = 0usize;
    while !game.victory() && round < MAX_ROUNDS {
        round += 1;
        println!();
        println!("================ РАУНД {round} ================");

        // Демонстрация round-trip: каждый раунд партия уходит в хранилище
        // и поднимается обратно — поведение не должно меняться.
        storage.save_game(GAME_ID, &game.snapshot());
        game = match storage.load_game(GAME_ID) {
            Some(snapshot) => Game::reconstruct(snapshot),
            None => return Err(EngineError::InvalidGameState("snapshot lost in storage")),
        };

        play_round(&mut game)?;
        debug_print_state(&game);
    }

    println!();
    if game.victory() {
        println!("Партия завершена за {round} раунд(ов).");
        for p in game.players() {
            println!(
                "  {} — {}",
                p.name,
                if p.is_active() { "остался с картами (дурак)" } else { "вышел" }
            );
        }
    } else {
        println!("Достигнут лимит {MAX_ROUNDS} раундов, прерываем.");
    }

    if let Some(node) = game.history().last_node() {
        println!(
            "История: {} узлов, последний — {} действий (закрыт: {}).",
            game.history().nodes.len(),
            node.actions.len(),
            node.finalized
        );
    }

    // Проекция глазами первого игрока — то, что ушло бы клиенту.
    let view = game.projection_for("Alice")?;
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("Проекция для Alice:\n{json}"),
        Err(e) => println!("Не удалось сериализовать проекцию: {e}"),
    }

    Ok(())
}

/// Один раунд жадных ботов: атакующий кладёт младшую карту, защитник
/// кроет минимально возможными, иначе все объявляют «бито» и защитник
/// забирает стол.
fn play_round(game: &mut Game) -> Result<(), EngineError> {
    let defender = match game.defender() {
        Some(p) => p.name.clone(),
        None => return Err(EngineError::InvalidGameState("no defender")),
    };
    let attacker_idx = ring::offset_from(game.players(), &defender, -1)?;
    let attacker = game.players()[attacker_idx].name.clone();

    let Some(card) = cheapest_card(game, attacker_idx) else {
        // Атакующему нечем ходить — такого в живой партии не бывает.
        return Err(EngineError::InvalidGameState("attacker has no cards"));
    };
    println!("{attacker} атакует: {card} (защищается {defender})");
    game.attack(&attacker, card)?;

    loop {
        if game.victory() || game.table_top().is_empty() {
            return Ok(());
        }

        if let Some((position, cover)) = choose_cover(game) {
            println!("{defender} кроет позицию {position} картой {cover}");
            game.cover(cover, position)?;
            continue;
        }

        // Покрыть нечем: все активные по кругу говорят «бито»,
        // раунд закроется сам (защитник заберёт стол).
        println!("{defender} не может покрыть — стол уходит ему");
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
            game.declare_turn_done(&name)?;
        }
        return Ok(());
    }
}

/// Младшая карта в руке: сперва не-козыри по рангу, потом козыри.
fn cheapest_card(game: &Game, idx: usize) -> Option<Card> {
    let trump = game.trump_card().suit;
    game.players()[idx]
        .hand
        .iter()
        .copied()
        .min_by_key(|c| (c.suit == trump, c.rank))
}

/// Первая непокрытая позиция и самая дешёвая бьющая её карта защитника.
fn choose_cover(game: &Game) -> Option<(usize, Card)> {
    let trump = game.trump_card().suit;
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

fn debug_print_state(game: &Game) {
    let hands: Vec<String> = game
        .players()
        .iter()
        .map(|p| {
            format!(
                "{}{}: {} карт{}",
                p.name,
                if p.is_defending { " (защита)" } else if p.began_round { " (атака)" } else { "" },
                p.hand.len(),
                if p.is_active() { "" } else { " [вышел]" }
            )
        })
        .collect();
    println!("Колода: {} | {}", game.deck_len(), hands.join(" | "));
}
