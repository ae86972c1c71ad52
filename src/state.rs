//! Снэпшот партии для персистентности.
//!
//! «Замороженная» партия: всё, что нужно, чтобы восстановить `Game`
//! бит-в-бит по наблюдаемому поведению — без перетасовки и пересдачи.
//! Игроки хранятся упорядоченным списком (порядок списка = порядок
//! посадки), а не map-ом: порядок мест — часть состояния.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::player::Player;
use crate::domain::table_top::TableTop;
use crate::engine::game::Game;
use crate::engine::history::GameHistory;

/// Сериализуемое состояние партии: {players, tableTop, deck, trumpCard,
/// victory, history}.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub players: Vec<Player>,
    pub table_top: TableTop,
    pub deck: Deck,
    pub trump_card: Card,
    pub victory: bool,
    pub history: GameHistory,
}

impl GameSnapshot {
    /// Упаковать живую партию в снэпшот.
    pub fn from_game(game: &Game) -> Self {
        Self {
            players: game.players.clone(),
            table_top: game.table_top.clone(),
            deck: game.deck.clone(),
            trump_card: game.trump_card,
            victory: game.victory,
            history: game.history.clone(),
        }
    }

    /// Развернуть снэпшот обратно в партию. Чистая операция: никакого
    /// RNG, те же инварианты, те же допустимые ходы, те же проекции.
    pub fn into_game(self) -> Game {
        Game {
            players: self.players,
            table_top: self.table_top,
            deck: self.deck,
            trump_card: self.trump_card,
            victory: self.victory,
            history: self.history,
        }
    }
}

impl Game {
    /// Снять снэпшот текущего состояния.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }

    /// Восстановить партию из снэпшота.
    pub fn reconstruct(snapshot: GameSnapshot) -> Game {
        snapshot.into_game()
    }
}
