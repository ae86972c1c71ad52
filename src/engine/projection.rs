//! Закрытые проекции состояния партии.
//!
//! Это анти-чит граница движка: для чужих игроков наружу уходят только
//! размер руки и публичные флаги, никогда — сами карты. Остаток колоды
//! отдаётся числом, содержимое не раскрывается.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::player::{Player, Standing};

/// Публичный вид одного игрока (без карт).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub name: String,
    pub seat_order: usize,
    pub hand_size: usize,
    pub is_defending: bool,
    pub can_attack: bool,
    pub began_round: bool,
    pub turned: bool,
    pub eliminated: bool,
}

impl PlayerView {
    pub fn from_player(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            seat_order: p.seat_order,
            hand_size: p.hand.len(),
            is_defending: p.is_defending,
            can_attack: p.can_attack,
            began_round: p.began_round,
            turned: p.turned,
            eliminated: !matches!(p.standing, Standing::Active),
        }
    }
}

/// Пара на столе: атака и (возможно) покрытие. Стол публичен целиком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableEntryView {
    pub placed: Card,
    pub cover: Option<Card>,
}

/// Проекция партии для конкретного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameView {
    /// Чья это проекция.
    pub hero: String,
    /// Полная рука героя — единственная раскрытая рука.
    pub hand: Vec<Card>,
    pub trump_card: Card,
    /// Остаток колоды: только количество.
    pub deck_count: usize,
    pub table_top: Vec<TableEntryView>,
    pub players: Vec<PlayerView>,
    pub victory: bool,
}
