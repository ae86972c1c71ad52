use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::ActionSeq;

/// Статус игрока в партии: вылет — это флаг, а не удаление из списка,
/// чтобы seat-индексы оставались стабильными для кольцевой арифметики.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Standing {
    /// Игрок ещё в игре.
    Active,
    /// Игрок вышел (пустая рука при пустой колоде); внутри — номер
    /// действия, на котором это случилось.
    EliminatedAt(ActionSeq),
}

/// Состояние одного места за столом. Владеет им исключительно `Game`;
/// наружу уходят только проекции по значению.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Фиксированный порядок посадки (индекс в списке игроков).
    pub seat_order: usize,
    /// Рука. Дубликаты невозможны: каждая карта существует в одном экземпляре.
    pub hand: Vec<Card>,
    pub is_defending: bool,
    pub can_attack: bool,
    /// Этот игрок начал текущий раунд (он же «атакующий»).
    pub began_round: bool,
    /// Игрок объявил «бито» в текущем раунде.
    pub turned: bool,
    pub standing: Standing,
}

impl Player {
    pub fn new(name: String, seat_order: usize) -> Self {
        Self {
            name,
            seat_order,
            hand: Vec::new(),
            is_defending: false,
            can_attack: false,
            began_round: false,
            turned: false,
            standing: Standing::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.standing, Standing::Active)
    }

    pub fn has_card(&self, card: &Card) -> bool {
        self.hand.contains(card)
    }

    /// Забрать карту из руки. `None`, если карты нет.
    pub fn take_card(&mut self, card: &Card) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c == card)?;
        Some(self.hand.remove(idx))
    }

    /// Сбросить пер-раундовые флаги роли. Вызывается только движком
    /// в единственной точке переназначения ролей.
    pub fn reset_round_flags(&mut self) {
        self.is_defending = false;
        self.can_attack = false;
        self.began_round = false;
        self.turned = false;
    }
}
