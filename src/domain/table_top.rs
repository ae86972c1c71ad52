use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank};

/// Максимум атакующих карт на столе за один раунд.
pub const MAX_TABLE_CARDS: usize = 6;

/// Ошибки уровня стола (движок переводит их в свои `EngineError`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableTopError {
    /// На столе уже шесть атакующих карт.
    Full,
    /// Такая атакующая карта уже лежит на столе.
    DuplicateCard(Card),
    /// По этой позиции нет атакующей карты.
    NoSuchPosition(usize),
    /// Атакующая карта в этой позиции уже покрыта.
    AlreadyCovered(usize),
}

/// «Стол» раунда: матрица атака → покрытие.
///
/// Явный упорядоченный список пар вместо map-а: порядок вставки — часть
/// наблюдаемого состояния (позиции для cover), и он не должен зависеть от
/// порядка итерации хеш-таблицы.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableTop {
    entries: Vec<(Card, Option<Card>)>,
}

impl TableTop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_TABLE_CARDS
    }

    /// Положить атакующую карту (непокрытую).
    pub fn place(&mut self, card: Card) -> Result<(), TableTopError> {
        if self.is_full() {
            return Err(TableTopError::Full);
        }
        if self.entries.iter().any(|(c, _)| *c == card) {
            return Err(TableTopError::DuplicateCard(card));
        }
        self.entries.push((card, None));
        Ok(())
    }

    /// Покрыть атакующую карту по позиции (0-based, в порядке вставки).
    pub fn cover_at(&mut self, position: usize, card: Card) -> Result<(), TableTopError> {
        let (_, slot) = self
            .entries
            .get_mut(position)
            .ok_or(TableTopError::NoSuchPosition(position))?;
        if slot.is_some() {
            return Err(TableTopError::AlreadyCovered(position));
        }
        *slot = Some(card);
        Ok(())
    }

    /// Атакующая карта по позиции (без покрытия).
    pub fn placed_at(&self, position: usize) -> Option<&Card> {
        self.entries.get(position).map(|(c, _)| c)
    }

    /// Сколько атакующих карт уже покрыто.
    pub fn covered_count(&self) -> usize {
        self.entries.iter().filter(|(_, cover)| cover.is_some()).count()
    }

    /// Сколько ещё не покрыто.
    pub fn uncovered_count(&self) -> usize {
        self.entries.len() - self.covered_count()
    }

    /// Есть ли на столе карта такого ранга (среди атак и покрытий).
    pub fn has_rank(&self, rank: Rank) -> bool {
        self.flat_cards().any(|c| c.rank == rank)
    }

    /// Все ли атакующие карты этого ранга.
    pub fn all_placed_have_rank(&self, rank: Rank) -> bool {
        self.entries.iter().all(|(c, _)| c.rank == rank)
    }

    /// Непокрытые атакующие карты.
    pub fn uncovered(&self) -> impl Iterator<Item = &Card> + '_ {
        self.entries
            .iter()
            .filter(|(_, cover)| cover.is_none())
            .map(|(c, _)| c)
    }

    /// Ленивая последовательность всех карт на столе: атаки, затем их
    /// покрытия. Конечная и перезапускаемая (каждый вызов — новый проход).
    pub fn flat_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.entries
            .iter()
            .flat_map(|(placed, cover)| std::iter::once(placed).chain(cover.iter()))
    }

    /// Пары (атака, покрытие) в порядке вставки.
    pub fn entries(&self) -> &[(Card, Option<Card>)] {
        &self.entries
    }

    /// Снять со стола всё (карты уходят вызывающему).
    pub fn clear(&mut self) -> Vec<Card> {
        let cards = self.flat_cards().copied().collect();
        self.entries.clear();
        cards
    }
}
