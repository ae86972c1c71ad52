use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::table_top::TableTopError;

/// Ошибки движка дурака.
///
/// Любая ошибка валидации означает: состояние партии НЕ изменилось.
/// Наружу движок не пишет логов и не ретраит — вызывающий слой сам
/// переводит ошибку в отказ хода для клиента.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    // --- Ошибки создания партии ---
    #[error("Недопустимое число игроков: {0} (нужно от 1 до 8)")]
    InvalidPlayerCount(usize),

    #[error("Имена игроков должны быть уникальны")]
    DuplicatePlayerNames,

    // --- Ошибки состояния ---
    #[error("Партия уже завершена")]
    GameAlreadyWon,

    /// Внутренний инвариант нарушен (нет защитника / нет начавшего раунд).
    /// Фатально: сессию с такой партией нужно завершать, а не продолжать.
    #[error("Внутренняя ошибка состояния: {0}")]
    InvalidGameState(&'static str),

    // --- Ошибки хода ---
    #[error("Игрок {0} не найден в партии")]
    PlayerNotFound(String),

    #[error("Игрок {0} не среди активных")]
    PlayerNotInRing(String),

    #[error("Карты {0} нет в руке")]
    CardNotInHand(Card),

    #[error("На столе уже шесть карт")]
    TableTopFull,

    #[error("Карта {0} уже лежит на столе")]
    DuplicateTableCard(Card),

    #[error("Ранг карты не совпадает ни с одной картой на столе")]
    CardRankMismatch,

    #[error("Перевод защиты сейчас невозможен")]
    InvalidDefenseTransfer,

    #[error("У следующего игрока не хватает карт, чтобы принять перевод")]
    InsufficientCoverCards,

    #[error("Нет атакующей карты в позиции {0}")]
    InvalidPosition(usize),

    #[error("Карта той же масти, но не старше — покрыть нельзя")]
    CoverTooLow,

    #[error("Покрыть можно картой той же масти или козырем")]
    CoverWrongSuit,

    #[error("На столе ничего не разыграно")]
    NothingPlaced,
}

impl From<TableTopError> for EngineError {
    fn from(e: TableTopError) -> Self {
        match e {
            TableTopError::Full => EngineError::TableTopFull,
            TableTopError::DuplicateCard(card) => EngineError::DuplicateTableCard(card),
            // Покрытие уже покрытой позиции — тот же класс ошибки клиента,
            // что и несуществующая позиция: покрывать там нечего.
            TableTopError::NoSuchPosition(pos) | TableTopError::AlreadyCovered(pos) => {
                EngineError::InvalidPosition(pos)
            }
        }
    }
}
