//! Доменная модель дурака: карты, колода, игроки, стол.

pub mod card;
pub mod deck;
pub mod player;
pub mod table_top;

/// Момент вылета игрока — порядковый номер действия в истории партии
/// (не wall-clock, чтобы reconstruct был детерминированным).
pub type ActionSeq = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use deck::*;
pub use player::*;
pub use table_top::*;
