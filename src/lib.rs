//! Движок подкидного дурака с переводом.
//!
//! Чистая синхронная машина состояний: колода + козырь, общий «стол»
//! (матрица атака/покрытие), кольцо ходов по активным местам, завершение
//! раунда, вылет игроков и определение победы. Сетевой транспорт, лобби и
//! клиентский протокол живут снаружи — движок только принимает ходы и
//! возвращает результат или ошибку.

pub mod domain;
pub mod engine;
pub mod infra;
pub mod state;

pub use engine::{EngineError, Game, RandomSource};
pub use state::GameSnapshot;
