//! Движок партии дурака.
//!
//! Высокоуровневый объект: `Game`
//! Основные операции:
//!   - `Game::new` – создать партию (тасовка + раздача)
//!   - `attack` / `cover` / `declare_turn_done` – ходы игроков
//!   - `finalise_round` – закрытие раунда (обычно срабатывает само)
//!   - `projection_for` – закрытая проекция для одного игрока

pub mod errors;
pub mod game;
pub mod history;
pub mod projection;
pub mod ring;

pub use errors::EngineError;
pub use game::{Game, HAND_SIZE, MAX_PLAYERS};
pub use history::{ActionRecord, GameHistory, HistoryNode};
pub use projection::{GameView, PlayerView, TableEntryView};

/// RNG интерфейс для движка. Реализации — в infra (обёртки над `rand`),
/// в тестах — детерминированные заглушки.
pub trait RandomSource {
    /// Перемешать срез на месте (равномерная перестановка).
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Случайный индекс в диапазоне [0, upper). `upper` должен быть > 0.
    fn pick_index(&mut self, upper: usize) -> usize;
}
