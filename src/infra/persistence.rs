use std::collections::HashMap;

use crate::state::GameSnapshot;

/// Абстракция хранилища партий.
///
/// Движок сам никуда не пишет: сессионный слой снимает `GameSnapshot`
/// и кладёт его сюда под своим идентификатором партии. Удобно:
/// - для юнит- и интеграционных тестов round-trip-а,
/// - для оффлайн-инструментов (dev CLI, реплей).
pub trait GameStorage {
    /// Загрузить снэпшот партии.
    fn load_game(&self, id: &str) -> Option<GameSnapshot>;

    /// Сохранить снэпшот партии.
    fn save_game(&mut self, id: &str, snapshot: &GameSnapshot);

    /// Удалить партию (сессия закончилась).
    fn remove_game(&mut self, id: &str);
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryGameStorage {
    games: HashMap<String, GameSnapshot>,
}

impl InMemoryGameStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStorage for InMemoryGameStorage {
    fn load_game(&self, id: &str) -> Option<GameSnapshot> {
        self.games.get(id).cloned()
    }

    fn save_game(&mut self, id: &str, snapshot: &GameSnapshot) {
        self.games.insert(id.to_string(), snapshot.clone());
    }

    fn remove_game(&mut self, id: &str) {
        self.games.remove(id);
    }
}
