//! Кольцевая арифметика по активным местам.
//!
//! Единственный источник истины для «атакующий», «сосед слева» и т.п.
//! Всегда работает по отфильтрованному списку активных игроков, а не по
//! всем местам: вылетевшие остаются в списке, но в кольце не участвуют.

use crate::domain::player::Player;
use crate::engine::errors::EngineError;

/// Индексы активных мест в порядке посадки.
pub fn active_seats(players: &[Player]) -> Vec<usize> {
    players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_active())
        .map(|(i, _)| i)
        .collect()
}

/// Игрок на смещении `k` от `anchor` по кольцу активных.
///
/// Отрицательные `k` нормализуются в [0, count). Возвращает индекс
/// в исходном списке игроков. `anchor` обязан быть активным.
pub fn offset_from(players: &[Player], anchor: &str, k: i64) -> Result<usize, EngineError> {
    let ring = active_seats(players);
    let pos = ring
        .iter()
        .position(|&i| players[i].name == anchor)
        .ok_or_else(|| EngineError::PlayerNotInRing(anchor.to_string()))?;

    let count = ring.len() as i64;
    let shifted = (pos as i64 + k).rem_euclid(count);
    Ok(ring[shifted as usize])
}

/// Активные места в кольцевом порядке, начиная с первого активного
/// на позиции `seat` или после неё (с заворотом). Нужно для добора карт:
/// начавший раунд мог уже вылететь, но обход всё равно стартует с его места.
pub fn active_from_seat(players: &[Player], seat: usize) -> Vec<usize> {
    let ring = active_seats(players);
    if ring.is_empty() {
        return ring;
    }
    let start = ring
        .iter()
        .position(|&i| i >= seat)
        .unwrap_or(0);
    let mut ordered = Vec::with_capacity(ring.len());
    for k in 0..ring.len() {
        ordered.push(ring[(start + k) % ring.len()]);
    }
    ordered
}
