use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Тип действия в партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionRecord {
    /// Партия создана: список имён и вскрытый козырь.
    GameStarted {
        players: Vec<String>,
        trump: Card,
    },

    /// Назначен новый защитник (и, значит, новый атакующий).
    DefenderAssigned {
        defender: String,
        attacker: String,
    },

    /// Атакующая карта легла на стол.
    AttackPlaced {
        player: String,
        card: Card,
    },

    /// Защитник перевёл защиту картой того же ранга.
    DefensePassed {
        from: String,
        to: String,
        card: Card,
    },

    /// Защитник покрыл карту в позиции.
    CoverPlaced {
        card: Card,
        position: usize,
    },

    /// Игрок объявил «бито».
    TurnDeclaredDone {
        player: String,
    },

    /// Защитник не отбился и забрал карты со стола.
    CardsForfeited {
        defender: String,
        cards: Vec<Card>,
    },

    /// Раунд закрыт (стол очищен, карты добраны).
    RoundClosed {
        forfeit: bool,
    },

    /// Игрок вышел из партии.
    PlayerEliminated {
        player: String,
    },

    /// Партия завершена.
    GameWon,
}

/// Один «узел» истории: действия одного раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryNode {
    pub index: u32,
    pub actions: Vec<ActionRecord>,
    /// Узел закрыт — раунд завершён, дописывать в него больше нельзя.
    pub finalized: bool,
}

/// История партии: append-only последовательность узлов-раундов.
///
/// Производная от действий движка, а не источник истины: движок только
/// дописывает (`append`), закрывает текущий узел (`finalize_current_node`)
/// и читает последний (`last_node`). Ничего из истории он не воспроизводит.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameHistory {
    pub nodes: Vec<HistoryNode>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Дописать действие в текущий открытый узел.
    /// Если открытого узла нет — открывается новый.
    pub fn append(&mut self, record: ActionRecord) {
        let needs_node = self
            .nodes
            .last()
            .map(|n| n.finalized)
            .unwrap_or(true);
        if needs_node {
            let index = self.nodes.len() as u32;
            self.nodes.push(HistoryNode {
                index,
                actions: Vec::new(),
                finalized: false,
            });
        }
        if let Some(node) = self.nodes.last_mut() {
            node.actions.push(record);
        }
    }

    /// Закрыть текущий узел (граница раунда). Без открытого узла — no-op.
    pub fn finalize_current_node(&mut self) {
        if let Some(node) = self.nodes.last_mut() {
            node.finalized = true;
        }
    }

    /// Последний узел (открытый или закрытый).
    pub fn last_node(&self) -> Option<&HistoryNode> {
        self.nodes.last()
    }

    /// Общее число записанных действий. Используется движком как
    /// детерминированная «метка времени» для момента вылета игрока.
    pub fn action_count(&self) -> u64 {
        self.nodes.iter().map(|n| n.actions.len() as u64).sum()
    }
}
