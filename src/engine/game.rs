use std::collections::HashSet;

use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::player::{Player, Standing};
use crate::domain::table_top::TableTop;
use crate::engine::errors::EngineError;
use crate::engine::history::{ActionRecord, GameHistory};
use crate::engine::projection::{GameView, PlayerView, TableEntryView};
use crate::engine::ring;
use crate::engine::RandomSource;

/// Карт в руке после раздачи и добора.
pub const HAND_SIZE: usize = 6;
/// Максимум игроков в партии.
pub const MAX_PLAYERS: usize = 8;

/// Партия дурака.
///
/// Синхронная машина состояний с единственным владельцем: все операции
/// неблокирующие, в один момент времени допустим ровно один мутирующий
/// вызов (сериализацию доступа делает вызывающий слой). Любая ошибка
/// валидации возвращается ДО первой мутации — частично применённых ходов
/// не бывает.
///
/// Игроки живут в фиксированном порядке посадки и никогда не удаляются:
/// вылет — это флаг `Standing::EliminatedAt`, кольцевая арифметика идёт
/// по отфильтрованному списку активных.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) table_top: TableTop,
    pub(crate) trump_card: Card,
    pub(crate) victory: bool,
    pub(crate) history: GameHistory,
}

impl Game {
    /// Новая партия: тасовка, раздача по шесть карт по кругу, случайный
    /// первый защитник, вскрытие козыря (карта уходит под низ колоды —
    /// общее число карт не меняется).
    pub fn new<R: RandomSource>(names: &[&str], rng: &mut R) -> Result<Self, EngineError> {
        if names.is_empty() || names.len() > MAX_PLAYERS {
            return Err(EngineError::InvalidPlayerCount(names.len()));
        }
        let unique: HashSet<&str> = names.iter().copied().collect();
        if unique.len() != names.len() {
            return Err(EngineError::DuplicatePlayerNames);
        }

        let mut deck = Deck::standard_52();
        rng.shuffle(deck.cards.make_contiguous());

        let mut players: Vec<Player> = names
            .iter()
            .enumerate()
            .map(|(seat, name)| Player::new((*name).to_string(), seat))
            .collect();

        // Раздача по кругу: шесть кругов по одной карте каждому.
        for _ in 0..HAND_SIZE {
            for p in players.iter_mut() {
                let card = deck
                    .draw_front()
                    .ok_or(EngineError::InvalidGameState("deck exhausted during deal"))?;
                p.hand.push(card);
            }
        }

        // Козырь: вскрываем верхнюю карту и прячем её под низ колоды.
        let trump_card = deck
            .draw_front()
            .ok_or(EngineError::InvalidGameState("no card left for trump"))?;
        deck.push_back(trump_card);

        let mut game = Game {
            players,
            deck,
            table_top: TableTop::new(),
            trump_card,
            victory: false,
            history: GameHistory::new(),
        };
        game.history.append(ActionRecord::GameStarted {
            players: names.iter().map(|n| n.to_string()).collect(),
            trump: trump_card,
        });

        let first_defender = game.players[rng.pick_index(game.players.len())].name.clone();
        game.assign_defender(&first_defender)?;
        Ok(game)
    }

    // --- Чтение ---

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn table_top(&self) -> &TableTop {
        &self.table_top
    }

    pub fn trump_card(&self) -> Card {
        self.trump_card
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Текущий защитник.
    pub fn defender(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_defending)
    }

    /// Закрытая проекция партии для игрока `name`: своя рука целиком,
    /// у остальных — только размеры рук и публичные флаги, колода — числом.
    pub fn projection_for(&self, name: &str) -> Result<GameView, EngineError> {
        let idx = self.player_index(name)?;
        Ok(GameView {
            hero: name.to_string(),
            hand: self.players[idx].hand.clone(),
            trump_card: self.trump_card,
            deck_count: self.deck.len(),
            table_top: self
                .table_top
                .entries()
                .iter()
                .map(|(placed, cover)| TableEntryView {
                    placed: *placed,
                    cover: *cover,
                })
                .collect(),
            players: self.players.iter().map(PlayerView::from_player).collect(),
            victory: self.victory,
        })
    }

    // --- Ходы ---

    /// Подкинуть атакующую карту.
    ///
    /// Защитник этим же вызовом может ПЕРЕВЕСТИ защиту: картой того же
    /// ранга, пока ничего не покрыто, если у соседа хватает карт принять
    /// стол; защита при этом переходит соседу ещё до выкладывания карты.
    pub fn attack(&mut self, player: &str, card: Card) -> Result<(), EngineError> {
        if self.victory {
            return Err(EngineError::GameAlreadyWon);
        }
        if self.table_top.is_full() {
            return Err(EngineError::TableTopFull);
        }

        let idx = self.player_index(player)?;
        if !self.players[idx].has_card(&card) {
            return Err(EngineError::CardNotInHand(card));
        }

        // Подкидывать можно только ранги, уже лежащие на столе.
        if !self.table_top.is_empty() && !self.table_top.has_rank(card.rank) {
            return Err(EngineError::CardRankMismatch);
        }

        if self.players[idx].is_defending {
            if self.table_top.covered_count() != 0
                || !self.table_top.all_placed_have_rank(card.rank)
            {
                return Err(EngineError::InvalidDefenseTransfer);
            }
            let next_idx = ring::offset_from(&self.players, player, 1)?;
            if self.players[next_idx].hand.len() < self.table_top.len() + 1 {
                return Err(EngineError::InsufficientCoverCards);
            }
            let from = self.players[idx].name.clone();
            let to = self.players[next_idx].name.clone();
            self.assign_defender(&to)?;
            self.history.append(ActionRecord::DefensePassed { from, to, card });
        }

        // Все проверки пройдены — мутируем.
        let taken = self.players[idx]
            .take_card(&card)
            .ok_or(EngineError::CardNotInHand(card))?;
        self.table_top.place(taken)?;
        self.history.append(ActionRecord::AttackPlaced {
            player: player.to_string(),
            card,
        });

        // Пустая рука при пустой колоде — игрок выходит прямо сейчас.
        if self.players[idx].hand.is_empty() && self.deck.is_empty() {
            self.eliminate(idx);
            self.turn_done_at(idx)?;
            if !self.victory && ring::active_seats(&self.players).len() == 1 {
                self.set_victory();
            }
        }
        Ok(())
    }

    /// Покрыть атакующую карту в позиции `position` (0-based, в порядке
    /// выкладывания). Действует всегда текущий защитник.
    pub fn cover(&mut self, card: Card, position: usize) -> Result<(), EngineError> {
        if self.victory {
            return Err(EngineError::GameAlreadyWon);
        }
        let def_idx = self.defender_index()?;
        if !self.players[def_idx].has_card(&card) {
            return Err(EngineError::CardNotInHand(card));
        }

        let placed = *self
            .table_top
            .placed_at(position)
            .ok_or(EngineError::InvalidPosition(position))?;
        // Той же масти — только старше; чужой масти — только козырь.
        if !card.beats(&placed, self.trump_card.suit) {
            return Err(if card.suit == placed.suit {
                EngineError::CoverTooLow
            } else {
                EngineError::CoverWrongSuit
            });
        }

        self.table_top.cover_at(position, card)?;
        self.players[def_idx].take_card(&card);
        self.history.append(ActionRecord::CoverPlaced { card, position });

        // Всё покрыто или рука защитника пуста — раунд закрывается сразу.
        if self.table_top.covered_count() == self.table_top.len()
            || self.players[def_idx].hand.is_empty()
        {
            return self.finalise_round();
        }

        // Стол изменился — прежние «бито» недействительны.
        for p in self.players.iter_mut() {
            if p.is_active() && !p.is_defending {
                p.turned = false;
            }
        }
        Ok(())
    }

    /// Игрок объявляет «бито» для текущего раунда.
    pub fn declare_turn_done(&mut self, name: &str) -> Result<(), EngineError> {
        if self.victory {
            return Err(EngineError::GameAlreadyWon);
        }
        if self.table_top.is_empty() {
            return Err(EngineError::NothingPlaced);
        }
        let idx = self.player_index(name)?;
        self.turn_done_at(idx)
    }

    /// Принудительно закрыть раунд (обычно срабатывает само из ходов;
    /// вызывающий слой может дёргать напрямую, например по таймауту).
    pub fn finalise_round(&mut self) -> Result<(), EngineError> {
        if self.victory {
            return Err(EngineError::GameAlreadyWon);
        }
        if self.table_top.is_empty() {
            return Err(EngineError::NothingPlaced);
        }

        // Начавший раунд — от его места пойдёт добор.
        // Фиксируем до переназначения ролей.
        let starter_seat = self
            .players
            .iter()
            .find(|p| p.began_round)
            .map(|p| p.seat_order)
            .ok_or(EngineError::InvalidGameState("no round starter"))?;
        let def_idx = self.defender_index()?;
        let defender = self.players[def_idx].name.clone();

        let forfeit = self.table_top.uncovered_count() > 0;

        // Снимаем стол: при форфейте всё уходит защитнику,
        // при отбое карты покидают игру.
        let cards = self.table_top.clear();
        if forfeit {
            self.history.append(ActionRecord::CardsForfeited {
                defender: defender.clone(),
                cards: cards.clone(),
            });
            self.players[def_idx].hand.extend(cards);
        }

        self.history.append(ActionRecord::RoundClosed { forfeit });
        self.history.finalize_current_node();

        // Не отбился — защита перескакивает через одного.
        let shift = if forfeit { 2 } else { 1 };
        let new_def_idx = ring::offset_from(&self.players, &defender, shift)?;
        let new_defender = self.players[new_def_idx].name.clone();
        self.assign_defender(&new_defender)?;

        // Добор до шести с головы колоды, начиная с начавшего раунд.
        if !self.deck.is_empty() {
            'players: for idx in ring::active_from_seat(&self.players, starter_seat) {
                while self.players[idx].hand.len() < HAND_SIZE {
                    match self.deck.draw_front() {
                        Some(card) => self.players[idx].hand.push(card),
                        None => break 'players,
                    }
                }
            }
        }

        // Вылет: пустая рука при пустой колоде выводит из игры.
        // Защитник не выходит — защита обязательна, «выиграть» опустошив
        // руку он не может.
        if self.deck.is_empty() {
            let emptied: Vec<usize> = self
                .players
                .iter()
                .enumerate()
                .filter(|(i, p)| p.is_active() && p.hand.is_empty() && *i != new_def_idx)
                .map(|(i, _)| i)
                .collect();
            for idx in emptied {
                self.eliminate(idx);
                // Стол пуст, объявлять «бито» нечему — только сам флаг.
                self.players[idx].turned = true;
            }
        }

        if ring::active_seats(&self.players).len() == 1 {
            self.set_victory();
        }
        Ok(())
    }

    // --- Внутреннее ---

    fn player_index(&self, name: &str) -> Result<usize, EngineError> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| EngineError::PlayerNotFound(name.to_string()))
    }

    fn defender_index(&self) -> Result<usize, EngineError> {
        self.players
            .iter()
            .position(|p| p.is_defending)
            .ok_or(EngineError::InvalidGameState("no defender"))
    }

    /// Единственная точка (пере)назначения ролей: сбрасывает пер-раундовые
    /// флаги у всех, ставит защитника и атакующего (кольцо, смещение −1).
    fn assign_defender(&mut self, name: &str) -> Result<(), EngineError> {
        if self.victory {
            return Err(EngineError::GameAlreadyWon);
        }
        let def_idx = self.player_index(name)?;
        let atk_idx = ring::offset_from(&self.players, name, -1)?;

        for p in self.players.iter_mut() {
            p.reset_round_flags();
        }
        self.players[def_idx].is_defending = true;
        self.players[atk_idx].can_attack = true;
        self.players[atk_idx].began_round = true;

        self.history.append(ActionRecord::DefenderAssigned {
            defender: self.players[def_idx].name.clone(),
            attacker: self.players[atk_idx].name.clone(),
        });
        Ok(())
    }

    fn turn_done_at(&mut self, idx: usize) -> Result<(), EngineError> {
        self.players[idx].turned = true;
        self.history.append(ActionRecord::TurnDeclaredDone {
            player: self.players[idx].name.clone(),
        });

        // «Бито» от атакующего или защитника открывает подкидывание всем
        // активным, кроме самого защитника.
        if self.players[idx].began_round || self.players[idx].is_defending {
            for p in self.players.iter_mut() {
                if p.is_active() && !p.is_defending {
                    p.can_attack = true;
                }
            }
        }

        self.try_auto_finalise(idx)
    }

    /// Три условия автозакрытия раунда, в порядке приоритета.
    fn try_auto_finalise(&mut self, idx: usize) -> Result<(), EngineError> {
        let def_idx = self.defender_index()?;

        // (a) все активные сказали «бито»
        let all_turned = self
            .players
            .iter()
            .filter(|p| p.is_active())
            .all(|p| p.turned);
        if all_turned {
            return self.finalise_round();
        }

        // (b) «бито» от защитника при безнадёжном столе
        if idx == def_idx {
            let uncovered = self.table_top.uncovered_count();
            let four_same_rank = uncovered == 4 && {
                let mut ranks = self.table_top.uncovered().map(|c| c.rank);
                match ranks.next() {
                    Some(first) => ranks.all(|r| r == first),
                    None => false,
                }
            };
            if self.table_top.is_full()
                || uncovered == self.players[def_idx].hand.len()
                || four_same_rank
            {
                return self.finalise_round();
            }
        }

        // (c) все, кроме защитника, сказали «бито», и стол полностью покрыт
        let others_turned = self
            .players
            .iter()
            .filter(|p| p.is_active() && !p.is_defending)
            .all(|p| p.turned);
        if others_turned && self.table_top.covered_count() == self.table_top.len() {
            return self.finalise_round();
        }
        Ok(())
    }

    fn eliminate(&mut self, idx: usize) {
        let at = self.history.action_count();
        self.players[idx].standing = Standing::EliminatedAt(at);
        self.history.append(ActionRecord::PlayerEliminated {
            player: self.players[idx].name.clone(),
        });
    }

    /// Победа терминальна: флаг никогда не снимается, все мутаторы после
    /// этого отвечают `GameAlreadyWon`.
    fn set_victory(&mut self) {
        self.victory = true;
        self.history.append(ActionRecord::GameWon);
        self.history.finalize_current_node();
    }
}
