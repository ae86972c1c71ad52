use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Колода карт: упорядоченный список ещё не розданных карт.
/// Берём только с головы, кладём только в хвост — других мутаций нет.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: VecDeque<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = VecDeque::with_capacity(52);
        for suit in [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades] {
            for rank in [
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
                Rank::Nine,
                Rank::Ten,
                Rank::Jack,
                Rank::Queen,
                Rank::King,
                Rank::Ace,
            ] {
                cards.push_back(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту с головы колоды.
    pub fn draw_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Положить карту в хвост колоды (так «прячется» показанный козырь).
    pub fn push_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Показать верхнюю карту, не снимая её.
    pub fn peek_front(&self) -> Option<&Card> {
        self.cards.front()
    }
}
