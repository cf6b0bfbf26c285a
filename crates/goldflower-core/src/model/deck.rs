use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use once_cell::sync::Lazy;

pub const DECK_SIZE: usize = 52;

static CANONICAL: Lazy<Deck> = Lazy::new(Deck::standard);

/// The 52-card deck in canonical order: suits in [`Suit::ALL`] order, ranks
/// ascending within each suit. Never mutated; shuffles work on copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    /// Process-wide instance shared by every deal.
    pub fn canonical() -> &'static Deck {
        &CANONICAL
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn to_vec(&self) -> Vec<Card> {
        self.cards.clone()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn build_deck() -> Deck {
    Deck::standard()
}
