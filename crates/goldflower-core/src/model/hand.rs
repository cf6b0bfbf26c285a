use crate::input::PlayerNumber;
use crate::model::card::Card;
use core::fmt;
use serde::Serialize;

pub const HAND_SIZE: usize = 3;

/// Three cards dealt to one player, in the order they sit in the shuffled deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
}

impl Hand {
    pub const fn new(cards: [Card; HAND_SIZE]) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn ascii(&self) -> String {
        self.cards
            .iter()
            .map(|card| card.ascii())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.cards;
        write!(f, "{a}, {b}, {c}")
    }
}

/// Index window `[3(p-1), 3(p-1)+3)` owned by `player`.
pub const fn hand_window(player: PlayerNumber) -> core::ops::Range<usize> {
    let start = (player.get() as usize - 1) * HAND_SIZE;
    start..start + HAND_SIZE
}

/// Slice the hand owned by `player` out of a shuffled deck.
///
/// `shuffled` must hold a full deck; the player number is already range
/// checked, so the window always fits.
pub fn extract_hand(shuffled: &[Card], player: PlayerNumber) -> Hand {
    let window = hand_window(player);
    let slice = &shuffled[window];
    Hand::new([slice[0], slice[1], slice[2]])
}
