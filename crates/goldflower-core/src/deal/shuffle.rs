use core::fmt;
use core::str::FromStr;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deal::mt::Mt19937;
use crate::deal::seed::DerivedSeed;
use crate::model::card::Card;
use crate::model::deck::Deck;

/// Generator plus shuffle algorithm. A scheme's output for a given seed is
/// frozen once released; new behavior gets a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleScheme {
    /// MT19937 seeded from the seed's 32-bit words, descending Fisher-Yates
    /// with bit-rejection sampling. Existing tables deal with this scheme.
    #[default]
    Mt19937,
    /// ChaCha20 keyed with the raw digest, shuffled by `rand` 0.8.
    #[serde(rename = "chacha20")]
    ChaCha20,
}

impl ShuffleScheme {
    pub const ALL: [ShuffleScheme; 2] = [ShuffleScheme::Mt19937, ShuffleScheme::ChaCha20];

    pub const fn as_str(self) -> &'static str {
        match self {
            ShuffleScheme::Mt19937 => "mt19937",
            ShuffleScheme::ChaCha20 => "chacha20",
        }
    }
}

impl fmt::Display for ShuffleScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shuffle scheme '{0}' (expected mt19937 or chacha20)")]
pub struct UnknownScheme(pub String);

impl FromStr for ShuffleScheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mt19937" | "mt" => Ok(ShuffleScheme::Mt19937),
            "chacha20" | "chacha" => Ok(ShuffleScheme::ChaCha20),
            _ => Err(UnknownScheme(s.to_string())),
        }
    }
}

/// Permute a private copy of `deck`; the deck itself is left untouched.
pub fn shuffle(deck: &Deck, seed: &DerivedSeed, scheme: ShuffleScheme) -> Vec<Card> {
    let mut cards = deck.to_vec();
    match scheme {
        ShuffleScheme::Mt19937 => {
            let mut rng = Mt19937::from_key(&seed.key_words());
            fisher_yates_descending(&mut cards, &mut rng);
        }
        ShuffleScheme::ChaCha20 => {
            let mut rng = ChaCha20Rng::from_seed(*seed.digest());
            cards.shuffle(&mut rng);
        }
    }
    cards
}

fn fisher_yates_descending<T>(items: &mut [T], rng: &mut Mt19937) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}
