use serde::Serialize;
use tracing::{Level, event};

use crate::deal::seed::{DerivedSeed, SeedInput};
use crate::deal::shuffle::{ShuffleScheme, shuffle};
use crate::input::PlayerNumber;
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::hand::{Hand, extract_hand};

/// One round, fully computed: derive, then shuffle. Hands are sliced on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDeal {
    input: SeedInput,
    scheme: ShuffleScheme,
    seed: DerivedSeed,
    shuffled: Vec<Card>,
}

impl RoundDeal {
    pub fn compute(input: SeedInput, scheme: ShuffleScheme, deck: &Deck) -> Self {
        let seed = input.derive();
        let shuffled = shuffle(deck, &seed, scheme);
        debug_assert_eq!(shuffled.len(), DECK_SIZE);

        event!(
            target: "goldflower_core::deal",
            Level::DEBUG,
            midnight = input.midnight_timestamp,
            round = input.round_number.get(),
            scheme = scheme.as_str(),
            seed = %seed.to_hex(),
        );

        Self {
            input,
            scheme,
            seed,
            shuffled,
        }
    }

    pub fn input(&self) -> &SeedInput {
        &self.input
    }

    pub fn scheme(&self) -> ShuffleScheme {
        self.scheme
    }

    pub fn seed(&self) -> &DerivedSeed {
        &self.seed
    }

    pub fn shuffled(&self) -> &[Card] {
        &self.shuffled
    }

    pub fn hand(&self, player: PlayerNumber) -> Hand {
        extract_hand(&self.shuffled, player)
    }

    /// Every seat's hand, player 1 first.
    pub fn hands(&self) -> Vec<(PlayerNumber, Hand)> {
        PlayerNumber::all()
            .map(|player| (player, self.hand(player)))
            .collect()
    }

    /// The 52nd card, which no seat receives.
    pub fn undealt(&self) -> Card {
        self.shuffled[DECK_SIZE - 1]
    }

    pub fn report(&self) -> TableReport {
        TableReport {
            midnight_timestamp: self.input.midnight_timestamp,
            round_number: self.input.round_number.get(),
            scheme: self.scheme,
            seed: self.seed,
            seed_hex: self.seed.to_hex(),
            hands: self
                .hands()
                .into_iter()
                .map(|(player, hand)| SeatReport { player, hand })
                .collect(),
            undealt: self.undealt(),
        }
    }
}

/// Derive, shuffle and slice in one call against the shared canonical deck.
pub fn deal_round(input: SeedInput, scheme: ShuffleScheme) -> RoundDeal {
    RoundDeal::compute(input, scheme, Deck::canonical())
}

/// Serializable view of a whole table, used for audits.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub midnight_timestamp: i64,
    pub round_number: u64,
    pub scheme: ShuffleScheme,
    pub seed: DerivedSeed,
    pub seed_hex: String,
    pub hands: Vec<SeatReport>,
    pub undealt: Card,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatReport {
    pub player: PlayerNumber,
    pub hand: Hand,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{RoundNumber, SharedValue};
    use std::collections::HashSet;

    fn reference_input() -> SeedInput {
        SeedInput::new(
            1_700_000_000,
            RoundNumber::new(1).unwrap(),
            SharedValue::new("42").unwrap(),
        )
    }

    #[test]
    fn player_one_gets_first_three_cards() {
        let deal = deal_round(reference_input(), ShuffleScheme::Mt19937);
        let player = PlayerNumber::new(1).unwrap();
        assert_eq!(deal.hand(player).to_string(), "♦3, ♦4, ♥K");
    }

    #[test]
    fn last_player_gets_indices_48_to_51() {
        let deal = deal_round(reference_input(), ShuffleScheme::Mt19937);
        let player = PlayerNumber::new(17).unwrap();
        assert_eq!(deal.hand(player).cards(), &deal.shuffled()[48..51]);
        assert_eq!(deal.hand(player).to_string(), "♠3, ♦K, ♥J");
        assert_eq!(deal.undealt().to_string(), "♠9");
    }

    #[test]
    fn table_uses_51_distinct_cards() {
        let deal = deal_round(reference_input(), ShuffleScheme::ChaCha20);
        let dealt: HashSet<Card> = deal
            .hands()
            .iter()
            .flat_map(|(_, hand)| hand.cards().iter().copied())
            .collect();
        assert_eq!(dealt.len(), 51);
        assert!(!dealt.contains(&deal.undealt()));
    }

    #[test]
    fn report_lists_every_seat() {
        let deal = deal_round(reference_input(), ShuffleScheme::Mt19937);
        let report = deal.report();
        assert_eq!(report.hands.len(), 17);
        assert_eq!(report.round_number, 1);
        assert_eq!(report.seed_hex, deal.seed().to_hex());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scheme"], "mt19937");
        assert_eq!(json["hands"][0]["player"], 1);
        assert_eq!(json["undealt"]["suit"], "Spades");
        assert_eq!(json["undealt"]["rank"], "Nine");
    }

    #[test]
    fn compute_accepts_any_deck_reference() {
        let deck = Deck::standard();
        let a = RoundDeal::compute(reference_input(), ShuffleScheme::Mt19937, &deck);
        let b = deal_round(reference_input(), ShuffleScheme::Mt19937);
        assert_eq!(a, b);
        assert_eq!(a.scheme(), ShuffleScheme::Mt19937);
        assert_eq!(a.input(), &reference_input());
    }
}
