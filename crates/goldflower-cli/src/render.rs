use std::io::{self, Write};

use goldflower_core::deal::{DerivedSeed, RoundDeal, ShuffleScheme};
use goldflower_core::input::{MAX_PLAYERS, PlayerNumber, RoundNumber};
use goldflower_core::model::card::Card;
use goldflower_core::model::hand::Hand;
use serde::Serialize;

use crate::config::CardStyle;

pub fn card_text(card: Card, style: CardStyle) -> String {
    match style {
        CardStyle::Symbols => card.to_string(),
        CardStyle::Ascii => card.ascii(),
    }
}

pub fn hand_text(hand: &Hand, style: CardStyle) -> String {
    match style {
        CardStyle::Symbols => hand.to_string(),
        CardStyle::Ascii => hand.ascii(),
    }
}

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "==================== Offline Golden Flower ===================="
    )?;
    writeln!(out, "How it works:")?;
    writeln!(out, "1. Every player picks their own player number (1, 2, 3...)")?;
    writeln!(
        out,
        "2. Up to {MAX_PLAYERS} players (3 cards each from a 52-card deck)"
    )?;
    writeln!(
        out,
        "3. All players enter the same shared value (agree on it among yourselves)"
    )?;
    writeln!(
        out,
        "4. Before each round, all players enter the same round number"
    )?;
    writeln!(
        out,
        "5. Cards are dealt from the shared value, today's date and the round number;"
    )?;
    writeln!(out, "   every player receives 3 cards nobody else holds")?;
    writeln!(
        out,
        "==============================================================="
    )
}

pub fn write_round<W: Write>(
    out: &mut W,
    round: RoundNumber,
    player: PlayerNumber,
    hand: &Hand,
    seed: &DerivedSeed,
    style: CardStyle,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "===== Round {round} =====")?;
    writeln!(out, "Player {player}'s cards: {}", hand_text(hand, style))?;
    writeln!(out, "Seed: {seed}")
}

/// Every seat at the table, for checking other players' claims.
pub fn write_table<W: Write>(out: &mut W, deal: &RoundDeal, style: CardStyle) -> io::Result<()> {
    let input = deal.input();
    writeln!(out, "===== Round {} audit =====", input.round_number)?;
    writeln!(out, "Midnight timestamp: {}", input.midnight_timestamp)?;
    writeln!(out, "Scheme: {}", deal.scheme())?;
    writeln!(out, "Seed: {}", deal.seed())?;
    for (player, hand) in deal.hands() {
        writeln!(out, "Player {player:>2}: {}", hand_text(&hand, style))?;
    }
    writeln!(out, "Undealt: {}", card_text(deal.undealt(), style))
}

/// One player's view of a round, as printed by `deal --json`.
#[derive(Debug, Clone, Serialize)]
pub struct DealReport {
    pub player: PlayerNumber,
    pub round_number: RoundNumber,
    pub midnight_timestamp: i64,
    pub scheme: ShuffleScheme,
    pub seed: DerivedSeed,
    pub seed_hex: String,
    pub hand: Vec<String>,
}

impl DealReport {
    pub fn new(deal: &RoundDeal, player: PlayerNumber, style: CardStyle) -> Self {
        let input = deal.input();
        Self {
            player,
            round_number: input.round_number,
            midnight_timestamp: input.midnight_timestamp,
            scheme: deal.scheme(),
            seed: *deal.seed(),
            seed_hex: deal.seed().to_hex(),
            hand: deal
                .hand(player)
                .iter()
                .map(|card| card_text(*card, style))
                .collect(),
        }
    }
}
