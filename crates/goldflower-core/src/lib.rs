#![deny(warnings)]
pub mod deal;
pub mod input;
pub mod model;

pub use deal::{DerivedSeed, RoundDeal, SeedInput, ShuffleScheme, TimezonePolicy};
pub use input::{MAX_PLAYERS, PlayerNumber, RoundCommand, RoundNumber, SharedValue};
pub use model::card::Card;
pub use model::deck::Deck;
pub use model::hand::Hand;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "goldflower"
    }

    pub const fn tagline() -> &'static str {
        "Offline three-card dealer"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
