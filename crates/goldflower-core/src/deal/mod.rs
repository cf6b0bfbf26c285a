pub mod clock;
pub mod mt;
pub mod round;
pub mod seed;
pub mod shuffle;

pub use clock::{ClockError, DayClock, TimezonePolicy, midnight_for_date, midnight_timestamp};
pub use round::{RoundDeal, TableReport, deal_round};
pub use seed::{DerivedSeed, SeedInput, derive_seed};
pub use shuffle::{ShuffleScheme, UnknownScheme, shuffle};
