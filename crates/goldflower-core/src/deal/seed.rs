use core::fmt;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::input::{RoundNumber, SharedValue};

/// Everything the participants agree on for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedInput {
    pub midnight_timestamp: i64,
    pub round_number: RoundNumber,
    pub shared_value: SharedValue,
}

impl SeedInput {
    pub fn new(midnight_timestamp: i64, round_number: RoundNumber, shared_value: SharedValue) -> Self {
        Self {
            midnight_timestamp,
            round_number,
            shared_value,
        }
    }

    pub fn derive(&self) -> DerivedSeed {
        derive_seed(
            self.midnight_timestamp,
            self.round_number.get(),
            self.shared_value.as_str(),
        )
    }
}

/// SHA-256 digest of the seed input, read as a big-endian 256-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedSeed([u8; 32]);

impl DerivedSeed {
    pub const fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    pub const fn digest(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Little-endian 32-bit words of the integer with high zero words dropped,
    /// keeping at least one word. This is the key MT19937 is seeded with.
    pub fn key_words(&self) -> Vec<u32> {
        let mut words: Vec<u32> = self
            .0
            .rchunks_exact(4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        while words.len() > 1 && words.last() == Some(&0) {
            words.pop();
        }
        words
    }
}

impl fmt::Display for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerivedSeed").field(&self.to_hex()).finish()
    }
}

impl Serialize for DerivedSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hash `"{midnight_timestamp}{round_number}{shared_value}"` with SHA-256.
///
/// The pieces are concatenated without separators in their plain decimal
/// form, exactly as every other participant's copy of the tool does.
pub fn derive_seed(midnight_timestamp: i64, round_number: u64, shared_value: &str) -> DerivedSeed {
    let text = format!("{midnight_timestamp}{round_number}{shared_value}");
    let digest = Sha256::digest(text.as_bytes());
    DerivedSeed(digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_DECIMAL: &str =
        "91769915986241337988181309402629325622898977349475231880470150982702282343569";
    const REFERENCE_HEX: &str = "cae3ee883e0a2f05caa233e776e9b21f620e5f270ea569739442860c575c8491";

    #[test]
    fn reference_seed_matches_known_value() {
        let seed = derive_seed(1_700_000_000, 1, "42");
        assert_eq!(seed.to_hex(), REFERENCE_HEX);
        assert_eq!(seed.to_string(), REFERENCE_DECIMAL);
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(
            derive_seed(1_760_659_200, 7, "hello world"),
            derive_seed(1_760_659_200, 7, "hello world")
        );
    }

    #[test]
    fn each_component_changes_the_seed() {
        let base = derive_seed(1_700_000_000, 1, "42");
        assert_ne!(base, derive_seed(1_699_920_000, 1, "42"));
        assert_ne!(base, derive_seed(1_700_000_000, 2, "42"));
        assert_ne!(base, derive_seed(1_700_000_000, 1, "43"));
    }

    #[test]
    fn concatenation_has_no_separators() {
        // Both inputs hash the text "1711x".
        assert_eq!(derive_seed(17, 11, "x"), derive_seed(171, 1, "x"));
    }

    #[test]
    fn utf8_shared_values_hash_their_bytes() {
        let seed = derive_seed(1_760_659_200, 1, "红桃");
        assert_eq!(
            seed.to_hex(),
            "a20aca67dd8ff4f153cbefe829efa691c01e6422a2f1ed4791e5aa8424ba0b63"
        );
    }

    #[test]
    fn seed_input_derives_same_value() {
        let input = SeedInput::new(
            1_700_000_000,
            RoundNumber::new(1).unwrap(),
            SharedValue::new("42").unwrap(),
        );
        assert_eq!(input.derive().to_hex(), REFERENCE_HEX);
    }

    #[test]
    fn key_words_are_little_endian() {
        let mut digest = [0u8; 32];
        digest[31] = 0x23;
        digest[30] = 0x01;
        digest[27] = 0x02;
        let seed = DerivedSeed::from_digest(digest);
        assert_eq!(seed.key_words(), vec![0x0123, 0x02]);
    }

    #[test]
    fn key_words_keep_one_word_for_zero() {
        let seed = DerivedSeed::from_digest([0u8; 32]);
        assert_eq!(seed.key_words(), vec![0]);
        assert_eq!(seed.to_string(), "0");
    }

    #[test]
    fn full_width_seed_has_eight_words() {
        let seed = derive_seed(1_700_000_000, 1, "42");
        let words = seed.key_words();
        assert_eq!(words.len(), 8);
        assert_eq!(words[0], 0x575c_8491);
        assert_eq!(words[7], 0xcae3_ee88);
    }

    #[test]
    fn serializes_as_decimal_string() {
        let seed = derive_seed(1_700_000_000, 1, "42");
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, format!("\"{REFERENCE_DECIMAL}\""));
    }
}
