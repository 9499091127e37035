use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Upcoming pieces, generated with the 7-bag randomizer.
///
/// Each bag holds all 7 kinds in shuffled order and is refilled when 7 or fewer pieces
/// remain, so the preview always shows at least 8 pieces and no kind is missing for long.
///
/// ```
/// use qtris_engine::{PieceBuffer, PieceKind};
///
/// let mut buffer = PieceBuffer::new();
/// let first: Vec<PieceKind> = (0..7).map(|_| buffer.pop_next()).collect();
/// for kind in PieceKind::ALL {
///     assert!(first.contains(&kind));
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl Default for PieceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBuffer {
    /// Creates a piece buffer with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic: equal seeds yield equal piece sequences.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next piece.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        let kind = self.bag.pop_front().unwrap_or(PieceKind::I);
        self.fill_bag();
        kind
    }

    /// Returns the upcoming pieces in draw order.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }

    /// Returns a buffer that keeps the random stream going but starts a fresh bag.
    #[must_use]
    pub(crate) fn reshuffled(&self) -> Self {
        let mut this = Self {
            rng: self.rng.clone(),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }
}

/// 128-bit seed for deterministic piece generation.
///
/// Serialized and parsed as a 32-character hex string, so it can be given on the command
/// line and stored alongside run reports.
///
/// ```
/// use qtris_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                input: s.to_owned(),
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_deterministic_piece_generation() {
        let mut buffer1 = PieceBuffer::with_seed(SEED);
        let mut buffer2 = PieceBuffer::with_seed(SEED);
        for _ in 0..20 {
            assert_eq!(buffer1.pop_next(), buffer2.pop_next());
        }
    }

    #[test]
    fn test_every_bag_contains_all_kinds() {
        let mut buffer = PieceBuffer::with_seed(SEED);
        for _ in 0..5 {
            let mut bag: Vec<PieceKind> = (0..PieceKind::LEN).map(|_| buffer.pop_next()).collect();
            bag.sort_by_key(|kind| *kind as u8);
            assert_eq!(bag, PieceKind::ALL);
        }
    }

    #[test]
    fn test_preview_matches_draws() {
        let mut buffer = PieceBuffer::with_seed(SEED);
        let preview: Vec<PieceKind> = buffer.next_pieces().collect();
        assert!(preview.len() > PieceKind::LEN);

        let drawn: Vec<PieceKind> = (0..preview.len()).map(|_| buffer.pop_next()).collect();
        assert_eq!(preview, drawn);
    }

    #[test]
    fn test_seed_hex_format() {
        let json = serde_json::to_string(&SEED).unwrap();
        assert_eq!(json, "\"123456789abcdef01122334455667788\"");
        let parsed: PieceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SEED);

        let upper: PieceSeed = "123456789ABCDEF01122334455667788".parse().unwrap();
        assert_eq!(upper, SEED);
    }

    #[test]
    fn test_seed_parse_errors() {
        for input in ["", "0123", "ghijklmnopqrstuvwxyzghijklmnopqr"] {
            let err = input.parse::<PieceSeed>().unwrap_err();
            assert!(err.to_string().starts_with("invalid hex seed"), "{err}");
        }
        assert!(serde_json::from_str::<PieceSeed>("\"00\"").is_err());
    }
}
