//! RNG module - bag randomizer
//!
//! Implements the "7-bag" randomization algorithm: each bag holds one of each
//! kind (I, O, T, S, Z, J, L), shuffled. Kinds are drawn until the bag is
//! empty, then a new bag is shuffled. Every refill cycle therefore contains
//! each kind exactly once, so no kind can go missing for long.
//!
//! The shuffle is driven by a small LCG so that a seed reproduces the exact
//! sequence of draws, and the whole bag state can be saved and restored.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed. Every `u32` is a distinct seed;
    /// the nonzero increment keeps a zero state moving.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Rebuild an RNG from a raw state taken with [`SimpleRng::state`]
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Raw internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Serializable bag state: enough to continue the exact same sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagState {
    pub rng_state: u32,
    pub bag: [PieceKind; PieceKind::COUNT],
    pub cursor: usize,
}

/// 7-bag piece generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    /// Current shuffled cycle
    bag: [PieceKind; PieceKind::COUNT],
    /// Index of the next kind to hand out
    cursor: usize,
    rng: SimpleRng,
}

impl Bag {
    /// Create a new bag with the given seed
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            cursor: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    /// Generate a new shuffled cycle
    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Draw the next kind, refilling when the cycle is exhausted
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PieceKind {
        if self.cursor >= PieceKind::COUNT {
            self.refill();
        }

        let kind = self.bag[self.cursor];
        self.cursor += 1;
        kind
    }

    /// The next `count` kinds, without consuming them
    pub fn peek(&self, count: usize) -> Vec<PieceKind> {
        let mut out = Vec::with_capacity(count);
        self.peek_into(&mut out, count);
        out
    }

    /// [`Bag::peek`] into a caller-owned buffer, replacing its contents
    pub fn peek_into(&self, out: &mut Vec<PieceKind>, count: usize) {
        out.clear();
        let mut preview = self.clone();
        out.extend((0..count).map(|_| preview.next()));
    }

    /// Kinds left in the current cycle
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.cursor.min(PieceKind::COUNT)..]
    }

    /// Capture the state for a session snapshot
    pub fn state(&self) -> BagState {
        BagState {
            rng_state: self.rng.state(),
            bag: self.bag,
            cursor: self.cursor,
        }
    }

    /// Rebuild a bag from a saved state
    ///
    /// The saved cycle must be a permutation of every kind and the cursor must
    /// not run past it; anything else could break the fairness guarantee.
    pub fn from_state(state: &BagState) -> Result<Self, SnapshotError> {
        if state.cursor > PieceKind::COUNT {
            return Err(SnapshotError::CorruptBag("cursor past end of cycle"));
        }
        let mut seen = [false; PieceKind::COUNT];
        for kind in state.bag {
            if std::mem::replace(&mut seen[kind.index()], true) {
                return Err(SnapshotError::CorruptBag("cycle repeats a kind"));
            }
        }

        Ok(Self {
            bag: state.bag,
            cursor: state.cursor,
            rng: SimpleRng::from_state(state.rng_state),
        })
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_zero_and_one_are_distinct_seeds() {
        assert_ne!(SimpleRng::new(0), SimpleRng::new(1));
        assert_ne!(SimpleRng::new(0).next_u32(), SimpleRng::new(1).next_u32());
        assert_eq!(SimpleRng::new(0).next_u32(), 1013904223);

        let mut zero = Bag::new(0);
        let mut one = Bag::new(1);
        let a: Vec<PieceKind> = (0..14).map(|_| zero.next()).collect();
        let b: Vec<PieceKind> = (0..14).map(|_| one.next()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rng_range_stays_below_max() {
        let mut rng = SimpleRng::new(7);
        for max in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_bag_first_cycle_has_every_kind() {
        let mut bag = Bag::new(1);
        assert_eq!(bag.remaining().len(), 7);

        let mut drawn: Vec<PieceKind> = (0..7).map(|_| bag.next()).collect();
        drawn.sort();
        assert_eq!(drawn, PieceKind::ALL.to_vec());
        assert!(bag.remaining().is_empty());
    }

    #[test]
    fn test_bag_same_seed_same_sequence() {
        let mut a = Bag::new(99);
        let mut b = Bag::new(99);
        for _ in 0..50 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_peek_matches_following_draws() {
        let mut bag = Bag::new(4242);
        for _ in 0..3 {
            bag.next();
        }

        // Crosses into the next cycle
        let preview = bag.peek(10);
        let drawn: Vec<PieceKind> = (0..10).map(|_| bag.next()).collect();
        assert_eq!(preview, drawn);
    }

    #[test]
    fn test_peek_into_replaces_buffer_contents() {
        let bag = Bag::new(77);
        let mut out = Vec::with_capacity(PieceKind::COUNT * 2);
        out.push(PieceKind::O);
        let ptr = out.as_ptr();

        bag.peek_into(&mut out, 9);
        assert_eq!(out, bag.peek(9));
        assert_eq!(out.as_ptr(), ptr);

        bag.peek_into(&mut out, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_state_round_trip_continues_sequence() {
        let mut bag = Bag::new(31337);
        for _ in 0..5 {
            bag.next();
        }

        let mut restored = Bag::from_state(&bag.state()).unwrap();
        for _ in 0..20 {
            assert_eq!(restored.next(), bag.next());
        }
    }

    #[test]
    fn test_from_state_rejects_duplicates() {
        let mut state = Bag::new(3).state();
        state.bag[1] = state.bag[0];
        assert!(Bag::from_state(&state).is_err());

        let mut state = Bag::new(3).state();
        state.cursor = 8;
        assert!(Bag::from_state(&state).is_err());
    }
}
