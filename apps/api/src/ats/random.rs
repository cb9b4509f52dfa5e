//! Injectable randomness. Every "pick one at random" in the engine goes through
//! a `RandomSource` so tests can pin the choice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource: Send {
    /// Uniform index in `0..upper`. Returns 0 when `upper` is 0.
    fn index(&mut self, upper: usize) -> usize;

    /// An independent source derived from this one, for work that runs
    /// concurrently with the parent.
    fn fork(&mut self) -> Box<dyn RandomSource>;
}

/// `RandomSource` backed by `rand`'s standard generator.
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.0.gen_range(0..upper)
    }

    fn fork(&mut self) -> Box<dyn RandomSource> {
        Box::new(StdRandom::seeded(self.0.gen()))
    }
}

/// How the engine seeds the sources it hands to each analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomSeed {
    Entropy,
    Fixed(u64),
}

impl RandomSeed {
    /// A fresh source. `stream` separates sources created for the same
    /// invocation so concurrent analyzers don't replay each other's choices.
    pub fn source(&self, stream: u64) -> Box<dyn RandomSource> {
        match self {
            RandomSeed::Entropy => Box::new(StdRandom::from_entropy()),
            RandomSeed::Fixed(seed) => Box::new(StdRandom::seeded(seed.wrapping_add(stream))),
        }
    }
}

/// Picks one element uniformly.
pub fn pick<'a, T>(items: &'a [T], rng: &mut dyn RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}

/// Picks one element uniformly among the first `window` items.
pub fn pick_within<'a, T>(
    items: &'a [T],
    window: usize,
    rng: &mut dyn RandomSource,
) -> Option<&'a T> {
    let bound = items.len().min(window);
    pick(&items[..bound], rng)
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Always answers the same index, clamped to the range asked for.
    pub struct FixedIndex(pub usize);

    impl RandomSource for FixedIndex {
        fn index(&mut self, upper: usize) -> usize {
            if upper == 0 {
                0
            } else {
                self.0.min(upper - 1)
            }
        }

        fn fork(&mut self) -> Box<dyn RandomSource> {
            Box::new(FixedIndex(self.0))
        }
    }
}
