use rand::Rng;

use crate::{
    models::NewEmployee,
    random::{YearRange, random_date, random_fullname, random_gender},
};

pub const FORCED_LETTER_COUNT: u64 = 100;
pub const RANDOM_COUNT: u64 = 1_000_000;
pub const DEFAULT_FORCED_LETTER: char = 'F';

/// Shape of the synthetic batch: a small sub-batch whose last names start with
/// `forced_letter`, followed by a large fully random one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub forced_letter: char,
    pub forced_count: u64,
    pub random_count: u64,
    pub years: YearRange,
}

impl Default for BatchPlan {
    fn default() -> Self {
        Self {
            forced_letter: DEFAULT_FORCED_LETTER,
            forced_count: FORCED_LETTER_COUNT,
            random_count: RANDOM_COUNT,
            years: YearRange::default(),
        }
    }
}

impl BatchPlan {
    pub fn total(&self) -> u64 {
        self.forced_count + self.random_count
    }

    /// Lazily yields the whole batch in order, forced-letter records first.
    /// Nothing is buffered, so callers decide how much to hold in memory.
    pub fn records<R: Rng>(&self, rng: R) -> Records<R> {
        Records {
            plan: *self,
            rng,
            emitted: 0,
        }
    }
}

pub struct Records<R> {
    plan: BatchPlan,
    rng: R,
    emitted: u64,
}

impl<R: Rng> Iterator for Records<R> {
    type Item = NewEmployee;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.plan.total() {
            return None;
        }
        let leading = (self.emitted < self.plan.forced_count).then_some(self.plan.forced_letter);
        self.emitted += 1;

        Some(NewEmployee {
            fullname: random_fullname(&mut self.rng, leading),
            birth_date: random_date(&mut self.rng, self.plan.years),
            gender: random_gender(&mut self.rng),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.plan.total() - self.emitted).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
