//! Seeded random values for test inputs.
//!
//! Every [`Runner`](crate::Runner) owns one [`Random`]. Its seed is reported
//! when the run starts, so a failing run can be replayed by setting
//! `UTH_SEED` (or `seed` in `uth.toml`) to that value.
use rand::{distributions::uniform::SampleUniform, rngs::StdRng, Rng, SeedableRng};

pub struct Random {
    seed: u64,
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u64) -> Random {
        Random {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed taken from the current time, in seconds.
    pub fn from_clock() -> Random {
        Random::new(chrono::Utc::now().timestamp().unsigned_abs())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random value in `[min, max)`. An empty range yields `min`.
    pub fn range<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    pub fn boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

impl std::fmt::Debug for Random {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Random").field("seed", &self.seed).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn same_seed_same_values() {
        let mut a = Random::new(7);
        let mut b = Random::new(7);
        let xs: Vec<i32> = (0..16).map(|_| a.range(-100, 100)).collect();
        let ys: Vec<i32> = (0..16).map(|_| b.range(-100, 100)).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn upper_bound_is_excluded() {
        let mut random = Random::new(1);
        for _ in 0..1000 {
            let value = random.range(0u8, 2);
            assert!(value < 2, "{value} is out of [0, 2)");
        }
        for _ in 0..1000 {
            let value = random.range(0.0f64, 1.0);
            assert!((0.0..1.0).contains(&value), "{value} is out of [0, 1)");
        }
    }

    #[test]
    fn single_value_range() {
        let mut random = Random::new(3);
        for _ in 0..32 {
            assert_eq!(random.range(5i64, 6), 5);
        }
    }

    #[test_case(4, 4; "empty")]
    #[test_case(9, 2; "reversed")]
    fn degenerate_range_yields_min(min: i32, max: i32) {
        assert_eq!(Random::new(11).range(min, max), min);
    }

    #[test]
    fn booleans_take_both_values() {
        let mut random = Random::new(5);
        let values: Vec<bool> = (0..64).map(|_| random.boolean()).collect();
        assert!(values.contains(&true));
        assert!(values.contains(&false));
    }
}
