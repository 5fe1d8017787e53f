use rand::Rng;

use crate::error::{Error, Result};

/// Applies a transform with probability `p`, otherwise passes the input through.
///
/// Every call draws exactly one uniform value from the generator, whichever
/// branch is taken, so downstream draws line up across runs with the same seed.
#[derive(Debug, Clone, Copy)]
pub struct RandomApply {
    p: f64,
}

impl RandomApply {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::configuration("probability", p));
        }
        Ok(Self { p })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    /// Draws the gate decision. `u` is uniform in [0,1) so `p = 0` never fires
    /// and `p = 1` always does.
    pub fn fires<R: Rng>(&self, rng: &mut R) -> bool {
        let u: f64 = rng.random();
        u < self.p
    }

    pub fn apply<T, R, F>(&self, x: T, rng: &mut R, transform: F) -> Result<T>
    where
        R: Rng,
        F: FnOnce(T, &mut R) -> Result<T>,
    {
        if self.fires(rng) {
            transform(x, rng)
        } else {
            Ok(x)
        }
    }
}
