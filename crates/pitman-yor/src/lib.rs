#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Sampling from the two-parameter Poisson-Dirichlet (Pitman-Yor) process
//!
//! The process is parameterized by a concentration `theta` and a discount
//! `sigma`, with `sigma < 1` and `theta > -sigma`. A sample of size `n` is a
//! list of per-species observation counts summing to `n`, produced by the
//! sequential (Chinese restaurant) construction: each individual either joins
//! an existing species with probability proportional to its current count
//! minus `sigma`, or founds a new one with probability proportional to
//! `theta + sigma * k`, where `k` species have been seen so far.
//!
//! Negative discounts give the finite process of Pitman & Yor (1995, sec 9.1):
//! with `sigma = -kappa` and `theta = kappa * m` the number of species is
//! bounded by the population size `m`. See [`PitmanYor::finite`].

mod error;

pub use error::{Error, Result};

use fenwick::FenwickTree;
use rand::Rng;

/// Validated parameters of a two-parameter Poisson-Dirichlet process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitmanYor {
    theta: f64,
    sigma: f64,
}

impl PitmanYor {
    /// Create a process with concentration `theta` and discount `sigma`.
    ///
    /// Requires `sigma < 1` and `theta > -sigma`, both finite; anything else
    /// is rejected before any sampling can happen.
    pub fn new(theta: f64, sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma >= 1.0 {
            return Err(Error::DiscountOutOfRange { sigma });
        }
        if !theta.is_finite() || theta <= -sigma {
            return Err(Error::ConcentrationTooSmall { theta, sigma });
        }
        Ok(Self { theta, sigma })
    }

    /// Create the finite process over a population of `pop_size` individuals,
    /// with `sigma = -kappa` and `theta = kappa * pop_size`.
    ///
    /// `kappa` must lie in (0, 1) and `pop_size` must be at least 1.
    pub fn finite(kappa: f64, pop_size: u64) -> Result<Self> {
        if !kappa.is_finite() || kappa <= 0.0 || kappa >= 1.0 {
            return Err(Error::KappaOutOfRange { kappa });
        }
        if pop_size == 0 {
            return Err(Error::EmptyPopulation);
        }
        Self::new(kappa * pop_size as f64, -kappa)
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Draw a species-count sample of size `n`.
    ///
    /// Returns one count per distinct species encountered, in order of first
    /// appearance. All counts are at least 1 and sum to exactly `n`; `n == 0`
    /// gives an empty vector.
    ///
    /// Each draw does one weighted selection through a Fenwick tree over the
    /// per-species weights `count - sigma`, so a full sample costs
    /// O(n log k) for k distinct species.
    pub fn sample_counts(&self, rng: &mut impl Rng, n: usize) -> Vec<u64> {
        let mut counts: Vec<u64> = Vec::new();
        let mut weights = FenwickTree::new();

        for t in 0..n {
            let u: f64 = rng.random();
            let v = u * (self.theta + t as f64);
            // Mass for founding a new species; in the finite (sigma < 0) case
            // this reaches zero once k = pop_size and must not go below it
            let new_mass = (self.theta + self.sigma * counts.len() as f64).max(0.0);

            if counts.is_empty() || v < new_mass {
                counts.push(1);
                weights.push(1.0 - self.sigma);
            } else {
                let j = weights.select(v - new_mass);
                counts[j] += 1;
                weights.add(j, 1.0);
            }
        }

        counts
    }

    /// Expected number of distinct species in a sample of size `n`.
    ///
    /// Computed by iterating E[K_{t+1}] = E[K_t] (1 + sigma/(theta + t)) +
    /// theta/(theta + t), which follows from the sequential construction by
    /// linearity and is exact for every valid (theta, sigma), including
    /// sigma = 0 and theta = 0.
    pub fn expected_species(&self, n: usize) -> f64 {
        let mut expected = 0.0;
        for t in 0..n {
            let denom = self.theta + t as f64;
            if t == 0 {
                expected = 1.0;
            } else {
                expected += (self.theta + self.sigma * expected) / denom;
            }
        }
        expected
    }

    /// Draw one independent sample per seed, in parallel.
    ///
    /// Each replicate gets its own generator of type `R` seeded from the
    /// corresponding entry of `seeds`, so results are reproducible regardless
    /// of how rayon schedules the work.
    #[cfg(feature = "parallel")]
    pub fn sample_counts_replicates<R>(&self, seeds: &[u64], n: usize) -> Vec<Vec<u64>>
    where
        R: Rng + rand::SeedableRng,
    {
        use rayon::prelude::*;

        seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = R::seed_from_u64(seed);
                self.sample_counts(&mut rng, n)
            })
            .collect()
    }
}
