#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Zero-truncated Poisson model
//!
//! A Poisson distribution conditioned on being strictly positive. The rate is
//! fitted to an observation histogram by matching the truncated mean
//! `lambda / (1 - e^-lambda)` to the empirical mean, solved by bisection on
//! the score `lambda + mean * e^-lambda - mean`.
//!
//! A [`ZeroTruncatedPoisson`] always holds a valid rate: it is constructed
//! either from a known rate or by [`fit`](ZeroTruncatedPoisson::fit), so
//! distribution queries can never observe an unestimated model.

mod error;

pub use error::{Error, Result};

use statrs::function::gamma::ln_gamma;

/// A Poisson distribution truncated to exclude zero observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroTruncatedPoisson {
    lambda: f64,
}

impl ZeroTruncatedPoisson {
    /// Convergence tolerance of the rate estimator, fixed for the model
    pub const TOLERANCE: f64 = 1e-20;

    /// Create a model with a known rate `lambda`, which must be finite and
    /// positive.
    pub fn new(lambda: f64) -> Result<Self> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(Error::InvalidRate { lambda });
        }
        Ok(Self { lambda })
    }

    /// Estimate the rate from an observation histogram.
    ///
    /// `hist[i]` is the number of species observed exactly `i` times (entry 0
    /// is ignored by the model but allowed, and is typically zero). The
    /// empirical mean `sum(i * hist[i]) / sum(hist[i])` must exceed 1, since
    /// the truncated mean is above 1 for every positive rate; a smaller mean
    /// means no root exists and is reported as [`Error::DegenerateMean`]
    /// instead of bisecting a bracket with no sign change.
    ///
    /// Deterministic: the same histogram always yields the same rate.
    pub fn fit(hist: &[f64]) -> Result<Self> {
        let mut total = 0.0;
        let mut weighted = 0.0;
        for (i, &freq) in hist.iter().enumerate() {
            if freq < 0.0 {
                return Err(Error::NegativeFrequency { index: i, freq });
            }
            total += freq;
            weighted += i as f64 * freq;
        }
        if total <= 0.0 {
            return Err(Error::EmptyHistogram);
        }

        let mean = weighted / total;
        if !mean.is_finite() || mean <= 1.0 {
            return Err(Error::DegenerateMean { mean });
        }

        Ok(Self {
            lambda: bisect_rate(mean),
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Mean of the truncated distribution, `lambda / (1 - e^-lambda)`
    pub fn mean(&self) -> f64 {
        self.lambda / -(-self.lambda).exp_m1()
    }

    /// Log probability mass at `y`; negative infinity at `y == 0`
    ///
    /// Computed entirely in log space, so large `y` cannot overflow the
    /// factorial term.
    pub fn ln_pmf(&self, y: u64) -> f64 {
        if y == 0 {
            return f64::NEG_INFINITY;
        }
        -self.lambda + y as f64 * self.lambda.ln()
            - ln_gamma(y as f64 + 1.0)
            - (-(-self.lambda).exp_m1()).ln()
    }

    /// Probability mass at `y`; zero at `y == 0` by definition of truncation
    pub fn pmf(&self, y: u64) -> f64 {
        self.ln_pmf(y).exp()
    }

    /// Cumulative mass at `y`, summed from 0 to `y` inclusive; O(y)
    pub fn cdf(&self, y: u64) -> f64 {
        (0..=y).map(|i| self.pmf(i)).sum()
    }
}

// Relative distance between the two bracket ends
fn movement(a: f64, b: f64) -> f64 {
    ((a - b) / a.max(b)).abs()
}

// Zero exactly when the truncated mean at `lambda` equals `mean`
fn lambda_score(mean: f64, lambda: f64) -> f64 {
    lambda + mean * (-lambda).exp() - mean
}

// Bisection over [mean - 1, mean]. For mean > 1 this always brackets the
// root: mean - lambda = lambda / (e^lambda - 1), which lies in (0, 1).
fn bisect_rate(mean: f64) -> f64 {
    let mut low = mean - 1.0;
    let mut high = mean;
    let mut mid = mean - 0.5;

    let mut diff = f64::MAX;
    let mut prev_val = f64::MAX;

    while movement(high, low) > ZeroTruncatedPoisson::TOLERANCE
        && diff > ZeroTruncatedPoisson::TOLERANCE
    {
        mid = (low + high) / 2.0;
        let mid_val = lambda_score(mean, mid);

        if mid_val < 0.0 {
            low = mid;
        } else {
            high = mid;
        }

        diff = ((prev_val - mid_val) / mid_val.max(prev_val)).abs();
        prev_val = mid_val;
    }

    mid
}
