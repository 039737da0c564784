#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Discount sigma = {sigma} is outside the supported range (sigma < 1)")]
    DiscountOutOfRange { sigma: f64 },

    #[error("Concentration theta = {theta} must exceed -sigma (sigma = {sigma})")]
    ConcentrationTooSmall { theta: f64, sigma: f64 },

    #[error("Kappa = {kappa} must be in (0, 1)")]
    KappaOutOfRange { kappa: f64 },

    #[error("Population size must be at least 1")]
    EmptyPopulation,
}

pub type Result<T> = std::result::Result<T, Error>;
