#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Rate lambda = {lambda} must be finite and positive")]
    InvalidRate { lambda: f64 },

    #[error("Histogram is empty or all frequencies are zero")]
    EmptyHistogram,

    #[error("Histogram frequency at index {index} is negative ({freq})")]
    NegativeFrequency { index: usize, freq: f64 },

    #[error(
        "Empirical mean {mean} is at most 1; a zero-truncated Poisson always has mean above 1"
    )]
    DegenerateMean { mean: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
