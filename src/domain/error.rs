//! Engine error types.
//!
//! Every variant is recoverable: callers treat any of them as
//! "no preview available" and keep trade submission disabled.

use thiserror::Error;

/// Errors raised by the LMSR engine.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LmsrError {
    #[error("liquidity parameter b must be positive and finite, got {0}")]
    InvalidLiquidity(f64),

    #[error("share quantity must be finite, got {0}")]
    NonFiniteQuantity(f64),

    #[error("spend must be positive and finite, got {0}")]
    InvalidSpend(f64),

    #[error("share delta must be positive and finite, got {0}")]
    InvalidShares(f64),

    #[error("share solve for spend {spend} did not converge after {iterations} iterations")]
    NoConvergence { spend: f64, iterations: u32 },

    #[error("cost of {delta} shares underflows f64")]
    CostUnderflow { delta: f64 },
}

impl LmsrError {
    /// True when the error comes from rejected caller input rather than
    /// from the limits of f64 arithmetic.
    pub const fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::NoConvergence { .. } | Self::CostUnderflow { .. })
    }
}
