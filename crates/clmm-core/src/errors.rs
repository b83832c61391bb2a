//! # Core Error Types
//!
//! Errors raised while decoding account bytes or evaluating position math.
//! Sentinel ("ignore range") amounts are not errors: they clamp to zero in
//! [`crate::accounting`].

use thiserror::Error;

/// Core errors shared by every component of the crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClmmCoreError {
    // ========================================================================
    // Decode Errors
    // ========================================================================
    #[error("Invalid {account} account length: expected {expected} bytes, got {actual}")]
    InvalidAccountLength {
        account: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Account discriminator does not match {account}")]
    DiscriminatorMismatch { account: &'static str },

    #[error("Tick array starts at {actual}, tick belongs to array starting at {expected}")]
    TickArrayMismatch { expected: i32, actual: i32 },

    #[error("Boundary tick record is for tick {actual}, position boundary is {expected}")]
    BoundaryTickMismatch { expected: i32, actual: i32 },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Tick {0} is outside the supported range")]
    InvalidTick(i32),

    #[error("Sqrt price {0} is outside the supported range")]
    InvalidSqrtPrice(u128),

    #[error("Price at sqrt price {0} does not fit in a Decimal")]
    PriceOutOfRange(u128),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid tick spacing: {0}")]
    InvalidTickSpacing(u16),

    #[error("Invalid tick range: lower {lower} must be below upper {upper}")]
    InvalidTickRange { lower: i32, upper: i32 },

    #[error("Invalid mint decimals: {0}")]
    InvalidDecimals(u8),

    #[error("Slippage must be a fraction in [0, 1], got {0}")]
    InvalidSlippage(String),

    // ========================================================================
    // Math Errors
    // ========================================================================
    #[error("Math overflow")]
    MathOverflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, ClmmCoreError>;

impl ClmmCoreError {
    /// Shorthand for a length mismatch on `account`
    pub fn invalid_length(account: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidAccountLength {
            account,
            expected,
            actual,
        }
    }

    /// Whether the error came from malformed account bytes
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAccountLength { .. } | Self::DiscriminatorMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClmmCoreError::invalid_length("TickArrayState", 10240, 12);
        assert_eq!(
            format!("{}", err),
            "Invalid TickArrayState account length: expected 10240 bytes, got 12"
        );
        assert!(err.is_decode_error());

        let err = ClmmCoreError::TickArrayMismatch {
            expected: -600,
            actual: 0,
        };
        assert!(!err.is_decode_error());
        assert!(format!("{}", err).contains("-600"));
    }
}
