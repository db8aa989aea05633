// registry-types/src/lib.rs

//! Shared primitive types for the stake registry
//!
//! This crate provides:
//! - Account addresses identifying callers and internal registry accounts
//! - Arbitrary-precision token amounts
//! - Role id and timestamp scalars

pub mod address;
pub mod amount;

pub use address::Address;
pub use amount::Amount;

/// Role identifier, assigned monotonically starting at 0
pub type RoleId = u64;

/// Timestamp in Unix epoch seconds
pub type Timestamp = u64;

/// Result type for primitive parsing
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors that can occur when parsing primitive types
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_imports() {
        // Smoke test to ensure all modules compile
    }
}
