//! Error types for IKEv2 keying operations
//!
//! This module defines a unified error type covering proposal decoding,
//! Diffie-Hellman computation, and key derivation.

use crate::proposal::TransformType;
use std::fmt;

/// Result type for keying operations
pub type Result<T> = std::result::Result<T, Error>;

/// IKEv2 keying errors
///
/// Every error is surfaced to the caller; nothing is retried or recovered
/// internally, and no partially-derived key bundle is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A proposal lacks a required transform category, or a derivation
    /// input (nonce, shared key) is absent
    MissingField(String),

    /// Decoded transform ID (or ID + attribute combination) is not in
    /// the registry
    UnsupportedTransform {
        /// Transform family the record claimed to belong to
        transform_type: TransformType,
        /// Offending on-wire transform ID
        transform_id: u16,
    },

    /// The operating-system CSPRNG returned an error
    RandomnessFailure(String),

    /// Cipher construction or operation failed (e.g. bad key length)
    CryptoInitFailure(String),

    /// Requested key stream exceeds 255 PRF blocks
    PrfPlusExhausted {
        /// Number of bytes the caller asked for
        requested: usize,
    },

    /// A descriptor could not be re-encoded as a wire transform record
    EncodingFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingField(msg) => write!(f, "Missing field: {}", msg),
            Error::UnsupportedTransform {
                transform_type,
                transform_id,
            } => {
                write!(
                    f,
                    "Unsupported {} transform: id {}",
                    transform_type, transform_id
                )
            }
            Error::RandomnessFailure(msg) => write!(f, "Randomness failure: {}", msg),
            Error::CryptoInitFailure(msg) => write!(f, "Crypto failure: {}", msg),
            Error::PrfPlusExhausted { requested } => {
                write!(
                    f,
                    "prf+ key stream exhausted: {} bytes needs more than 255 blocks",
                    requested
                )
            }
            Error::EncodingFailure(msg) => write!(f, "Encoding failure: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingField("IkeSaKey::new: proposal carries no PRF".to_string());
        assert_eq!(
            err.to_string(),
            "Missing field: IkeSaKey::new: proposal carries no PRF"
        );

        let err = Error::UnsupportedTransform {
            transform_type: TransformType::Dh,
            transform_id: 99,
        };
        assert_eq!(err.to_string(), "Unsupported D-H transform: id 99");

        let err = Error::PrfPlusExhausted { requested: 6000 };
        assert!(err.to_string().contains("6000"));
        assert!(err.to_string().contains("255"));
    }

    #[test]
    fn test_error_clone_eq() {
        let err1 = Error::RandomnessFailure("entropy source unavailable".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
