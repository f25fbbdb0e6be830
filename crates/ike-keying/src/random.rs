//! Cryptographically secure random draws
//!
//! All randomness comes from the operating-system CSPRNG ([`OsRng`]).
//! Failures propagate as [`Error::RandomnessFailure`]; nothing is retried.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;

/// Byte width of a secret draw; bounds the value below 2^2048
const RANDOM_NUMBER_BYTES: usize = 256;

/// Lower bound of a secret draw: 2^128 - 1. Accepted values must strictly
/// exceed it.
static RANDOM_NUMBER_MINIMUM: Lazy<BigUint> =
    Lazy::new(|| BigUint::parse_bytes("F".repeat(32).as_bytes(), 16).expect("Invalid hex"));

/// Draw a uniform random integer in `(2^128 - 1, 2^2048)`
///
/// Rejection-samples the CSPRNG until the draw strictly exceeds
/// `2^128 - 1`, so a Diffie-Hellman secret always has at least 128 useful
/// bits regardless of the group.
pub fn generate_random_number() -> Result<BigUint> {
    let mut buf = [0u8; RANDOM_NUMBER_BYTES];
    loop {
        OsRng.try_fill_bytes(&mut buf).map_err(|e| {
            Error::RandomnessFailure(format!("generate_random_number: {}", e))
        })?;
        let number = BigUint::from_bytes_be(&buf);
        if number > *RANDOM_NUMBER_MINIMUM {
            return Ok(number);
        }
    }
}

/// Draw one fresh random byte
pub fn generate_random_u8() -> Result<u8> {
    let mut buf = [0u8; 1];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::RandomnessFailure(format!("generate_random_u8: {}", e)))?;
    Ok(buf[0])
}
