//! Pseudorandom function transforms and the prf+ expansion
//!
//! Implements the PRF family used for SKEYSEED computation, AUTH payload
//! keys, and the prf+ key-expansion construction of RFC 7296 Section 2.13.

use crate::error::{Error, Result};
use crate::proposal::{Transform, TransformType};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

/// PRF_HMAC_SHA1 transform ID
const PRF_HMAC_SHA1: u16 = 2;

/// PRF_HMAC_SHA2_256 transform ID
const PRF_HMAC_SHA2_256: u16 = 5;

/// Pseudorandom function descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrfTransform {
    /// HMAC-SHA1
    HmacSha1,
    /// HMAC-SHA2-256
    HmacSha256,
}

impl PrfTransform {
    /// On-wire transform ID
    pub fn transform_id(self) -> u16 {
        match self {
            PrfTransform::HmacSha1 => PRF_HMAC_SHA1,
            PrfTransform::HmacSha256 => PRF_HMAC_SHA2_256,
        }
    }

    /// Preferred key length in bytes, which equals the output length
    pub fn key_len(self) -> usize {
        match self {
            PrfTransform::HmacSha1 => 20,
            PrfTransform::HmacSha256 => 32,
        }
    }

    /// Key the PRF, yielding a reusable keyed primitive
    pub fn init(self, key: &[u8]) -> KeyedPrf {
        match self {
            PrfTransform::HmacSha1 => KeyedPrf::HmacSha1(
                Hmac::<Sha1>::new_from_slice(key).expect("HMAC can take key of any size"),
            ),
            PrfTransform::HmacSha256 => KeyedPrf::HmacSha256(
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size"),
            ),
        }
    }

    /// Decode an on-wire transform record; `None` when unsupported
    pub fn decode_transform(transform: &Transform) -> Option<Self> {
        match transform.transform_id {
            PRF_HMAC_SHA1 => Some(PrfTransform::HmacSha1),
            PRF_HMAC_SHA2_256 => Some(PrfTransform::HmacSha256),
            _ => None,
        }
    }

    /// Re-encode as an on-wire transform record
    pub fn to_transform(self) -> Transform {
        Transform::new(TransformType::Prf, self.transform_id())
    }
}

/// Keyed PRF primitive
///
/// [`compute`](KeyedPrf::compute) clones the keyed state per call, so a
/// stored instance (e.g. the SK_d-keyed PRF reused across Child SA
/// derivations) stays valid for any number of computations.
#[derive(Clone)]
pub enum KeyedPrf {
    /// Keyed HMAC-SHA1
    HmacSha1(Hmac<Sha1>),
    /// Keyed HMAC-SHA2-256
    HmacSha256(Hmac<Sha256>),
}

impl std::fmt::Debug for KeyedPrf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyedPrf::HmacSha1(_) => f.write_str("KeyedPrf::HmacSha1(..)"),
            KeyedPrf::HmacSha256(_) => f.write_str("KeyedPrf::HmacSha256(..)"),
        }
    }
}

impl KeyedPrf {
    /// PRF output length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            KeyedPrf::HmacSha1(_) => 20,
            KeyedPrf::HmacSha256(_) => 32,
        }
    }

    /// Compute the PRF over `data`
    pub fn compute(&self, data: &[u8]) -> Vec<u8> {
        match self {
            KeyedPrf::HmacSha1(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            KeyedPrf::HmacSha256(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Compute prf+ (key expansion, RFC 7296 Section 2.13)
    ///
    /// ```text
    /// prf+ (K,S) = T1 | T2 | T3 | ...
    ///
    /// where:
    /// T1 = prf (K, S | 0x01)
    /// T2 = prf (K, T1 | S | 0x02)
    /// T3 = prf (K, T2 | S | 0x03)
    /// ...
    /// ```
    ///
    /// The block counter is a single byte starting at 1; a stream needing
    /// more than 255 blocks fails with [`Error::PrfPlusExhausted`] rather
    /// than wrapping.
    pub fn prf_plus(&self, seed: &[u8], length: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(length);
        let mut block: Vec<u8> = Vec::new();
        let mut counter: u8 = 1;

        while output.len() < length {
            // T(i) = prf(K, T(i-1) | S | i)
            let mut input = Vec::with_capacity(block.len() + seed.len() + 1);
            input.extend_from_slice(&block);
            input.extend_from_slice(seed);
            input.push(counter);

            block = self.compute(&input);
            output.extend_from_slice(&block);

            if output.len() >= length {
                break;
            }
            counter = counter
                .checked_add(1)
                .ok_or(Error::PrfPlusExhausted { requested: length })?;
        }

        output.truncate(length);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prf_hmac_sha1_known_vector() {
        // RFC 2202 test case 1
        let keyed = PrfTransform::HmacSha1.init(&[0x0b; 20]);
        let output = keyed.compute(b"Hi There");
        assert_eq!(
            output,
            hex::decode("b617318655057264e28bc0b6fb378c8ef146be00").unwrap()
        );
    }

    #[test]
    fn test_prf_output_lengths() {
        assert_eq!(PrfTransform::HmacSha1.init(&[0u8; 20]).output_len(), 20);
        assert_eq!(PrfTransform::HmacSha256.init(&[0u8; 32]).output_len(), 32);
    }

    #[test]
    fn test_prf_plus_block_construction() {
        // 40 bytes out of HMAC-SHA1 is exactly T1 | T2
        let key = [0x00u8; 20];
        let keyed = PrfTransform::HmacSha1.init(&key);
        let output = keyed.prf_plus(b"abc", 40).unwrap();

        let mut t1_input = b"abc".to_vec();
        t1_input.push(0x01);
        let t1 = keyed.compute(&t1_input);

        let mut t2_input = t1.clone();
        t2_input.extend_from_slice(b"abc");
        t2_input.push(0x02);
        let t2 = keyed.compute(&t2_input);

        let mut expected = t1;
        expected.extend_from_slice(&t2);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_prf_plus_truncates_to_exact_length() {
        let keyed = PrfTransform::HmacSha256.init(b"secret key");
        let output = keyed.prf_plus(b"seed data", 100).unwrap();
        assert_eq!(output.len(), 100);
    }

    #[test]
    fn test_prf_plus_short_is_prefix_of_long() {
        let keyed = PrfTransform::HmacSha256.init(b"secret key");
        let short = keyed.prf_plus(b"seed data", 16).unwrap();
        let long = keyed.prf_plus(b"seed data", 64).unwrap();
        assert_eq!(&short[..], &long[0..16]);
    }

    #[test]
    fn test_prf_plus_deterministic() {
        let keyed = PrfTransform::HmacSha1.init(b"secret key");
        let out1 = keyed.prf_plus(b"seed", 64).unwrap();
        let out2 = keyed.prf_plus(b"seed", 64).unwrap();
        assert_eq!(out1, out2);
    }

    #[test]
    fn test_prf_plus_255_block_limit() {
        let keyed = PrfTransform::HmacSha1.init(&[0x11u8; 20]);

        // 255 blocks of 20 bytes is the most the one-byte counter allows
        let max = keyed.prf_plus(b"seed", 255 * 20).unwrap();
        assert_eq!(max.len(), 255 * 20);

        let err = keyed.prf_plus(b"seed", 255 * 20 + 1).unwrap_err();
        assert_eq!(
            err,
            Error::PrfPlusExhausted {
                requested: 255 * 20 + 1
            }
        );
    }

    #[test]
    fn test_prf_plus_zero_length() {
        let keyed = PrfTransform::HmacSha1.init(&[0x11u8; 20]);
        assert!(keyed.prf_plus(b"seed", 0).unwrap().is_empty());
    }

    #[test]
    fn test_decode_encode_roundtrip() {
        for prf in [PrfTransform::HmacSha1, PrfTransform::HmacSha256] {
            let transform = prf.to_transform();
            assert_eq!(transform.transform_type, TransformType::Prf);
            assert_eq!(PrfTransform::decode_transform(&transform), Some(prf));
        }
    }

    #[test]
    fn test_decode_unsupported() {
        let transform = Transform::new(TransformType::Prf, 42);
        assert_eq!(PrfTransform::decode_transform(&transform), None);
    }
}
