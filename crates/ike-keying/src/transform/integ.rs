//! Integrity algorithm transforms
//!
//! HMAC-based integrity with truncated ICVs as used by the IKE SK payload
//! and ESP.

use crate::proposal::{Transform, TransformType};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

/// AUTH_HMAC_SHA1_96 transform ID
const AUTH_HMAC_SHA1_96: u16 = 2;

/// AUTH_HMAC_SHA2_256_128 transform ID
const AUTH_HMAC_SHA2_256_128: u16 = 12;

/// Integrity algorithm descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegTransform {
    /// HMAC-SHA1 with 96-bit ICV
    HmacSha1_96,
    /// HMAC-SHA2-256 with 128-bit ICV
    HmacSha256_128,
}

impl IntegTransform {
    /// On-wire transform ID
    pub fn transform_id(self) -> u16 {
        match self {
            IntegTransform::HmacSha1_96 => AUTH_HMAC_SHA1_96,
            IntegTransform::HmacSha256_128 => AUTH_HMAC_SHA2_256_128,
        }
    }

    /// Key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            IntegTransform::HmacSha1_96 => 20,
            IntegTransform::HmacSha256_128 => 32,
        }
    }

    /// Truncated ICV length in bytes
    pub fn output_len(self) -> usize {
        match self {
            IntegTransform::HmacSha1_96 => 12,
            IntegTransform::HmacSha256_128 => 16,
        }
    }

    /// Key the algorithm, yielding a reusable MAC primitive
    pub fn init(self, key: &[u8]) -> KeyedInteg {
        match self {
            IntegTransform::HmacSha1_96 => KeyedInteg::HmacSha1_96(
                Hmac::<Sha1>::new_from_slice(key).expect("HMAC can take key of any size"),
            ),
            IntegTransform::HmacSha256_128 => KeyedInteg::HmacSha256_128(
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size"),
            ),
        }
    }

    /// Decode an on-wire transform record; `None` when unsupported
    pub fn decode_transform(transform: &Transform) -> Option<Self> {
        match transform.transform_id {
            AUTH_HMAC_SHA1_96 => Some(IntegTransform::HmacSha1_96),
            AUTH_HMAC_SHA2_256_128 => Some(IntegTransform::HmacSha256_128),
            _ => None,
        }
    }

    /// Re-encode as an on-wire transform record
    pub fn to_transform(self) -> Transform {
        Transform::new(TransformType::Integ, self.transform_id())
    }
}

/// Keyed integrity primitive
///
/// [`compute`](KeyedInteg::compute) clones the keyed state per call, so a
/// stored instance can MAC any number of messages and is safe to share
/// behind a shared reference.
#[derive(Clone)]
pub enum KeyedInteg {
    /// Keyed HMAC-SHA1, ICV truncated to 12 bytes
    HmacSha1_96(Hmac<Sha1>),
    /// Keyed HMAC-SHA2-256, ICV truncated to 16 bytes
    HmacSha256_128(Hmac<Sha256>),
}

impl std::fmt::Debug for KeyedInteg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyedInteg::HmacSha1_96(_) => f.write_str("KeyedInteg::HmacSha1_96(..)"),
            KeyedInteg::HmacSha256_128(_) => f.write_str("KeyedInteg::HmacSha256_128(..)"),
        }
    }
}

impl KeyedInteg {
    /// Compute the truncated ICV over `data`
    pub fn compute(&self, data: &[u8]) -> Vec<u8> {
        match self {
            KeyedInteg::HmacSha1_96(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                let mut icv = mac.finalize().into_bytes().to_vec();
                icv.truncate(12);
                icv
            }
            KeyedInteg::HmacSha256_128(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                let mut icv = mac.finalize().into_bytes().to_vec();
                icv.truncate(16);
                icv
            }
        }
    }
}
