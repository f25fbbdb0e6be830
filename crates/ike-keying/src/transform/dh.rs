//! Diffie-Hellman group transforms
//!
//! MODP groups over `Z_p` with fixed prime and generator. Public values
//! and shared keys are big-endian and left-padded with zeros to the exact
//! byte length of the group prime, as the KE payload requires.

use crate::proposal::{Transform, TransformType};
use num_bigint::BigUint;

/// 1024-bit MODP group transform ID (Oakley Group 2)
const DH_1024_BIT_MODP: u16 = 2;

/// 2048-bit MODP group transform ID (Group 14)
const DH_2048_BIT_MODP: u16 = 14;

/// MODP group parameters (RFC 2409 / RFC 3526)
mod modp {
    use num_bigint::BigUint;
    use once_cell::sync::Lazy;

    /// Oakley Group 2 prime (RFC 2409), 1024-bit
    pub static GROUP2_PRIME: Lazy<BigUint> = Lazy::new(|| {
        BigUint::from_bytes_be(
            &hex::decode(
                "FFFFFFFFFFFFFFFFC90FDAA22168C234\
                 C4C6628B80DC1CD129024E088A67CC74\
                 020BBEA63B139B22514A08798E3404DD\
                 EF9519B3CD3A431B302B0A6DF25F1437\
                 4FE1356D6D51C245E485B576625E7EC6\
                 F44C42E9A637ED6B0BFF5CB6F406B7ED\
                 EE386BFB5A899FA5AE9F24117C4B1FE6\
                 49286651ECE65381FFFFFFFFFFFFFFFF",
            )
            .expect("Invalid hex"),
        )
    });

    /// Group 14 prime (RFC 3526), 2048-bit
    pub static GROUP14_PRIME: Lazy<BigUint> = Lazy::new(|| {
        BigUint::from_bytes_be(
            &hex::decode(
                "FFFFFFFFFFFFFFFFC90FDAA22168C234\
                 C4C6628B80DC1CD129024E088A67CC74\
                 020BBEA63B139B22514A08798E3404DD\
                 EF9519B3CD3A431B302B0A6DF25F1437\
                 4FE1356D6D51C245E485B576625E7EC6\
                 F44C42E9A637ED6B0BFF5CB6F406B7ED\
                 EE386BFB5A899FA5AE9F24117C4B1FE6\
                 49286651ECE45B3DC2007CB8A163BF05\
                 98DA48361C55D39A69163FA8FD24CF5F\
                 83655D23DCA3AD961C62F356208552BB\
                 9ED529077096966D670C354E4ABC9804\
                 F1746C08CA18217C32905E462E36CE3B\
                 E39E772C180E86039B2783A2EC07A28F\
                 B5C55DF06F4C52C9DE2BCBF695581718\
                 3995497CEA956AE515D2261898FA0510\
                 15728E5A8AACAA68FFFFFFFFFFFFFFFF",
            )
            .expect("Invalid hex"),
        )
    });

    /// Shared generator for both groups
    pub static GENERATOR: Lazy<BigUint> = Lazy::new(|| BigUint::from(2u32));
}

/// Diffie-Hellman group descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DhTransform {
    /// 1024-bit MODP group (Oakley Group 2)
    Modp1024,
    /// 2048-bit MODP group (Group 14)
    Modp2048,
}

impl DhTransform {
    /// On-wire transform ID
    pub fn transform_id(self) -> u16 {
        match self {
            DhTransform::Modp1024 => DH_1024_BIT_MODP,
            DhTransform::Modp2048 => DH_2048_BIT_MODP,
        }
    }

    /// Byte length of the group prime; public values and shared keys are
    /// exactly this long
    pub fn prime_len(self) -> usize {
        match self {
            DhTransform::Modp1024 => 128,
            DhTransform::Modp2048 => 256,
        }
    }

    fn prime(self) -> &'static BigUint {
        match self {
            DhTransform::Modp1024 => &modp::GROUP2_PRIME,
            DhTransform::Modp2048 => &modp::GROUP14_PRIME,
        }
    }

    /// Compute the local public value `g^secret mod p`
    pub fn get_public_value(self, secret: &BigUint) -> Vec<u8> {
        self.left_pad(modp::GENERATOR.modpow(secret, self.prime()))
    }

    /// Compute the shared key `peer^secret mod p`
    pub fn get_shared_key(self, secret: &BigUint, peer_public_value: &BigUint) -> Vec<u8> {
        self.left_pad(peer_public_value.modpow(secret, self.prime()))
    }

    fn left_pad(self, value: BigUint) -> Vec<u8> {
        let bytes = value.to_bytes_be();
        let mut padded = vec![0u8; self.prime_len() - bytes.len()];
        padded.extend_from_slice(&bytes);
        padded
    }

    /// Decode an on-wire transform record; `None` when unsupported
    pub fn decode_transform(transform: &Transform) -> Option<Self> {
        match transform.transform_id {
            DH_1024_BIT_MODP => Some(DhTransform::Modp1024),
            DH_2048_BIT_MODP => Some(DhTransform::Modp2048),
            _ => None,
        }
    }

    /// Re-encode as an on-wire transform record
    pub fn to_transform(self) -> Transform {
        Transform::new(TransformType::Dh, self.transform_id())
    }
}
