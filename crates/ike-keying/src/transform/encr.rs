//! Encryption algorithm transforms
//!
//! Implements the ENCR family for the IKE SK payload: AES-CBC with
//! 128/192/256-bit keys and ENCR_NULL for null configurations.
//!
//! AES-CBC (transform ID 12) is a variable-key-size cipher; its key size
//! travels as a TV Key Length attribute and is part of descriptor
//! identity. [`IkeCrypto`] prepends a fresh random IV to every ciphertext
//! and strips it on decryption; plaintext is PKCS#7 padded.
//!
//! Child SAs carry [`EncrKernelTransform`] instead: the kernel owns the
//! ESP cipher, so only the metadata (transform ID, key length, attribute)
//! is exposed.

use crate::error::{Error, Result};
use crate::proposal::{Transform, TransformType};
use aes::{Aes128, Aes192, Aes256};
use cbc::{Decryptor, Encryptor};
use cipher::block_padding::Pkcs7;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

type Aes128CbcEnc = Encryptor<Aes128>;
type Aes128CbcDec = Decryptor<Aes128>;
type Aes192CbcEnc = Encryptor<Aes192>;
type Aes192CbcDec = Decryptor<Aes192>;
type Aes256CbcEnc = Encryptor<Aes256>;
type Aes256CbcDec = Decryptor<Aes256>;

/// ENCR_NULL transform ID
const ENCR_NULL: u16 = 11;

/// ENCR_AES_CBC transform ID
const ENCR_AES_CBC: u16 = 12;

/// AES block and IV size in bytes
const AES_BLOCK_SIZE: usize = 16;

/// Encryption algorithm descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncrTransform {
    /// AES-CBC with 128-bit key
    AesCbc128,
    /// AES-CBC with 192-bit key
    AesCbc192,
    /// AES-CBC with 256-bit key
    AesCbc256,
    /// NULL encryption
    Null,
}

impl EncrTransform {
    /// On-wire transform ID
    pub fn transform_id(self) -> u16 {
        match self {
            EncrTransform::AesCbc128 | EncrTransform::AesCbc192 | EncrTransform::AesCbc256 => {
                ENCR_AES_CBC
            }
            EncrTransform::Null => ENCR_NULL,
        }
    }

    /// Key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            EncrTransform::AesCbc128 => 16,
            EncrTransform::AesCbc192 => 24,
            EncrTransform::AesCbc256 => 32,
            EncrTransform::Null => 0,
        }
    }

    /// Key Length attribute value in bits; every ENCR variant reports one,
    /// ENCR_NULL as zero
    fn key_length_attribute(self) -> u16 {
        match self {
            EncrTransform::AesCbc128 => 128,
            EncrTransform::AesCbc192 => 192,
            EncrTransform::AesCbc256 => 256,
            EncrTransform::Null => 0,
        }
    }

    /// Decode an on-wire transform record; `None` when the ID or
    /// ID + key-length combination is unsupported
    pub fn decode_transform(transform: &Transform) -> Option<Self> {
        match transform.transform_id {
            ENCR_AES_CBC => match transform.key_length_attribute().ok()? {
                Some(128) => Some(EncrTransform::AesCbc128),
                Some(192) => Some(EncrTransform::AesCbc192),
                Some(256) => Some(EncrTransform::AesCbc256),
                _ => None,
            },
            ENCR_NULL => Some(EncrTransform::Null),
            _ => None,
        }
    }

    /// Re-encode as an on-wire transform record
    ///
    /// Fails with [`Error::EncodingFailure`] if the required key-length
    /// attribute cannot be represented.
    pub fn to_transform(self) -> Result<Transform> {
        Ok(Transform::new(TransformType::Encr, self.transform_id())
            .with_key_length(self.key_length_attribute()))
    }

    /// Build a cipher object bound to `key`
    pub fn new_crypto(self, key: &[u8]) -> Result<IkeCrypto> {
        if key.len() != self.key_len() {
            return Err(Error::CryptoInitFailure(format!(
                "EncrTransform::new_crypto: key length {} does not match required {}",
                key.len(),
                self.key_len()
            )));
        }
        match self {
            EncrTransform::Null => Ok(IkeCrypto::Null),
            _ => Ok(IkeCrypto::AesCbc { key: key.to_vec() }),
        }
    }
}

/// Kernel-side encryption descriptor for Child SAs
///
/// The ESP cipher lives in the kernel, so this variant carries metadata
/// only and exposes no cipher object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncrKernelTransform(EncrTransform);

impl EncrKernelTransform {
    /// On-wire transform ID
    pub fn transform_id(self) -> u16 {
        self.0.transform_id()
    }

    /// Key length in bytes
    pub fn key_len(self) -> usize {
        self.0.key_len()
    }

    /// Decode an on-wire transform record; `None` when unsupported
    pub fn decode_transform(transform: &Transform) -> Option<Self> {
        EncrTransform::decode_transform(transform).map(EncrKernelTransform)
    }

    /// Re-encode as an on-wire transform record
    pub fn to_transform(self) -> Result<Transform> {
        self.0.to_transform()
    }
}

/// Cipher object bound to an SK_e key
///
/// Stateless between calls: every [`encrypt`](IkeCrypto::encrypt) draws a
/// fresh IV, so the object is safe to use for any number of messages.
#[derive(Clone)]
pub enum IkeCrypto {
    /// AES-CBC with the bound key
    AesCbc {
        /// Bound encryption key, zeroized on drop
        key: Vec<u8>,
    },
    /// NULL cipher, identity transform
    Null,
}

impl std::fmt::Debug for IkeCrypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IkeCrypto::AesCbc { .. } => f.write_str("IkeCrypto::AesCbc {{ key: .. }}"),
            IkeCrypto::Null => f.write_str("IkeCrypto::Null"),
        }
    }
}

impl IkeCrypto {
    /// Encrypt `plaintext`, returning `IV || ciphertext`
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match self {
            IkeCrypto::Null => Ok(plaintext.to_vec()),
            IkeCrypto::AesCbc { key } => {
                let mut iv = [0u8; AES_BLOCK_SIZE];
                OsRng.try_fill_bytes(&mut iv).map_err(|e| {
                    Error::RandomnessFailure(format!("IkeCrypto::encrypt: {}", e))
                })?;

                let ciphertext = match key.len() {
                    16 => Aes128CbcEnc::new_from_slices(key, &iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::encrypt: {}", e))
                        })?
                        .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
                    24 => Aes192CbcEnc::new_from_slices(key, &iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::encrypt: {}", e))
                        })?
                        .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
                    32 => Aes256CbcEnc::new_from_slices(key, &iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::encrypt: {}", e))
                        })?
                        .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
                    n => {
                        return Err(Error::CryptoInitFailure(format!(
                            "IkeCrypto::encrypt: unsupported AES key length {}",
                            n
                        )))
                    }
                };

                let mut out = iv.to_vec();
                out.extend_from_slice(&ciphertext);
                Ok(out)
            }
        }
    }

    /// Decrypt `IV || ciphertext` produced by [`encrypt`](IkeCrypto::encrypt)
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            IkeCrypto::Null => Ok(ciphertext.to_vec()),
            IkeCrypto::AesCbc { key } => {
                if ciphertext.len() < 2 * AES_BLOCK_SIZE
                    || (ciphertext.len() - AES_BLOCK_SIZE) % AES_BLOCK_SIZE != 0
                {
                    return Err(Error::CryptoInitFailure(format!(
                        "IkeCrypto::decrypt: ciphertext length {} is not IV plus whole blocks",
                        ciphertext.len()
                    )));
                }
                let (iv, body) = ciphertext.split_at(AES_BLOCK_SIZE);

                let plaintext = match key.len() {
                    16 => Aes128CbcDec::new_from_slices(key, iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::decrypt: {}", e))
                        })?
                        .decrypt_padded_vec_mut::<Pkcs7>(body),
                    24 => Aes192CbcDec::new_from_slices(key, iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::decrypt: {}", e))
                        })?
                        .decrypt_padded_vec_mut::<Pkcs7>(body),
                    32 => Aes256CbcDec::new_from_slices(key, iv)
                        .map_err(|e| {
                            Error::CryptoInitFailure(format!("IkeCrypto::decrypt: {}", e))
                        })?
                        .decrypt_padded_vec_mut::<Pkcs7>(body),
                    n => {
                        return Err(Error::CryptoInitFailure(format!(
                            "IkeCrypto::decrypt: unsupported AES key length {}",
                            n
                        )))
                    }
                };

                plaintext.map_err(|_| {
                    Error::CryptoInitFailure(
                        "IkeCrypto::decrypt: invalid padding".to_string(),
                    )
                })
            }
        }
    }
}

impl Drop for IkeCrypto {
    fn drop(&mut self) {
        if let IkeCrypto::AesCbc { key } = self {
            key.zeroize();
        }
    }
}
