//! Cryptographic transform registry
//!
//! One module per algorithm family from the IKEv2 transform registry:
//!
//! - [`dh`] - Diffie-Hellman groups (MODP)
//! - [`encr`] - Encryption algorithms (AES-CBC, NULL)
//! - [`integ`] - Integrity algorithms (HMAC)
//! - [`prf`] - Pseudorandom functions (HMAC) and the prf+ expansion
//! - [`esn`] - Extended sequence number indicators (Child SA only)
//!
//! Each family is a closed set of descriptors with two directions of
//! translation: `decode_transform` maps an on-wire [`Transform`] record to
//! a descriptor (`None` when the ID or attribute combination is
//! unsupported), and `to_transform` re-encodes a descriptor for the
//! message layer.
//!
//! [`Transform`]: crate::proposal::Transform

pub mod dh;
pub mod encr;
pub mod esn;
pub mod integ;
pub mod prf;

pub use dh::DhTransform;
pub use encr::{EncrKernelTransform, EncrTransform, IkeCrypto};
pub use esn::EsnTransform;
pub use integ::{IntegTransform, KeyedInteg};
pub use prf::{KeyedPrf, PrfTransform};
