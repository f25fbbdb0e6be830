//! IKEv2 Security Association keying core
//!
//! This crate implements the key-agreement and key-derivation core of an
//! IKEv2 (Internet Key Exchange v2) implementation as defined in
//! [RFC 7296]:
//!
//! - **Transform registry**: Diffie-Hellman groups, encryption,
//!   integrity, PRF and ESN algorithms behind per-family descriptors
//! - **Key agreement**: Diffie-Hellman over MODP groups with a
//!   rejection-sampled secret
//! - **IKE SA keys**: SKEYSEED and the seven SA keys (SK_d, SK_ai, SK_ar,
//!   SK_ei, SK_er, SK_pi, SK_pr) via the prf+ expansion
//! - **Child SA keys**: the four directional ESP keys derived from the
//!   parent SA's SK_d
//!
//! # Key hierarchy
//!
//! ```text
//! SKEYSEED = prf(Ni | Nr, g^ir)
//!     │
//!     └── prf+ (SKEYSEED, Ni | Nr | SPIi | SPIr)
//!           ├── SK_d ──── prf+ (SK_d, Ni | Nr) ── Child SA keys
//!           ├── SK_ai / SK_ar     integrity (IKE messages)
//!           ├── SK_ei / SK_er     encryption (IKE messages)
//!           └── SK_pi / SK_pr     AUTH payload computation
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use ike_keying::proposal::{Proposal, ProtocolId, Transform, TransformType};
//! use ike_keying::IkeSaKey;
//!
//! // Proposal as decoded from the peer's SA payload
//! let proposal = Proposal::new(ProtocolId::Ike)
//!     .add_transform(Transform::new(TransformType::Dh, 2))
//!     .add_transform(Transform::new(TransformType::Encr, 12).with_key_length(256))
//!     .add_transform(Transform::new(TransformType::Integ, 2))
//!     .add_transform(Transform::new(TransformType::Prf, 2));
//!
//! let peer_public_value = vec![0x42u8; 128]; // from the peer's KE payload
//! let nonces = [vec![0x11u8; 16], vec![0x22u8; 16]].concat(); // Ni | Nr
//!
//! let (ike_sa, local_public_value) =
//!     IkeSaKey::new(&proposal, &peer_public_value, &nonces, 0x1111, 0x2222)?;
//!
//! assert_eq!(local_public_value.len(), 128);
//! assert_eq!(ike_sa.sk_ei.len(), 32);
//! # Ok::<(), ike_keying::Error>(())
//! ```
//!
//! # Out of scope
//!
//! Wire-level message parsing and serialization, ESP packet processing,
//! network I/O, peer authentication and SA state management live in the
//! surrounding layers; this crate consumes decoded proposals and hands
//! back derived key material and initialized primitives.
//!
//! # Concurrency
//!
//! Everything here is synchronous and computational. A derived key bundle
//! is safe to read from multiple threads: the keyed primitives clone
//! their incremental state per computation instead of mutating it.
//!
//! # Security
//!
//! - No unsafe code
//! - All cryptographic operations use vetted RustCrypto libraries
//! - Key buffers are zeroized on drop with `zeroize`
//! - Randomness comes from the operating-system CSPRNG only
//!
//! # References
//!
//! - [RFC 7296] - IKEv2 Protocol
//! - [RFC 3526](https://datatracker.ietf.org/doc/html/rfc3526) - MODP groups
//!
//! [RFC 7296]: https://datatracker.ietf.org/doc/html/rfc7296

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod cert;
pub mod child_sa;
pub mod error;
pub mod ike_sa;
pub mod logging;
pub mod proposal;
pub mod random;
pub mod transform;

// Re-export commonly used types
pub use child_sa::ChildSaKey;
pub use error::{Error, Result};
pub use ike_sa::{calculate_diffie_hellman_materials, IkeSaKey};
pub use proposal::{Proposal, ProtocolId, Transform, TransformType};
