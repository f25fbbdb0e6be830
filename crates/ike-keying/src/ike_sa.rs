//! IKE SA key agreement and key derivation
//!
//! Given a selected proposal, the peer's Diffie-Hellman public value, the
//! concatenated nonces and both SPIs, this module performs the exchange
//! and derives the seven keys that bind an IKE SA (RFC 7296 Sections 1.3,
//! 1.4 and 2.14):
//!
//! ```text
//! SKEYSEED = prf(Ni | Nr, g^ir)
//!
//! {SK_d | SK_ai | SK_ar | SK_ei | SK_er | SK_pi | SK_pr}
//!     = prf+ (SKEYSEED, Ni | Nr | SPIi | SPIr)
//! ```
//!
//! The slice order above is normative and must not change.

use crate::error::{Error, Result};
use crate::logging;
use crate::proposal::{Proposal, ProtocolId, TransformType};
use crate::random::generate_random_number;
use crate::transform::{
    DhTransform, EncrTransform, IkeCrypto, IntegTransform, KeyedInteg, KeyedPrf, PrfTransform,
};
use num_bigint::BigUint;
use std::fmt;
use zeroize::Zeroize;

/// Generate a fresh Diffie-Hellman secret and compute the exchange
/// materials for `dh_info`
///
/// Takes the peer's public value; returns the local public value and the
/// shared key, both left-padded to the group's prime length.
pub fn calculate_diffie_hellman_materials(
    dh_info: DhTransform,
    peer_public_value: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
    let secret = generate_random_number()?;
    let peer_public_value = BigUint::from_bytes_be(peer_public_value);

    let local_public_value = dh_info.get_public_value(&secret);
    let shared_key = dh_info.get_shared_key(&secret, &peer_public_value);
    logging::log_dh_materials_computed(dh_info.transform_id());

    Ok((local_public_value, shared_key))
}

/// Build the prf+ seed `Ni | Nr | SPIi | SPIr` with big-endian SPIs
fn concatenate_nonce_and_spi(nonce: &[u8], initiator_spi: u64, responder_spi: u64) -> Vec<u8> {
    let mut seed = Vec::with_capacity(nonce.len() + 16);
    seed.extend_from_slice(nonce);
    seed.extend_from_slice(&initiator_spi.to_be_bytes());
    seed.extend_from_slice(&responder_spi.to_be_bytes());
    seed
}

/// IKE SA key bundle
///
/// Holds the negotiated transform descriptors, the seven derived keys, and
/// primitives already bound to each key. Constructed once per
/// negotiation; treat as immutable afterwards. Key buffers are zeroized
/// on drop.
///
/// The bundle is safe to read concurrently after construction: the keyed
/// primitives clone their internal state on every computation, so no call
/// mutates the stored instance.
#[derive(Debug)]
pub struct IkeSaKey {
    /// Negotiated Diffie-Hellman group
    pub dh_info: DhTransform,
    /// Negotiated encryption algorithm
    pub encr_info: EncrTransform,
    /// Negotiated integrity algorithm
    pub integ_info: IntegTransform,
    /// Negotiated pseudorandom function
    pub prf_info: PrfTransform,

    /// Key for deriving Child SA keys
    pub sk_d: Vec<u8>,
    /// Initiator's integrity key
    pub sk_ai: Vec<u8>,
    /// Responder's integrity key
    pub sk_ar: Vec<u8>,
    /// Initiator's encryption key
    pub sk_ei: Vec<u8>,
    /// Responder's encryption key
    pub sk_er: Vec<u8>,
    /// Initiator's AUTH payload key
    pub sk_pi: Vec<u8>,
    /// Responder's AUTH payload key
    pub sk_pr: Vec<u8>,

    /// PRF keyed with SK_d, reused for Child SA derivations
    pub prf_d: KeyedPrf,
    /// Integrity primitive keyed with SK_ai
    pub integ_i: KeyedInteg,
    /// Integrity primitive keyed with SK_ar
    pub integ_r: KeyedInteg,
    /// Cipher bound to SK_ei
    pub encr_i: IkeCrypto,
    /// Cipher bound to SK_er
    pub encr_r: IkeCrypto,
    /// PRF keyed with SK_pi
    pub prf_i: KeyedPrf,
    /// PRF keyed with SK_pr
    pub prf_r: KeyedPrf,
}

impl IkeSaKey {
    /// Negotiate and derive an IKE SA key bundle
    ///
    /// Decodes index 0 of each transform list in `proposal`, performs the
    /// Diffie-Hellman exchange against `key_exchange_data` (the peer's
    /// public value), and derives all keys. Returns the bundle together
    /// with the local public value to place in the KE payload.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] when a transform category is empty,
    /// [`Error::UnsupportedTransform`] when an index-0 transform does not
    /// decode, and any failure from the derivation itself. No partial
    /// bundle is ever returned.
    pub fn new(
        proposal: &Proposal,
        key_exchange_data: &[u8],
        concatenated_nonce: &[u8],
        initiator_spi: u64,
        responder_spi: u64,
    ) -> Result<(Self, Vec<u8>)> {
        if proposal.diffie_hellman_groups.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::new: proposal carries no Diffie-Hellman group".to_string(),
            ));
        }
        if proposal.encryption_algorithms.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::new: proposal carries no encryption algorithm".to_string(),
            ));
        }
        if proposal.integrity_algorithms.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::new: proposal carries no integrity algorithm".to_string(),
            ));
        }
        if proposal.pseudorandom_functions.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::new: proposal carries no pseudorandom function".to_string(),
            ));
        }

        let transform = &proposal.diffie_hellman_groups[0];
        let dh_info =
            DhTransform::decode_transform(transform).ok_or(Error::UnsupportedTransform {
                transform_type: TransformType::Dh,
                transform_id: transform.transform_id,
            })?;

        let transform = &proposal.encryption_algorithms[0];
        let encr_info =
            EncrTransform::decode_transform(transform).ok_or(Error::UnsupportedTransform {
                transform_type: TransformType::Encr,
                transform_id: transform.transform_id,
            })?;

        let transform = &proposal.integrity_algorithms[0];
        let integ_info =
            IntegTransform::decode_transform(transform).ok_or(Error::UnsupportedTransform {
                transform_type: TransformType::Integ,
                transform_id: transform.transform_id,
            })?;

        let transform = &proposal.pseudorandom_functions[0];
        let prf_info =
            PrfTransform::decode_transform(transform).ok_or(Error::UnsupportedTransform {
                transform_type: TransformType::Prf,
                transform_id: transform.transform_id,
            })?;

        let (local_public_value, shared_key) =
            calculate_diffie_hellman_materials(dh_info, key_exchange_data)?;

        let key = Self::generate(
            dh_info,
            encr_info,
            integ_info,
            prf_info,
            concatenated_nonce,
            &shared_key,
            initiator_spi,
            responder_spi,
        )?;

        Ok((key, local_public_value))
    }

    /// Derive an IKE SA key bundle from already-agreed materials
    ///
    /// Deterministic: identical inputs yield byte-identical key material.
    /// [`IkeSaKey::new`] calls this after performing the Diffie-Hellman
    /// exchange.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        dh_info: DhTransform,
        encr_info: EncrTransform,
        integ_info: IntegTransform,
        prf_info: PrfTransform,
        concatenated_nonce: &[u8],
        diffie_hellman_shared_key: &[u8],
        initiator_spi: u64,
        responder_spi: u64,
    ) -> Result<Self> {
        if concatenated_nonce.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::generate: concatenated nonce is empty".to_string(),
            ));
        }
        if diffie_hellman_shared_key.is_empty() {
            return Err(Error::MissingField(
                "IkeSaKey::generate: Diffie-Hellman shared key is empty".to_string(),
            ));
        }

        let length_sk_d = prf_info.key_len();
        let length_sk_ai = integ_info.key_len();
        let length_sk_ei = encr_info.key_len();
        // SK_ar mirrors SK_ai, SK_er mirrors SK_ei, SK_pi and SK_pr mirror SK_d
        let total_key_length = length_sk_d * 3 + length_sk_ai * 2 + length_sk_ei * 2;

        // SKEYSEED = prf(Ni | Nr, g^ir)
        let skeyseed = prf_info
            .init(concatenated_nonce)
            .compute(diffie_hellman_shared_key);

        let seed = concatenate_nonce_and_spi(concatenated_nonce, initiator_spi, responder_spi);
        let mut key_stream = prf_info.init(&skeyseed).prf_plus(&seed, total_key_length)?;

        let mut offset = 0;
        let sk_d = key_stream[offset..offset + length_sk_d].to_vec();
        offset += length_sk_d;
        let sk_ai = key_stream[offset..offset + length_sk_ai].to_vec();
        offset += length_sk_ai;
        let sk_ar = key_stream[offset..offset + length_sk_ai].to_vec();
        offset += length_sk_ai;
        let sk_ei = key_stream[offset..offset + length_sk_ei].to_vec();
        offset += length_sk_ei;
        let sk_er = key_stream[offset..offset + length_sk_ei].to_vec();
        offset += length_sk_ei;
        let sk_pi = key_stream[offset..offset + length_sk_d].to_vec();
        offset += length_sk_d;
        let sk_pr = key_stream[offset..offset + length_sk_d].to_vec();
        key_stream.zeroize();

        let prf_d = prf_info.init(&sk_d);
        let integ_i = integ_info.init(&sk_ai);
        let integ_r = integ_info.init(&sk_ar);
        let encr_i = encr_info.new_crypto(&sk_ei)?;
        let encr_r = encr_info.new_crypto(&sk_er)?;
        let prf_i = prf_info.init(&sk_pi);
        let prf_r = prf_info.init(&sk_pr);

        logging::log_ike_sa_keys_derived(initiator_spi, responder_spi, total_key_length);

        Ok(IkeSaKey {
            dh_info,
            encr_info,
            integ_info,
            prf_info,
            sk_d,
            sk_ai,
            sk_ar,
            sk_ei,
            sk_er,
            sk_pi,
            sk_pr,
            prf_d,
            integ_i,
            integ_r,
            encr_i,
            encr_r,
            prf_i,
            prf_r,
        })
    }

    /// Re-encode the chosen transforms as a wire-shaped IKE proposal
    pub fn to_proposal(&self) -> Result<Proposal> {
        let mut proposal = Proposal::new(ProtocolId::Ike);
        proposal
            .diffie_hellman_groups
            .push(self.dh_info.to_transform());
        proposal
            .pseudorandom_functions
            .push(self.prf_info.to_transform());
        proposal
            .encryption_algorithms
            .push(self.encr_info.to_transform()?);
        proposal
            .integrity_algorithms
            .push(self.integ_info.to_transform());
        Ok(proposal)
    }
}

// Debugging aid only; never part of the protocol surface.
impl fmt::Display for IkeSaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\nEncryption Algorithm: {}\
             \nSK_ei: {}\
             \nSK_er: {}\
             \nIntegrity Algorithm: {}\
             \nSK_ai: {}\
             \nSK_ar: {}\
             \nSK_pi: {}\
             \nSK_pr: {}\
             \nSK_d : {}\n",
            self.encr_info.transform_id(),
            hex::encode(&self.sk_ei),
            hex::encode(&self.sk_er),
            self.integ_info.transform_id(),
            hex::encode(&self.sk_ai),
            hex::encode(&self.sk_ar),
            hex::encode(&self.sk_pi),
            hex::encode(&self.sk_pr),
            hex::encode(&self.sk_d),
        )
    }
}

impl Drop for IkeSaKey {
    fn drop(&mut self) {
        self.sk_d.zeroize();
        self.sk_ai.zeroize();
        self.sk_ar.zeroize();
        self.sk_ei.zeroize();
        self.sk_er.zeroize();
        self.sk_pi.zeroize();
        self.sk_pr.zeroize();
    }
}
