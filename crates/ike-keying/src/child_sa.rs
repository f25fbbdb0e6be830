//! Child SA key derivation
//!
//! Child SA keys protect ESP traffic and are derived from the parent
//! IKE SA's SK_d-keyed PRF (RFC 7296 Section 2.17):
//!
//! ```text
//! KEYMAT = prf+(SK_d, Ni | Nr)
//! ```
//!
//! sliced in the normative order: initiator-to-responder encryption,
//! initiator-to-responder integrity, responder-to-initiator encryption,
//! responder-to-initiator integrity.

use crate::error::{Error, Result};
use crate::ike_sa::IkeSaKey;
use crate::logging;
use crate::proposal::{Proposal, ProtocolId, TransformType};
use crate::transform::{DhTransform, EncrKernelTransform, EsnTransform, IntegTransform};
use zeroize::Zeroize;

/// Child SA key bundle
///
/// Key fields are empty until [`generate_key`](ChildSaKey::generate_key)
/// runs; afterwards callers treat the bundle as immutable. Key buffers
/// are zeroized on drop.
#[derive(Debug)]
pub struct ChildSaKey {
    /// Security Parameter Index
    pub spi: u32,

    /// Diffie-Hellman group, present only when PFS was negotiated
    pub dh_info: Option<DhTransform>,
    /// Encryption algorithm metadata; the cipher itself lives in the kernel
    pub encr_k_info: EncrKernelTransform,
    /// Integrity algorithm; absent for combined-mode ciphers
    pub integ_k_info: Option<IntegTransform>,
    /// Extended sequence number indicator
    pub esn_info: EsnTransform,

    /// Encryption key for initiator-to-responder traffic
    pub initiator_to_responder_encryption_key: Vec<u8>,
    /// Encryption key for responder-to-initiator traffic
    pub responder_to_initiator_encryption_key: Vec<u8>,
    /// Integrity key for initiator-to-responder traffic; empty when no
    /// integrity algorithm was negotiated
    pub initiator_to_responder_integrity_key: Vec<u8>,
    /// Integrity key for responder-to-initiator traffic; empty when no
    /// integrity algorithm was negotiated
    pub responder_to_initiator_integrity_key: Vec<u8>,
}

impl ChildSaKey {
    /// Decode a Child SA key bundle from an ESP proposal
    ///
    /// Requires non-empty encryption and ESN transform lists; the
    /// Diffie-Hellman group and integrity algorithm are decoded only when
    /// offered. Key fields start empty.
    pub fn new_by_proposal(spi: u32, proposal: &Proposal) -> Result<Self> {
        if proposal.encryption_algorithms.is_empty() {
            return Err(Error::MissingField(
                "ChildSaKey::new_by_proposal: proposal carries no encryption algorithm"
                    .to_string(),
            ));
        }
        if proposal.extended_sequence_numbers.is_empty() {
            return Err(Error::MissingField(
                "ChildSaKey::new_by_proposal: proposal carries no extended sequence numbers \
                 transform"
                    .to_string(),
            ));
        }

        let dh_info = match proposal.diffie_hellman_groups.first() {
            Some(transform) => Some(DhTransform::decode_transform(transform).ok_or(
                Error::UnsupportedTransform {
                    transform_type: TransformType::Dh,
                    transform_id: transform.transform_id,
                },
            )?),
            None => None,
        };

        let transform = &proposal.encryption_algorithms[0];
        let encr_k_info = EncrKernelTransform::decode_transform(transform).ok_or(
            Error::UnsupportedTransform {
                transform_type: TransformType::Encr,
                transform_id: transform.transform_id,
            },
        )?;

        let integ_k_info = match proposal.integrity_algorithms.first() {
            Some(transform) => Some(IntegTransform::decode_transform(transform).ok_or(
                Error::UnsupportedTransform {
                    transform_type: TransformType::Integ,
                    transform_id: transform.transform_id,
                },
            )?),
            None => None,
        };

        let transform = &proposal.extended_sequence_numbers[0];
        let esn_info =
            EsnTransform::decode_transform(transform).ok_or(Error::UnsupportedTransform {
                transform_type: TransformType::Esn,
                transform_id: transform.transform_id,
            })?;

        Ok(ChildSaKey {
            spi,
            dh_info,
            encr_k_info,
            integ_k_info,
            esn_info,
            initiator_to_responder_encryption_key: Vec::new(),
            responder_to_initiator_encryption_key: Vec::new(),
            initiator_to_responder_integrity_key: Vec::new(),
            responder_to_initiator_integrity_key: Vec::new(),
        })
    }

    /// Derive the four directional keys from the parent IKE SA
    ///
    /// Runs prf+ keyed by the parent's SK_d-keyed PRF over the
    /// concatenated nonces and slices the stream in the normative order.
    /// The bundle is mutated in place; treat it as immutable afterwards.
    pub fn generate_key(&mut self, ike_sa: &IkeSaKey, concatenated_nonce: &[u8]) -> Result<()> {
        if concatenated_nonce.is_empty() {
            return Err(Error::MissingField(
                "ChildSaKey::generate_key: concatenated nonce is empty".to_string(),
            ));
        }

        let length_encryption_key = self.encr_k_info.key_len();
        let length_integrity_key = self.integ_k_info.map(IntegTransform::key_len).unwrap_or(0);
        let total_key_length = 2 * (length_encryption_key + length_integrity_key);

        let mut key_stream = ike_sa
            .prf_d
            .prf_plus(concatenated_nonce, total_key_length)?;

        let mut offset = 0;
        self.initiator_to_responder_encryption_key =
            key_stream[offset..offset + length_encryption_key].to_vec();
        offset += length_encryption_key;
        self.initiator_to_responder_integrity_key =
            key_stream[offset..offset + length_integrity_key].to_vec();
        offset += length_integrity_key;
        self.responder_to_initiator_encryption_key =
            key_stream[offset..offset + length_encryption_key].to_vec();
        offset += length_encryption_key;
        self.responder_to_initiator_integrity_key =
            key_stream[offset..offset + length_integrity_key].to_vec();
        key_stream.zeroize();

        logging::log_child_sa_keys_derived(self.spi, total_key_length);

        Ok(())
    }

    /// Re-encode the chosen transforms as a wire-shaped ESP proposal
    pub fn to_proposal(&self) -> Result<Proposal> {
        let mut proposal = Proposal::new(ProtocolId::Esp);
        if let Some(dh_info) = self.dh_info {
            proposal.diffie_hellman_groups.push(dh_info.to_transform());
        }
        proposal
            .encryption_algorithms
            .push(self.encr_k_info.to_transform()?);
        if let Some(integ_k_info) = self.integ_k_info {
            proposal
                .integrity_algorithms
                .push(integ_k_info.to_transform());
        }
        proposal
            .extended_sequence_numbers
            .push(self.esn_info.to_transform());
        Ok(proposal)
    }
}

impl Drop for ChildSaKey {
    fn drop(&mut self) {
        self.initiator_to_responder_encryption_key.zeroize();
        self.responder_to_initiator_encryption_key.zeroize();
        self.initiator_to_responder_integrity_key.zeroize();
        self.responder_to_initiator_integrity_key.zeroize();
    }
}
