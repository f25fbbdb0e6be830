//! IKEv2 proposal and transform structures
//!
//! Wire-shaped model of an SA proposal as defined in RFC 7296 Section 3.3.
//! The message layer decodes SA payloads into this shape; the keying core
//! consumes index 0 of each transform list and re-encodes chosen
//! descriptors back into it.
//!
//! # Structure
//!
//! ```text
//! Proposal
//!   ├── Encryption Algorithm transform(s)   (ENCR)
//!   ├── Pseudorandom Function transform(s)  (PRF)
//!   ├── Integrity Algorithm transform(s)    (INTEG)
//!   ├── Diffie-Hellman Group transform(s)   (D-H)
//!   └── Extended Sequence Numbers (ESN)     (Child SA only)
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// Attribute format bit for Type/Value attributes (fixed two-byte value)
pub const ATTRIBUTE_FORMAT_TV: u8 = 1;

/// Key Length attribute type (RFC 7296 Section 3.3.5)
pub const ATTRIBUTE_TYPE_KEY_LENGTH: u16 = 14;

/// Transform Type (RFC 7296 Section 3.3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransformType {
    /// Encryption Algorithm (ENCR)
    Encr = 1,
    /// Pseudo-random Function (PRF)
    Prf = 2,
    /// Integrity Algorithm (INTEG)
    Integ = 3,
    /// Diffie-Hellman Group (D-H)
    Dh = 4,
    /// Extended Sequence Numbers (ESN)
    Esn = 5,
}

impl TransformType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(TransformType::Encr),
            2 => Some(TransformType::Prf),
            3 => Some(TransformType::Integ),
            4 => Some(TransformType::Dh),
            5 => Some(TransformType::Esn),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformType::Encr => "ENCR",
            TransformType::Prf => "PRF",
            TransformType::Integ => "INTEG",
            TransformType::Dh => "D-H",
            TransformType::Esn => "ESN",
        };
        f.write_str(name)
    }
}

/// Protocol ID for proposals (RFC 7296 Section 3.3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProtocolId {
    /// IKE SA
    Ike = 1,
    /// AH (Authentication Header) - not commonly used
    Ah = 2,
    /// ESP (Encapsulating Security Payload)
    Esp = 3,
}

impl ProtocolId {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ProtocolId::Ike),
            2 => Some(ProtocolId::Ah),
            3 => Some(ProtocolId::Esp),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Transform attribute (e.g. key length)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformAttribute {
    /// Attribute format (TV = 1, TLV = 0)
    pub format: u8,
    /// Attribute type
    pub attr_type: u16,
    /// Attribute value; two bytes big-endian for TV attributes
    pub value: Vec<u8>,
}

/// A single cryptographic algorithm choice inside a proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// Transform type
    pub transform_type: TransformType,

    /// On-wire transform ID from the IANA IKEv2 registry
    pub transform_id: u16,

    /// Attributes (e.g. key length)
    pub attributes: Vec<TransformAttribute>,
}

impl Transform {
    /// Create new transform without attributes
    pub fn new(transform_type: TransformType, transform_id: u16) -> Self {
        Transform {
            transform_type,
            transform_id,
            attributes: Vec::new(),
        }
    }

    /// Attach a Key Length attribute in bits (TV format)
    pub fn with_key_length(mut self, bits: u16) -> Self {
        self.attributes.push(TransformAttribute {
            format: ATTRIBUTE_FORMAT_TV,
            attr_type: ATTRIBUTE_TYPE_KEY_LENGTH,
            value: bits.to_be_bytes().to_vec(),
        });
        self
    }

    /// Decode the Key Length attribute, in bits
    ///
    /// Returns `Ok(None)` when no key-length attribute is present, and an
    /// [`Error::UnsupportedTransform`] when one is present but its payload
    /// is not a two-byte value.
    pub fn key_length_attribute(&self) -> Result<Option<u16>> {
        for attr in &self.attributes {
            if attr.attr_type == ATTRIBUTE_TYPE_KEY_LENGTH {
                if attr.value.len() != 2 {
                    return Err(Error::UnsupportedTransform {
                        transform_type: self.transform_type,
                        transform_id: self.transform_id,
                    });
                }
                return Ok(Some(u16::from_be_bytes([attr.value[0], attr.value[1]])));
            }
        }
        Ok(None)
    }
}

/// An SA proposal, grouped by transform type
///
/// Each list is ordered by peer preference; the keying core always
/// consumes index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Protocol ID (IKE or ESP)
    pub protocol_id: ProtocolId,

    /// Encryption algorithms (ENCR)
    pub encryption_algorithms: Vec<Transform>,

    /// Pseudorandom functions (PRF)
    pub pseudorandom_functions: Vec<Transform>,

    /// Integrity algorithms (INTEG)
    pub integrity_algorithms: Vec<Transform>,

    /// Diffie-Hellman groups (D-H)
    pub diffie_hellman_groups: Vec<Transform>,

    /// Extended sequence number indicators (ESN), Child SA only
    pub extended_sequence_numbers: Vec<Transform>,
}

impl Proposal {
    /// Create an empty proposal for the given protocol
    pub fn new(protocol_id: ProtocolId) -> Self {
        Proposal {
            protocol_id,
            encryption_algorithms: Vec::new(),
            pseudorandom_functions: Vec::new(),
            integrity_algorithms: Vec::new(),
            diffie_hellman_groups: Vec::new(),
            extended_sequence_numbers: Vec::new(),
        }
    }

    /// Add a transform to the list matching its type
    pub fn add_transform(mut self, transform: Transform) -> Self {
        match transform.transform_type {
            TransformType::Encr => self.encryption_algorithms.push(transform),
            TransformType::Prf => self.pseudorandom_functions.push(transform),
            TransformType::Integ => self.integrity_algorithms.push(transform),
            TransformType::Dh => self.diffie_hellman_groups.push(transform),
            TransformType::Esn => self.extended_sequence_numbers.push(transform),
        }
        self
    }
}
