//! Certificate authority matching
//!
//! Answers CERTREQ payloads: checks whether a requested certificate
//! authority hash matches the locally configured one.

/// X.509 Certificate - Signature encoding (RFC 7296 Section 3.6)
pub const X509_CERTIFICATE_SIGNATURE: u8 = 4;

/// Compare the stored CA hash against a peer-requested one
///
/// Returns true iff `certificate_encoding` is the X.509 certificate
/// signature encoding, the stored hash is non-empty, and both hashes are
/// byte-for-byte equal. Any other encoding is rejected without
/// comparison.
pub fn compare_root_certificate(
    certificate_authority: &[u8],
    certificate_encoding: u8,
    requested_certificate_authority_hash: &[u8],
) -> bool {
    if certificate_encoding != X509_CERTIFICATE_SIGNATURE {
        return false;
    }
    if certificate_authority.is_empty() {
        return false;
    }
    certificate_authority == requested_certificate_authority_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_hashes() {
        let ca = [0xDEu8, 0xAD, 0xBE, 0xEF];
        assert!(compare_root_certificate(
            &ca,
            X509_CERTIFICATE_SIGNATURE,
            &ca
        ));
    }

    #[test]
    fn test_mismatching_hashes() {
        let ca = [0xDEu8, 0xAD, 0xBE, 0xEF];
        let requested = [0xDEu8, 0xAD, 0xBE, 0xEE];
        assert!(!compare_root_certificate(
            &ca,
            X509_CERTIFICATE_SIGNATURE,
            &requested
        ));
    }

    #[test]
    fn test_other_encoding_rejected() {
        let ca = [0xDEu8, 0xAD, 0xBE, 0xEF];
        assert!(!compare_root_certificate(&ca, 1, &ca));
    }

    #[test]
    fn test_empty_stored_hash_rejected() {
        assert!(!compare_root_certificate(
            &[],
            X509_CERTIFICATE_SIGNATURE,
            &[]
        ));
    }
}
