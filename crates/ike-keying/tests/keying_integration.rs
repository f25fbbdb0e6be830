//! Keying integration tests
//!
//! End-to-end key agreement between two honest parties, plus
//! property-based checks of the core invariants:
//!
//! 1. **Agreement**: both sides of a Diffie-Hellman exchange derive the
//!    same SA keys
//! 2. **Lengths**: DH outputs match the group's prime length, prf+
//!    consumes exactly the requested number of bytes
//! 3. **Round-trip**: decode(encode(descriptor)) is the identity for
//!    every supported algorithm
//! 4. **Bounds**: random secrets stay inside the defined range

use ike_keying::proposal::{Proposal, ProtocolId, Transform, TransformType};
use ike_keying::random::generate_random_number;
use ike_keying::transform::{
    DhTransform, EncrKernelTransform, EncrTransform, EsnTransform, IntegTransform, PrfTransform,
};
use ike_keying::{ChildSaKey, IkeSaKey};
use num_bigint::BigUint;
use proptest::prelude::*;

/// AES-CBC-256, HMAC-SHA1 integrity, HMAC-SHA1 PRF, MODP-1024
fn create_test_ike_proposal() -> Proposal {
    Proposal::new(ProtocolId::Ike)
        .add_transform(Transform::new(TransformType::Dh, 2))
        .add_transform(Transform::new(TransformType::Encr, 12).with_key_length(256))
        .add_transform(Transform::new(TransformType::Integ, 2))
        .add_transform(Transform::new(TransformType::Prf, 2))
}

fn create_test_esp_proposal() -> Proposal {
    Proposal::new(ProtocolId::Esp)
        .add_transform(Transform::new(TransformType::Encr, 12).with_key_length(128))
        .add_transform(Transform::new(TransformType::Integ, 12))
        .add_transform(Transform::new(TransformType::Esn, 0))
}

#[test]
fn test_both_sides_derive_identical_ike_sa_keys() {
    let proposal = create_test_ike_proposal();
    let group = DhTransform::Modp1024;

    let nonce = [vec![0x11u8; 16], vec![0x22u8; 16]].concat();
    let spi_i: u64 = 0xAABBCCDD00112233;
    let spi_r: u64 = 0x445566778899AABB;

    // Initiator's exchange, driven manually
    let initiator_secret = BigUint::from(0xDEADBEEFu32);
    let initiator_public = group.get_public_value(&initiator_secret);

    // Responder receives the initiator's public value and negotiates
    let (responder_sa, responder_public) =
        IkeSaKey::new(&proposal, &initiator_public, &nonce, spi_i, spi_r).unwrap();

    // Initiator finishes its side of the exchange
    let shared_key = group.get_shared_key(
        &initiator_secret,
        &BigUint::from_bytes_be(&responder_public),
    );
    let initiator_sa = IkeSaKey::generate(
        responder_sa.dh_info,
        responder_sa.encr_info,
        responder_sa.integ_info,
        responder_sa.prf_info,
        &nonce,
        &shared_key,
        spi_i,
        spi_r,
    )
    .unwrap();

    assert_eq!(initiator_sa.sk_d, responder_sa.sk_d);
    assert_eq!(initiator_sa.sk_ai, responder_sa.sk_ai);
    assert_eq!(initiator_sa.sk_ar, responder_sa.sk_ar);
    assert_eq!(initiator_sa.sk_ei, responder_sa.sk_ei);
    assert_eq!(initiator_sa.sk_er, responder_sa.sk_er);
    assert_eq!(initiator_sa.sk_pi, responder_sa.sk_pi);
    assert_eq!(initiator_sa.sk_pr, responder_sa.sk_pr);
}

#[test]
fn test_child_sa_keys_follow_ike_sa() {
    let proposal = create_test_ike_proposal();
    let (ike_sa, _) = IkeSaKey::new(
        &proposal,
        &[0x42u8; 128],
        &[0x11u8; 32],
        0x1111,
        0x2222,
    )
    .unwrap();

    let mut child = ChildSaKey::new_by_proposal(0x9999, &create_test_esp_proposal()).unwrap();
    let child_nonce = [vec![0x33u8; 16], vec![0x44u8; 16]].concat();
    child.generate_key(&ike_sa, &child_nonce).unwrap();

    // AES-CBC-128 with HMAC-SHA2-256-128 integrity
    assert_eq!(child.initiator_to_responder_encryption_key.len(), 16);
    assert_eq!(child.initiator_to_responder_integrity_key.len(), 32);
    assert_eq!(child.responder_to_initiator_encryption_key.len(), 16);
    assert_eq!(child.responder_to_initiator_integrity_key.len(), 32);

    // A second derivation from the same parent and nonces is identical
    let mut child2 = ChildSaKey::new_by_proposal(0x9999, &create_test_esp_proposal()).unwrap();
    child2.generate_key(&ike_sa, &child_nonce).unwrap();
    assert_eq!(
        child.initiator_to_responder_encryption_key,
        child2.initiator_to_responder_encryption_key
    );
}

#[test]
fn test_descriptor_roundtrip_is_identity() {
    for dh in [DhTransform::Modp1024, DhTransform::Modp2048] {
        assert_eq!(DhTransform::decode_transform(&dh.to_transform()), Some(dh));
    }
    for encr in [
        EncrTransform::AesCbc128,
        EncrTransform::AesCbc192,
        EncrTransform::AesCbc256,
        EncrTransform::Null,
    ] {
        assert_eq!(
            EncrTransform::decode_transform(&encr.to_transform().unwrap()),
            Some(encr)
        );
    }
    for integ in [IntegTransform::HmacSha1_96, IntegTransform::HmacSha256_128] {
        assert_eq!(
            IntegTransform::decode_transform(&integ.to_transform()),
            Some(integ)
        );
    }
    for prf in [PrfTransform::HmacSha1, PrfTransform::HmacSha256] {
        assert_eq!(
            PrfTransform::decode_transform(&prf.to_transform()),
            Some(prf)
        );
    }
    for esn in [EsnTransform::NoEsn, EsnTransform::Esn] {
        assert_eq!(
            EsnTransform::decode_transform(&esn.to_transform()),
            Some(esn)
        );
    }
}

#[test]
fn test_ike_and_kernel_encr_decode_agree() {
    let transform = Transform::new(TransformType::Encr, 12).with_key_length(192);
    let ike = EncrTransform::decode_transform(&transform).unwrap();
    let kernel = EncrKernelTransform::decode_transform(&transform).unwrap();
    assert_eq!(ike.transform_id(), kernel.transform_id());
    assert_eq!(ike.key_len(), kernel.key_len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_dh_outputs_match_prime_length(secret_bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let secret = BigUint::from_bytes_be(&secret_bytes);
        for group in [DhTransform::Modp1024, DhTransform::Modp2048] {
            let public = group.get_public_value(&secret);
            prop_assert_eq!(public.len(), group.prime_len());

            let peer = BigUint::from_bytes_be(&public);
            let shared = group.get_shared_key(&secret, &peer);
            prop_assert_eq!(shared.len(), group.prime_len());
        }
    }

    #[test]
    fn prop_dh_agreement(
        a_bytes in prop::collection::vec(1u8..=255, 8..32),
        b_bytes in prop::collection::vec(1u8..=255, 8..32),
    ) {
        let a = BigUint::from_bytes_be(&a_bytes);
        let b = BigUint::from_bytes_be(&b_bytes);
        let group = DhTransform::Modp1024;

        let public_a = BigUint::from_bytes_be(&group.get_public_value(&a));
        let public_b = BigUint::from_bytes_be(&group.get_public_value(&b));

        prop_assert_eq!(
            group.get_shared_key(&a, &public_b),
            group.get_shared_key(&b, &public_a)
        );
    }

    #[test]
    fn prop_prf_plus_yields_exact_length(
        length in 1usize..600,
        seed in prop::collection::vec(any::<u8>(), 0..64),
        key in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        for prf in [PrfTransform::HmacSha1, PrfTransform::HmacSha256] {
            let output = prf.init(&key).prf_plus(&seed, length).unwrap();
            prop_assert_eq!(output.len(), length);
        }
    }

    #[test]
    fn prop_derived_key_lengths_match_algorithms(spi_i in any::<u64>(), spi_r in any::<u64>()) {
        let key = IkeSaKey::generate(
            DhTransform::Modp1024,
            EncrTransform::AesCbc192,
            IntegTransform::HmacSha256_128,
            PrfTransform::HmacSha256,
            &[0x01u8; 32],
            &[0x02u8; 128],
            spi_i,
            spi_r,
        ).unwrap();

        prop_assert_eq!(key.sk_d.len(), key.prf_info.key_len());
        prop_assert_eq!(key.sk_ai.len(), key.integ_info.key_len());
        prop_assert_eq!(key.sk_ar.len(), key.integ_info.key_len());
        prop_assert_eq!(key.sk_ei.len(), key.encr_info.key_len());
        prop_assert_eq!(key.sk_er.len(), key.encr_info.key_len());
        prop_assert_eq!(key.sk_pi.len(), key.prf_info.key_len());
        prop_assert_eq!(key.sk_pr.len(), key.prf_info.key_len());
    }
}

#[test]
fn test_random_secret_bounds() {
    let minimum = (BigUint::from(1u8) << 128usize) - BigUint::from(1u8);
    let maximum = BigUint::from(1u8) << 2048usize;

    for _ in 0..8 {
        let number = generate_random_number().unwrap();
        assert!(number > minimum);
        assert!(number < maximum);
    }
}
