//! Tests for the map-key decoder and the state-dump protobuf messages.
//!
//! Keys are built the way cw-storage-plus lays out `Map<(UserKey, &str), _>`
//! entries so the decoder is exercised against realistic storage.

use prost::Message;

use crate::key::{KeyDecodeError, KeyLayout, KeySection, LengthPrefix, MIN_MAP_KEY_LEN};
use crate::proto::{
    Model, PageRequest, PageResponse, QueryAllContractStateRequest, QueryAllContractStateResponse,
};
use crate::{KeyDecoder, MapKeyDecoder};

// ───────────────────────────── helpers ──────────────────────────────

const USER: &str = "osmo1cyyzpxplxdzkeea7kwsydadg87357qnahakaks";

fn identifier(addr: &str) -> String {
    format!(r#"{{"addr":"{addr}"}}"#)
}

fn push_len(out: &mut Vec<u8>, prefix: LengthPrefix, len: usize) {
    match prefix {
        LengthPrefix::OneByte => out.push(len as u8),
        LengthPrefix::TwoBytes => out.extend_from_slice(&(len as u16).to_be_bytes()),
    }
}

/// Build `[len][namespace][len][payload][remainder]`.
fn build_key(
    prefix: LengthPrefix,
    namespace: &[u8],
    payload: &[u8],
    remainder: &[u8],
) -> Vec<u8> {
    let mut key = Vec::new();
    push_len(&mut key, prefix, namespace.len());
    key.extend_from_slice(namespace);
    push_len(&mut key, prefix, payload.len());
    key.extend_from_slice(payload);
    key.extend_from_slice(remainder);
    key
}

fn decoder(prefix: LengthPrefix) -> MapKeyDecoder {
    MapKeyDecoder::new(KeyLayout {
        prefix,
        min_len: MIN_MAP_KEY_LEN,
    })
}

// ═══════════════════════════════════════════════════════════════════
//  Well-formed keys
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_two_byte_prefix_recovers_identifier() {
    let payload = identifier(USER);
    let key = build_key(LengthPrefix::TwoBytes, b"collaterals", payload.as_bytes(), b"uosmo");

    let id = decoder(LengthPrefix::TwoBytes).decode(&key).unwrap();
    assert_eq!(id.as_str(), payload);
    assert_eq!(id.address().unwrap(), USER);
}

#[test]
fn test_one_byte_prefix_recovers_identifier() {
    let payload = identifier(USER);
    let key = build_key(LengthPrefix::OneByte, b"debts", payload.as_bytes(), b"uatom");

    let id = decoder(LengthPrefix::OneByte).decode(&key).unwrap();
    assert_eq!(id.as_str(), payload);
}

#[test]
fn test_remainder_is_ignored() {
    let payload = identifier(USER);
    let decoder = MapKeyDecoder::default();

    let plain = build_key(LengthPrefix::TwoBytes, b"debts", payload.as_bytes(), b"");
    let with_denom = build_key(
        LengthPrefix::TwoBytes,
        b"debts",
        payload.as_bytes(),
        b"ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2",
    );

    assert_eq!(decoder.decode(&plain).unwrap(), decoder.decode(&with_denom).unwrap());
}

#[test]
fn test_payload_reaching_end_of_key() {
    // Address section ends exactly at the last byte.
    let payload = identifier(USER);
    let key = build_key(LengthPrefix::TwoBytes, b"collaterals", payload.as_bytes(), b"");
    assert!(MapKeyDecoder::default().decode(&key).is_ok());
}

// ═══════════════════════════════════════════════════════════════════
//  Rejected keys
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_short_key_rejected_before_prefix_parsing() {
    // The prefix claims far more bytes than exist; the length check must win.
    let key = vec![0xFF; MIN_MAP_KEY_LEN - 1];
    let err = MapKeyDecoder::default().decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::TooShort {
            len: MIN_MAP_KEY_LEN - 1,
            min: MIN_MAP_KEY_LEN
        }
    );
}

#[test]
fn test_config_keys_rejected() {
    // Item storage (e.g. `config`, `owner`) has no length prefixes and is short.
    let decoder = MapKeyDecoder::default();
    assert!(matches!(decoder.decode(b"config"), Err(KeyDecodeError::TooShort { .. })));
    assert!(matches!(decoder.decode(b""), Err(KeyDecodeError::TooShort { .. })));
}

#[test]
fn test_namespace_length_past_end_rejected() {
    let mut key = vec![0xFF, 0xFF];
    key.extend_from_slice(&[b'a'; 60]);

    let err = MapKeyDecoder::default().decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::OutOfBounds {
            section: KeySection::MapName,
            wanted: 0xFFFF,
            remaining: 60
        }
    );
}

#[test]
fn test_address_length_past_end_rejected() {
    let payload = identifier(USER);
    let mut key = build_key(LengthPrefix::TwoBytes, b"debts", payload.as_bytes(), b"");
    // Drop the last 5 bytes so the declared address length overruns.
    key.truncate(key.len() - 5);

    let err = MapKeyDecoder::default().decode(&key).unwrap_err();
    assert!(matches!(
        err,
        KeyDecodeError::OutOfBounds {
            section: KeySection::Address,
            ..
        }
    ));
}

#[test]
fn test_missing_address_prefix_rejected() {
    // Namespace consumes everything after its own prefix.
    let mut key = vec![0x00, 60];
    key.extend_from_slice(&[b'n'; 60]);

    let err = MapKeyDecoder::default().decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::MissingPrefix {
            section: KeySection::Address
        }
    );
}

#[test]
fn test_one_byte_namespace_length_past_end_rejected() {
    let mut key = vec![0xFF];
    key.extend_from_slice(&[b'a'; 60]);

    let err = decoder(LengthPrefix::OneByte).decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::OutOfBounds {
            section: KeySection::MapName,
            wanted: 0xFF,
            remaining: 60
        }
    );
}

#[test]
fn test_one_byte_address_length_past_end_rejected() {
    let payload = identifier(USER);
    let mut key = build_key(LengthPrefix::OneByte, b"debts", payload.as_bytes(), b"");
    key.truncate(key.len() - 5);

    let err = decoder(LengthPrefix::OneByte).decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::OutOfBounds {
            section: KeySection::Address,
            wanted: payload.len(),
            remaining: payload.len() - 5
        }
    );
}

#[test]
fn test_one_byte_missing_address_prefix_rejected() {
    let mut key = vec![60];
    key.extend_from_slice(&[b'n'; 60]);

    let err = decoder(LengthPrefix::OneByte).decode(&key).unwrap_err();
    assert_eq!(
        err,
        KeyDecodeError::MissingPrefix {
            section: KeySection::Address
        }
    );
}

#[test]
fn test_invalid_utf8_payload_rejected() {
    let payload = vec![0xC3, 0x28, 0xA0, 0xA1].repeat(15);
    let key = build_key(LengthPrefix::TwoBytes, b"debts", &payload, b"");

    let err = MapKeyDecoder::default().decode(&key).unwrap_err();
    assert!(matches!(err, KeyDecodeError::InvalidUtf8(_)));
}

#[test]
fn test_custom_minimum_length() {
    let decoder = MapKeyDecoder::new(KeyLayout {
        prefix: LengthPrefix::OneByte,
        min_len: 4,
    });
    let key = build_key(LengthPrefix::OneByte, b"d", b"ab", b"");
    assert_eq!(decoder.decode(&key).unwrap().as_str(), "ab");
}

#[test]
fn test_length_prefix_from_width() {
    assert_eq!(LengthPrefix::from_width(1), Some(LengthPrefix::OneByte));
    assert_eq!(LengthPrefix::from_width(2), Some(LengthPrefix::TwoBytes));
    assert_eq!(LengthPrefix::from_width(3), None);
}

// ═══════════════════════════════════════════════════════════════════
//  Protobuf messages
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_request_encodes_address_and_page() {
    let request = QueryAllContractStateRequest {
        address: "osmo1redbank".to_string(),
        pagination: Some(PageRequest::page(vec![1, 2], 100)),
    };
    let bytes = request.encode_to_vec();

    // Field 1, wire type 2 (length-delimited), then the address.
    assert_eq!(bytes[0], 0x0A);
    assert_eq!(bytes[1] as usize, "osmo1redbank".len());
    assert_eq!(QueryAllContractStateRequest::decode(bytes.as_slice()).unwrap(), request);
}

#[test]
fn test_response_next_key() {
    let mut response = QueryAllContractStateResponse {
        models: vec![Model {
            key: b"config".to_vec(),
            value: b"{}".to_vec(),
        }],
        pagination: None,
    };
    assert!(response.next_key().is_none());

    response.pagination = Some(PageResponse {
        next_key: vec![],
        total: 0,
    });
    assert!(response.next_key().is_none());

    response.pagination = Some(PageResponse {
        next_key: vec![7, 7],
        total: 0,
    });
    assert_eq!(response.next_key(), Some(&[7u8, 7][..]));
}
