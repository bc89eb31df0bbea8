//! Public key material decoding.
use log::{trace, warn};

use crate::error::Error;
use crate::jwk::JWK;
use crate::raw::{map_entry, string_entry, RawObject};

pub const PUBLIC_KEY_BASE58: &str = "publicKeyBase58";
pub const PUBLIC_KEY_HEX: &str = "publicKeyHex";
pub const PUBLIC_KEY_PEM: &str = "publicKeyPem";
pub const PUBLIC_KEY_JWK: &str = "publicKeyJwk";

const ENCODINGS: [&str; 4] = [
    PUBLIC_KEY_BASE58,
    PUBLIC_KEY_HEX,
    PUBLIC_KEY_PEM,
    PUBLIC_KEY_JWK,
];

/// Decode the key material of a raw public key object.
///
/// Encodings are tried in the order base58, hex, PEM, JWK and the first one
/// present wins. The JWK is returned alongside the raw bytes so the key can
/// be re-encoded in its original form. An empty JWK object decodes to empty
/// key bytes.
pub fn decode_key(raw: &RawObject) -> Result<(Vec<u8>, Option<JWK>), Error> {
    let present = ENCODINGS
        .iter()
        .filter(|name| raw.get(**name).map_or(false, |v| !v.is_null()))
        .count();
    if present > 1 {
        warn!(
            "public key {} has {} key encodings, only the first is used",
            string_entry(raw, "id").unwrap_or_default(),
            present
        );
    }

    let base58 = string_entry(raw, PUBLIC_KEY_BASE58)?;
    if !base58.is_empty() {
        return Ok((bs58::decode(base58).into_vec()?, None));
    }

    let hex_key = string_entry(raw, PUBLIC_KEY_HEX)?;
    if !hex_key.is_empty() {
        return Ok((hex::decode(hex_key)?, None));
    }

    let pem = string_entry(raw, PUBLIC_KEY_PEM)?;
    if !pem.is_empty() {
        return Ok((pem_decode(&pem)?, None));
    }

    if let Some(jwk) = map_entry(raw, PUBLIC_KEY_JWK)? {
        return decode_jwk(jwk);
    }

    Err(Error::UnsupportedKeyEncoding)
}

fn decode_jwk(jwk: &RawObject) -> Result<(Vec<u8>, Option<JWK>), Error> {
    if jwk.is_empty() {
        return Ok((Vec::new(), None));
    }
    let jwk: JWK = serde_json::from_value(serde_json::Value::Object(jwk.clone()))
        .map_err(crate::jwk::Error::from)?;
    let bytes = jwk.public_key_bytes()?;
    Ok((bytes, Some(jwk)))
}

/// DER payload of the PEM block in `text`. Text before the block is ignored.
pub fn pem_decode(text: &str) -> Result<Vec<u8>, Error> {
    let start = text.find("-----BEGIN ").ok_or(Error::InvalidPem)?;
    let (label, der) =
        pem_rfc7468::decode_vec(text[start..].as_bytes()).map_err(|_| Error::InvalidPem)?;
    trace!("decoded PEM block {}", label);
    Ok(der)
}
