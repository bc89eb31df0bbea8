use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::der::{Integer, RSAPublicKey, DER};

// RFC 7517 - JSON Web Key (JWK)
// RFC 7518 - JSON Web Algorithms (JWA)
// RFC 8037 - CFRG ECDH and Signatures in JOSE

/// Error type for JWK public key extraction.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Missing curve in JWK
    #[error("Missing curve in JWK")]
    MissingCurve,
    /// Missing elliptic curve point in JWK
    #[error("Missing elliptic curve point in JWK")]
    MissingPoint,
    /// Missing modulus in RSA key
    #[error("Missing modulus in RSA key")]
    MissingModulus,
    /// Missing exponent in RSA key
    #[error("Missing exponent in RSA key")]
    MissingExponent,
    /// Key type is not supported
    #[error("Key type not supported")]
    UnsupportedKeyType,
    /// Curve not implemented
    #[error("Curve not implemented: '{0}'")]
    CurveNotImplemented(String),
    /// Invalid key length
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(usize),
    /// JWK object does not deserialize
    #[error("unmarshal JWK: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct JWK {
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_use: Option<String>,
    #[serde(rename = "key_ops")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_operations: Option<Vec<String>>,
    #[serde(rename = "alg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(rename = "kid")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(flatten)]
    pub params: Params,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "kty")]
pub enum Params {
    EC(ECParams),
    RSA(RSAParams),
    #[serde(rename = "oct")]
    Symmetric(SymmetricParams),
    OKP(OctetParams),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct ECParams {
    // Parameters for Elliptic Curve Public Keys
    #[serde(rename = "crv")]
    pub curve: Option<String>,
    #[serde(rename = "x")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_coordinate: Option<Base64urlUInt>,
    #[serde(rename = "y")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_coordinate: Option<Base64urlUInt>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct RSAParams {
    // Parameters for RSA Public Keys
    #[serde(rename = "n")]
    pub modulus: Option<Base64urlUInt>,
    #[serde(rename = "e")]
    pub exponent: Option<Base64urlUInt>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct SymmetricParams {
    // Parameters for Symmetric Keys
    #[serde(rename = "k")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_value: Option<Base64urlUInt>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct OctetParams {
    // Parameters for Octet Key Pair Public Keys
    #[serde(rename = "crv")]
    pub curve: String,
    #[serde(rename = "x")]
    pub public_key: Base64urlUInt,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
#[serde(into = "Base64urlUIntString")]
pub struct Base64urlUInt(pub Vec<u8>);
type Base64urlUIntString = String;

impl JWK {
    /// Raw public key bytes, in the form signature suites consume them.
    ///
    /// - OKP: the `x` parameter.
    /// - EC: the uncompressed SEC1 point `0x04 || x || y`.
    /// - RSA: the PKCS#1 `RSAPublicKey` DER.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        match &self.params {
            Params::OKP(params) => Ok(params.public_key.0.clone()),
            Params::EC(params) => params.public_key_bytes(),
            Params::RSA(params) => params.public_key_der(),
            Params::Symmetric(_) => Err(Error::UnsupportedKeyType),
        }
    }
}

impl From<Params> for JWK {
    fn from(params: Params) -> Self {
        Self {
            params,
            public_key_use: None,
            key_operations: None,
            algorithm: None,
            key_id: None,
        }
    }
}

impl ECParams {
    fn field_size(&self) -> Result<usize, Error> {
        match self.curve.as_deref() {
            Some("P-256") | Some("secp256k1") => Ok(32),
            Some("P-384") => Ok(48),
            Some("P-521") => Ok(66),
            Some(curve) => Err(Error::CurveNotImplemented(curve.to_string())),
            None => Err(Error::MissingCurve),
        }
    }

    /// Uncompressed SEC1 encoding of the public point.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        let size = self.field_size()?;
        let x = &self.x_coordinate.as_ref().ok_or(Error::MissingPoint)?.0;
        let y = &self.y_coordinate.as_ref().ok_or(Error::MissingPoint)?.0;
        let mut bytes = Vec::with_capacity(1 + 2 * size);
        bytes.push(0x04);
        for coordinate in &[x, y] {
            if coordinate.len() > size {
                return Err(Error::InvalidKeyLength(coordinate.len()));
            }
            bytes.resize(bytes.len() + size - coordinate.len(), 0);
            bytes.extend_from_slice(coordinate);
        }
        Ok(bytes)
    }
}

impl RSAParams {
    /// PKCS#1 DER encoding of the public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>, Error> {
        let modulus = self.modulus.as_ref().ok_or(Error::MissingModulus)?;
        let exponent = self.exponent.as_ref().ok_or(Error::MissingExponent)?;
        let key = RSAPublicKey {
            modulus: Integer(modulus.0.clone()),
            public_exponent: Integer(exponent.0.clone()),
        };
        Ok(DER::from(key))
    }
}

impl TryFrom<String> for Base64urlUInt {
    type Error = base64::DecodeError;
    fn try_from(data: String) -> Result<Self, Self::Error> {
        Ok(Base64urlUInt(base64::decode_config(
            data,
            base64::URL_SAFE,
        )?))
    }
}

impl From<&Base64urlUInt> for String {
    fn from(data: &Base64urlUInt) -> String {
        base64::encode_config(&data.0, base64::URL_SAFE_NO_PAD)
    }
}

impl From<Base64urlUInt> for Base64urlUIntString {
    fn from(data: Base64urlUInt) -> Base64urlUIntString {
        String::from(&data)
    }
}
