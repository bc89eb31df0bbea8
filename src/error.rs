//! Error types for the DID Document codec.
use base64::DecodeError as Base64Error;
use chrono::ParseError as TimestampError;
use hex::FromHexError;
use serde_json::Error as SerdeJSONError;
use thiserror::Error;

use crate::jwk::Error as JWKError;

/// Error type for DID Document parsing, encoding and proof verification.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// String does not match the generic DID syntax
    #[error("invalid did: {0}. Make sure it conforms to the generic DID syntax: https://w3c.github.io/did-core/#generic-did-syntax")]
    InvalidDID(String),
    /// Document payload is `null`
    #[error("document payload is not provided")]
    EmptyDocument,
    /// A raw field holds a JSON value of the wrong type
    #[error("unexpected value for `{field}`: expected {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
    },
    /// Document does not conform to the schema of its context
    #[error("did document not valid:\n{}", .0.iter().map(|e| format!("- {}\n", e)).collect::<String>())]
    SchemaViolation(Vec<String>),
    /// None of the supported public key encodings is present
    #[error("public key encoding not supported")]
    UnsupportedKeyEncoding,
    /// Missing or malformed PEM block
    #[error("failed to decode PEM block containing public key")]
    InvalidPem,
    /// Verification relationship references an unknown key
    #[error("key {0} not exist in did doc public key")]
    MissingVerificationKey(String),
    /// Public key has neither a JWK nor raw key bytes
    #[error("public key {0} has no key material to encode")]
    MissingKeyMaterial(String),
    /// Document carries no proof
    #[error("proof not found")]
    NoProofFound,
    /// Key resolver has no key with this id
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// No signature suite accepts the proof type
    #[error("no signature suite for proof type {0}")]
    UnsupportedProofType(String),
    /// Signature suite rejected the proof
    #[error("verification failed: {0}")]
    VerificationFailed(String),
    /// Error wrapped with the step that produced it
    #[error("{step} failed: {source}")]
    Context {
        step: &'static str,
        #[source]
        source: Box<Error>,
    },
    /// Error from the JWK decoder
    #[error(transparent)]
    Jwk(#[from] JWKError),
    /// Error parsing an RFC3339 timestamp
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    /// Error decoding base64url data
    #[error(transparent)]
    Base64(#[from] Base64Error),
    /// Error decoding hex data
    #[error(transparent)]
    FromHex(#[from] FromHexError),
    /// Error decoding Base58 data
    #[error(transparent)]
    Base58(#[from] bs58::decode::Error),
    /// Error from `serde_json` crate
    #[error(transparent)]
    SerdeJSON(#[from] SerdeJSONError),
}

/// Classes of [`Error`], independent of the step that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    SchemaViolation,
    UnsupportedKeyEncoding,
    MissingVerificationKey,
    TimestampParseFailure,
    Base64DecodeFailure,
    NoProofFound,
    KeyNotFound,
    VerificationFailed,
    EncodeFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context { source, .. } => source.kind(),
            Error::InvalidDID(_)
            | Error::EmptyDocument
            | Error::UnexpectedType { .. }
            | Error::InvalidPem
            | Error::Jwk(_)
            | Error::FromHex(_)
            | Error::Base58(_)
            | Error::SerdeJSON(_) => ErrorKind::MalformedInput,
            Error::SchemaViolation(_) => ErrorKind::SchemaViolation,
            Error::UnsupportedKeyEncoding => ErrorKind::UnsupportedKeyEncoding,
            Error::MissingVerificationKey(_) => ErrorKind::MissingVerificationKey,
            Error::Timestamp(_) => ErrorKind::TimestampParseFailure,
            Error::Base64(_) => ErrorKind::Base64DecodeFailure,
            Error::NoProofFound => ErrorKind::NoProofFound,
            Error::KeyNotFound(_) => ErrorKind::KeyNotFound,
            Error::UnsupportedProofType(_) | Error::VerificationFailed(_) => {
                ErrorKind::VerificationFailed
            }
            Error::MissingKeyMaterial(_) => ErrorKind::EncodeFailure,
        }
    }

    /// Innermost error, with every [`Error::Context`] layer removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            e => e,
        }
    }

    pub(crate) fn unexpected_type(field: &str, expected: &'static str) -> Self {
        Error::UnexpectedType {
            field: field.to_string(),
            expected,
        }
    }
}

/// Attach the failing step to an error.
pub(crate) trait ResultExt<T> {
    fn context(self, step: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn context(self, step: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::Context {
            step,
            source: Box::new(e.into()),
        })
    }
}
