use chrono::prelude::*;
use derive_builder::Builder;
use serde_json::{Map, Value};

use crate::dialect::{Dialect, DEFAULT_CONTEXT};
use crate::error::Error;
use crate::jwk::JWK;

// ***********************************************
// * Data Structures for Decentralized Identifiers
// * https://w3c.github.io/did-core/
// * w3id.org/did/v1, v0.11 and the 2019 draft
// ***********************************************

/// Normalized DID Document.
///
/// Verification relationships hold resolved keys, never references. See
/// [`Document::from_json_bytes`] and [`Document::to_json_bytes`] for the
/// wire forms.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct Document {
    /// Context URIs. The first one selects the [`Dialect`].
    pub context: Vec<String>,
    pub id: String,
    pub public_key: Vec<PublicKey>,
    pub service: Vec<Service>,
    pub authentication: Vec<VerificationMethod>,
    pub assertion_method: Vec<VerificationMethod>,
    pub capability_delegation: Vec<VerificationMethod>,
    pub capability_invocation: Vec<VerificationMethod>,
    pub key_agreement: Vec<VerificationMethod>,
    /// Timestamps keep the UTC offset they were written with.
    pub created: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub proof: Vec<Proof>,
}

/// Public key of a DID Document.
///
/// The key material is kept as raw bytes whatever the source encoding. When
/// the key was given as a JWK, the JWK is kept too and takes precedence on
/// encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    pub id: String,
    pub type_: String,
    pub controller: String,
    pub value: Option<Vec<u8>>,
    pub(crate) jwk: Option<JWK>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Service {
    pub id: String,
    pub type_: String,
    pub service_endpoint: String,
    pub recipient_keys: Vec<String>,
    pub routing_keys: Vec<String>,
    pub priority: u64,
    /// Every other property of the service entry, kept as is.
    pub properties: Map<String, Value>,
}

/// A key in a verification relationship, resolved by value.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationMethod {
    pub public_key: PublicKey,
}

/// Cryptographic proof of the integrity of the DID Document.
#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
    pub type_: String,
    pub created: DateTime<FixedOffset>,
    pub creator: String,
    pub proof_value: Vec<u8>,
    pub domain: String,
    pub nonce: Vec<u8>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            context: vec![DEFAULT_CONTEXT.to_string()],
            id: String::new(),
            public_key: Vec::new(),
            service: Vec::new(),
            authentication: Vec::new(),
            assertion_method: Vec::new(),
            capability_delegation: Vec::new(),
            capability_invocation: Vec::new(),
            key_agreement: Vec::new(),
            created: None,
            updated: None,
            proof: Vec::new(),
        }
    }
}

impl Document {
    pub fn new(id: &str) -> Document {
        Document {
            id: String::from(id),
            ..Default::default()
        }
    }

    /// Dialect selected by the first context URI.
    pub fn dialect(&self) -> Dialect {
        self.context
            .first()
            .map(|context| Dialect::from_context(context))
            .unwrap_or_default()
    }

    /// Find a public key by id.
    pub fn public_key_by_id(&self, id: &str) -> Option<&PublicKey> {
        self.public_key.iter().find(|pk| pk.id == id)
    }
}

impl PublicKey {
    /// Create a public key from raw key bytes.
    pub fn from_bytes(id: &str, type_: &str, controller: &str, value: Vec<u8>) -> Self {
        Self {
            id: id.to_string(),
            type_: type_.to_string(),
            controller: controller.to_string(),
            value: Some(value),
            jwk: None,
        }
    }

    /// Create a public key from a JWK. The raw key bytes are derived from it.
    pub fn from_jwk(id: &str, type_: &str, controller: &str, jwk: JWK) -> Result<Self, Error> {
        let value = jwk.public_key_bytes()?;
        Ok(Self {
            id: id.to_string(),
            type_: type_.to_string(),
            controller: controller.to_string(),
            value: Some(value),
            jwk: Some(jwk),
        })
    }

    /// Public key without key material.
    pub fn new(id: &str, type_: &str, controller: &str) -> Self {
        Self {
            id: id.to_string(),
            type_: type_.to_string(),
            controller: controller.to_string(),
            value: None,
            jwk: None,
        }
    }

    pub fn json_web_key(&self) -> Option<&JWK> {
        self.jwk.as_ref()
    }
}

impl VerificationMethod {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }
}

impl From<PublicKey> for VerificationMethod {
    fn from(public_key: PublicKey) -> Self {
        Self::new(public_key)
    }
}
