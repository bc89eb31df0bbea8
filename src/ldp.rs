//! Linked data proof verification.
//!
//! The cryptography is left to [`SignatureSuite`] implementations. This
//! module finds the suite and the key for each proof and computes the
//! signing input.
use log::debug;
use serde_json::Value;

use crate::decode::{CREATOR, TYPE};
use crate::dialect::Dialect;
use crate::document::{Document, PublicKey};
use crate::error::Error;
use crate::raw::{string_entry, RawObject};

/// Verification algorithm for one or more proof types.
pub trait SignatureSuite {
    /// Whether this suite verifies proofs of the given type.
    fn accept(&self, proof_type: &str) -> bool;

    /// Check `signature` over `message` with `key`. A bad signature is
    /// [`Error::VerificationFailed`].
    fn verify(&self, key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<(), Error>;
}

/// Look up the key a proof was created with.
pub trait KeyResolver {
    fn resolve(&self, id: &str) -> Result<&PublicKey, Error>;
}

/// Resolve proof creators against the public keys of a DID Document.
pub struct DocumentKeyResolver<'a> {
    public_keys: &'a [PublicKey],
}

impl<'a> DocumentKeyResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            public_keys: &document.public_key,
        }
    }
}

impl KeyResolver for DocumentKeyResolver<'_> {
    fn resolve(&self, id: &str) -> Result<&PublicKey, Error> {
        self.public_keys
            .iter()
            .find(|pk| pk.id == id)
            .ok_or_else(|| Error::KeyNotFound(id.to_string()))
    }
}

/// Canonical signing input of an encoded document: the JCS form of the
/// document without its `proof` property.
pub fn signing_input(document: &Value) -> Result<Vec<u8>, Error> {
    let mut unsigned = document.clone();
    if let Value::Object(object) = &mut unsigned {
        object.remove("proof");
    }
    Ok(serde_jcs::to_vec(&unsigned)?)
}

/// Verify every proof of an encoded DID Document.
///
/// Returns the first failure unchanged.
pub fn verify(
    json: &[u8],
    resolver: &dyn KeyResolver,
    suites: &[&dyn SignatureSuite],
) -> Result<(), Error> {
    let document: Value = serde_json::from_slice(json)?;
    let context = match document.get("@context") {
        Some(Value::Array(contexts)) => contexts.first().and_then(Value::as_str),
        Some(Value::String(context)) => Some(context.as_str()),
        _ => None,
    };
    let fields = Dialect::from_context(context.unwrap_or_default()).fields();

    let proofs = match document.get("proof") {
        Some(Value::Array(proofs)) if !proofs.is_empty() => proofs,
        None | Some(Value::Null) | Some(Value::Array(_)) => return Err(Error::NoProofFound),
        Some(_) => return Err(Error::unexpected_type("proof", "array")),
    };
    let message = signing_input(&document)?;

    for proof in proofs {
        let proof: &RawObject = match proof {
            Value::Object(object) => object,
            _ => return Err(Error::unexpected_type("proof", "object")),
        };
        let proof_type = string_entry(proof, TYPE)?;
        let suite = suites
            .iter()
            .find(|suite| suite.accept(&proof_type))
            .ok_or_else(|| Error::UnsupportedProofType(proof_type.clone()))?;
        let creator = string_entry(proof, CREATOR)?;
        let key = resolver.resolve(&creator)?;
        let signature = base64::decode_config(
            string_entry(proof, fields.proof_value)?,
            base64::URL_SAFE_NO_PAD,
        )?;
        debug!("verifying {} proof by {}", proof_type, creator);
        suite.verify(key, &message, &signature)?;
    }
    Ok(())
}

impl Document {
    /// Verify the document's proofs with the given suites.
    ///
    /// The proofs are checked over the encoded form of the document, so
    /// properties the encoder leaves out are not covered.
    pub fn verify_proof(&self, suites: &[&dyn SignatureSuite]) -> Result<(), Error> {
        if self.proof.is_empty() {
            return Err(Error::NoProofFound);
        }
        let json = self.to_json_bytes()?;
        let resolver = DocumentKeyResolver::new(self);
        verify(&json, &resolver, suites)
    }
}

#[cfg(feature = "ed25519")]
pub use ed25519_signature::Ed25519Signature2018;

#[cfg(feature = "ed25519")]
mod ed25519_signature {
    use std::convert::TryFrom;

    use ed25519_dalek::Verifier;

    use super::SignatureSuite;
    use crate::document::PublicKey;
    use crate::error::Error;

    /// Ed25519 signatures over the raw key bytes.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Ed25519Signature2018;

    impl SignatureSuite for Ed25519Signature2018 {
        fn accept(&self, proof_type: &str) -> bool {
            proof_type == "Ed25519Signature2018"
        }

        fn verify(&self, key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<(), Error> {
            let key_bytes = key
                .value
                .as_deref()
                .ok_or_else(|| Error::VerificationFailed(format!("key {} has no value", key.id)))?;
            let public_key = ed25519_dalek::PublicKey::from_bytes(key_bytes)
                .map_err(|e| Error::VerificationFailed(e.to_string()))?;
            let signature = ed25519_dalek::Signature::try_from(signature)
                .map_err(|e| Error::VerificationFailed(e.to_string()))?;
            public_key
                .verify(message, &signature)
                .map_err(|e| Error::VerificationFailed(e.to_string()))
        }
    }
}
