//! Decoding, validation and encoding of [DID Documents][did-core].
//!
//! Three JSON dialects are understood, selected by the first `@context` URI:
//! - [`DEFAULT_CONTEXT`] (`https://w3id.org/did/v1`), the current one;
//! - [`V0_11_CONTEXT`], where the key controller is `owner` and proofs carry
//!   a `signatureValue`;
//! - [`V1_2019_CONTEXT`], where a verification relationship may reference an
//!   array of key ids.
//!
//! Decoding validates the input against the dialect's JSON Schema, then
//! normalizes it into a [`Document`] where keys are raw bytes and
//! verification relationships hold the keys themselves.
//!
//! ```
//! use ssi_did_doc::Document;
//!
//! let doc = Document::from_json(r#"{
//!     "@context": "https://w3id.org/did/v1",
//!     "id": "did:example:123",
//!     "publicKey": [{
//!         "id": "did:example:123#key-1",
//!         "type": "Ed25519VerificationKey2018",
//!         "controller": "did:example:123",
//!         "publicKeyHex": "0102"
//!     }],
//!     "authentication": ["did:example:123#key-1"]
//! }"#).unwrap();
//! assert_eq!(doc.authentication[0].public_key.value, Some(vec![1, 2]));
//! ```
//!
//! [did-core]: <https://www.w3.org/TR/did-core/>

pub mod decode;
pub mod der;
pub mod dialect;
pub mod did;
pub mod document;
pub mod encode;
pub mod error;
pub mod jwk;
pub mod key;
pub mod ldp;
pub mod one_or_many;
pub mod raw;
pub mod schema;

pub use dialect::{Dialect, DEFAULT_CONTEXT, V0_11_CONTEXT, V1_2019_CONTEXT};
pub use did::DID;
pub use document::{Document, DocumentBuilder, Proof, PublicKey, Service, VerificationMethod};
pub use error::{Error, ErrorKind};
pub use jwk::JWK;
pub use ldp::{DocumentKeyResolver, KeyResolver, SignatureSuite};
#[cfg(feature = "ed25519")]
pub use ldp::Ed25519Signature2018;
