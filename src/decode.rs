//! JSON to [`Document`].
use chrono::prelude::*;
use log::{debug, trace};
use serde_json::Value;

use crate::dialect::{Dialect, FieldNames};
use crate::document::{Document, Proof, PublicKey, Service, VerificationMethod};
use crate::error::{Error, ResultExt};
use crate::key::decode_key;
use crate::raw::{string_array, string_entry, uint_entry, RawDocument, RawObject};
use crate::schema::Schema;

pub(crate) const ID: &str = "id";
pub(crate) const TYPE: &str = "type";
pub(crate) const PUBLIC_KEY: &str = "publicKey";
pub(crate) const SERVICE_ENDPOINT: &str = "serviceEndpoint";
pub(crate) const RECIPIENT_KEYS: &str = "recipientKeys";
pub(crate) const ROUTING_KEYS: &str = "routingKeys";
pub(crate) const PRIORITY: &str = "priority";
pub(crate) const CONTROLLER: &str = "controller";
pub(crate) const CREATOR: &str = "creator";
pub(crate) const CREATED: &str = "created";
pub(crate) const DOMAIN: &str = "domain";
pub(crate) const NONCE: &str = "nonce";

impl Document {
    pub fn from_json(json: &str) -> Result<Document, Error> {
        Self::from_json_bytes(json.as_bytes())
    }

    /// Parse and validate a DID Document.
    ///
    /// The first `@context` entry selects the schema and the field names used
    /// for every nested entry. Decoding is all or nothing.
    pub fn from_json_bytes(json: &[u8]) -> Result<Document, Error> {
        let value: Value = serde_json::from_slice(json).context("JSON unmarshalling of did doc")?;
        if value.is_null() {
            return Err(Error::EmptyDocument);
        }
        let raw: RawDocument =
            serde_json::from_value(value.clone()).context("JSON unmarshalling of did doc")?;

        let context = raw.context();
        let dialect = Dialect::from_context(&context[0]);
        debug!("decoding DID document {:?} as {:?}", raw.id, dialect);

        Schema::for_context(&context[0]).validate(&value)?;
        let fields = dialect.fields();

        let service = raw
            .service
            .unwrap_or_default()
            .into_iter()
            .map(decode_service)
            .collect::<Result<Vec<_>, _>>()
            .context("populate services")?;

        let public_key = decode_public_keys(fields, raw.public_key.as_deref().unwrap_or_default())
            .context("populate public keys")?;

        let authentication = decode_verification_methods(fields, raw.authentication, &public_key)
            .context("populate authentications")?;
        let assertion_method = decode_verification_methods(fields, raw.assertion_method, &public_key)
            .context("populate assertion methods")?;
        let capability_delegation =
            decode_verification_methods(fields, raw.capability_delegation, &public_key)
                .context("populate capability delegations")?;
        let capability_invocation =
            decode_verification_methods(fields, raw.capability_invocation, &public_key)
                .context("populate capability invocations")?;

        let key_agreement = decode_key_agreements(raw.key_agreement.as_deref().unwrap_or_default())
            .context("populate key agreements")?;

        let proof = raw
            .proof
            .unwrap_or_default()
            .iter()
            .map(|proof| decode_proof(fields, proof))
            .collect::<Result<Vec<_>, _>>()
            .context("populate proofs")?;

        let created = parse_timestamp(raw.created.as_deref()).context("parse created")?;
        let updated = parse_timestamp(raw.updated.as_deref()).context("parse updated")?;

        Ok(Document {
            context,
            id: raw.id.unwrap_or_default(),
            public_key,
            service,
            authentication,
            assertion_method,
            capability_delegation,
            capability_invocation,
            key_agreement,
            created,
            updated,
            proof,
        })
    }
}

fn parse_timestamp(timestamp: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, Error> {
    match timestamp {
        Some(timestamp) => Ok(Some(
            DateTime::parse_from_rfc3339(timestamp)?,
        )),
        None => Ok(None),
    }
}

fn decode_service(mut raw: RawObject) -> Result<Service, Error> {
    let service = Service {
        id: string_entry(&raw, ID)?,
        type_: string_entry(&raw, TYPE)?,
        service_endpoint: string_entry(&raw, SERVICE_ENDPOINT)?,
        recipient_keys: string_array(&raw, RECIPIENT_KEYS)?,
        routing_keys: string_array(&raw, ROUTING_KEYS)?,
        priority: uint_entry(&raw, PRIORITY)?,
        properties: Default::default(),
    };
    for key in &[ID, TYPE, SERVICE_ENDPOINT, RECIPIENT_KEYS, ROUTING_KEYS, PRIORITY] {
        raw.remove(*key);
    }
    Ok(Service {
        properties: raw,
        ..service
    })
}

fn decode_public_key(controller_field: &str, raw: &RawObject) -> Result<PublicKey, Error> {
    let (value, jwk) = decode_key(raw)?;
    let public_key = PublicKey {
        id: string_entry(raw, ID)?,
        type_: string_entry(raw, TYPE)?,
        controller: string_entry(raw, controller_field)?,
        value: Some(value),
        jwk,
    };
    trace!("decoded public key {}", public_key.id);
    Ok(public_key)
}

fn decode_public_keys(fields: &FieldNames, raw: &[RawObject]) -> Result<Vec<PublicKey>, Error> {
    raw.iter()
        .map(|pk| decode_public_key(fields.controller, pk))
        .collect()
}

fn decode_verification_methods(
    fields: &FieldNames,
    raw: Option<Vec<Value>>,
    public_keys: &[PublicKey],
) -> Result<Vec<VerificationMethod>, Error> {
    let mut vms = Vec::new();
    for entry in raw.unwrap_or_default() {
        vms.extend(decode_verification_method(fields, entry, public_keys)?);
    }
    Ok(vms)
}

/// Decode one verification relationship entry.
///
/// An entry is a key id, a dialect-specific object referencing key ids, or
/// an embedded public key.
fn decode_verification_method(
    fields: &FieldNames,
    raw: Value,
    public_keys: &[PublicKey],
) -> Result<Vec<VerificationMethod>, Error> {
    let object = match raw {
        Value::String(key_id) => return resolve_key_ids(public_keys, &[key_id]),
        Value::Object(object) => object,
        _ => return Err(Error::unexpected_type("verification method", "string or object")),
    };

    match object.get(PUBLIC_KEY) {
        Some(Value::String(key_id)) if fields.key_reference_object => {
            return resolve_key_ids(public_keys, &[key_id.clone()]);
        }
        Some(Value::Array(key_ids)) if fields.key_reference_array => {
            let key_ids = key_ids
                .iter()
                .map(|key_id| match key_id {
                    Value::String(key_id) => Ok(key_id.clone()),
                    _ => Err(Error::unexpected_type(PUBLIC_KEY, "array of strings")),
                })
                .collect::<Result<Vec<String>, Error>>()?;
            return resolve_key_ids(public_keys, &key_ids);
        }
        _ => {}
    }

    let public_key = decode_public_key(fields.controller, &object)?;
    Ok(vec![VerificationMethod::new(public_key)])
}

/// Resolve key ids against the document's public keys. Empty ids are skipped.
fn resolve_key_ids(
    public_keys: &[PublicKey],
    key_ids: &[String],
) -> Result<Vec<VerificationMethod>, Error> {
    let mut vms = Vec::new();
    for key_id in key_ids {
        if key_id.is_empty() {
            continue;
        }
        let public_key = public_keys
            .iter()
            .find(|pk| &pk.id == key_id)
            .ok_or_else(|| Error::MissingVerificationKey(key_id.clone()))?;
        trace!("resolved verification method {}", key_id);
        vms.push(VerificationMethod::new(public_key.clone()));
    }
    Ok(vms)
}

fn decode_key_agreements(raw: &[RawObject]) -> Result<Vec<VerificationMethod>, Error> {
    // keyAgreement postdates the v0.11 `owner` naming.
    raw.iter()
        .map(|pk| decode_public_key(CONTROLLER, pk).map(VerificationMethod::new))
        .collect()
}

fn decode_proof(fields: &FieldNames, raw: &Value) -> Result<Proof, Error> {
    let raw = match raw {
        Value::Object(object) => object,
        _ => return Err(Error::unexpected_type("proof", "object")),
    };
    let created = DateTime::parse_from_rfc3339(&string_entry(raw, CREATED)?)?;
    let proof_value =
        base64::decode_config(string_entry(raw, fields.proof_value)?, base64::URL_SAFE_NO_PAD)?;
    let nonce = base64::decode_config(string_entry(raw, NONCE)?, base64::URL_SAFE_NO_PAD)?;
    Ok(Proof {
        type_: string_entry(raw, TYPE)?,
        created,
        creator: string_entry(raw, CREATOR)?,
        proof_value,
        domain: string_entry(raw, DOMAIN)?,
        nonce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DEFAULT_CONTEXT, V0_11_CONTEXT, V1_2019_CONTEXT};
    use crate::error::ErrorKind;
    use serde_json::json;

    const KEY_1: &str = "H3C2AVvLMv6gmMNam3uVAjZpfkcJCwDwnZn6z3wXmqPV";
    const KEY_2: &str = "GUXiqNHCdirb6NKpH6wYG4AubeBrKKn7f4Kg9AXMddDk";

    fn decode(value: Value) -> Result<Document, Error> {
        Document::from_json_bytes(&serde_json::to_vec(&value).unwrap())
    }

    fn doc_with_auth(context: &str, authentication: Value) -> Value {
        let controller = Dialect::from_context(context).fields().controller;
        json!({
            "@context": [context],
            "id": "did:example:123",
            "publicKey": [
                {
                    "id": "did:example:123#key-1",
                    "type": "Ed25519VerificationKey2018",
                    controller: "did:example:123",
                    "publicKeyBase58": KEY_1
                },
                {
                    "id": "did:example:123#key-2",
                    "type": "Ed25519VerificationKey2018",
                    controller: "did:example:123",
                    "publicKeyBase58": KEY_2
                }
            ],
            "authentication": authentication
        })
    }

    #[test]
    fn key_references() {
        let doc = decode(doc_with_auth(
            DEFAULT_CONTEXT,
            json!(["did:example:123#key-2", "did:example:123#key-1"]),
        ))
        .unwrap();
        let ids: Vec<&str> = doc
            .authentication
            .iter()
            .map(|vm| vm.public_key.id.as_str())
            .collect();
        assert_eq!(ids, vec!["did:example:123#key-2", "did:example:123#key-1"]);
        assert_eq!(doc.authentication[0].public_key, doc.public_key[1]);
    }

    #[test]
    fn empty_key_reference_is_skipped() {
        let doc = decode(doc_with_auth(DEFAULT_CONTEXT, json!([""]))).unwrap();
        assert!(doc.authentication.is_empty());
    }

    #[test]
    fn unknown_key_reference() {
        let err = decode(doc_with_auth(DEFAULT_CONTEXT, json!(["did:example:123#nope"])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingVerificationKey);
        assert!(matches!(err.root(), Error::MissingVerificationKey(id) if id == "did:example:123#nope"));
        assert!(err.to_string().starts_with("populate authentications failed"));
    }

    #[test]
    fn embedded_key() {
        let doc = decode(doc_with_auth(
            DEFAULT_CONTEXT,
            json!([{
                "id": "did:example:123#auth-1",
                "type": "Ed25519VerificationKey2018",
                "controller": "did:example:123",
                "publicKeyHex": "0102"
            }]),
        ))
        .unwrap();
        assert_eq!(doc.authentication.len(), 1);
        let pk = &doc.authentication[0].public_key;
        assert_eq!(pk.id, "did:example:123#auth-1");
        assert_eq!(pk.controller, "did:example:123");
        assert_eq!(pk.value, Some(vec![1, 2]));
        assert!(doc.public_key_by_id("did:example:123#auth-1").is_none());
    }

    #[test]
    fn legacy_reference_object() {
        let doc = decode(doc_with_auth(
            V0_11_CONTEXT,
            json!([{
                "type": "Ed25519SignatureAuthentication2018",
                "publicKey": "did:example:123#key-1"
            }]),
        ))
        .unwrap();
        assert_eq!(doc.authentication.len(), 1);
        assert_eq!(doc.authentication[0].public_key.id, "did:example:123#key-1");
        assert_eq!(doc.public_key[0].controller, "did:example:123");
    }

    #[test]
    fn reference_array_2019() {
        let doc = decode(doc_with_auth(
            V1_2019_CONTEXT,
            json!([{
                "type": "Ed25519SignatureAuthentication2018",
                "publicKey": ["did:example:123#key-1", "", "did:example:123#key-2"]
            }]),
        ))
        .unwrap();
        let ids: Vec<&str> = doc
            .authentication
            .iter()
            .map(|vm| vm.public_key.id.as_str())
            .collect();
        assert_eq!(ids, vec!["did:example:123#key-1", "did:example:123#key-2"]);

        let err = decode(doc_with_auth(
            V1_2019_CONTEXT,
            json!([{ "type": "Ed25519SignatureAuthentication2018", "publicKey": ["did:example:123#key-9"] }]),
        ))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingVerificationKey);
    }

    #[test]
    fn all_relationships_decoded() {
        let mut value = doc_with_auth(DEFAULT_CONTEXT, json!(["did:example:123#key-1"]));
        value["assertionMethod"] = json!(["did:example:123#key-1"]);
        value["capabilityDelegation"] = json!(["did:example:123#key-2"]);
        value["capabilityInvocation"] = json!(["did:example:123#key-1", "did:example:123#key-2"]);
        value["keyAgreement"] = json!([{
            "id": "did:example:123#ka-1",
            "type": "X25519KeyAgreementKey2019",
            "controller": "did:example:123",
            "publicKeyBase58": KEY_2
        }]);
        let doc = decode(value).unwrap();
        assert_eq!(doc.assertion_method.len(), 1);
        assert_eq!(doc.capability_delegation[0].public_key.id, "did:example:123#key-2");
        assert_eq!(doc.capability_invocation.len(), 2);
        assert_eq!(doc.key_agreement[0].public_key.id, "did:example:123#ka-1");
        assert_eq!(doc.key_agreement[0].public_key.controller, "did:example:123");

        let mut value = doc_with_auth(DEFAULT_CONTEXT, json!([]));
        value["capabilityInvocation"] = json!(["did:example:123#missing"]);
        let err = decode(value).unwrap_err();
        assert!(err.to_string().starts_with("populate capability invocations failed"));
    }

    #[test]
    fn services_keep_extra_properties() {
        let doc = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "service": [{
                "id": "did:example:123#did-communication",
                "type": "did-communication",
                "serviceEndpoint": "https://agent.example.com/",
                "recipientKeys": ["did:example:123#key-1"],
                "routingKeys": ["did:example:mediator#key-1"],
                "priority": 1,
                "accept": ["didcomm/aip2;env=rfc19"],
                "label": "agent"
            }]
        }))
        .unwrap();
        let service = &doc.service[0];
        assert_eq!(service.id, "did:example:123#did-communication");
        assert_eq!(service.type_, "did-communication");
        assert_eq!(service.service_endpoint, "https://agent.example.com/");
        assert_eq!(service.recipient_keys, vec!["did:example:123#key-1"]);
        assert_eq!(service.routing_keys, vec!["did:example:mediator#key-1"]);
        assert_eq!(service.priority, 1);
        assert_eq!(service.properties.len(), 2);
        assert_eq!(service.properties["label"], json!("agent"));
        assert!(!service.properties.contains_key("id"));
    }

    #[test]
    fn wrong_typed_service_field() {
        let err = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "service": [{
                "id": "did:example:123#svc",
                "type": "agent",
                "serviceEndpoint": "https://agent.example.com/",
                "priority": "high"
            }]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().starts_with("populate services failed"));
    }

    #[test]
    fn proofs() {
        let doc = decode(json!({
            "@context": V0_11_CONTEXT,
            "id": "did:example:123",
            "proof": [{
                "type": "Ed25519Signature2018",
                "created": "2019-09-23T14:16:59.484733-04:00",
                "creator": "did:example:123#key-1",
                "signatureValue": "AQID",
                "domain": "example.com",
                "nonce": "BAU"
            }]
        }))
        .unwrap();
        let proof = &doc.proof[0];
        assert_eq!(proof.proof_value, vec![1, 2, 3]);
        assert_eq!(proof.nonce, vec![4, 5]);
        assert_eq!(proof.created.to_rfc3339(), "2019-09-23T14:16:59.484733-04:00");
        assert_eq!(proof.domain, "example.com");

        let err = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "proof": [{
                "type": "Ed25519Signature2018",
                "created": "2019-09-23T14:16:59Z",
                "creator": "did:example:123#key-1",
                "proofValue": "not base64!"
            }]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Base64DecodeFailure);
    }

    #[test]
    fn malformed_input() {
        assert_eq!(
            Document::from_json_bytes(b"{").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        assert!(matches!(
            Document::from_json_bytes(b"null"),
            Err(Error::EmptyDocument)
        ));
        let err = decode(json!({ "@context": DEFAULT_CONTEXT, "id": "did:example:1", "publicKey": {} }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn schema_violation() {
        let err = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "publicKey": [{
                "id": "did:example:123#key-1",
                "type": "Ed25519VerificationKey2018",
                "owner": "did:example:123",
                "publicKeyBase58": KEY_1
            }]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().starts_with("did document not valid:\n- "));
    }

    #[test]
    fn document_timestamps() {
        let doc = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "created": "2002-10-10T17:00:00Z",
            "updated": "2002-10-10T17:00:00Z"
        }))
        .unwrap();
        let expected: DateTime<FixedOffset> = "2002-10-10T17:00:00Z".parse().unwrap();
        assert_eq!(doc.created, Some(expected));
        assert_eq!(doc.updated, Some(expected));

        let err = decode(json!({
            "@context": DEFAULT_CONTEXT,
            "id": "did:example:123",
            "updated": "yesterday"
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimestampParseFailure);
    }
}
