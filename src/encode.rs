//! [`Document`] to JSON.
use chrono::prelude::*;
use log::debug;
use serde_json::{Map, Value};

use crate::decode::{
    CREATED, CREATOR, DOMAIN, ID, NONCE, PRIORITY, RECIPIENT_KEYS, ROUTING_KEYS,
    SERVICE_ENDPOINT, TYPE,
};
use crate::dialect::{FieldNames, DEFAULT_CONTEXT};
use crate::document::{Document, Proof, PublicKey, Service};
use crate::error::{Error, ResultExt};
use crate::key::{PUBLIC_KEY_BASE58, PUBLIC_KEY_JWK};

impl Document {
    /// Raw JSON form of the document, in the dialect of its first context.
    ///
    /// Only `authentication` is written out of the verification
    /// relationships. `assertionMethod`, `capabilityDelegation`,
    /// `capabilityInvocation` and `keyAgreement` are left out.
    pub fn to_json_value(&self) -> Result<Value, Error> {
        let dialect = self.dialect();
        let fields = dialect.fields();
        debug!("encoding DID document {} as {:?}", self.id, dialect);

        let mut doc = Map::new();
        let context = if self.context.is_empty() {
            vec![DEFAULT_CONTEXT.to_string()]
        } else {
            self.context.clone()
        };
        doc.insert("@context".to_string(), context.into());
        if !self.id.is_empty() {
            doc.insert(ID.to_string(), self.id.clone().into());
        }

        if !self.public_key.is_empty() {
            let public_key = self
                .public_key
                .iter()
                .map(|pk| encode_public_key(fields, pk))
                .collect::<Result<Vec<_>, _>>()
                .context("populate public keys")?;
            doc.insert("publicKey".to_string(), Value::Array(public_key));
        }

        if !self.authentication.is_empty() {
            let authentication = self
                .authentication
                .iter()
                .map(|vm| encode_public_key(fields, &vm.public_key))
                .collect::<Result<Vec<_>, _>>()
                .context("populate authentications")?;
            doc.insert("authentication".to_string(), Value::Array(authentication));
        }

        if !self.service.is_empty() {
            let service = self.service.iter().map(encode_service).collect();
            doc.insert("service".to_string(), Value::Array(service));
        }

        if let Some(created) = &self.created {
            doc.insert(CREATED.to_string(), encode_timestamp(created));
        }
        if let Some(updated) = &self.updated {
            doc.insert("updated".to_string(), encode_timestamp(updated));
        }

        if !self.proof.is_empty() {
            let proof = self
                .proof
                .iter()
                .map(|proof| encode_proof(fields, proof))
                .collect();
            doc.insert("proof".to_string(), Value::Array(proof));
        }

        Ok(Value::Object(doc))
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(&self.to_json_value()?)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.to_json_value()?)?)
    }
}

/// RFC3339 in the offset the timestamp was written with. The fraction has
/// no trailing zeros and a zero offset is written `Z`.
fn encode_timestamp(timestamp: &DateTime<FixedOffset>) -> Value {
    let mut encoded = timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();
    // Leap seconds carry their extra second in the nanoseconds.
    let nanos = timestamp.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        encoded.push('.');
        encoded.push_str(format!("{:09}", nanos).trim_end_matches('0'));
    }
    if timestamp.offset().local_minus_utc() == 0 {
        encoded.push('Z');
    } else {
        encoded.push_str(&timestamp.format("%:z").to_string());
    }
    Value::String(encoded)
}

fn encode_public_key(fields: &FieldNames, pk: &PublicKey) -> Result<Value, Error> {
    let mut raw = Map::new();
    raw.insert(ID.to_string(), pk.id.clone().into());
    raw.insert(TYPE.to_string(), pk.type_.clone().into());
    raw.insert(fields.controller.to_string(), pk.controller.clone().into());
    match (&pk.jwk, &pk.value) {
        (Some(jwk), _) => {
            raw.insert(PUBLIC_KEY_JWK.to_string(), serde_json::to_value(jwk)?);
        }
        (None, Some(value)) => {
            raw.insert(
                PUBLIC_KEY_BASE58.to_string(),
                bs58::encode(value).into_string().into(),
            );
        }
        (None, None) => return Err(Error::MissingKeyMaterial(pk.id.clone())),
    }
    Ok(Value::Object(raw))
}

fn encode_service(service: &Service) -> Value {
    let mut raw = service.properties.clone();
    raw.insert(ID.to_string(), service.id.clone().into());
    raw.insert(TYPE.to_string(), service.type_.clone().into());
    raw.insert(
        SERVICE_ENDPOINT.to_string(),
        service.service_endpoint.clone().into(),
    );
    raw.insert(
        RECIPIENT_KEYS.to_string(),
        service.recipient_keys.clone().into(),
    );
    raw.insert(ROUTING_KEYS.to_string(), service.routing_keys.clone().into());
    raw.insert(PRIORITY.to_string(), service.priority.into());
    Value::Object(raw)
}

fn encode_proof(fields: &FieldNames, proof: &Proof) -> Value {
    let mut raw = Map::new();
    raw.insert(TYPE.to_string(), proof.type_.clone().into());
    raw.insert(CREATED.to_string(), encode_timestamp(&proof.created));
    raw.insert(CREATOR.to_string(), proof.creator.clone().into());
    raw.insert(
        fields.proof_value.to_string(),
        base64::encode_config(&proof.proof_value, base64::URL_SAFE_NO_PAD).into(),
    );
    raw.insert(DOMAIN.to_string(), proof.domain.clone().into());
    raw.insert(
        NONCE.to_string(),
        base64::encode_config(&proof.nonce, base64::URL_SAFE_NO_PAD).into(),
    );
    Value::Object(raw)
}
