//! Loosely-typed view of a DID Document, as read from JSON.
//!
//! Raw fields stay as [`serde_json::Value`] until the decoder knows the
//! dialect. The accessors below read a field as the expected type. An absent
//! or `null` field reads as its empty value and a wrongly typed field is an
//! error.
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::one_or_many::OneOrMany;

pub type RawObject = Map<String, Value>;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(rename = "@context")]
    pub context: Option<OneOrMany<String>>,
    pub id: Option<String>,
    pub public_key: Option<Vec<RawObject>>,
    pub service: Option<Vec<RawObject>>,
    pub authentication: Option<Vec<Value>>,
    pub assertion_method: Option<Vec<Value>>,
    pub capability_delegation: Option<Vec<Value>>,
    pub capability_invocation: Option<Vec<Value>>,
    pub key_agreement: Option<Vec<RawObject>>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub proof: Option<Vec<Value>>,
}

impl RawDocument {
    /// Context URIs, never empty. A missing or empty context yields `[""]`.
    pub fn context(&self) -> Vec<String> {
        match &self.context {
            Some(context) if !context.is_empty() => context.clone().into_vec(),
            _ => vec![String::new()],
        }
    }
}

/// Read a string field.
pub fn string_entry(object: &RawObject, key: &str) -> Result<String, Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Error::unexpected_type(key, "string")),
    }
}

/// Read a non-negative integer field.
pub fn uint_entry(object: &RawObject, key: &str) -> Result<u64, Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
            (Some(n), _) => Ok(n),
            // JSON numbers like `1.0` still carry an integral priority.
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                Ok(f as u64)
            }
            _ => Err(Error::unexpected_type(key, "non-negative integer")),
        },
        Some(_) => Err(Error::unexpected_type(key, "non-negative integer")),
    }
}

/// Read an array of strings, skipping `null` elements.
pub fn string_array(object: &RawObject, key: &str) -> Result<Vec<String>, Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                _ => Err(Error::unexpected_type(key, "array of strings")),
            })
            .collect(),
        Some(_) => Err(Error::unexpected_type(key, "array of strings")),
    }
}

/// Read an object field.
pub fn map_entry<'a>(object: &'a RawObject, key: &str) -> Result<Option<&'a RawObject>, Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::unexpected_type(key, "object")),
    }
}
