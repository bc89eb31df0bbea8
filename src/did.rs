use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

// Generic DID syntax: https://w3c.github.io/did-core/#generic-did-syntax
const IDCHAR: &str = r"a-zA-Z0-9\-_\.";

lazy_static! {
    static ref DID_REGEX: Regex = Regex::new(&format!(
        r"^did:[a-z0-9]+:(:+|[:{idchar}]+)*[{idchar}]+$",
        idchar = IDCHAR
    ))
    .unwrap();
}

/// DID parsed according to the generic syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DID {
    /// Always `did`.
    pub scheme: String,
    /// DID method name.
    pub method: String,
    /// Identifier computed or assigned by the DID method. May contain `:`.
    pub method_specific_id: String,
}

impl DID {
    /// Parse a DID string.
    ///
    /// Fails with [`Error::InvalidDID`] if `did` does not match the
    /// [generic DID syntax](https://w3c.github.io/did-core/#generic-did-syntax).
    pub fn parse(did: &str) -> Result<Self, Error> {
        if !DID_REGEX.is_match(did) {
            return Err(Error::InvalidDID(did.to_string()));
        }
        let mut parts = did.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(method), Some(method_specific_id)) => Ok(DID {
                scheme: "did".to_string(),
                method: method.to_string(),
                method_specific_id: method_specific_id.to_string(),
            }),
            _ => Err(Error::InvalidDID(did.to_string())),
        }
    }
}

impl FromStr for DID {
    type Err = Error;
    fn from_str(did: &str) -> Result<Self, Self::Err> {
        DID::parse(did)
    }
}

impl fmt::Display for DID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.method, self.method_specific_id)
    }
}
