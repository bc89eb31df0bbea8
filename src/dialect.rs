/// Current DID context.
pub const DEFAULT_CONTEXT: &str = "https://w3id.org/did/v1";

// v0.11 context used by universal resolver
pub const V0_11_CONTEXT: &str = "https://w3id.org/did/v0.11";

/// Context of the 2019 DID draft.
pub const V1_2019_CONTEXT: &str = "https://www.w3.org/2019/did/v1";

/// JSON serialization dialect of a DID Document, selected by the first
/// `@context` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Current,
    V0_11,
    V1_2019,
}

/// Dialect-dependent field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
    pub controller: &'static str,
    pub proof_value: &'static str,
    /// Verification relationship entries may reference keys through an
    /// object with a single string `publicKey` property.
    pub key_reference_object: bool,
    /// Verification relationship entries may reference keys through an
    /// object with a `publicKey` array of key ids.
    pub key_reference_array: bool,
}

const CURRENT_FIELDS: FieldNames = FieldNames {
    controller: "controller",
    proof_value: "proofValue",
    key_reference_object: false,
    key_reference_array: false,
};

const V0_11_FIELDS: FieldNames = FieldNames {
    controller: "owner",
    proof_value: "signatureValue",
    key_reference_object: true,
    key_reference_array: false,
};

const V1_2019_FIELDS: FieldNames = FieldNames {
    controller: "controller",
    proof_value: "proofValue",
    key_reference_object: false,
    key_reference_array: true,
};

impl Dialect {
    /// Any context other than the two legacy ones selects [`Dialect::Current`].
    pub fn from_context(context: &str) -> Self {
        match context {
            V0_11_CONTEXT => Dialect::V0_11,
            V1_2019_CONTEXT => Dialect::V1_2019,
            _ => Dialect::Current,
        }
    }

    pub fn fields(self) -> &'static FieldNames {
        match self {
            Dialect::Current => &CURRENT_FIELDS,
            Dialect::V0_11 => &V0_11_FIELDS,
            Dialect::V1_2019 => &V1_2019_FIELDS,
        }
    }

    pub fn context(self) -> &'static str {
        match self {
            Dialect::Current => DEFAULT_CONTEXT,
            Dialect::V0_11 => V0_11_CONTEXT,
            Dialect::V1_2019 => V1_2019_CONTEXT,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Current
    }
}
