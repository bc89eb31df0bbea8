//! JSON Schema validation of raw DID Documents.
//!
//! One schema is pinned per supported context. The schemas are compiled on
//! first use and never mutated afterwards.
use jsonschema::JSONSchema;
use lazy_static::lazy_static;
use serde_json::Value;

use crate::dialect::Dialect;
use crate::error::Error;

pub const SCHEMA_V1: &str = include_str!("../schemas/did-v1.json");
pub const SCHEMA_V0_11: &str = include_str!("../schemas/did-v0.11.json");
pub const SCHEMA_V1_2019: &str = include_str!("../schemas/did-v1-2019.json");

fn compile(schema: &str) -> JSONSchema {
    let schema: Value = serde_json::from_str(schema).unwrap();
    JSONSchema::compile(&schema).unwrap()
}

lazy_static! {
    static ref COMPILED_V1: JSONSchema = compile(SCHEMA_V1);
    static ref COMPILED_V0_11: JSONSchema = compile(SCHEMA_V0_11);
    static ref COMPILED_V1_2019: JSONSchema = compile(SCHEMA_V1_2019);
}

/// Schema a DID Document is validated against.
pub struct Schema {
    dialect: Dialect,
}

static SCHEMA_CURRENT: Schema = Schema {
    dialect: Dialect::Current,
};
static SCHEMA_LEGACY: Schema = Schema {
    dialect: Dialect::V0_11,
};
static SCHEMA_2019: Schema = Schema {
    dialect: Dialect::V1_2019,
};

impl Schema {
    /// Select the schema for a context URI. Unknown contexts use the current schema.
    pub fn for_context(context: &str) -> &'static Schema {
        Self::for_dialect(Dialect::from_context(context))
    }

    pub fn for_dialect(dialect: Dialect) -> &'static Schema {
        match dialect {
            Dialect::Current => &SCHEMA_CURRENT,
            Dialect::V0_11 => &SCHEMA_LEGACY,
            Dialect::V1_2019 => &SCHEMA_2019,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn compiled(&self) -> &'static JSONSchema {
        match self.dialect {
            Dialect::Current => &COMPILED_V1,
            Dialect::V0_11 => &COMPILED_V0_11,
            Dialect::V1_2019 => &COMPILED_V1_2019,
        }
    }

    /// Validate a raw document, collecting every schema error.
    pub fn validate(&self, document: &Value) -> Result<(), Error> {
        let result = self.compiled().validate(document);
        if let Err(errors) = result {
            let messages: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(Error::SchemaViolation(messages));
        }
        Ok(())
    }
}
