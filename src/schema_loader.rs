//! JSON Schema compilation and validation for config documents.
//!
//! Schemas are embedded in the binary and compiled on use. Validation errors
//! are collected into a single message naming the document that failed.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

pub(crate) struct CompiledSchema {
    label: String,
    compiled: JSONSchema,
}

impl CompiledSchema {
    /// Compile a schema from its JSON text.
    pub(crate) fn from_json_str(raw: &str, label: &str) -> Result<Self> {
        let schema: Value =
            serde_json::from_str(raw).with_context(|| format!("parsing schema {label}"))?;
        Self::compile(schema, label)
    }

    fn compile(schema: Value, label: &str) -> Result<Self> {
        let compiled = JSONSchema::compile(&schema)
            .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;
        Ok(Self {
            label: label.to_string(),
            compiled,
        })
    }

    /// Validate `instance`, reporting every violation at once.
    pub(crate) fn validate(&self, instance: &Value, document: &str) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| {
                    let pointer = err.instance_path.to_string();
                    if pointer.is_empty() {
                        err.to_string()
                    } else {
                        format!("{pointer}: {err}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            bail!(
                "{document} failed validation against {}:\n{details}",
                self.label
            );
        }
        Ok(())
    }
}
