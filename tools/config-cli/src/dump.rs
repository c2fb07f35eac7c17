//! Printing decoded definitions

use std::io::Write;

use anyhow::{Context, Result};
use legacy_config::{Definition, DefinitionKind};
use serde_json::Value;

use crate::config::OutputFormat;

/// Dump output options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    /// Only dump the definition with this id
    pub id: Option<u32>,
}

/// Write `definitions` to `out` in the requested format
pub fn dump<K: DefinitionKind>(
    definitions: &[Definition<K>],
    options: DumpOptions,
    out: &mut impl Write,
) -> Result<()> {
    let selected: Vec<&Definition<K>> = match options.id {
        Some(id) => {
            let definition = definitions
                .iter()
                .find(|definition| definition.id() == id)
                .with_context(|| format!("No {} definition with id {}", K::ENTRY_NAME, id))?;
            vec![definition]
        }
        None => definitions.iter().collect(),
    };

    match options.format {
        OutputFormat::Json => {
            if options.pretty {
                serde_json::to_writer_pretty(&mut *out, &selected)?;
            } else {
                serde_json::to_writer(&mut *out, &selected)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for definition in selected {
                write_text(definition, out)?;
            }
        }
    }
    Ok(())
}

/// One header line, then a `name: value` line per supplied field
fn write_text<K: DefinitionKind>(definition: &Definition<K>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} {}", K::ENTRY_NAME, definition.id())?;

    for (opcode, property) in definition.properties().entries() {
        if property.is_present() {
            let ty = property.property_type();
            writeln!(out, "  {} ({}): {}", ty.name(), opcode, property.to_json()?)?;
        }
    }

    if let Value::Object(fields) = serde_json::to_value(definition.inline())? {
        for (name, value) in fields {
            if !is_blank(&value) {
                writeln!(out, "  {}: {}", name, value)?;
            }
        }
    }
    Ok(())
}

/// Inline fields left at their empty default
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().all(Value::is_null),
        _ => false,
    }
}
