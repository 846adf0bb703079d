//! Attribute value resolution
//!
//! Maps a typed attribute value to the text both writers put into cells and
//! attribute values. Matching is exhaustive over [`Value`], so a new value
//! kind cannot be added without deciding how it is rendered.

use crate::domain::{AttributeDefinition, AttributeKind, EnumEntry, Result, SourceError, Value};
use chrono::{DateTime, Utc};

/// Timestamp layout used in every output
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// ISO-8601 UTC timestamp with second precision
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Format-neutral rendering of one attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Scalar(String),
    /// Multi-selection labels in source order; empty slots are empty strings
    List(Vec<String>),
}

impl Resolved {
    /// Joins list entries with `separator`; scalars are returned unchanged
    pub fn joined(&self, separator: &str) -> String {
        match self {
            Resolved::Scalar(value) => value.clone(),
            Resolved::List(values) => values.join(separator),
        }
    }
}

fn entry_label(entry: &Option<EnumEntry>) -> String {
    entry.as_ref().map(EnumEntry::label).unwrap_or_default()
}

/// Resolves `value` as an instance of `definition`
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedValue`] when the payload kind does not
/// match the definition kind.
pub fn resolve(definition: &AttributeDefinition, value: &Value) -> Result<Resolved> {
    let resolved = match (&definition.kind, value) {
        (AttributeKind::Text { .. }, Value::Text(text)) => Resolved::Scalar(text.clone()),
        (AttributeKind::Boolean, Value::Boolean(flag)) => Resolved::Scalar(flag.to_string()),
        (AttributeKind::Date, Value::Date(date)) => Resolved::Scalar(format_timestamp(date)),
        (AttributeKind::Integer { .. }, Value::Integer(number)) => {
            Resolved::Scalar(number.to_string())
        }
        (AttributeKind::Real { .. }, Value::Real(number)) => Resolved::Scalar(number.to_string()),
        (AttributeKind::Enumeration { multi_select, .. }, Value::Enumeration(entries)) => {
            if *multi_select {
                Resolved::List(entries.iter().map(entry_label).collect())
            } else {
                Resolved::Scalar(entries.first().map(entry_label).unwrap_or_default())
            }
        }
        (kind, value) => {
            return Err(SourceError::UnsupportedValue {
                attribute: definition.name.clone(),
                reason: format!(
                    "{} value for a {} attribute",
                    value.kind_name(),
                    kind.name()
                ),
            }
            .into())
        }
    };
    Ok(resolved)
}
