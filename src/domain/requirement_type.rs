//! Requirement types and their attribute definitions

use crate::domain::ids::TypeTag;
use crate::domain::requirement::Person;
use serde::{Deserialize, Serialize};

/// A schema grouping requirements that share an attribute set and a tag prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementType {
    pub name: String,

    /// Raw tag as the source reports it; see [`RequirementType::tag`]
    #[serde(rename = "tag")]
    pub raw_tag: String,

    #[serde(default)]
    pub description: String,

    /// User-defined attributes in display order
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

impl RequirementType {
    /// Normalized tag used for every identifier derived from this type
    pub fn tag(&self) -> Result<TypeTag, String> {
        TypeTag::new(&self.raw_tag)
    }
}

/// A user-defined attribute of a requirement type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub kind: AttributeKind,
}

/// The six attribute kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    Text {
        #[serde(default = "default_text_max_length")]
        max_length: u32,
    },
    Boolean,
    Date,
    Integer {
        min: i64,
        max: i64,
    },
    Real {
        min: f64,
        max: f64,
        #[serde(default = "default_accuracy")]
        accuracy: u32,
    },
    Enumeration {
        /// Permitted values; a `None` entry is a placeholder the source may report
        #[serde(default)]
        entries: Vec<Option<EnumEntry>>,
        #[serde(default)]
        multi_select: bool,
    },
}

impl AttributeKind {
    /// Short lowercase name of the kind, used in messages
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Text { .. } => "text",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Date => "date",
            AttributeKind::Integer { .. } => "integer",
            AttributeKind::Real { .. } => "real",
            AttributeKind::Enumeration { .. } => "enumeration",
        }
    }
}

fn default_text_max_length() -> u32 {
    4000
}

fn default_accuracy() -> u32 {
    1
}

/// One selectable value of an enumeration: a plain label or a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumEntry {
    Label(String),
    Person(Person),
}

impl EnumEntry {
    /// Display label; persons show as `First Last`
    pub fn label(&self) -> String {
        match self {
            EnumEntry::Label(label) => label.clone(),
            EnumEntry::Person(person) => person.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_is_normalized() {
        let ty = RequirementType {
            name: "Software Requirement".to_string(),
            raw_tag: "SW Req".to_string(),
            description: String::new(),
            attributes: vec![],
        };
        assert_eq!(ty.tag().unwrap().as_str(), "SW-Req");
    }

    #[test]
    fn test_attribute_definition_deserialize() {
        let json = r#"{
            "name": "Owner group",
            "kind": { "type": "enumeration", "multi_select": true,
                      "entries": ["Core", {"first_name": "Ada", "last_name": "Lovelace", "user_id": "ada"}, null] }
        }"#;
        let def: AttributeDefinition = serde_json::from_str(json).unwrap();
        match def.kind {
            AttributeKind::Enumeration {
                entries,
                multi_select,
            } => {
                assert!(multi_select);
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[0].as_ref().unwrap().label(), "Core");
                assert_eq!(entries[1].as_ref().unwrap().label(), "Ada Lovelace");
                assert!(entries[2].is_none());
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_text_default_length() {
        let def: AttributeDefinition =
            serde_json::from_str(r#"{"name": "Note", "kind": {"type": "text"}}"#).unwrap();
        assert_eq!(def.kind, AttributeKind::Text { max_length: 4000 });
        assert_eq!(def.kind.name(), "text");
    }
}
