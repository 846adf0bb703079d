//! Requirement records, their values and traces
//!
//! Nodes are read-only projections of the source data. A node owns its
//! children, so a hierarchy handed to the engine is always finite and acyclic.

use crate::domain::ids::NodeId;
use crate::domain::requirement_type::EnumEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user of the requirement source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}

impl Person {
    /// `First Last`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One entry of a requirement's revision history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
}

/// Requirement version as `major.minor`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Payload of one attribute value, one variant per attribute kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Boolean(bool),
    Date(DateTime<Utc>),
    Integer(i64),
    Real(f64),
    /// Selected entries in source order; `None` is an empty selection slot
    Enumeration(Vec<Option<EnumEntry>>),
}

impl Value {
    /// Short lowercase name of the payload kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Enumeration(_) => "enumeration",
        }
    }
}

/// Binds a value to a user-defined attribute, by attribute name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub attribute: String,
    pub value: Value,
}

/// Reference to a requirement, possibly in another project or type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementRef {
    pub project: String,
    pub type_name: String,
    /// Raw type tag
    pub tag: String,
    pub number: u64,
}

impl RequirementRef {
    pub fn node_id(&self) -> NodeId {
        NodeId::from_raw(&self.tag, self.number)
    }
}

/// The far end of a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEndpoint {
    Requirement(RequirementRef),
    /// The object was deleted or is no longer accessible
    Deleted,
    /// A non-requirement object such as a document reference
    External { description: String },
}

/// A directed link seen from one of its ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub endpoint: TraceEndpoint,
    #[serde(default)]
    pub suspect: bool,
}

/// A requirement record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementNode {
    /// Numeric ID, unique within the requirement type
    pub number: u64,
    pub name: String,
    #[serde(default)]
    pub owner: Option<Person>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    /// Rich-text description (HTML)
    #[serde(default)]
    pub description: String,
    /// Oldest revision first
    #[serde(default)]
    pub history: Vec<Revision>,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default)]
    pub children: Vec<RequirementNode>,
    /// Outgoing traces
    #[serde(default)]
    pub traces_to: Vec<Trace>,
    /// Incoming traces
    #[serde(default)]
    pub traces_from: Vec<Trace>,
}

impl RequirementNode {
    pub fn new(number: u64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            owner: None,
            status: String::new(),
            priority: String::new(),
            description: String::new(),
            history: Vec::new(),
            version: Version::default(),
            attribute_values: Vec::new(),
            children: Vec::new(),
            traces_to: Vec::new(),
            traces_from: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// First revision
    pub fn created(&self) -> Option<&Revision> {
        self.history.first()
    }

    /// Latest revision
    pub fn modified(&self) -> Option<&Revision> {
        self.history.last()
    }

    /// The value bound to the named attribute, if any
    pub fn value_of(&self, attribute: &str) -> Option<&Value> {
        self.attribute_values
            .iter()
            .find(|v| v.attribute == attribute)
            .map(|v| &v.value)
    }

    /// Number of nodes in this subtree, the node included
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}
