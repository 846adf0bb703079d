//! Identifier types with normalization
//!
//! Requirement identifiers end up as attribute values and element references
//! in the exported files, so every identifier is normalized into a token that
//! both output formats accept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized requirement-type tag
///
/// Spaces become `-`, slashes become `_` and ampersands become `.`.
/// Normalizing an already normalized tag leaves it unchanged.
///
/// # Examples
///
/// ```
/// use reqport::domain::ids::TypeTag;
///
/// let tag = TypeTag::new("SW Req/A&B").unwrap();
/// assert_eq!(tag.as_str(), "SW-Req_A.B");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a normalized tag from a raw source tag
    pub fn new(raw: impl AsRef<str>) -> Result<Self, String> {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            return Err("Requirement type tag cannot be empty".to_string());
        }
        Ok(Self(normalize_tag(raw)))
    }

    /// Returns the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TypeTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw tag into a format-legal token
pub fn normalize_tag(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            ' ' => '-',
            '/' => '_',
            '&' => '.',
            other => other,
        })
        .collect()
}

/// Export identifier of one requirement: normalized tag followed by the number
///
/// # Examples
///
/// ```
/// use reqport::domain::ids::{NodeId, TypeTag};
///
/// let id = NodeId::new(&TypeTag::new("F").unwrap(), 12);
/// assert_eq!(id.as_str(), "F12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Builds the identifier for requirement `number` of the type tagged `tag`
    pub fn new(tag: &TypeTag, number: u64) -> Self {
        Self(format!("{}{}", tag.as_str(), number))
    }

    /// Builds the identifier from an unnormalized tag
    pub fn from_raw(raw_tag: &str, number: u64) -> Self {
        Self(format!("{}{}", normalize_tag(raw_tag), number))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns a display name into an XML name fragment
///
/// Any character outside `[-_:a-zA-Z]` is replaced with a dash.
///
/// # Examples
///
/// ```
/// use reqport::domain::ids::xml_name;
///
/// assert_eq!(xml_name("ReqIF.Name"), "ReqIF-Name");
/// assert_eq!(xml_name("Risk level 2"), "Risk-level--");
/// ```
pub fn xml_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() || matches!(c, '-' | '_' | ':') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("F", "F" ; "plain")]
    #[test_case("SW Req", "SW-Req" ; "space")]
    #[test_case("HW/SW", "HW_SW" ; "slash")]
    #[test_case("R&D", "R.D" ; "ampersand")]
    #[test_case("A B/C&D", "A-B_C.D" ; "all")]
    fn test_normalize_tag(raw: &str, expected: &str) {
        assert_eq!(normalize_tag(raw), expected);
    }

    #[test_case("F")]
    #[test_case("SW Req/A&B")]
    #[test_case("  x / y & z ")]
    fn test_normalize_tag_idempotent(raw: &str) {
        let once = normalize_tag(raw);
        assert_eq!(normalize_tag(&once), once);

        let tag = TypeTag::new(raw).unwrap();
        assert_eq!(TypeTag::new(tag.as_str()).unwrap(), tag);
    }

    #[test]
    fn test_type_tag_empty() {
        assert!(TypeTag::new("").is_err());
        assert!(TypeTag::new("   ").is_err());
        assert!(TypeTag::from_str("").is_err());
    }

    #[test]
    fn test_node_id() {
        let tag = TypeTag::new("SW Req").unwrap();
        assert_eq!(NodeId::new(&tag, 7).as_str(), "SW-Req7");
        assert_eq!(NodeId::from_raw("SW Req", 7), NodeId::new(&tag, 7));
        assert_eq!(NodeId::new(&tag, 7).to_string(), "SW-Req7");
    }

    #[test]
    fn test_node_ids_distinct_for_distinct_numbers() {
        let tag = TypeTag::new("F").unwrap();
        assert_ne!(NodeId::new(&tag, 1), NodeId::new(&tag, 2));
    }

    #[test_case("Status", "Status" ; "letters")]
    #[test_case("ReqIF.ForeignID", "ReqIF-ForeignID" ; "dot")]
    #[test_case("a:b_c-d", "a:b_c-d" ; "allowed punctuation")]
    #[test_case("Cost (€) 10", "Cost-------" ; "digits and symbols")]
    #[test_case("Ääni", "--ni" ; "non ascii")]
    fn test_xml_name(raw: &str, expected: &str) {
        assert_eq!(xml_name(raw), expected);
    }
}
