//! Value and rich-text transformation
//!
//! - [`attribute`]: typed attribute values to text
//! - [`xhtml`]: description HTML to the ReqIF XHTML subset
//! - [`plaintext`]: description HTML to plain text
//! - [`images`]: embedded image export and conversion

pub mod attribute;
pub mod html;
pub mod images;
pub mod plaintext;
pub mod xhtml;

pub use attribute::{format_timestamp, resolve, Resolved};
pub use xhtml::sanitize;
