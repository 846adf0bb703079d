//! ReqIF output
//!
//! The document is streamed region by region, one region per export phase:
//!
//! | Phase          | Region                                    |
//! |----------------|-------------------------------------------|
//! | open           | XML declaration, `REQ-IF`, `THE-HEADER`   |
//! | definitions    | `DATATYPES`, `SPEC-TYPES`                 |
//! | requirements   | `SPEC-OBJECTS`                            |
//! | traces         | `SPEC-RELATIONS`                          |
//! | specifications | `SPECIFICATIONS`                          |
//! | close          | closing tags                              |

pub mod catalog;
pub mod hierarchy;
pub mod objects;
pub mod relations;
pub mod writer;
pub mod xml;

pub use writer::ReqifWriter;
