//! Seam: typed entity definitions validated against a relational database.
//!
//! Entities are declared once as statics, every value crossing into a record goes through the
//! wrappers of [`wrap`], and [`check_schema`] verifies the definitions against the live catalog
//! at startup. Statements are executed by a driver crate such as `seam-postgres`.
pub use seam_core::*;
