//! Utility modules.
//!
//! - `html`: escaping and attribute parsing
//! - `mime`: extension to MIME type mapping

pub mod html;
pub mod mime;
