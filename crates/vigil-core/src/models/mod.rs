//! Data models for report submissions
//!
//! Every model here is transient: built for one submission and dropped after it.

mod file;
mod form;
mod signature;
mod upload;

pub use file::*;
pub use form::*;
pub use signature::*;
pub use upload::*;
