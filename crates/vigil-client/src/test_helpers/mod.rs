//! Test doubles and fixtures for the client crate

mod fixtures;
mod mocks;

pub use fixtures::*;
pub use mocks::*;
