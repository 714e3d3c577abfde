//! Testing utilities and mock implementations
//!
//! Lets the adapter, tools and server be exercised without reaching the real
//! Adzuna API.

pub mod mocks;

pub use mocks::*;
