//! Route builders.

pub mod front;
pub use front::*;
