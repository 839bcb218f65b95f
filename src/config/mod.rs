pub mod env;
pub mod types;

pub use env::*;
pub use types::*;
