//! Safe SQL builder: identifiers validated before interpolation, values bound as parameters.

mod builder;
pub mod ident;
pub mod operator;
pub mod params;
pub mod row;

pub use builder::*;
pub use ident::{identifier, is_word};
pub use operator::{Direction, Operator};
pub use params::*;
pub use row::{row_to_map, Row};
