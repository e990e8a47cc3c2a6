#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain model and reactive state logic for a map showing a vessel, its
//! destination and the sea route between them.

mod domain;
mod error;
mod ports;
mod state;

pub use domain::*;
pub use error::*;
pub use ports::*;
pub use state::*;
