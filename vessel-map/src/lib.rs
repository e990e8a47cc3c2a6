#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Keeps a map's destination, vessel and route overlays in sync with the
//! vessel identifier and destination supplied by a host application, using the
//! Searoutes API for vessel positions and sea routes.

pub mod controller;
pub mod error;
pub mod host;
pub mod searoutes;
pub mod settings;
pub mod sink;
pub mod startup;
