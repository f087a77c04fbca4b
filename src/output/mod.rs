// src/output/mod.rs
//! JSON export of harvest results.
//!
//! An [`Export`] is rendered and bound to a [`Destination`] first; [`deliver`]
//! then performs the write in one place.

mod types;
mod writer;

pub use types::{Delivery, Destination, Export};
pub use writer::deliver;
