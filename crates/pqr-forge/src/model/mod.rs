//! In-memory tables exchanged between the loaders, the resolution engine, and the writer.
//!
//! - [`atom`] / [`structure`] – atoms read from the coordinate file, in file order.
//! - [`topology`] – force-field atom rows carrying charges and atom-type aliases.
//! - [`parameter`] – reference radii keyed by residue and atom name.
//! - [`record`] – resolved output rows.
//! - [`types`] – coordinate alias and the closed atom-population enums.

pub mod atom;
pub mod parameter;
pub mod record;
pub mod structure;
pub mod topology;
pub mod types;
