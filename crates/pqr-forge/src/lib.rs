//! # PqrForge
//!
//! **PqrForge** merges a coordinate file, a force-field topology, and a radius table into the PQR records an electrostatics solver consumes. It targets core-shell nanoparticle systems: a rigid lattice residue whose charges follow the topology atom numbering, and repeated ligand residues whose charges depend on their protonation variant.
//!
//! ## Features
//!
//! - **Typed input tables** – `Structure`, `Topology`, and `ParameterTable` hold parsed PDB, GROMACS `.itp`, and APBS `.DAT` data with `nalgebra` coordinates.
//! - **Checked joins** – Lattice atoms are matched to the topology only after their name sequences are proven identical; ligand instances are classified by size into closed `LigandVariant`s.
//! - **Explicit policies** – Unclassified ligand instances and unresolved charges or radii are handled by configurable `UnclassifiedPolicy` and `MissingValuePolicy` settings instead of silent gaps.
//! - **Fixed-column output** – `io::write_pqr_records` emits the exact PQR layout expected downstream.

mod model;

pub mod io;
pub mod ops;

pub use model::atom::StructureAtom;
pub use model::parameter::{ParameterEntry, ParameterTable};
pub use model::record::PqrRecord;
pub use model::structure::{ResidueInstance, Structure};
pub use model::topology::{Topology, TopologyAtom, TopologyInstance};
pub use model::types::{AtomGroup, LigandVariant, Point};

pub use ops::{
    MissingValuePolicy, Resolution, ResolutionSummary, ResolveConfig, UnclassifiedPolicy, resolve,
};
