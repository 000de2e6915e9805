//! Error types returned by the resolution engine.
//!
//! Each variant names the stage and the atom or residue instance that broke an invariant, so
//! a failed run can be traced back to the offending input row without re-reading the files.

use crate::model::types::LigandVariant;
use thiserror::Error;

/// Error conditions surfaced by the operations layer.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Lattice atom names in the structure and the topology do not line up positionally.
    #[error("lattice atoms of residue '{residue_name}' are out of sync with the topology: {details}")]
    LatticeMismatch {
        residue_name: String,
        details: String,
    },

    /// A ligand instance needs a charge prototype that the topology never defines.
    #[error("topology defines no {variant} prototype ({expected_size} atoms) for residue '{residue_name}'")]
    MissingPrototype {
        variant: LigandVariant,
        residue_name: String,
        expected_size: usize,
    },

    /// No charge could be found for an atom.
    #[error("no charge found for atom {atom_id} '{atom_name}' in {residue_name} {residue_number}")]
    UnresolvedCharge {
        atom_id: u32,
        atom_name: String,
        residue_name: String,
        residue_number: i32,
    },

    /// No radius could be found for an atom under the given lookup key.
    #[error(
        "no radius found for atom {atom_id} '{atom_name}' in {residue_name} {residue_number} (looked up as '{lookup_key}')"
    )]
    UnresolvedRadius {
        atom_id: u32,
        atom_name: String,
        residue_name: String,
        residue_number: i32,
        lookup_key: String,
    },

    /// Ligand instance whose atom count matches neither variant.
    #[error(
        "ligand instance {residue_name} {residue_number} has {atom_count} atoms, which matches no protonation variant"
    )]
    UnclassifiedInstance {
        residue_name: String,
        residue_number: i32,
        atom_count: usize,
    },

    /// Residue name absent from the chain map.
    #[error("no chain identifier is mapped for residue '{residue_name}'")]
    UnmappedResidue { residue_name: String },

    /// Structure atom whose residue is neither the lattice nor the ligand residue.
    #[error("atom {atom_id} belongs to unsupported residue '{residue_name}'")]
    UnsupportedResidue { atom_id: u32, residue_name: String },

    /// Invalid resolution settings.
    #[error("invalid configuration: {details}")]
    Config { details: String },
}

impl Error {
    /// Helper for constructing an [`Error::LatticeMismatch`] variant.
    ///
    /// # Arguments
    ///
    /// * `residue_name` - Lattice residue label.
    /// * `details` - Description of the first divergence.
    pub fn lattice_mismatch(residue_name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::LatticeMismatch {
            residue_name: residue_name.into(),
            details: details.into(),
        }
    }

    /// Helper for constructing an [`Error::Config`] variant.
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config {
            details: details.into(),
        }
    }

    /// Helper for constructing an [`Error::UnmappedResidue`] variant.
    pub fn unmapped_residue(residue_name: impl Into<String>) -> Self {
        Self::UnmappedResidue {
            residue_name: residue_name.into(),
        }
    }
}
