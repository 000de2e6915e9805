//! Fully resolved output row: structure identity plus chain, charge, and radius.

use super::atom::StructureAtom;
use super::types::Point;
use smol_str::SmolStr;

/// One atom ready to be serialized as a PQR `ATOM` line.
#[derive(Debug, Clone, PartialEq)]
pub struct PqrRecord {
    pub record: SmolStr,
    pub id: u32,
    pub name: SmolStr,
    pub residue_name: SmolStr,
    /// Single-character chain label derived from the residue name.
    pub chain_id: char,
    pub residue_number: i32,
    pub pos: Point,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Radius in ångströms.
    pub radius: f64,
}

impl PqrRecord {
    /// Builds a record from a structure atom and its resolved attributes.
    pub fn from_atom(atom: &StructureAtom, chain_id: char, charge: f64, radius: f64) -> Self {
        Self {
            record: atom.record.clone(),
            id: atom.id,
            name: atom.name.clone(),
            residue_name: atom.residue_name.clone(),
            chain_id,
            residue_number: atom.residue_number,
            pos: atom.pos,
            charge,
            radius,
        }
    }
}
