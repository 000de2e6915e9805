//! Atom record read from a coordinate (structure) file.
//!
//! A [`StructureAtom`] is the unit the whole pipeline is keyed on: every atom that enters
//! from the structure file must leave as exactly one PQR record. Names are stored as
//! `SmolStr` because they are short and copied into every intermediate table.

use super::types::Point;
use smol_str::SmolStr;
use std::fmt;

/// One physical atom of the input structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureAtom {
    /// Record tag as it appeared in the file (`ATOM` or `HETATM`).
    pub record: SmolStr,
    /// One-based serial number, unique within the file.
    pub id: u32,
    /// Atom name (not unique across residues).
    pub name: SmolStr,
    /// Residue name, e.g. `COR` or `APT`.
    pub residue_name: SmolStr,
    /// Residue instance number; unique only together with the residue name.
    pub residue_number: i32,
    /// Cartesian coordinates in ångströms.
    pub pos: Point,
}

impl StructureAtom {
    /// Creates an `ATOM` record with the given identity and position.
    ///
    /// # Arguments
    ///
    /// * `id` - Serial number from the structure file.
    /// * `name` - Atom name.
    /// * `residue_name` - Residue the atom belongs to.
    /// * `residue_number` - Residue instance number.
    /// * `pos` - Cartesian position.
    pub fn new(id: u32, name: &str, residue_name: &str, residue_number: i32, pos: Point) -> Self {
        Self {
            record: SmolStr::new_static("ATOM"),
            id,
            name: SmolStr::new(name),
            residue_name: SmolStr::new(residue_name),
            residue_number,
            pos,
        }
    }
}

impl fmt::Display for StructureAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "atom {} '{}' in {} {}",
            self.id, self.name, self.residue_name, self.residue_number
        )
    }
}
