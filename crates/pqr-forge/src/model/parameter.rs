//! Per-residue, per-atom reference table of radii (and reference charges).
//!
//! The table is order independent for lookups but remembers insertion order so reports
//! and tests stay deterministic. Keys are `(residue name, atom name)`; for lattice atoms the
//! atom name column holds force-field atom types instead of atom names.

use smol_str::SmolStr;
use std::collections::HashMap;

/// One row of the parameter reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry {
    /// Residue the row applies to.
    pub residue_name: SmolStr,
    /// Atom name, or force-field atom type for lattice rows.
    pub atom_name: SmolStr,
    /// Reference charge. Not consulted during resolution; charges come from the topology.
    pub charge: f64,
    /// Atomic radius in ångströms.
    pub radius: f64,
    /// Force-field atom type column.
    pub atom_type: SmolStr,
}

impl ParameterEntry {
    /// Creates a row from its five columns.
    pub fn new(
        residue_name: &str,
        atom_name: &str,
        charge: f64,
        radius: f64,
        atom_type: &str,
    ) -> Self {
        Self {
            residue_name: SmolStr::new(residue_name),
            atom_name: SmolStr::new(atom_name),
            charge,
            radius,
            atom_type: SmolStr::new(atom_type),
        }
    }
}

/// Keyed collection of [`ParameterEntry`] rows.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    entries: Vec<ParameterEntry>,
    index: HashMap<SmolStr, HashMap<SmolStr, usize>>,
}

impl ParameterTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry keyed by residue and atom name.
    ///
    /// A repeated key with the same radius is ignored (the first row is kept). A repeated
    /// key with a different radius is rejected and the offending entry handed back, since
    /// keeping both would make the radius join ambiguous.
    ///
    /// # Arguments
    ///
    /// * `entry` - Row to add.
    ///
    /// # Returns
    ///
    /// `Ok(())` when stored or collapsed into an identical row, `Err(entry)` on conflict.
    pub fn insert(&mut self, entry: ParameterEntry) -> Result<(), ParameterEntry> {
        if let Some(existing) = self.get(&entry.residue_name, &entry.atom_name) {
            return if existing.radius == entry.radius {
                Ok(())
            } else {
                Err(entry)
            };
        }

        let position = self.entries.len();
        self.index
            .entry(entry.residue_name.clone())
            .or_default()
            .insert(entry.atom_name.clone(), position);
        self.entries.push(entry);
        Ok(())
    }

    /// Looks up the entry for an atom (or atom-type alias) within a residue.
    pub fn get(&self, residue_name: &str, atom_name: &str) -> Option<&ParameterEntry> {
        self.index
            .get(residue_name)
            .and_then(|atoms| atoms.get(atom_name))
            .map(|&idx| &self.entries[idx])
    }

    /// Convenience accessor for the radius of a keyed entry.
    pub fn radius(&self, residue_name: &str, atom_name: &str) -> Option<f64> {
        self.get(residue_name, atom_name).map(|entry| entry.radius)
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no row was stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_scoped_by_residue() {
        let mut table = ParameterTable::new();
        table
            .insert(ParameterEntry::new("COR", "SC4", 1.1, 2.2, "SC4"))
            .unwrap();
        table
            .insert(ParameterEntry::new("APT", "SC4", 0.0, 1.9, "SC4"))
            .unwrap();

        assert_eq!(table.radius("COR", "SC4"), Some(2.2));
        assert_eq!(table.radius("APT", "SC4"), Some(1.9));
        assert_eq!(table.radius("SOL", "SC4"), None);
    }

    #[test]
    fn identical_duplicate_collapses() {
        let mut table = ParameterTable::new();
        table
            .insert(ParameterEntry::new("APT", "N", -0.3, 1.85, "NH3"))
            .unwrap();
        table
            .insert(ParameterEntry::new("APT", "N", -0.3, 1.85, "NH3"))
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn conflicting_duplicate_is_rejected() {
        let mut table = ParameterTable::new();
        table
            .insert(ParameterEntry::new("APT", "N", -0.3, 1.85, "NH3"))
            .unwrap();
        let rejected = table
            .insert(ParameterEntry::new("APT", "N", -0.3, 2.00, "NH3"))
            .expect_err("different radius must conflict");

        assert_eq!(rejected.radius, 2.00);
        assert_eq!(table.radius("APT", "N"), Some(1.85));
    }
}
