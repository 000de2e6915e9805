//! Atom group and ligand variant classification.
//!
//! Residue names decide whether an atom is part of the lattice or of a ligand; ligand residue
//! instances are then told apart purely by how many atoms they carry.

use super::config::ResolveConfig;
use super::error::Error;
use crate::model::{
    structure::{ResidueInstance, Structure},
    types::{AtomGroup, LigandVariant},
};

/// Atom-count rule mapping a ligand instance size to its protonation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRule {
    /// Member count of a protonated instance.
    pub protonated_size: usize,
    /// Member count of a deprotonated instance.
    pub deprotonated_size: usize,
}

impl Default for VariantRule {
    fn default() -> Self {
        Self {
            protonated_size: 13,
            deprotonated_size: 12,
        }
    }
}

impl VariantRule {
    /// Returns the variant whose size equals `atom_count`, if any.
    pub fn classify(&self, atom_count: usize) -> Option<LigandVariant> {
        if atom_count == self.protonated_size {
            Some(LigandVariant::Protonated)
        } else if atom_count == self.deprotonated_size {
            Some(LigandVariant::Deprotonated)
        } else {
            None
        }
    }

    /// Atom count that identifies `variant`.
    pub fn expected_size(&self, variant: LigandVariant) -> usize {
        match variant {
            LigandVariant::Protonated => self.protonated_size,
            LigandVariant::Deprotonated => self.deprotonated_size,
        }
    }
}

impl AtomGroup {
    /// Resolves the group of a residue name under the configured residue labels.
    pub fn of(residue_name: &str, config: &ResolveConfig) -> Option<AtomGroup> {
        if residue_name == config.lattice_residue {
            Some(AtomGroup::Lattice)
        } else if residue_name == config.ligand_residue {
            Some(AtomGroup::Ligand)
        } else {
            None
        }
    }
}

/// Ligand residue instance paired with the variant its size implies.
#[derive(Debug, Clone)]
pub struct ClassifiedInstance<'a> {
    /// Member atoms and residue number.
    pub instance: ResidueInstance<'a>,
    /// Variant implied by the member count, `None` when unclassified.
    pub variant: Option<LigandVariant>,
}

/// Rejects structures containing atoms outside the lattice and ligand residues.
///
/// # Errors
///
/// Returns [`Error::UnsupportedResidue`] for the first atom in file order whose residue
/// belongs to neither group.
pub fn ensure_supported(structure: &Structure, config: &ResolveConfig) -> Result<(), Error> {
    match structure
        .iter_atoms()
        .find(|atom| AtomGroup::of(&atom.residue_name, config).is_none())
    {
        Some(atom) => Err(Error::UnsupportedResidue {
            atom_id: atom.id,
            residue_name: atom.residue_name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Groups the ligand atoms of `structure` into instances and classifies each one.
///
/// Instances come back in ascending residue number.
pub fn classify_ligand_instances<'a>(
    structure: &'a Structure,
    config: &ResolveConfig,
) -> Vec<ClassifiedInstance<'a>> {
    let rule = config.variant_rule();
    structure
        .residue_instances(&config.ligand_residue)
        .into_iter()
        .map(|instance| {
            let variant = rule.classify(instance.len());
            ClassifiedInstance { instance, variant }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{atom::StructureAtom, types::Point};

    fn atom(id: u32, name: &str, res: &str, num: i32) -> StructureAtom {
        StructureAtom::new(id, name, res, num, Point::origin())
    }

    #[test]
    fn default_rule_maps_thirteen_and_twelve() {
        let rule = VariantRule::default();
        assert_eq!(rule.classify(13), Some(LigandVariant::Protonated));
        assert_eq!(rule.classify(12), Some(LigandVariant::Deprotonated));
        assert_eq!(rule.classify(11), None);
        assert_eq!(rule.classify(14), None);
    }

    #[test]
    fn custom_rule_is_honored() {
        let rule = VariantRule {
            protonated_size: 4,
            deprotonated_size: 3,
        };
        assert_eq!(rule.classify(4), Some(LigandVariant::Protonated));
        assert_eq!(rule.classify(3), Some(LigandVariant::Deprotonated));
        assert_eq!(rule.expected_size(LigandVariant::Deprotonated), 3);
    }

    #[test]
    fn atom_group_follows_configured_residue_names() {
        let config = ResolveConfig::default();
        assert_eq!(AtomGroup::of("COR", &config), Some(AtomGroup::Lattice));
        assert_eq!(AtomGroup::of("APT", &config), Some(AtomGroup::Ligand));
        assert_eq!(AtomGroup::of("SOL", &config), None);
    }

    #[test]
    fn ensure_supported_reports_first_foreign_atom() {
        let structure: Structure = vec![
            atom(1, "SI1", "COR", 1),
            atom(2, "OW", "SOL", 2),
            atom(3, "NA", "ION", 3),
        ]
        .into_iter()
        .collect();

        let err = ensure_supported(&structure, &ResolveConfig::default()).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedResidue {
                atom_id: 2,
                residue_name: "SOL".into()
            }
        );
    }

    #[test]
    fn ligand_instances_are_sorted_and_classified() {
        let mut atoms = Vec::new();
        let mut id = 1;
        for _ in 0..3 {
            atoms.push(atom(id, "C1", "APT", 9));
            id += 1;
        }
        for _ in 0..2 {
            atoms.push(atom(id, "C1", "APT", 4));
            id += 1;
        }
        let structure: Structure = atoms.into_iter().collect();
        let config = ResolveConfig {
            protonated_size: 3,
            deprotonated_size: 2,
            ..ResolveConfig::default()
        };

        let classified = classify_ligand_instances(&structure, &config);
        let summary: Vec<_> = classified
            .iter()
            .map(|c| (c.instance.number, c.variant))
            .collect();
        assert_eq!(
            summary,
            vec![
                (4, Some(LigandVariant::Deprotonated)),
                (9, Some(LigandVariant::Protonated)),
            ]
        );
    }
}
