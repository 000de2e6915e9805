//! Resolution settings and their TOML representation.
//!
//! Every field has a default matching the silica nanoparticle system (`COR` lattice, `APT`
//! ligands of 13 or 12 atoms), so an empty document is a valid configuration. Unknown keys are
//! rejected to catch typos early.

use super::classify::VariantRule;
use super::error::Error;
use serde::Deserialize;
use std::collections::BTreeMap;

/// What to do with a ligand instance whose size matches no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiedPolicy {
    /// Abort the run.
    Fail,
    /// Drop the instance from the output and log a warning.
    #[default]
    Skip,
    /// Keep the instance without charges; the missing-value policy then decides.
    Include,
}

/// What to do when a charge or radius lookup finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// Abort the run naming the atom.
    #[default]
    Fail,
    /// Substitute `0.0` and log a warning.
    Zero,
}

/// Residue name to single-character chain identifier mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ChainMap(BTreeMap<String, char>);

impl Default for ChainMap {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert("COR".to_string(), 'A');
        map.insert("APT".to_string(), 'B');
        Self(map)
    }
}

impl ChainMap {
    /// Creates a map with no entries.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Maps `residue_name` to `chain_id`, replacing any earlier mapping.
    pub fn insert(&mut self, residue_name: impl Into<String>, chain_id: char) {
        self.0.insert(residue_name.into(), chain_id);
    }

    /// Chain identifier for a residue name, if mapped.
    pub fn chain_for(&self, residue_name: &str) -> Option<char> {
        self.0.get(residue_name).copied()
    }

    /// Iterates mappings ordered by residue name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.0.iter().map(|(name, &chain)| (name.as_str(), chain))
    }
}

/// Settings consumed by [`crate::ops::resolve`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// Residue name of lattice (core) atoms.
    pub lattice_residue: String,
    /// Residue name of ligand atoms.
    pub ligand_residue: String,
    /// Atom count of a protonated ligand instance.
    pub protonated_size: usize,
    /// Atom count of a deprotonated ligand instance.
    pub deprotonated_size: usize,
    /// Handling of ligand instances matching no variant size.
    pub on_unclassified: UnclassifiedPolicy,
    /// Handling of unresolved charges and radii.
    pub on_missing: MissingValuePolicy,
    /// Chain identifier per residue name.
    pub chains: ChainMap,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        let rule = VariantRule::default();
        Self {
            lattice_residue: "COR".to_string(),
            ligand_residue: "APT".to_string(),
            protonated_size: rule.protonated_size,
            deprotonated_size: rule.deprotonated_size,
            on_unclassified: UnclassifiedPolicy::default(),
            on_missing: MissingValuePolicy::default(),
            chains: ChainMap::default(),
        }
    }
}

impl ResolveConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Arguments
    ///
    /// * `content` - TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document is malformed, contains unknown keys, or
    /// describes an invalid combination (see [`ResolveConfig::validate`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use pqr_forge::{MissingValuePolicy, ResolveConfig};
    ///
    /// let config = ResolveConfig::from_toml_str("on_missing = \"zero\"").unwrap();
    /// assert_eq!(config.on_missing, MissingValuePolicy::Zero);
    /// assert_eq!(config.protonated_size, 13);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings describe a resolvable system.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a residue name is empty, both groups share a residue
    /// name, a variant size is zero, or both variants have the same size.
    pub fn validate(&self) -> Result<(), Error> {
        if self.lattice_residue.trim().is_empty() || self.ligand_residue.trim().is_empty() {
            return Err(Error::config("residue names must not be empty"));
        }
        if self.lattice_residue == self.ligand_residue {
            return Err(Error::config(format!(
                "lattice and ligand residues are both '{}'",
                self.lattice_residue
            )));
        }
        if self.protonated_size == 0 || self.deprotonated_size == 0 {
            return Err(Error::config("variant sizes must be positive"));
        }
        if self.protonated_size == self.deprotonated_size {
            return Err(Error::config(format!(
                "protonated and deprotonated variants share size {}",
                self.protonated_size
            )));
        }
        Ok(())
    }

    /// Variant rule built from the configured sizes.
    pub fn variant_rule(&self) -> VariantRule {
        VariantRule {
            protonated_size: self.protonated_size,
            deprotonated_size: self.deprotonated_size,
        }
    }
}
