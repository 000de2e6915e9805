//! Final assembly of resolved atoms into output records.

use super::config::{MissingValuePolicy, ResolveConfig};
use super::error::Error;
use super::radius::RadiusLookup;
use crate::model::{atom::StructureAtom, record::PqrRecord};
use log::warn;

/// A structure atom with whatever charge and radius the resolvers found for it.
#[derive(Debug, Clone)]
pub struct ResolvedAtom<'a> {
    /// Source atom; its own name is the one written.
    pub atom: &'a StructureAtom,
    /// Charge found for the atom, if any.
    pub charge: Option<f64>,
    /// Radius lookup outcome.
    pub radius: RadiusLookup,
}

/// Records produced by [`assemble`] plus the number of values replaced by zero.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Records in input order.
    pub records: Vec<PqrRecord>,
    /// Charges or radii replaced by `0.0`.
    pub zero_filled: usize,
}

/// Turns resolved atoms into records, preserving input order.
///
/// Chain identifiers come from the configured chain map. Missing charges or radii are
/// handled according to [`ResolveConfig::on_missing`].
///
/// # Errors
///
/// Returns [`Error::UnmappedResidue`] when a residue has no chain, or
/// [`Error::UnresolvedCharge`] / [`Error::UnresolvedRadius`] under
/// [`MissingValuePolicy::Fail`].
pub fn assemble(atoms: &[ResolvedAtom<'_>], config: &ResolveConfig) -> Result<Assembly, Error> {
    let mut assembly = Assembly {
        records: Vec::with_capacity(atoms.len()),
        zero_filled: 0,
    };

    for resolved in atoms {
        let atom = resolved.atom;
        let chain_id = config
            .chains
            .chain_for(&atom.residue_name)
            .ok_or_else(|| Error::unmapped_residue(atom.residue_name.as_str()))?;

        let charge = match resolved.charge {
            Some(charge) => charge,
            None => {
                fill_missing(config.on_missing, atom, "charge", || Error::UnresolvedCharge {
                    atom_id: atom.id,
                    atom_name: atom.name.to_string(),
                    residue_name: atom.residue_name.to_string(),
                    residue_number: atom.residue_number,
                })?;
                assembly.zero_filled += 1;
                0.0
            }
        };

        let radius = match resolved.radius.radius {
            Some(radius) => radius,
            None => {
                fill_missing(config.on_missing, atom, "radius", || Error::UnresolvedRadius {
                    atom_id: atom.id,
                    atom_name: atom.name.to_string(),
                    residue_name: atom.residue_name.to_string(),
                    residue_number: atom.residue_number,
                    lookup_key: resolved.radius.key.to_string(),
                })?;
                assembly.zero_filled += 1;
                0.0
            }
        };

        assembly
            .records
            .push(PqrRecord::from_atom(atom, chain_id, charge, radius));
    }

    Ok(assembly)
}

fn fill_missing(
    policy: MissingValuePolicy,
    atom: &StructureAtom,
    field: &str,
    error: impl FnOnce() -> Error,
) -> Result<(), Error> {
    match policy {
        MissingValuePolicy::Fail => Err(error()),
        MissingValuePolicy::Zero => {
            warn!("No {} found for {}; writing 0.0", field, atom);
            Ok(())
        }
    }
}
