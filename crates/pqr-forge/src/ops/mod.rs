//! Charge and radius resolution engine.
//!
//! [`resolve`] is a pure function from the three parsed input tables to the ordered output
//! records. Internally it runs four stages: classification of atoms into lattice and ligand
//! groups, charge lookup, radius lookup, and assembly with chain identifiers. All stages share
//! the [`Error`] type and the settings in [`ResolveConfig`].

mod assemble;
mod charge;
mod classify;
mod config;
mod error;
mod radius;

pub use config::{ChainMap, MissingValuePolicy, ResolveConfig, UnclassifiedPolicy};

pub use classify::VariantRule;

pub use charge::{ChargePrototype, ChargePrototypes};

pub use error::Error;

use crate::model::{
    atom::StructureAtom,
    parameter::ParameterTable,
    record::PqrRecord,
    structure::Structure,
    topology::{Topology, TopologyAtom},
    types::LigandVariant,
};
use assemble::ResolvedAtom;
use log::{info, warn};

/// Counters describing how a structure was resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSummary {
    /// Lattice atoms written.
    pub lattice_atoms: usize,
    /// Ligand instances resolved as protonated.
    pub protonated: usize,
    /// Ligand instances resolved as deprotonated.
    pub deprotonated: usize,
    /// Unclassified ligand instances kept in the output.
    pub unclassified: usize,
    /// Unclassified ligand instances dropped from the output.
    pub skipped: usize,
    /// Charges or radii replaced by zero.
    pub zero_filled: usize,
    /// Sum of all written charges.
    pub net_charge: f64,
}

/// Output of [`resolve`]: records in write order plus summary counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Records in write order.
    pub records: Vec<PqrRecord>,
    /// Counters gathered while resolving.
    pub summary: ResolutionSummary,
}

/// Assigns a charge, radius, and chain to every structure atom.
///
/// Lattice atoms are written first in file order, followed by ligand instances in ascending
/// residue number with members in file order.
///
/// # Arguments
///
/// * `structure` - Atom coordinates and identities.
/// * `topology` - Force-field atom table supplying charges and lattice type aliases.
/// * `parameters` - Radius table keyed by residue and atom name (or type alias).
/// * `config` - Residue labels, variant sizes, chain map, and failure policies.
///
/// # Errors
///
/// Returns [`Error::Config`] for invalid settings, [`Error::UnsupportedResidue`] for atoms
/// outside both groups, [`Error::LatticeMismatch`] when lattice names do not align,
/// [`Error::MissingPrototype`] or [`Error::UnclassifiedInstance`] for ligand problems, and
/// the assembly errors of unmapped chains or unresolved values.
///
/// # Examples
///
/// ```
/// use pqr_forge::{
///     ParameterEntry, ParameterTable, Point, ResolveConfig, Structure, StructureAtom,
///     Topology, TopologyAtom, resolve,
/// };
///
/// let structure: Structure =
///     std::iter::once(StructureAtom::new(1, "SI1", "COR", 1, Point::origin())).collect();
/// let topology: Topology =
///     std::iter::once(TopologyAtom::new(1, "SIA", 1, "COR", "SI1", 1.1)).collect();
/// let mut parameters = ParameterTable::new();
/// parameters
///     .insert(ParameterEntry::new("COR", "SIA", 1.1, 2.2, "SIA"))
///     .unwrap();
///
/// let resolution = resolve(&structure, &topology, &parameters, &ResolveConfig::default()).unwrap();
/// assert_eq!(resolution.records[0].chain_id, 'A');
/// assert_eq!(resolution.records[0].radius, 2.2);
/// ```
pub fn resolve(
    structure: &Structure,
    topology: &Topology,
    parameters: &ParameterTable,
    config: &ResolveConfig,
) -> Result<Resolution, Error> {
    config.validate()?;
    classify::ensure_supported(structure, config)?;

    let mut summary = ResolutionSummary::default();
    let mut resolved = Vec::with_capacity(structure.atom_count());

    resolve_lattice(structure, topology, parameters, config, &mut resolved)?;
    summary.lattice_atoms = resolved.len();
    info!(
        "Resolved {} {} lattice atoms",
        summary.lattice_atoms, config.lattice_residue
    );

    resolve_ligands(
        structure,
        topology,
        parameters,
        config,
        &mut resolved,
        &mut summary,
    )?;
    info!(
        "Resolved {} {} ligand instances ({} protonated, {} deprotonated, {} unclassified, {} skipped)",
        summary.protonated + summary.deprotonated + summary.unclassified,
        config.ligand_residue,
        summary.protonated,
        summary.deprotonated,
        summary.unclassified,
        summary.skipped
    );

    let assembly = assemble::assemble(&resolved, config)?;
    summary.zero_filled = assembly.zero_filled;
    summary.net_charge = assembly.records.iter().map(|r| r.charge).sum();
    info!(
        "Assembled {} records with net charge {:.4}",
        assembly.records.len(),
        summary.net_charge
    );

    Ok(Resolution {
        records: assembly.records,
        summary,
    })
}

fn resolve_lattice<'a>(
    structure: &'a Structure,
    topology: &Topology,
    parameters: &ParameterTable,
    config: &ResolveConfig,
    resolved: &mut Vec<ResolvedAtom<'a>>,
) -> Result<(), Error> {
    let residue = config.lattice_residue.as_str();
    let lattice_atoms: Vec<&StructureAtom> = structure.residue_atoms(residue).collect();
    let topology_atoms: Vec<&TopologyAtom> = topology.residue_atoms(residue).collect();

    charge::check_lattice_alignment(residue, &lattice_atoms, &topology_atoms)?;

    let charges = charge::lattice_charges(residue, &lattice_atoms, topology)?;
    let radii = radius::lattice_radii(residue, &topology_atoms, parameters);

    resolved.extend(
        lattice_atoms
            .into_iter()
            .zip(charges)
            .zip(radii)
            .map(|((atom, charge), radius)| ResolvedAtom {
                atom,
                charge,
                radius,
            }),
    );
    Ok(())
}

fn resolve_ligands<'a>(
    structure: &'a Structure,
    topology: &Topology,
    parameters: &ParameterTable,
    config: &ResolveConfig,
    resolved: &mut Vec<ResolvedAtom<'a>>,
    summary: &mut ResolutionSummary,
) -> Result<(), Error> {
    let residue = config.ligand_residue.as_str();
    let rule = config.variant_rule();
    let instances = classify::classify_ligand_instances(structure, config);
    if instances.is_empty() {
        return Ok(());
    }

    let prototypes = ChargePrototypes::scan(topology, residue, rule);

    for classified in instances {
        let atoms = &classified.instance.atoms;
        let charges = match classified.variant {
            Some(variant) => {
                let prototype =
                    prototypes
                        .get(variant)
                        .ok_or_else(|| Error::MissingPrototype {
                            variant,
                            residue_name: residue.to_string(),
                            expected_size: rule.expected_size(variant),
                        })?;
                match variant {
                    LigandVariant::Protonated => summary.protonated += 1,
                    LigandVariant::Deprotonated => summary.deprotonated += 1,
                }
                charge::ligand_charges(atoms, prototype)
            }
            None => match config.on_unclassified {
                UnclassifiedPolicy::Fail => {
                    return Err(Error::UnclassifiedInstance {
                        residue_name: residue.to_string(),
                        residue_number: classified.instance.number,
                        atom_count: atoms.len(),
                    });
                }
                UnclassifiedPolicy::Skip => {
                    warn!(
                        "Skipping {} {}: {} atoms match no protonation variant",
                        residue,
                        classified.instance.number,
                        atoms.len()
                    );
                    summary.skipped += 1;
                    continue;
                }
                UnclassifiedPolicy::Include => {
                    warn!(
                        "Keeping {} {} without charges: {} atoms match no protonation variant",
                        residue,
                        classified.instance.number,
                        atoms.len()
                    );
                    summary.unclassified += 1;
                    vec![None; atoms.len()]
                }
            },
        };

        let radii = radius::ligand_radii(residue, atoms, parameters);
        resolved.extend(
            atoms
                .iter()
                .zip(charges)
                .zip(radii)
                .map(|((&atom, charge), radius)| ResolvedAtom {
                    atom,
                    charge,
                    radius,
                }),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parameter::ParameterEntry, types::Point};

    const PROTONATED: [&str; 13] = [
        "N1", "HN1", "HN2", "HN3", "C1", "H11", "H12", "C2", "H21", "H22", "C3", "H31", "H32",
    ];

    fn deprotonated() -> Vec<&'static str> {
        PROTONATED.iter().copied().filter(|&n| n != "HN3").collect()
    }

    fn protonated_charge(name: &str) -> f64 {
        let idx = PROTONATED.iter().position(|&n| n == name).unwrap();
        0.01 * (idx as f64 + 1.0)
    }

    fn deprotonated_charge(name: &str) -> f64 {
        -protonated_charge(name)
    }

    fn lattice_topology_rows() -> Vec<TopologyAtom> {
        vec![
            TopologyAtom::new(1, "SIA", 1, "COR", "SI1", 1.1),
            TopologyAtom::new(2, "OA", 1, "COR", "O1", -0.55),
            TopologyAtom::new(3, "OB", 1, "COR", "O2", -0.6),
        ]
    }

    fn topology() -> Topology {
        let mut rows = lattice_topology_rows();
        let mut nr = 4;
        for name in deprotonated() {
            rows.push(TopologyAtom::new(nr, "X", 2, "APT", name, deprotonated_charge(name)));
            nr += 1;
        }
        for name in PROTONATED {
            rows.push(TopologyAtom::new(nr, "X", 3, "APT", name, protonated_charge(name)));
            nr += 1;
        }
        rows.into_iter().collect()
    }

    fn parameters() -> ParameterTable {
        let mut table = ParameterTable::new();
        table.insert(ParameterEntry::new("COR", "SIA", 1.1, 2.2, "SIA")).unwrap();
        table.insert(ParameterEntry::new("COR", "OA", -0.55, 1.7, "OA")).unwrap();
        table.insert(ParameterEntry::new("COR", "OB", -0.6, 1.75, "OB")).unwrap();
        for (i, name) in PROTONATED.iter().enumerate() {
            table
                .insert(ParameterEntry::new("APT", name, 0.0, 1.0 + 0.1 * i as f64, "X"))
                .unwrap();
        }
        table
    }

    fn ligand_radius(name: &str) -> f64 {
        let idx = PROTONATED.iter().position(|&n| n == name).unwrap();
        1.0 + 0.1 * idx as f64
    }

    /// Lattice atoms (ids 1 to 3, matching the topology numbering) interleaved in the file
    /// with a protonated instance (residue 20) listed before a deprotonated one (residue 10).
    fn structure_atoms() -> Vec<StructureAtom> {
        let atom = |id: u32, name: &str, res: &str, num: i32| {
            StructureAtom::new(id, name, res, num, Point::new(id as f64, 0.0, 0.0))
        };
        let mut atoms = Vec::new();
        let mut ligand_id = 4;

        atoms.push(atom(1, "SI1", "COR", 1));
        for name in PROTONATED {
            atoms.push(atom(ligand_id, name, "APT", 20));
            ligand_id += 1;
        }
        atoms.push(atom(2, "O1", "COR", 1));
        for name in deprotonated() {
            atoms.push(atom(ligand_id, name, "APT", 10));
            ligand_id += 1;
        }
        atoms.push(atom(3, "O2", "COR", 1));
        atoms
    }

    fn structure() -> Structure {
        structure_atoms().into_iter().collect()
    }

    fn run(structure: &Structure, config: &ResolveConfig) -> Result<Resolution, Error> {
        resolve(structure, &topology(), &parameters(), config)
    }

    #[test]
    fn every_atom_is_written_exactly_once() {
        let structure = structure();
        let resolution = run(&structure, &ResolveConfig::default()).unwrap();

        assert_eq!(resolution.records.len(), structure.atom_count());
        let mut ids: Vec<u32> = resolution.records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (1..=structure.atom_count() as u32).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn output_orders_lattice_then_ligands_by_residue_number() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();
        let records = &resolution.records;

        let lattice: Vec<&str> = records[..3].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(lattice, vec!["SI1", "O1", "O2"]);
        assert!(records[3..15].iter().all(|r| r.residue_number == 10));
        assert!(records[15..].iter().all(|r| r.residue_number == 20));
        assert_eq!(records[3].name, "N1");
        assert_eq!(records[15].name, "N1");
    }

    #[test]
    fn lattice_charges_follow_topology_numbering() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();
        let topo = topology();

        for record in resolution.records.iter().filter(|r| r.residue_name == "COR") {
            let expected = topo
                .iter_atoms()
                .find(|t| t.nr == record.id)
                .map(|t| t.charge)
                .unwrap();
            assert_eq!(record.charge, expected, "atom {}", record.id);
        }
    }

    #[test]
    fn ligand_charges_follow_variant_prototype() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();

        for record in resolution.records.iter().filter(|r| r.residue_name == "APT") {
            let expected = match record.residue_number {
                20 => protonated_charge(&record.name),
                10 => deprotonated_charge(&record.name),
                other => panic!("unexpected residue {other}"),
            };
            assert_eq!(record.charge, expected, "{} {}", record.residue_number, record.name);
        }
        assert_eq!(resolution.summary.protonated, 1);
        assert_eq!(resolution.summary.deprotonated, 1);
    }

    #[test]
    fn radii_use_alias_for_lattice_and_name_for_ligands() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();
        let records = &resolution.records;

        let lattice: Vec<f64> = records[..3].iter().map(|r| r.radius).collect();
        assert_eq!(lattice, vec![2.2, 1.7, 1.75]);
        for record in &records[3..] {
            assert_eq!(record.radius, ligand_radius(&record.name));
        }
    }

    #[test]
    fn chains_follow_residue_names() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();
        for record in &resolution.records {
            let expected = if record.residue_name == "COR" { 'A' } else { 'B' };
            assert_eq!(record.chain_id, expected);
        }
    }

    #[test]
    fn resolving_twice_is_identical() {
        let structure = structure();
        let first = run(&structure, &ResolveConfig::default()).unwrap();
        let second = run(&structure, &ResolveConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn summary_counts_and_net_charge() {
        let resolution = run(&structure(), &ResolveConfig::default()).unwrap();
        let summary = &resolution.summary;

        assert_eq!(summary.lattice_atoms, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.zero_filled, 0);
        let expected: f64 = resolution.records.iter().map(|r| r.charge).sum();
        assert_eq!(summary.net_charge, expected);
    }

    #[test]
    fn permuted_lattice_names_fail() {
        let mut atoms = structure_atoms();
        let si = atoms.iter().position(|a| a.name == "SI1").unwrap();
        let o2 = atoms.iter().position(|a| a.name == "O2").unwrap();
        let (first, second) = (atoms[si].name.clone(), atoms[o2].name.clone());
        atoms[si].name = second;
        atoms[o2].name = first;
        let structure: Structure = atoms.into_iter().collect();

        let err = run(&structure, &ResolveConfig::default()).unwrap_err();
        assert!(matches!(err, Error::LatticeMismatch { .. }));
    }

    #[test]
    fn offset_lattice_ids_fail_instead_of_borrowing_ligand_charges() {
        let structure: Structure = vec![
            StructureAtom::new(1, "N1", "APT", 2, Point::origin()),
            StructureAtom::new(2, "SI1", "COR", 1, Point::origin()),
        ]
        .into_iter()
        .collect();
        let topology: Topology = vec![
            TopologyAtom::new(1, "SIA", 1, "COR", "SI1", 1.1),
            TopologyAtom::new(2, "NH3", 2, "APT", "N1", -0.3),
        ]
        .into_iter()
        .collect();

        let err = resolve(&structure, &topology, &parameters(), &ResolveConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::LatticeMismatch { .. }));
    }

    #[test]
    fn unclassified_instance_is_skipped_by_default() {
        let mut atoms = structure_atoms();
        atoms.push(StructureAtom::new(500, "N1", "APT", 30, Point::origin()));
        atoms.push(StructureAtom::new(501, "C1", "APT", 30, Point::origin()));
        let structure: Structure = atoms.into_iter().collect();

        let resolution = run(&structure, &ResolveConfig::default()).unwrap();
        assert_eq!(resolution.summary.skipped, 1);
        assert_eq!(resolution.records.len(), structure.atom_count() - 2);
        assert!(resolution.records.iter().all(|r| r.residue_number != 30));
    }

    #[test]
    fn unclassified_instance_fails_under_fail_policy() {
        let mut atoms = structure_atoms();
        atoms.push(StructureAtom::new(500, "N1", "APT", 30, Point::origin()));
        let structure: Structure = atoms.into_iter().collect();
        let config = ResolveConfig {
            on_unclassified: UnclassifiedPolicy::Fail,
            ..ResolveConfig::default()
        };

        let err = run(&structure, &config).unwrap_err();
        assert_eq!(
            err,
            Error::UnclassifiedInstance {
                residue_name: "APT".into(),
                residue_number: 30,
                atom_count: 1,
            }
        );
    }

    #[test]
    fn included_instance_needs_missing_value_policy() {
        let mut atoms = structure_atoms();
        atoms.push(StructureAtom::new(500, "N1", "APT", 30, Point::origin()));
        let structure: Structure = atoms.into_iter().collect();

        let strict = ResolveConfig {
            on_unclassified: UnclassifiedPolicy::Include,
            ..ResolveConfig::default()
        };
        let err = run(&structure, &strict).unwrap_err();
        assert!(matches!(err, Error::UnresolvedCharge { atom_id: 500, .. }));

        let lenient = ResolveConfig {
            on_missing: MissingValuePolicy::Zero,
            ..strict
        };
        let resolution = run(&structure, &lenient).unwrap();
        let last = resolution.records.last().unwrap();
        assert_eq!(last.id, 500);
        assert_eq!(last.charge, 0.0);
        assert_eq!(last.radius, ligand_radius("N1"));
        assert_eq!(resolution.summary.unclassified, 1);
        assert_eq!(resolution.summary.zero_filled, 1);
    }

    #[test]
    fn missing_prototype_is_reported() {
        let topology: Topology = lattice_topology_rows()
            .into_iter()
            .chain(
                deprotonated()
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| TopologyAtom::new(4 + i as u32, "X", 2, "APT", name, 0.0)),
            )
            .collect();

        let err = resolve(&structure(), &topology, &parameters(), &ResolveConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::MissingPrototype {
                variant: LigandVariant::Protonated,
                residue_name: "APT".into(),
                expected_size: 13,
            }
        );
    }

    #[test]
    fn foreign_residue_is_rejected() {
        let mut atoms = structure_atoms();
        atoms.push(StructureAtom::new(600, "OW", "SOL", 99, Point::origin()));
        let structure: Structure = atoms.into_iter().collect();

        let err = run(&structure, &ResolveConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedResidue { atom_id: 600, .. }));
    }

    #[test]
    fn invalid_config_is_rejected_before_resolution() {
        let config = ResolveConfig {
            deprotonated_size: 13,
            ..ResolveConfig::default()
        };
        let err = run(&structure(), &config).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn text_inputs_round_through_readers_and_writer() {
        use crate::io::{read_dat_parameters, read_itp_topology, read_pdb_structure, write_pqr_records};
        use std::io::Cursor;

        let pdb = "\
ATOM      1 SI1  COR     1       1.000   2.000   3.000  1.00  0.00\n\
ATOM      2 O1   COR     1       2.500   2.000   3.000  1.00  0.00\n\
ATOM      3 N1   APT     7       4.000   5.000   6.000  1.00  0.00\n\
ATOM      4 HN1  APT     7       4.500   5.000   6.000  1.00  0.00\n\
ATOM      5 N1   APT     3      -1.000  -2.000  -3.000  1.00  0.00\n\
END\n";
        let itp = "\
[ moleculetype ]\n\
APT_COR 3\n\
[ atoms ]\n\
  1  SIA  1  COR  SI1  1   1.10\n\
  2  OA   1  COR  O1   2  -0.55\n\
  3  NH3  2  APT  N1   3  -0.80\n\
  4  NH3  3  APT  N1   4  -0.30\n\
  5  HC   3  APT  HN1  5   0.40\n";
        let dat = "\
# residue atom charge radius type\n\
COR\tSIA\t1.10\t2.20\tSIA\n\
COR\tOA\t-0.55\t1.70\tOA\n\
APT\tN1\t-0.30\t1.85\tNH3\n\
APT\tHN1\t0.40\t0.90\tHC\n";

        let structure = read_pdb_structure(Cursor::new(pdb)).unwrap();
        let topology = read_itp_topology(Cursor::new(itp)).unwrap();
        let parameters = read_dat_parameters(Cursor::new(dat)).unwrap();
        let config =
            ResolveConfig::from_toml_str("protonated_size = 2\ndeprotonated_size = 1").unwrap();

        let resolution = resolve(&structure, &topology, &parameters, &config).unwrap();
        let mut out = Vec::new();
        write_pqr_records(&mut out, &resolution.records).unwrap();

        let expected = "\
ATOM      1 SI1  COR A     1    1.000   2.000   3.000  1.1000 2.2000\n\
ATOM      2 O1   COR A     1    2.500   2.000   3.000 -0.5500 1.7000\n\
ATOM      5 N1   APT B     3   -1.000  -2.000  -3.000 -0.8000 1.8500\n\
ATOM      3 N1   APT B     7    4.000   5.000   6.000 -0.3000 1.8500\n\
ATOM      4 HN1  APT B     7    4.500   5.000   6.000  0.4000 0.9000\n\
TER\n\
END\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
