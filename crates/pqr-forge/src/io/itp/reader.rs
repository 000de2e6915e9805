//! GROMACS `.itp` topology reader extracting the `[ atoms ]` table.
//!
//! The reader walks bracketed directives, strips `;` comments, ignores preprocessor lines,
//! and collects every row of every `[ atoms ]` directive in declaration order. The first
//! `[ moleculetype ]` name is kept for reporting. Bonded directives are skipped; resolution
//! only needs per-atom charges and types.

use crate::io::error::Error;
use crate::model::topology::{Topology, TopologyAtom};
use smol_str::SmolStr;
use std::collections::HashSet;
use std::io::BufRead;

const FORMAT: &str = "ITP";

/// Parses a GROMACS include topology into a [`Topology`].
///
/// # Arguments
///
/// * `reader` - Buffered reader yielding `.itp` lines.
///
/// # Returns
///
/// The topology with atom rows in declaration order.
///
/// # Errors
///
/// Returns [`Error`] when an `[ atoms ]` row has too few columns or malformed numbers, when
/// an atom number is repeated, when no `[ atoms ]` rows exist, or on I/O failure.
///
/// # Examples
///
/// ```
/// use pqr_forge::io::read_itp_topology;
/// use std::io::Cursor;
///
/// let itp = "\
/// [ moleculetype ]\n\
/// APT_COR 3\n\
/// [ atoms ]\n\
/// ; nr type resnr residue atom cgnr charge mass\n\
///   1  SC4     1     COR  SI1    1  1.1000 28.0800\n";
/// let topology = read_itp_topology(Cursor::new(itp)).unwrap();
/// assert_eq!(topology.molecule_name.as_deref(), Some("APT_COR"));
/// assert_eq!(topology.atom_count(), 1);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<Topology, Error> {
    let mut topology = Topology::new();
    let mut section = Section::None;
    let mut seen_numbers: HashSet<u32> = HashSet::new();

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|e| Error::from_io(e, None))?;
        let line_number = idx + 1;

        let content = strip_comment(&line).trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        if let Some(directive) = parse_directive(content) {
            section = Section::from_directive(&directive);
            continue;
        }

        match section {
            Section::MoleculeType => {
                if topology.molecule_name.is_none() {
                    topology.molecule_name = content.split_whitespace().next().map(str::to_string);
                }
            }
            Section::Atoms => {
                let atom = parse_atom_row(content, line_number)?;
                if !seen_numbers.insert(atom.nr) {
                    return Err(Error::inconsistent_data(
                        FORMAT,
                        None,
                        format!("duplicate atom number {} (line {line_number})", atom.nr),
                    ));
                }
                topology.add_atom(atom);
            }
            Section::Other | Section::None => {}
        }
    }

    if topology.atom_count() == 0 {
        return Err(Error::missing_section(FORMAT, None, "[ atoms ]"));
    }

    Ok(topology)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    MoleculeType,
    Atoms,
    Other,
}

impl Section {
    fn from_directive(name: &str) -> Self {
        match name {
            "moleculetype" => Section::MoleculeType,
            "atoms" => Section::Atoms,
            _ => Section::Other,
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Returns the lowercase directive name for `[ name ]` lines.
fn parse_directive(content: &str) -> Option<String> {
    content
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(|name| name.trim().to_ascii_lowercase())
}

fn parse_atom_row(content: &str, line_number: usize) -> Result<TopologyAtom, Error> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() < 7 {
        return Err(Error::parse(
            FORMAT,
            None,
            line_number,
            "[ atoms ] row must include nr, type, resnr, residue, atom, cgnr, and charge",
        ));
    }

    let nr = tokens[0]
        .parse::<u32>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid atom number"))?;
    let residue_number = tokens[2]
        .parse::<i32>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid residue number"))?;
    let charge_group = tokens[5]
        .parse::<u32>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid charge group"))?;
    let charge = tokens[6]
        .parse::<f64>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid charge"))?;
    let mass = tokens
        .get(7)
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid mass"))
        })
        .transpose()?;

    Ok(TopologyAtom {
        nr,
        atom_type: SmolStr::new(tokens[1]),
        residue_number,
        residue_name: SmolStr::new(tokens[3]),
        name: SmolStr::new(tokens[4]),
        charge_group,
        charge,
        mass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_result(itp: &str) -> Result<Topology, Error> {
        read(Cursor::new(itp.as_bytes()))
    }

    const ITP_DATA: &str = "\
; nanoparticle topology\n\
#include \"charmm36.ff/forcefield.itp\"\n\
[ moleculetype ]\n\
; name  nrexcl\n\
APT_COR   3\n\
\n\
[ atoms ]\n\
;   nr  type  resnr residue  atom   cgnr     charge       mass\n\
     1   SC4      1    COR    SI1      1     1.1000    28.0800   ; core silicon\n\
     2    OC      1    COR     O1      2    -0.5500    15.9994\n\
     3   NH3      2    APT      N      3    -0.3000\n\
\n\
[ bonds ]\n\
     1     2     1\n";

    #[test]
    fn read_collects_atom_rows_and_molecule_name() {
        let topology = parse_result(ITP_DATA).expect("ITP should parse");

        assert_eq!(topology.molecule_name.as_deref(), Some("APT_COR"));
        assert_eq!(topology.atom_count(), 3);

        let first = &topology.atoms()[0];
        assert_eq!(first.nr, 1);
        assert_eq!(first.atom_type, "SC4");
        assert_eq!(first.residue_number, 1);
        assert_eq!(first.residue_name, "COR");
        assert_eq!(first.name, "SI1");
        assert_eq!(first.charge_group, 1);
        assert!((first.charge - 1.1).abs() < 1e-12);
        assert_eq!(first.mass, Some(28.08));

        let ligand = &topology.atoms()[2];
        assert_eq!(ligand.residue_name, "APT");
        assert!(ligand.mass.is_none());
    }

    #[test]
    fn read_accepts_compact_directive_headers() {
        let topology = parse_result("[atoms]\n1 OC 1 COR O1 1 -0.55\n").expect("compact header");
        assert_eq!(topology.atom_count(), 1);
        assert!(topology.molecule_name.is_none());
    }

    #[test]
    fn read_rejects_short_rows() {
        let err = parse_result("[ atoms ]\n1 OC 1 COR O1 1\n").expect_err("missing charge");
        match err {
            Error::Parse { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_rejects_bad_charge() {
        let err =
            parse_result("[ atoms ]\n1 OC 1 COR O1 1 minus\n").expect_err("non-numeric charge");
        assert!(err.to_string().contains("Invalid charge"));
    }

    #[test]
    fn read_rejects_duplicate_atom_numbers() {
        let err = parse_result("[ atoms ]\n1 OC 1 COR O1 1 -0.5\n1 OC 1 COR O2 2 -0.5\n")
            .expect_err("duplicate nr");
        assert!(matches!(err, Error::InconsistentData { .. }));
    }

    #[test]
    fn read_requires_atoms_directive() {
        let err = parse_result("[ moleculetype ]\nAPT_COR 3\n").expect_err("no atoms");
        assert!(matches!(err, Error::MissingSection { .. }));
    }
}
