//! PDB coordinate reader producing the flat, file-ordered [`Structure`] table.
//!
//! Only `ATOM`/`HETATM` records are consumed; everything else (titles, unit cells,
//! connectivity) is irrelevant to charge and radius assignment and is skipped. Reading ends
//! at the first `END` or `ENDMDL` record so multi-model files contribute their first model.

use crate::io::error::Error;
use crate::model::{atom::StructureAtom, structure::Structure, types::Point};
use smol_str::SmolStr;
use std::collections::HashSet;
use std::io::BufRead;
use std::ops::Range;

const FORMAT: &str = "PDB";

/// Parses a PDB stream into a [`Structure`].
///
/// # Arguments
///
/// * `reader` - Any buffered reader that yields PDB lines.
///
/// # Returns
///
/// The structure with atoms in file order.
///
/// # Errors
///
/// Returns [`Error`] when a coordinate record is truncated or carries malformed numeric
/// fields, when two records share a serial number, when no atom records are present, or
/// when the underlying reader fails.
///
/// # Examples
///
/// ```
/// use pqr_forge::io::read_pdb_structure;
/// use std::io::Cursor;
///
/// let pdb = "\
/// ATOM      1  SI1 COR     1      10.000  10.000  10.000  1.00  0.00          SI\n\
/// END\n";
/// let structure = read_pdb_structure(Cursor::new(pdb)).unwrap();
/// assert_eq!(structure.atom_count(), 1);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut structure = Structure::new();
    let mut seen_ids: HashSet<u32> = HashSet::new();

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|e| Error::from_io(e, None))?;
        let line_number = idx + 1;

        if line.starts_with("ENDMDL") || line.trim_end() == "END" {
            break;
        }

        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let atom = parse_atom_record(&line, line_number)?;
            if !seen_ids.insert(atom.id) {
                return Err(Error::inconsistent_data(
                    FORMAT,
                    None,
                    format!("duplicate atom serial {} (line {line_number})", atom.id),
                ));
            }
            structure.add_atom(atom);
        }
    }

    if structure.is_empty() {
        return Err(Error::missing_section(FORMAT, None, "ATOM/HETATM"));
    }

    Ok(structure)
}

/// Parses one fixed-column `ATOM`/`HETATM` record.
fn parse_atom_record(line: &str, line_number: usize) -> Result<StructureAtom, Error> {
    if line.len() < 54 {
        return Err(Error::parse(
            FORMAT,
            None,
            line_number,
            "Atom record too short",
        ));
    }

    let record = column(line, 0..6, line_number)?;
    let serial = column(line, 6..11, line_number)?;
    let name = column(line, 12..16, line_number)?;
    let res_name = column(line, 17..20, line_number)?;
    let res_seq = column(line, 22..26, line_number)?;

    let id = serial.parse::<u32>().map_err(|_| {
        Error::parse(
            FORMAT,
            None,
            line_number,
            format!("Invalid atom serial '{serial}'"),
        )
    })?;
    let residue_number = res_seq.parse::<i32>().map_err(|_| {
        Error::parse(
            FORMAT,
            None,
            line_number,
            "Invalid residue sequence number",
        )
    })?;

    let x = parse_coordinate(line, 30..38, line_number, "X")?;
    let y = parse_coordinate(line, 38..46, line_number, "Y")?;
    let z = parse_coordinate(line, 46..54, line_number, "Z")?;

    Ok(StructureAtom {
        record: SmolStr::new(record),
        id,
        name: SmolStr::new(name),
        residue_name: SmolStr::new(res_name),
        residue_number,
        pos: Point::new(x, y, z),
    })
}

fn column(line: &str, range: Range<usize>, line_number: usize) -> Result<&str, Error> {
    line.get(range)
        .map(str::trim)
        .ok_or_else(|| Error::parse(FORMAT, None, line_number, "Non-ASCII column content"))
}

fn parse_coordinate(
    line: &str,
    range: Range<usize>,
    line_number: usize,
    axis: &str,
) -> Result<f64, Error> {
    column(line, range, line_number)?
        .parse::<f64>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, format!("Invalid {axis} coordinate")))
}
