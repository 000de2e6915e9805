//! Reader for APBS-style `.DAT` radius tables (e.g. `CHARMM.DAT`).
//!
//! Each data row lists `residue atom charge radius atom_type`, separated by tabs or
//! spaces. Lines starting with `#` and blank lines are skipped.

use crate::io::error::Error;
use crate::model::parameter::{ParameterEntry, ParameterTable};
use smol_str::SmolStr;
use std::io::BufRead;

const FORMAT: &str = "DAT";

/// Parses a radius/charge parameter table.
///
/// # Arguments
///
/// * `reader` - Buffered reader yielding parameter lines.
///
/// # Returns
///
/// A [`ParameterTable`] keyed by residue and atom name.
///
/// # Errors
///
/// Returns [`Error`] for rows with fewer than five columns, non-numeric charge or radius,
/// a repeated key with a different radius, an input without data rows, or I/O failure.
///
/// # Examples
///
/// ```
/// use pqr_forge::io::read_dat_parameters;
/// use std::io::Cursor;
///
/// let dat = "# resname\tatom\tcharge\tradius\ttype\nAPT\tN\t-0.30\t1.85\tNH3\n";
/// let table = read_dat_parameters(Cursor::new(dat)).unwrap();
/// assert_eq!(table.radius("APT", "N"), Some(1.85));
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<ParameterTable, Error> {
    let mut table = ParameterTable::new();

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|e| Error::from_io(e, None))?;
        let line_number = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let entry = parse_row(trimmed, line_number)?;
        table.insert(entry).map_err(|rejected| {
            let kept = table
                .radius(&rejected.residue_name, &rejected.atom_name)
                .unwrap_or_default();
            Error::inconsistent_data(
                FORMAT,
                None,
                format!(
                    "conflicting radius for {} {} (line {line_number}): {} vs {}",
                    rejected.residue_name, rejected.atom_name, kept, rejected.radius
                ),
            )
        })?;
    }

    if table.is_empty() {
        return Err(Error::missing_section(FORMAT, None, "parameter"));
    }

    Ok(table)
}

fn parse_row(line: &str, line_number: usize) -> Result<ParameterEntry, Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(Error::parse(
            FORMAT,
            None,
            line_number,
            "row must include residue, atom, charge, radius, and atom type",
        ));
    }

    let charge = tokens[2]
        .parse::<f64>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid charge"))?;
    let radius = tokens[3]
        .parse::<f64>()
        .map_err(|_| Error::parse(FORMAT, None, line_number, "Invalid radius"))?;

    Ok(ParameterEntry {
        residue_name: SmolStr::new(tokens[0]),
        atom_name: SmolStr::new(tokens[1]),
        charge,
        radius,
        atom_type: SmolStr::new(tokens[4]),
    })
}
