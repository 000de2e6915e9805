//! PQR writer emitting one fixed-width `ATOM` line per resolved record.
//!
//! The column layout matches what APBS and PDB2PQR consumers expect from this pipeline:
//! serial, name, residue, chain, residue number, three coordinates with three decimals,
//! then charge and radius with four decimals. The file ends with `TER` and `END`.

use crate::io::error::Error;
use crate::model::record::PqrRecord;
use std::io::Write;

/// Serializes resolved records to PQR text.
///
/// # Arguments
///
/// * `writer` - Destination implementing [`Write`].
/// * `records` - Rows in output order.
///
/// # Errors
///
/// Returns [`Error::Io`] when the destination rejects a write.
///
/// # Examples
///
/// ```
/// use pqr_forge::io::write_pqr_records;
/// use pqr_forge::{PqrRecord, Point};
///
/// let record = PqrRecord {
///     record: "ATOM".into(),
///     id: 1,
///     name: "SI1".into(),
///     residue_name: "COR".into(),
///     chain_id: 'A',
///     residue_number: 1,
///     pos: Point::new(1.0, 2.0, 3.0),
///     charge: 1.1,
///     radius: 2.2,
/// };
/// let mut out = Vec::new();
/// write_pqr_records(&mut out, &[record]).unwrap();
/// assert!(String::from_utf8(out).unwrap().ends_with("TER\nEND\n"));
/// ```
pub fn write<W: Write>(writer: W, records: &[PqrRecord]) -> Result<(), Error> {
    let mut ctx = WriterContext::new(writer);

    for record in records {
        ctx.write_atom_record(record)?;
    }

    ctx.write_footer()
}

struct WriterContext<W> {
    writer: W,
}

impl<W: Write> WriterContext<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_atom_record(&mut self, record: &PqrRecord) -> Result<(), Error> {
        writeln!(
            self.writer,
            "ATOM  {:>5} {:<4} {:<3} {:>1} {:>5} {:>8.3}{:>8.3}{:>8.3} {:>7.4} {:>6.4}",
            record.id,
            record.name,
            record.residue_name,
            record.chain_id,
            record.residue_number,
            record.pos.x,
            record.pos.y,
            record.pos.z,
            record.charge,
            record.radius,
        )
        .map_err(|e| Error::from_io(e, None))
    }

    fn write_footer(&mut self) -> Result<(), Error> {
        writeln!(self.writer, "TER").map_err(|e| Error::from_io(e, None))?;
        writeln!(self.writer, "END").map_err(|e| Error::from_io(e, None))?;
        self.writer.flush().map_err(|e| Error::from_io(e, None))
    }
}
