//! IO front-end for the three input tables and the PQR output.
//!
//! Readers turn PDB coordinates, GROMACS `.itp` topologies, and APBS `.DAT` radius tables
//! into the in-memory [`crate::model`] types; the writer serializes resolved records into
//! fixed-column PQR text. Every function reports failures through the shared [`Error`].

mod error;

mod pdb {
    pub mod reader;
}

mod itp {
    pub mod reader;
}

mod dat {
    pub mod reader;
}

mod pqr {
    pub mod writer;
}

pub use pdb::reader::read as read_pdb_structure;

pub use itp::reader::read as read_itp_topology;

pub use dat::reader::read as read_dat_parameters;

pub use pqr::writer::write as write_pqr_records;

pub use error::Error;
