use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use nalgebra::Vector3;
use prettytable::{Table, format, row};

use pqr_forge::ops::ChainMap;
use pqr_forge::{PqrRecord, Resolution};

use crate::commands::{System, run_with_spinner};

/// Report-only command that resolves the system without writing a PQR file.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

/// Resolves the system and prints chain, ligand, and lattice statistics to stderr.
pub fn run(system: &System, _args: &InfoArgs) -> Result<()> {
    let resolution = system.resolve()?;

    let (chain_reports, lattice) = run_with_spinner("Analyzing resolved system", || {
        let reports = collect_chain_reports(&resolution.records);
        let lattice = lattice_geometry(
            resolution
                .records
                .iter()
                .filter(|r| r.residue_name == system.config.lattice_residue),
        );
        Ok((reports, lattice))
    })?;

    print_tables(
        &chain_reports,
        &resolution,
        &system.config.chains,
        lattice.as_ref(),
    )
}

fn collect_chain_reports(records: &[PqrRecord]) -> Vec<ChainReport> {
    let mut grouped: BTreeMap<(char, &str), (BTreeSet<i32>, usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = grouped
            .entry((record.chain_id, record.residue_name.as_str()))
            .or_default();
        entry.0.insert(record.residue_number);
        entry.1 += 1;
        entry.2 += record.charge;
    }

    grouped
        .into_iter()
        .map(|((chain, residue), (instances, atoms, charge))| ChainReport {
            chain,
            residue: residue.to_string(),
            instances: instances.len(),
            atoms,
            charge,
        })
        .collect()
}

fn lattice_geometry<'a, I>(records: I) -> Option<LatticeGeometry>
where
    I: Iterator<Item = &'a PqrRecord> + Clone,
{
    let count = records.clone().count();
    if count == 0 {
        return None;
    }

    let sum = records
        .clone()
        .fold(Vector3::<f64>::zeros(), |acc, r| acc + r.pos.coords);
    let center = sum / count as f64;
    let max_radius = records
        .map(|r| (r.pos.coords - center).norm())
        .fold(0.0_f64, f64::max);

    Some(LatticeGeometry {
        atoms: count,
        center,
        max_radius,
    })
}

fn print_tables(
    reports: &[ChainReport],
    resolution: &Resolution,
    chains: &ChainMap,
    lattice: Option<&LatticeGeometry>,
) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "PqrForge System Report")?;
    writeln!(&mut stderr)?;

    let mut chain_table = Table::new();
    print_boxed_label(&mut stderr, "Chain Breakdown")?;
    chain_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    chain_table.set_titles(row!["Chain", "Residue", "Instances", "Atoms", "Net Charge"]);
    for report in reports {
        chain_table.add_row(row![
            report.chain,
            report.residue,
            report.instances,
            report.atoms,
            format!("{:.4}", report.charge)
        ]);
    }
    chain_table
        .print(&mut stderr)
        .context("Failed to render chain summary")?;
    writeln!(&mut stderr)?;

    let summary = &resolution.summary;
    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Resolution Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Lattice Atoms", summary.lattice_atoms]);
    summary_table.add_row(row!["Protonated Ligands", summary.protonated]);
    summary_table.add_row(row!["Deprotonated Ligands", summary.deprotonated]);
    summary_table.add_row(row!["Unclassified Ligands (kept)", summary.unclassified]);
    summary_table.add_row(row!["Unclassified Ligands (skipped)", summary.skipped]);
    summary_table.add_row(row!["Zero-filled Values", summary.zero_filled]);
    summary_table.add_row(row!["Net Charge", format!("{:.4}", summary.net_charge)]);
    summary_table.add_row(row!["Chain Map", describe_chain_map(chains)]);

    if let Some(geometry) = lattice {
        summary_table.add_row(row![
            "Lattice Center (Å)",
            format!(
                "x = {:.3}, y = {:.3}, z = {:.3}",
                geometry.center.x, geometry.center.y, geometry.center.z
            )
        ]);
        summary_table.add_row(row![
            "Lattice Radius (Å)",
            format!("{:.3} over {} atoms", geometry.max_radius, geometry.atoms)
        ]);
    } else {
        summary_table.add_row(row!["Lattice", "No lattice atoms"]);
    }

    summary_table
        .print(&mut stderr)
        .context("Failed to render resolution summary")?;

    Ok(())
}

fn describe_chain_map(chains: &ChainMap) -> String {
    chains
        .iter()
        .map(|(residue, chain)| format!("{residue} → {chain}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

#[derive(Debug)]
struct ChainReport {
    chain: char,
    residue: String,
    instances: usize,
    atoms: usize,
    charge: f64,
}

#[derive(Debug)]
struct LatticeGeometry {
    atoms: usize,
    center: Vector3<f64>,
    max_radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_map_is_listed_by_residue_name() {
        assert_eq!(describe_chain_map(&ChainMap::default()), "APT → B, COR → A");
    }
}
