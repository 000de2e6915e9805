use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::InputFiles;
use commands::{convert, info};

#[derive(Parser, Debug)]
#[command(
    name = "pqrforge",
    about = "A command-line tool that resolves charges and radii for nanoparticle structures and writes PQR files.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Structure (PDB) file path. When omitted, stdin is used.
    #[arg(short, long, value_name = "PDB", global = true)]
    input: Option<PathBuf>,
    /// GROMACS topology providing charges and lattice atom types.
    #[arg(
        short,
        long,
        value_name = "ITP",
        default_value = "APT_COR.itp",
        global = true
    )]
    topology: PathBuf,
    /// APBS parameter table providing radii.
    #[arg(
        short,
        long,
        value_name = "DAT",
        default_value = "CHARMM.DAT",
        global = true
    )]
    parameters: PathBuf,
    /// TOML file with resolution settings.
    #[arg(short, long, value_name = "TOML", global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve charges and radii and write a PQR file.
    Convert(convert::ConvertArgs),
    /// Resolve the system and print a summary without writing output.
    Info(info::InfoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    let files = InputFiles {
        structure: cli.input.clone(),
        topology: cli.topology.clone(),
        parameters: cli.parameters.clone(),
        config: cli.config.clone(),
    };
    files.ensure_exist()?;

    match cli.command {
        Command::Convert(args) => {
            let system = commands::load_system(&files, args.overrides())?;
            convert::run(&system, &files, &args)?;
        }
        Command::Info(args) => {
            let system = commands::load_system(&files, Default::default())?;
            info::run(&system, &args)?;
        }
    }

    Ok(())
}
