use std::fs::{self, File};
use std::io::{self as stdio, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use pqr_forge::io::{read_dat_parameters, read_itp_topology, read_pdb_structure};
use pqr_forge::{
    MissingValuePolicy, ParameterTable, Resolution, ResolveConfig, Structure, Topology,
    UnclassifiedPolicy, resolve,
};

pub mod convert;
pub mod info;

/// Paths of every input the pipeline reads.
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub structure: Option<PathBuf>,
    pub topology: PathBuf,
    pub parameters: PathBuf,
    pub config: Option<PathBuf>,
}

impl InputFiles {
    /// Fails with a message naming the first input file that does not exist.
    pub fn ensure_exist(&self) -> Result<()> {
        let named = [
            ("structure", self.structure.as_deref()),
            ("topology", Some(self.topology.as_path())),
            ("parameter", Some(self.parameters.as_path())),
            ("config", self.config.as_deref()),
        ];
        for (label, path) in named {
            if let Some(path) = path {
                if !path.is_file() {
                    bail!("The {} file {} does not exist.", label, path.display());
                }
                log::info!("Checking {} file {}", label, path.display());
            }
        }
        Ok(())
    }
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyOverrides {
    pub on_unclassified: Option<UnclassifiedPolicy>,
    pub on_missing: Option<MissingValuePolicy>,
}

/// Everything `resolve` needs, loaded from disk.
#[derive(Debug)]
pub struct System {
    pub structure: Structure,
    pub topology: Topology,
    pub parameters: ParameterTable,
    pub config: ResolveConfig,
}

impl System {
    /// Runs the resolution engine behind a spinner.
    pub fn resolve(&self) -> Result<Resolution> {
        run_with_spinner("Resolving charges and radii", || {
            resolve(
                &self.structure,
                &self.topology,
                &self.parameters,
                &self.config,
            )
            .context("Failed to resolve charges and radii")
        })
    }
}

/// Loads the structure, topology, parameter table, and configuration.
pub fn load_system(files: &InputFiles, overrides: PolicyOverrides) -> Result<System> {
    let config = load_config(files.config.as_deref(), overrides)?;
    let structure = load_structure(files.structure.as_deref())?;

    run_with_spinner("Reading topology and parameters", || {
        let topology = load_topology(&files.topology)?;
        let parameters = load_parameters(&files.parameters)?;
        log::info!(
            "Loaded {} structure atoms, {} topology atoms, {} parameter rows",
            structure.atom_count(),
            topology.atom_count(),
            parameters.len()
        );
        Ok((topology, parameters))
    })
    .map(|(topology, parameters)| System {
        structure,
        topology,
        parameters,
        config,
    })
}

fn load_structure(path: Option<&Path>) -> Result<Structure> {
    if let Some(path) = path {
        let reader = open(path, "structure")?;
        read_pdb_structure(reader)
            .map_err(|e| e.with_path(path))
            .with_context(|| format!("Failed to parse PDB input from {}", path.display()))
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe a structure into pqrforge."
            );
        }
        read_pdb_structure(BufReader::new(stdin.lock()))
            .context("Failed to parse PDB input from stdin")
    }
}

fn load_topology(path: &Path) -> Result<Topology> {
    let reader = open(path, "topology")?;
    read_itp_topology(reader)
        .map_err(|e| e.with_path(path))
        .with_context(|| format!("Failed to parse topology from {}", path.display()))
}

fn load_parameters(path: &Path) -> Result<ParameterTable> {
    let reader = open(path, "parameter")?;
    read_dat_parameters(reader)
        .map_err(|e| e.with_path(path))
        .with_context(|| format!("Failed to parse parameters from {}", path.display()))
}

fn load_config(path: Option<&Path>, overrides: PolicyOverrides) -> Result<ResolveConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ResolveConfig::from_toml_str(&content)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => ResolveConfig::default(),
    };

    if let Some(policy) = overrides.on_unclassified {
        config.on_unclassified = policy;
    }
    if let Some(policy) = overrides.on_missing {
        config.on_missing = policy;
    }
    Ok(config)
}

fn open(path: &Path, label: &str) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file {}", label, path.display()))?;
    Ok(BufReader::new(file))
}

/// Initializes `env_logger` with a default filter derived from `-v` repetitions.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Runs `work` while showing a spinner with `message` on stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}
