use std::path::{Path, PathBuf};
use std::{fs, process};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use mbvst_solver::config::{read_config, SolverConfig, StrategyKind};
use mbvst_solver::graph_parser::{read_graph_from_file, solution_path, write_solution_to_file};
use mbvst_solver::ilp_solver::start_mbvst_solver;
use mbvst_solver::solver::MicroLpSolver;

#[derive(Parser)]
#[command(name = "mbvst")]
#[command(about = "Spanning trees with few branch vertices via iterated ILP solving and reconnection")]
struct Cli {
    /// graph file, or directory whose *.txt files are solved one after another
    input: PathBuf,
    /// config file with 'key:value' lines (strategy, seed, max_iterations, time_limit)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// directory for the solution files (sol_<name>.txt)
    #[arg(short, long, default_value = "solutions")]
    output: PathBuf,
    /// append per-instance statistics to this file
    #[arg(long)]
    stats: Option<PathBuf>,
    /// reconnection strategy: scored | random
    #[arg(long)]
    strategy: Option<StrategyKind>,
    #[arg(long)]
    seed: Option<u64>,
    /// stop after this many ILPs per instance
    #[arg(long)]
    max_iterations: Option<usize>,
    /// time limit per instance in seconds
    #[arg(long)]
    time_limit: Option<f64>,
}

impl Cli {
    /// config file values, overridden by command line flags
    fn solver_config(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(file) => read_config(file)?,
            None => SolverConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(it) = self.max_iterations {
            config.max_iterations = (it > 0).then_some(it);
        }
        if let Some(t) = self.time_limit {
            anyhow::ensure!(t.is_finite() && t >= 0.0, "time limit must be a non-negative number of seconds");
            config.time_limit = (t > 0.0).then(|| std::time::Duration::from_secs_f64(t));
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    if let Err(err) = run(Cli::parse()) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.solver_config()?;
    let instances = collect_instances(&cli.input)?;
    fs::create_dir_all(&cli.output)
        .with_context(|| format!("could not create output directory {:?}", cli.output))?;

    let mut solved = 0;
    for file in &instances {
        // a failing instance must not abort the batch
        match solve_instance(file, &cli, &config) {
            Ok(out) => {
                solved += 1;
                info!(solution = %out.display(), "solution written");
            },
            Err(err) => warn!(file = %file.display(), "no solution: {err:#}"),
        }
    }
    info!(solved, total = instances.len(), "done");
    if instances.len() == 1 && solved == 0 {
        anyhow::bail!("instance {:?} could not be solved", instances[0]);
    }
    Ok(())
}

/// single file -> [file]; directory -> all *.txt files in it (sorted by name)
fn collect_instances(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(input).with_context(|| format!("could not read directory {input:?}"))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn solve_instance(file: &Path, cli: &Cli, config: &SolverConfig) -> Result<PathBuf> {
    let g = read_graph_from_file(file)?;
    let sol = start_mbvst_solver(file, cli.stats.as_deref(), &g, &mut MicroLpSolver, config)?;
    let out = solution_path(file, &cli.output);
    write_solution_to_file(&out, &sol.tree)?;
    Ok(out)
}
