use std::{fs::File, io, io::Write, path::Path, path::PathBuf, time::Instant};
use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, info, warn};
use crate::config::SolverConfig;
use crate::connectivity::{candidate_graph, check_connectivity, Connectivity};
use crate::graph_trait::{Edge, Graph};
use crate::heuristic::{repair, Quota, SelectionStrategy};
use crate::model::build_model;
use crate::petgraph::PGraph;
use crate::solver::{MilpSolver, SolverStatus};
use crate::structure::{analyze, StructureAnalysis};

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid input graph: {0}")]
    InvalidGraph(&'static str),
    #[error("the ILP became infeasible in iteration {iteration}")]
    Infeasible { iteration: usize },
    #[error("the solver stopped without an optimal solution in iteration {iteration}")]
    Stopped { iteration: usize },
    #[error("solver error in iteration {iteration}: {message}")]
    Solver { iteration: usize, message: String },
    #[error("no connected tree after {0} iterations")]
    IterationLimit(usize),
    #[error("no connected tree within the time limit ({iterations} iterations)")]
    TimeLimit { iterations: usize },
}

/// what happened in one iteration that produced a disconnected candidate
#[derive(Clone, Debug, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub components: usize,
    pub quota: usize,              // quota used for this repair step
    pub added: Vec<Edge>,
    pub forced_edges: usize,       // |forced| after the repair step
}

pub struct MbvstSolution {
    pub tree: PGraph,
    pub branch_vertices: Vec<usize>,
    pub iterations: usize,
    pub forced: IndexSet<Edge>,
    pub history: Vec<IterationRecord>,
}

/// state threaded through the iterations (owned by the controller only)
struct IterationState {
    iteration: usize,
    forced: IndexSet<Edge>,
    quota: Quota,
}

/// runs the build -> solve -> check -> repair loop on the connected graph 'g' until the
/// candidate is a spanning tree (or the ILP becomes infeasible / a safety limit is hit)
pub fn solve_mbvst(g: &impl Graph,
                   solver: &mut dyn MilpSolver,
                   strategy: &mut dyn SelectionStrategy,
                   config: &SolverConfig) -> Result<MbvstSolution, SolveError> {
    validate(g)?;
    let analysis = analyze(g);
    solve_with_analysis(g, &analysis, solver, strategy, config)
}

fn validate(g: &impl Graph) -> Result<(), SolveError> {
    if g.size() < 2 {
        return Err(SolveError::InvalidGraph("at least two vertices required"));
    }
    if !g.is_connected() {
        return Err(SolveError::InvalidGraph("graph is not connected"));
    }
    Ok(())
}

/// like 'solve_mbvst', but reuses an existing structure analysis of 'g'
pub fn solve_with_analysis(g: &impl Graph,
                           analysis: &StructureAnalysis,
                           solver: &mut dyn MilpSolver,
                           strategy: &mut dyn SelectionStrategy,
                           config: &SolverConfig) -> Result<MbvstSolution, SolveError> {
    let start = Instant::now();
    let mut state = IterationState {
        iteration: 0,
        forced: IndexSet::new(),
        quota: Quota::initial(g.size()),
    };
    let mut history = Vec::new();
    debug!(bridges = analysis.bridges.len(), cycles = analysis.cycle_basis.len(),
           quota = state.quota.get(), solver = solver.name(), strategy = strategy.name(),
           "structure analysis done");

    loop {
        if let Some(max_it) = config.max_iterations {
            if state.iteration >= max_it {
                return Err(SolveError::IterationLimit(state.iteration));
            }
        }
        if let Some(limit) = config.time_limit {
            if start.elapsed() >= limit {
                return Err(SolveError::TimeLimit { iterations: state.iteration });
            }
        }

        let model = build_model(g, analysis, &state.forced);
        state.iteration += 1;

        let outcome = solver.solve(&model);
        match outcome.status {
            SolverStatus::Optimal => {},
            SolverStatus::Infeasible => return Err(SolveError::Infeasible { iteration: state.iteration }),
            SolverStatus::Stopped => return Err(SolveError::Stopped { iteration: state.iteration }),
            SolverStatus::Error(message) => return Err(SolveError::Solver { iteration: state.iteration, message }),
        }

        let tree: PGraph = candidate_graph(g.size(), &model.selected_edges(&outcome.assignment));
        let components = match check_connectivity(&tree) {
            Connectivity::Connected => {
                info!(iteration = state.iteration, "connected spanning tree found");
                return Ok(MbvstSolution {
                    branch_vertices: tree.branch_vertices(),
                    tree,
                    iterations: state.iteration,
                    forced: state.forced,
                    history,
                });
            },
            Connectivity::Disconnected(components) => components,
        };

        let quota = state.quota;
        let r = repair(g, &tree, &components, state.forced, quota, strategy);
        info!(iteration = state.iteration, components = components.len(), quota = quota.get(),
              added = r.added.len(), "candidate is disconnected");
        history.push(IterationRecord {
            iteration: state.iteration,
            components: components.len(),
            quota: quota.get(),
            added: r.added,
            forced_edges: r.forced.len(),
        });
        state.forced = r.forced;
        state.quota = r.quota;
    }
}

struct SolveStats {
    file_name: String,              // name of the graph file
    output_file: PathBuf,           // name of the output file that these stats are written to
    runtime: f32,                   // how long it took to solve MBVST on the graph
    size: usize,                    // |V|
    edges: usize,                   // |E|
    bridges: usize,                 // no. of bridges (always fixed)
    cycles: usize,                  // size of the fundamental cycle basis
    iterations: usize,              // no. of ILPs solved
    forced_edges: usize,            // no. of reconnection edges forced in the end
    branch_vertices: Option<usize>, // solution value (None -> unsolved)
}

impl SolveStats {
    fn write_stats(&self) -> Result<(), io::Error> {
        let mut file: File;
        if let Ok(f) = File::options().append(true).open(&self.output_file) {
            // stats file already exists -> open for appending data
            file = f;
        } else {
            file = File::create(&self.output_file)?;
            file.write_all(b"File\tTime (s)\tVertices\tEdges\tBridges\tCycles\tIterations\tForced Edges\tBranch Vertices\n")?;
        }
        let b = match self.branch_vertices {
            Some(b) => b.to_string(),
            None => String::from("unsolved"),
        };
        file.write_all(format!("{}\t{:.2}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                               self.file_name,
                               self.runtime,
                               self.size,
                               self.edges,
                               self.bridges,
                               self.cycles,
                               self.iterations,
                               self.forced_edges,
                               b).as_bytes())?;
        debug!(file = ?self.output_file, "statistics written");
        Ok(())
    }
}

/// solves MBVST on 'g' (read from 'in_file') and, if 'stats_file' is given, appends a line of
/// statistics to it (also if the instance could not be solved)
pub fn start_mbvst_solver(in_file: &Path,
                          stats_file: Option<&Path>,
                          g: &impl Graph,
                          solver: &mut dyn MilpSolver,
                          config: &SolverConfig) -> Result<MbvstSolution, SolveError> {
    info!(file = %in_file.display(), vertices = g.size(), edges = g.edge_count(), "solving");
    let now = Instant::now();  // start timer
    let (analysis, result) = match validate(g) {
        Ok(()) => {
            let mut strategy = config.selection_strategy();
            let analysis = analyze(g);
            let result = solve_with_analysis(g, &analysis, solver, strategy.as_mut(), config);
            (Some(analysis), result)
        },
        Err(err) => (None, Err(err)),
    };

    if let Some(out) = stats_file {
        let mut stats = SolveStats {
            file_name: in_file.display().to_string(),
            output_file: out.to_path_buf(),
            runtime: now.elapsed().as_secs_f32(),
            size: g.size(),
            edges: g.edge_count(),
            bridges: analysis.as_ref().map_or(0, |a| a.bridges.len()),
            cycles: analysis.as_ref().map_or(0, |a| a.cycle_basis.len()),
            iterations: 0,
            forced_edges: 0,
            branch_vertices: None,
        };
        if let Ok(sol) = &result {
            stats.iterations = sol.iterations;
            stats.forced_edges = sol.forced.len();
            stats.branch_vertices = Some(sol.branch_vertices.len());
        }
        stats.write_stats().unwrap_or_else(|err| {
            warn!("problem writing statistics to file: {err}");
        });
    }
    if let Ok(sol) = &result {
        info!(seconds = now.elapsed().as_secs_f32(), iterations = sol.iterations,
              branch_vertices = sol.branch_vertices.len(), "solved");
    }
    result
}
