use good_lp::solvers::microlp::microlp;
use good_lp::{variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use crate::model::{MilpModel, Sense};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// proven optimal, 'assignment' holds the solution
    Optimal,
    /// proven infeasible
    Infeasible,
    /// interrupted (e.g. by a time limit) before optimality or infeasibility was proven
    Stopped,
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    /// one value per model variable (empty unless status == Optimal)
    pub assignment: Vec<bool>,
}

impl SolverOutcome {
    pub fn optimal(assignment: Vec<bool>) -> Self {
        SolverOutcome { status: SolverStatus::Optimal, assignment }
    }

    pub fn failed(status: SolverStatus) -> Self {
        debug_assert_ne!(status, SolverStatus::Optimal);
        SolverOutcome { status, assignment: Vec::new() }
    }
}

/// black-box oracle that solves a 0/1 MILP to optimality
pub trait MilpSolver {
    fn name(&self) -> &str;
    fn solve(&mut self, model: &MilpModel) -> SolverOutcome;
}

/// pure-Rust branch-and-bound backend (microlp through good_lp)
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLpSolver;

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&mut self, model: &MilpModel) -> SolverOutcome {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = model.variables.iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let mut objective: Expression = 0.into();
        for (var, coef) in &model.objective {
            objective += xs[*var] * *coef;
        }

        let mut problem = vars.minimise(objective).using(microlp);
        for c in &model.constraints {
            let mut lhs: Expression = 0.into();
            for (var, coef) in &c.terms {
                lhs += xs[*var] * *coef;
            }
            problem.add_constraint(match c.sense {
                Sense::Eq => lhs.eq(c.rhs),
                Sense::Le => lhs.leq(c.rhs),
            });
        }

        match problem.solve() {
            // binaries come back as floats -> round to recover exact 0/1 values
            Ok(solution) => SolverOutcome::optimal(xs.iter().map(|x| solution.value(*x) > 0.5).collect()),
            Err(ResolutionError::Infeasible) => SolverOutcome::failed(SolverStatus::Infeasible),
            Err(err) => SolverOutcome::failed(SolverStatus::Error(err.to_string())),
        }
    }
}
