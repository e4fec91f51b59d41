use ahash::AHashMap;
use indexmap::IndexSet;
use tracing::debug;
use crate::graph_trait::{normalize, Edge, Graph};
use crate::structure::{StructureAnalysis, VertexClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    /// x_e = 1 <=> edge e is selected
    Edge(Edge),
    /// y_v = 1 <=> high-degree vertex v may exceed tree degree 2
    Branch(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Cardinality,
    CycleElimination,
    ForcedEdge,
    DegreeCap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// returns whether the 0/1 assignment satisfies this constraint
    pub fn satisfied_by(&self, assignment: &[bool]) -> bool {
        let lhs: f64 = self.terms.iter()
            .filter(|(var, _)| assignment[*var])
            .map(|(_, coef)| coef)
            .sum();
        match self.sense {
            Sense::Eq => (lhs - self.rhs).abs() < 1e-9,
            Sense::Le => lhs <= self.rhs + 1e-9,
        }
    }
}

/// binary minimization problem; all variables are 0/1, every constraint is a sparse row
/// `sum(coef * var) (= | <=) rhs` over variable indices (translated by a 'MilpSolver')
#[derive(Clone, Debug, Default)]
pub struct MilpModel {
    pub variables: Vec<Variable>,
    pub objective: Vec<(usize, f64)>,
    pub constraints: Vec<LinearConstraint>,
    edge_vars: AHashMap<Edge, usize>,
    branch_vars: AHashMap<usize, usize>,
}

impl MilpModel {
    fn add_variable(&mut self, var: Variable) -> usize {
        let idx = self.variables.len();
        self.variables.push(var);
        match var {
            Variable::Edge(e) => { self.edge_vars.insert(e, idx); },
            Variable::Branch(v) => { self.branch_vars.insert(v, idx); },
        }
        idx
    }

    /// index of the selection variable of edge {u,v} (None if {u,v} is no edge)
    pub fn edge_var(&self, u: usize, v: usize) -> Option<usize> {
        self.edge_vars.get(&normalize(u, v)).copied()
    }

    /// index of the branch indicator of vertex 'v' (None for low-degree vertices)
    pub fn branch_var(&self, v: usize) -> Option<usize> {
        self.branch_vars.get(&v).copied()
    }

    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item=&LinearConstraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    /// returns the selected edges of a 0/1 assignment (in variable order = edge enumeration order)
    pub fn selected_edges(&self, assignment: &[bool]) -> Vec<Edge> {
        self.variables.iter()
            .zip(assignment)
            .filter_map(|(var, value)| match var {
                Variable::Edge(e) if *value => Some(*e),
                _ => None,
            })
            .collect()
    }

    /// objective value of a 0/1 assignment
    pub fn objective_value(&self, assignment: &[bool]) -> f64 {
        self.objective.iter()
            .filter(|(var, _)| assignment[*var])
            .map(|(_, coef)| coef)
            .sum()
    }

    /// returns whether a 0/1 assignment satisfies every constraint
    pub fn is_feasible(&self, assignment: &[bool]) -> bool {
        assignment.len() == self.variables.len()
            && self.constraints.iter().all(|c| c.satisfied_by(assignment))
    }
}

/// builds the MILP of one iteration:
///  (1) sum x_e = n - 1
///  (2) sum_{e in C} x_e <= |C| - 1 for every fundamental cycle C
///  (3) x_e = 1 for every bridge and every forced edge
///  (4) sum_{e in delta(v)} x_e <= 2 + (deg(v) - 2) y_v (high-degree v), <= 2 (low-degree v)
/// objective: minimize sum y_v
/// forced edges that are not part of 'g' are skipped (no error)
pub fn build_model(g: &impl Graph, analysis: &StructureAnalysis, forced: &IndexSet<Edge>) -> MilpModel {
    let mut model = MilpModel::default();
    let edges = g.edges();

    //------------------------- create the variables -------------------------//
    for e in &edges {
        model.add_variable(Variable::Edge(*e));
    }
    for v in analysis.high_degree_vertices() {
        let y = model.add_variable(Variable::Branch(v));
        model.objective.push((y, 1.0));
    }

    //------------------------- add constraints ------------------------------//
    // (1) spanning tree cardinality
    model.constraints.push(LinearConstraint {
        kind: ConstraintKind::Cardinality,
        terms: (0..edges.len()).map(|x| (x, 1.0)).collect(),
        sense: Sense::Eq,
        rhs: g.size().saturating_sub(1) as f64,
    });

    // (2) no fundamental cycle is selected completely
    for cycle in &analysis.cycle_basis {
        let terms: Vec<(usize, f64)> = cycle.iter()
            .filter_map(|(u, v)| model.edge_var(*u, *v))
            .map(|x| (x, 1.0))
            .collect();
        model.constraints.push(LinearConstraint {
            kind: ConstraintKind::CycleElimination,
            terms,
            sense: Sense::Le,
            rhs: (cycle.len() - 1) as f64,
        });
    }

    // (3) bridges and forced reconnection edges
    let fixed: IndexSet<Edge> = analysis.bridges.union(forced).copied().collect();
    for (u, v) in fixed {
        match model.edge_var(u, v) {
            Some(x) => model.constraints.push(LinearConstraint {
                kind: ConstraintKind::ForcedEdge,
                terms: vec![(x, 1.0)],
                sense: Sense::Eq,
                rhs: 1.0,
            }),
            None => debug!(u, v, "forced edge is not part of the graph, skipped"),
        }
    }

    // (4) degree / branching caps
    let mut incident: Vec<Vec<(usize, f64)>> = vec![Vec::new(); g.size()];
    for (x, (u, v)) in edges.iter().enumerate() {
        incident[*u].push((x, 1.0));
        incident[*v].push((x, 1.0));
    }
    for (v, mut terms) in incident.into_iter().enumerate() {
        if analysis.class(v) == VertexClass::HighDegree {
            if let Some(y) = model.branch_var(v) {
                terms.push((y, -((g.degree(v) - 2) as f64)));
            }
        }
        model.constraints.push(LinearConstraint {
            kind: ConstraintKind::DegreeCap,
            terms,
            sense: Sense::Le,
            rhs: 2.0,
        });
    }

    model
}
