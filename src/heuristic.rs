use ahash::AHashSet;
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use crate::connectivity::component_index;
use crate::graph_trait::{Edge, Graph};

/// max. number of edges that are forced in a single repair step (never below 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quota(usize);

impl Quota {
    /// max(1, floor(sqrt(n) / 2))
    pub fn initial(n: usize) -> Self {
        Quota((((n as f64).sqrt() / 2.0).floor() as usize).max(1))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// max(1, quota - 1)
    pub fn decremented(self) -> Self {
        Quota(self.0.saturating_sub(1).max(1))
    }
}

/// picks (at most 'quota') reconnection edges out of the candidates
pub trait SelectionStrategy {
    fn name(&self) -> &'static str;
    /// 'candidates' are given in edge enumeration order, tree_degree[v] = deg(v) in the candidate
    fn select(&mut self, candidates: Vec<Edge>, tree_degree: &[usize], quota: usize) -> Vec<Edge>;
}

/// prefers edges whose endpoints have few candidate-tree edges (deg(u) + deg(v), ascending);
/// ties are resolved by enumeration order (stable sort) -> deterministic
#[derive(Clone, Copy, Debug, Default)]
pub struct DegreeScored;

impl SelectionStrategy for DegreeScored {
    fn name(&self) -> &'static str {
        "scored"
    }

    fn select(&mut self, mut candidates: Vec<Edge>, tree_degree: &[usize], quota: usize) -> Vec<Edge> {
        candidates.sort_by_key(|(u, v)| tree_degree[*u] + tree_degree[*v]);
        candidates.truncate(quota);
        candidates
    }
}

/// uniform sample (without replacement) of the candidates
pub struct RandomSample {
    rng: StdRng,
}

impl RandomSample {
    /// seeded -> reproducible; None -> seeded from system entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomSample { rng }
    }
}

impl SelectionStrategy for RandomSample {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&mut self, candidates: Vec<Edge>, _tree_degree: &[usize], quota: usize) -> Vec<Edge> {
        candidates.choose_multiple(&mut self.rng, quota).copied().collect()
    }
}

/// returns all edges of 'g' (in enumeration order) whose endpoints lie in different components
pub fn reconnection_candidates(g: &impl Graph, components: &[AHashSet<usize>]) -> Vec<Edge> {
    let comp = component_index(g.size(), components);
    g.edges().into_iter().filter(|(u, v)| comp[*u] != comp[*v]).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Repair {
    pub forced: IndexSet<Edge>,
    pub quota: Quota,
    /// edges that were selected in this step
    pub added: Vec<Edge>,
}

/// one repair step on a disconnected candidate 'tree' of 'g':
/// selects min(|candidates|, quota) reconnection edges, adds them to the forced edges and
/// decrements the quota (floored at 1)
pub fn repair(g: &impl Graph,
              tree: &impl Graph,
              components: &[AHashSet<usize>],
              mut forced: IndexSet<Edge>,
              quota: Quota,
              strategy: &mut dyn SelectionStrategy) -> Repair {
    let candidates = reconnection_candidates(g, components);
    let mut added = Vec::new();
    if !candidates.is_empty() {
        let tree_degree: Vec<usize> = (0..tree.size()).map(|v| tree.degree(v)).collect();
        let sample_size = candidates.len().min(quota.get());
        added = strategy.select(candidates, &tree_degree, sample_size);
        debug_assert!(added.len() <= sample_size);
        forced.extend(added.iter().copied());
    }
    Repair { forced, quota: quota.decremented(), added }
}
