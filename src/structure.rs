use std::collections::VecDeque;
use ahash::AHashSet;
use indexmap::IndexSet;
use crate::graph_trait::{normalize, Edge, Graph};

/// vertices of degree <= LOW_DEGREE_MAX (in the input graph) may never become branch vertices
pub const LOW_DEGREE_MAX: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexClass {
    LowDegree,
    HighDegree,
}

/// everything that is derived once from the (static) input graph and reused in every iteration
#[derive(Clone, Debug, PartialEq)]
pub struct StructureAnalysis {
    pub bridges: IndexSet<Edge>,          // in edge enumeration order
    pub partition: Vec<VertexClass>,      // partition[v] = class of vertex v
    pub cycle_basis: Vec<Vec<Edge>>,      // fundamental cycles, each given by its edges
}

impl StructureAnalysis {
    pub fn class(&self, v: usize) -> VertexClass {
        self.partition[v]
    }

    pub fn high_degree_vertices(&self) -> impl Iterator<Item=usize> + '_ {
        self.partition.iter()
            .enumerate()
            .filter(|(_, c)| **c == VertexClass::HighDegree)
            .map(|(v, _)| v)
    }
}

/// computes bridges, degree partition and fundamental cycle basis of 'g'
pub fn analyze(g: &impl Graph) -> StructureAnalysis {
    StructureAnalysis {
        bridges: bridges(g),
        partition: partition(g),
        cycle_basis: fundamental_cycles(g),
    }
}

/// labels every vertex as LowDegree (deg <= 2) or HighDegree (deg > 2)
pub fn partition(g: &impl Graph) -> Vec<VertexClass> {
    (0..g.size())
        .map(|v| if g.degree(v) <= LOW_DEGREE_MAX {
            VertexClass::LowDegree
        } else {
            VertexClass::HighDegree
        })
        .collect()
}

/// returns all bridges of 'g' (in the order of g.edges())
/// iterative dfs with discovery times and low-links (no recursion -> no stack overflow on long paths)
pub fn bridges(g: &impl Graph) -> IndexSet<Edge> {
    let n = g.size();
    let adj: Vec<Vec<usize>> = (0..n).map(|v| g.neighbors_iter(v).collect()).collect();
    let mut disc = vec![0usize; n];  // 0 -> not visited yet
    let mut low = vec![0usize; n];
    let mut time = 0;
    let mut found: AHashSet<Edge> = AHashSet::new();

    for root in 0..n {
        if disc[root] != 0 { continue; }
        time += 1;
        disc[root] = time;
        low[root] = time;
        // (vertex, dfs parent, index of the next neighbor to look at)
        let mut stack: Vec<(usize, usize, usize)> = vec![(root, usize::MAX, 0)];
        while let Some(frame) = stack.last_mut() {
            let (u, parent) = (frame.0, frame.1);
            if frame.2 < adj[u].len() {
                let v = adj[u][frame.2];
                frame.2 += 1;
                if disc[v] == 0 {
                    time += 1;
                    disc[v] = time;
                    low[v] = time;
                    stack.push((v, u, 0));
                } else if v != parent {  // back edge (graph is simple -> parent edge is unique)
                    low[u] = low[u].min(disc[v]);
                }
            } else {
                stack.pop();
                if let Some(&(p, _, _)) = stack.last() {
                    low[p] = low[p].min(low[u]);
                    if low[u] > disc[p] {
                        found.insert(normalize(p, u));
                    }
                }
            }
        }
    }

    g.edges().into_iter().filter(|e| found.contains(e)).collect()
}

/// returns a fundamental cycle basis of 'g': one cycle per non-tree edge of a bfs spanning forest
/// (|basis| = m - n + #components)
pub fn fundamental_cycles(g: &impl Graph) -> Vec<Vec<Edge>> {
    let n = g.size();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut depth = vec![usize::MAX; n];
    for root in 0..n {
        if depth[root] != usize::MAX { continue; }
        depth[root] = 0;
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            for v in g.neighbors_iter(u) {
                if depth[v] == usize::MAX {
                    depth[v] = depth[u] + 1;
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
    }

    let mut cycles = Vec::new();
    for (u, v) in g.edges() {
        if parent[u] == Some(v) || parent[v] == Some(u) {
            continue;  // tree edge
        }
        // close the cycle by climbing from both endpoints up to their lowest common ancestor
        let mut cycle = vec![(u, v)];
        let (mut a, mut b) = (u, v);
        while a != b {
            let climb_a = depth[a] >= depth[b];
            let x = if climb_a { a } else { b };
            let Some(p) = parent[x] else { break };
            cycle.push(normalize(x, p));
            if climb_a { a = p; } else { b = p; }
        }
        cycles.push(cycle);
    }
    cycles
}

#[cfg(test)]
mod tests {
    use ahash::AHashSet;
    use proptest::prelude::*;
    use crate::graph_parser::read_graph_from_file;
    use crate::graph_trait::{normalize, Edge, Graph};
    use crate::petgraph::PGraph;
    use crate::structure::*;

    #[test]
    fn test_bridges() {
        let g = read_graph_from_file("test_instances/path5.txt").unwrap();
        assert_eq!(bridges(&g).into_iter().collect::<Vec<_>>(), g.edges());

        let g = read_graph_from_file("test_instances/triangle_pendant.txt").unwrap();
        assert_eq!(bridges(&g).into_iter().collect::<Vec<_>>(), vec![(2,3)]);

        let g = read_graph_from_file("test_instances/bridged_cycles.txt").unwrap();
        assert_eq!(bridges(&g).into_iter().collect::<Vec<_>>(), vec![(3,4), (7,8)]);

        let g = read_graph_from_file("test_instances/petersen.txt").unwrap();
        assert!(bridges(&g).is_empty());
    }

    #[test]
    fn test_partition() {
        let g = read_graph_from_file("test_instances/triangle_pendant.txt").unwrap();
        let p = partition(&g);
        assert_eq!(p, vec![VertexClass::LowDegree, VertexClass::LowDegree,
                           VertexClass::HighDegree, VertexClass::LowDegree]);
        let analysis = analyze(&g);
        assert_eq!(analysis.high_degree_vertices().collect::<Vec<_>>(), vec![2]);
        assert_eq!(analysis.class(3), VertexClass::LowDegree);
    }

    fn assert_is_cycle(cycle: &[Edge]) {
        // every vertex on a simple cycle is hit exactly twice
        let mut count = std::collections::HashMap::new();
        for (u, v) in cycle {
            *count.entry(*u).or_insert(0) += 1;
            *count.entry(*v).or_insert(0) += 1;
        }
        assert!(cycle.len() >= 3);
        assert!(count.values().all(|c| *c == 2));
        let distinct: AHashSet<Edge> = cycle.iter().copied().collect();
        assert_eq!(distinct.len(), cycle.len());
    }

    #[test]
    fn test_fundamental_cycles() {
        let g = read_graph_from_file("test_instances/triangle_pendant.txt").unwrap();
        let cycles = fundamental_cycles(&g);
        assert_eq!(cycles.len(), 1);
        let mut triangle = cycles[0].clone();
        triangle.sort_unstable();
        assert_eq!(triangle, vec![(0,1), (0,2), (1,2)]);

        let g = read_graph_from_file("test_instances/petersen.txt").unwrap();
        let cycles = fundamental_cycles(&g);
        assert_eq!(cycles.len(), 15 - 10 + 1);
        for c in &cycles {
            assert_is_cycle(c);
            assert!(c.iter().all(|(u, v)| g.has_edge(*u, *v)));
        }

        assert!(fundamental_cycles(&read_graph_from_file("test_instances/path5.txt").unwrap()).is_empty());
    }

    fn connected_graph() -> impl Strategy<Value = (usize, Vec<Edge>)> {
        (2usize..10).prop_flat_map(|n| (
            Just(n),
            proptest::collection::vec(any::<prop::sample::Index>(), n - 1),
            proptest::collection::vec((0..n, 0..n), 0..12),
        )).prop_map(|(n, tree, extra)| {
            // random spanning tree (vertex i hangs below some vertex < i) plus random extra edges
            let mut edges: Vec<Edge> = tree.iter()
                .enumerate()
                .map(|(i, idx)| normalize(idx.index(i + 1), i + 1))
                .collect();
            edges.extend(extra.into_iter().filter(|(u, v)| u != v).map(|(u, v)| normalize(u, v)));
            (n, edges)
        })
    }

    proptest! {
        #[test]
        fn bridges_match_brute_force((n, edges) in connected_graph()) {
            let g = PGraph::from_edges(n, &edges);
            let b = bridges(&g);
            for e in g.edges() {
                let rest: Vec<Edge> = g.edges().into_iter().filter(|f| *f != e).collect();
                let disconnects = !PGraph::from_edges(n, &rest).is_connected();
                prop_assert_eq!(b.contains(&e), disconnects);
            }
        }

        #[test]
        fn cycle_basis_has_one_cycle_per_non_tree_edge((n, edges) in connected_graph()) {
            let g = PGraph::from_edges(n, &edges);
            let cycles = fundamental_cycles(&g);
            prop_assert_eq!(cycles.len(), g.edge_count() + 1 - n);
            let b = bridges(&g);
            for c in &cycles {
                assert_is_cycle(c);
                prop_assert!(c.iter().all(|e| !b.contains(e)));  // bridges lie on no cycle
            }
        }

        #[test]
        fn analysis_is_idempotent((n, edges) in connected_graph()) {
            let g = PGraph::from_edges(n, &edges);
            prop_assert_eq!(analyze(&g), analyze(&g));
        }
    }
}
