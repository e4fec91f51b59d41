use ahash::AHashSet;
use crate::graph_trait::{Edge, Graph};

#[derive(Clone, Debug, PartialEq)]
pub enum Connectivity {
    Connected,
    /// disjoint vertex sets covering all vertices (at least two of them)
    Disconnected(Vec<AHashSet<usize>>),
}

/// builds the candidate subgraph: all 'n' vertices of the input graph, only the selected edges
pub fn candidate_graph<G: Graph>(n: usize, selected: &[Edge]) -> G {
    G::from_edges(n, selected)
}

pub fn check_connectivity(candidate: &impl Graph) -> Connectivity {
    if candidate.is_connected() {
        return Connectivity::Connected;
    }
    Connectivity::Disconnected(candidate.connected_components_sets())
}

/// maps every vertex to the index of its component
pub fn component_index(n: usize, components: &[AHashSet<usize>]) -> Vec<usize> {
    let mut index = vec![usize::MAX; n];
    for (i, comp) in components.iter().enumerate() {
        for v in comp {
            index[*v] = i;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use ahash::AHashSet;
    use crate::connectivity::*;
    use crate::petgraph::PGraph;

    #[test]
    fn test_connected_candidate() {
        let t: PGraph = candidate_graph(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(check_connectivity(&t), Connectivity::Connected);
    }

    #[test]
    fn test_disconnected_candidate() {
        // 4-cycle plus isolated vertex 4 (n - 1 edges, but not a tree)
        let t: PGraph = candidate_graph(5, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        let Connectivity::Disconnected(comps) = check_connectivity(&t) else {
            panic!("candidate should be disconnected");
        };
        assert_eq!(comps.len(), 2);
        assert!(comps.contains(&AHashSet::from([0, 1, 2, 3])));
        assert!(comps.contains(&AHashSet::from([4])));
        let idx = component_index(5, &comps);
        assert_eq!(idx[0], idx[3]);
        assert_ne!(idx[0], idx[4]);
    }
}
