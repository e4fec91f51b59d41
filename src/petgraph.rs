use crate::graph_trait::{normalize, Edge, Graph};
use petgraph::graph::NodeIndex;
use petgraph::visit::{EdgeRef, NodeIndexable};

type PGraphType = petgraph::graph::UnGraph<(), ()>;

pub struct PGraph {
    g: PGraphType,
    degrees: Vec<usize>,
}

impl Graph for PGraph {
    fn new(n: usize) -> Self {
        let mut g_struct = PGraph {
            g: PGraphType::with_capacity(n, n),
            degrees: vec![0; n],
        };
        for _ in 0..n {
            g_struct.g.add_node(());
        }
        g_struct
    }

    fn size(&self) -> usize {
        self.g.node_count()
    }

    fn edge_count(&self) -> usize {
        self.g.edge_count()  // O(1) time
    }

    fn degree(&self, v: usize) -> usize {
        self.degrees[v]
    }

    fn add_edge(&mut self, u: usize, v: usize) -> bool {
        debug_assert_ne!(u, v);
        if self.has_edge(u, v) {
            return false;
        }
        self.g.add_edge(self.g.from_index(u), self.g.from_index(v), ());
        self.degrees[u] += 1;
        self.degrees[v] += 1;
        true
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        // O(e’) time (e’: number of edges connected to u and v)
        self.g.contains_edge(self.g.from_index(u), self.g.from_index(v))
    }

    fn neighbors_iter(&self, v: usize) -> Box<dyn Iterator<Item=usize> + '_> {
        Box::new(self.g.neighbors(self.g.from_index(v)).map(NodeIndex::index))
    }

    fn edges(&self) -> Vec<Edge> {
        // edge indices are handed out in insertion order and never invalidated (no removals)
        self.g.edge_references()
            .map(|e| normalize(e.source().index(), e.target().index()))
            .collect()
    }
}
