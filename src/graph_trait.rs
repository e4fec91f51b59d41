use ahash::AHashSet;

/// undirected edge {u,v}, always stored with u < v
pub type Edge = (usize, usize);

/// returns the normalized form (smaller endpoint first) of edge {u,v}
pub fn normalize(u: usize, v: usize) -> Edge {
	if u < v { (u, v) } else { (v, u) }
}

pub trait Graph {
	/// creates a new graph with 'n' vertices and no edges
	fn new(n: usize) -> Self;
	/// returns the size (i.e. number of vertices) of the graph
	fn size(&self) -> usize;
	/// returns number of edges in the graph (in O(1) time)
	fn edge_count(&self) -> usize;
	/// returns degree (i.e., number of neighbors) of vertex 'v'
	fn degree(&self, v: usize) -> usize;
	/// adds edge {u,v} (returns false and does nothing if it is present already)
	fn add_edge(&mut self, u: usize, v: usize) -> bool;
	/// returns whether edge {u,v} is present in the graph
	fn has_edge(&self, u: usize, v: usize) -> bool;
	/// returns an iterator over vertex v's neighbors
	fn neighbors_iter(&self, v: usize) -> Box<dyn Iterator<Item=usize> + '_>;
	/// returns all edges (normalized) in the order in which they were added
	fn edges(&self) -> Vec<Edge>;

	/// creates a graph with 'n' vertices and the given edges
	fn from_edges(n: usize, edges: &[Edge]) -> Self where Self: Sized {
		let mut g = Self::new(n);
		for (u, v) in edges {
			g.add_edge(*u, *v);
		}
		g
	}

	/// returns vector of connected components
	/// each component is represented as an AHashSet of the vertices it contains
	fn connected_components_sets(&self) -> Vec<AHashSet<usize>> {
		let mut components: Vec<AHashSet<usize>> = Vec::new();
		let mut seen: AHashSet<usize> = AHashSet::with_capacity(self.size());
		for v in 0..self.size() {
			if seen.contains(&v) { continue; }

			seen.insert(v);
			let mut comp = AHashSet::from([v]);

			// find all other vertices in component c (using dfs)
			let mut stack = vec![v];
			while let Some(u) = stack.pop() {
				for nb_u in self.neighbors_iter(u) {
					if seen.insert(nb_u) {
						stack.push(nb_u);
						comp.insert(nb_u);
					}
				}
			}
			components.push(comp);
		}
		components
	}

	/// returns whether the graph consists of a single connected component
	fn is_connected(&self) -> bool {
		if self.size() == 0 {
			return true;
		}
		let mut seen = vec![false; self.size()];
		seen[0] = true;
		let mut reached = 1;
		let mut stack = vec![0];
		while let Some(u) = stack.pop() {
			for nb_u in self.neighbors_iter(u) {
				if !seen[nb_u] {
					seen[nb_u] = true;
					reached += 1;
					stack.push(nb_u);
				}
			}
		}
		reached == self.size()
	}

	/// returns all vertices of degree > 2 (in increasing order)
	fn branch_vertices(&self) -> Vec<usize> {
		(0..self.size()).filter(|v| self.degree(*v) > 2).collect()
	}
}
