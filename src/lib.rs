pub mod graph_trait;
pub mod petgraph;
pub mod graph_parser;
pub mod config;
pub mod structure;
pub mod model;
pub mod solver;
pub mod connectivity;
pub mod heuristic;
pub mod ilp_solver;
