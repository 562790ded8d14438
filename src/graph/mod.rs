pub mod path_finding;
pub mod rate_graph;
