pub mod graph;
pub mod link;
pub mod network_graph;
pub mod node;
