mod graph;
mod resolve;

pub use graph::run_graph;
pub use resolve::run_resolve;
