pub mod build;
pub mod graph;
pub mod util;
