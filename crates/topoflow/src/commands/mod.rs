pub mod graph;
pub mod plan;
pub mod render;
pub mod simulate;
pub mod validate;
