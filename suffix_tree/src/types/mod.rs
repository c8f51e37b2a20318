pub mod node;
pub mod text;
