pub mod generation;
pub mod speech;
pub mod system;
