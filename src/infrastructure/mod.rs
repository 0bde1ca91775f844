pub mod generation;
pub mod identity;
pub mod sandbox;
