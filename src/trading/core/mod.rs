pub mod executor;
pub mod gate;
