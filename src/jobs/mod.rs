pub mod publisher;
pub mod token_sweep;
