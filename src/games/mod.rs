//! Game engines.
//!
//! Each game owns its state and RNG stream and knows nothing of the others.

pub mod fog_path;
pub mod knapsack;
pub mod nim;
