mod utils;
mod types;

pub use types::StampConfig;
pub use utils::{best_match_score, edge_map, StampDetector};

#[cfg(test)]
pub(crate) use utils::tests as tests_support;
