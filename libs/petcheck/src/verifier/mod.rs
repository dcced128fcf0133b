mod utils;
mod types;

pub use types::{VerificationOutcome, VerificationResult, VerifierConfig};
pub use utils::{contains_required_keywords, DocumentVerifier};
