//! HTTP surface of the two services
//!
//! Each server binary mounts exactly one of the routers below.

pub mod errors;
pub mod predict;
pub mod server;
pub mod types;
pub mod verify;

pub use errors::{PredictError, VerifyError};
pub use predict::predict;
pub use server::{classifier_router, serve, verifier_router};
pub use types::{ClassifierState, ServerConfig, VerifierState};
pub use verify::verify_license;
