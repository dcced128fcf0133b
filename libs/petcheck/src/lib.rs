pub mod common;
pub mod image_utils;
pub mod image2text;
pub mod stamp;
pub mod verifier;
pub mod classifier;
pub mod api;
