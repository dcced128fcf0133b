mod model;
mod preprocessing;
mod recommendation;
mod types;
mod utils;

pub use model::{load_class_names, softmax, ConditionModel, OnnxConditionModel};
pub use preprocessing::{preprocess, CROP_SIZE, MEAN, RESIZE_SHORTER_SIDE, STD};
pub use recommendation::{recommendation, CONFIDENT_THRESHOLD};
pub use types::{Classification, ClassifierConfig, ClassifyError, Prediction};
pub use utils::{restrict_to_species, SkinClassifier};
