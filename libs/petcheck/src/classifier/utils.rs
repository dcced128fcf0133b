use image::DynamicImage;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::model::ConditionModel;
use super::types::{Classification, ClassifyError};
use crate::common::Species;
use crate::image_utils::load_image_from_path;

/// Narrow a full softmax to the classes of one species and pick the best.
///
/// Probabilities are not renormalized over the subset.
pub fn restrict_to_species(
    class_names: &[String],
    probabilities: &[f32],
    species: Species,
) -> Result<Classification, ClassifyError> {
    let prefix = species.label_prefix();

    let species_classes: Vec<(&str, f32)> = class_names
        .iter()
        .zip(probabilities.iter().copied())
        .filter(|(name, _)| name.starts_with(&prefix))
        .map(|(name, p)| (name.as_str(), p))
        .collect();

    let (full_prediction, confidence) = species_classes
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .ok_or(ClassifyError::NoSpeciesClasses(species))?;

    let strip = |name: &str| name.strip_prefix(&prefix).unwrap_or(name).to_string();

    let class_probabilities: BTreeMap<String, f32> = species_classes
        .iter()
        .map(|(name, p)| (strip(name), *p))
        .collect();

    Ok(Classification {
        species,
        prediction: strip(full_prediction),
        full_prediction: full_prediction.to_string(),
        confidence,
        class_probabilities,
    })
}

/// Species-aware wrapper around the loaded network.
#[derive(Clone)]
pub struct SkinClassifier {
    model: Arc<dyn ConditionModel>,
}

impl SkinClassifier {
    pub fn new(model: Arc<dyn ConditionModel>) -> Self {
        Self { model }
    }

    pub fn classify(&self, image: &DynamicImage, species: Species) -> Result<Classification, ClassifyError> {
        let class_names = self.model.class_names();
        if !class_names.iter().any(|name| name.starts_with(&species.label_prefix())) {
            return Err(ClassifyError::NoSpeciesClasses(species));
        }

        let probabilities = self.model.probabilities(image)?;
        let classification = restrict_to_species(class_names, &probabilities, species)?;

        log::info!(
            "Predicted {} for {} with confidence {:.3}",
            classification.full_prediction,
            species,
            classification.confidence
        );
        Ok(classification)
    }

    pub fn classify_path(&self, path: &Path, species: Species) -> Result<Classification, ClassifyError> {
        let image = load_image_from_path(path).map_err(|e| ClassifyError::InvalidImage(e.to_string()))?;
        self.classify(&image, species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use image::RgbImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        class_names: Vec<String>,
        probabilities: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedModel {
        fn new(classes: &[(&str, f32)]) -> Self {
            Self {
                class_names: classes.iter().map(|(name, _)| name.to_string()).collect(),
                probabilities: classes.iter().map(|(_, p)| *p).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ConditionModel for FixedModel {
        fn class_names(&self) -> &[String] {
            &self.class_names
        }

        fn probabilities(&self, _image: &DynamicImage) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probabilities.clone())
        }
    }

    fn image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(32, 32))
    }

    fn mixed_model() -> FixedModel {
        FixedModel::new(&[
            ("cat_fleas", 0.05),
            ("cat_healthy", 0.10),
            ("cat_ringworm", 0.25),
            ("dog_allergies", 0.15),
            ("dog_healthy", 0.40),
            ("dog_ringworm", 0.05),
        ])
    }

    #[test]
    fn test_restrict_picks_best_of_species() {
        let model = mixed_model();
        let result = restrict_to_species(&model.class_names, &model.probabilities, Species::Cat).unwrap();
        assert_eq!(result.prediction, "ringworm");
        assert_eq!(result.full_prediction, "cat_ringworm");
        assert_eq!(result.confidence, 0.25);
        assert_eq!(
            result.class_probabilities.keys().collect::<Vec<_>>(),
            vec!["fleas", "healthy", "ringworm"]
        );
    }

    #[test]
    fn test_subset_probabilities_are_not_renormalized() {
        let model = mixed_model();
        let result = restrict_to_species(&model.class_names, &model.probabilities, Species::Dog).unwrap();
        let sum: f32 = result.class_probabilities.values().sum();
        // a slice of the full softmax, the other species holds the rest
        assert!((sum - 0.60).abs() < 1e-6);
        assert!(sum < 1.0);
    }

    #[test]
    fn test_ties_keep_first_class() {
        let names = vec!["dog_fleas".to_string(), "dog_healthy".to_string()];
        let result = restrict_to_species(&names, &[0.5, 0.5], Species::Dog).unwrap();
        assert_eq!(result.prediction, "fleas");
    }

    #[test]
    fn test_species_without_classes() {
        let model = Arc::new(FixedModel::new(&[("dog_healthy", 1.0)]));
        let classifier = SkinClassifier::new(model.clone());
        let err = classifier.classify(&image(), Species::Cat).unwrap_err();
        assert!(matches!(err, ClassifyError::NoSpeciesClasses(Species::Cat)));
        assert_eq!(err.to_string(), "No classes found for species: cat");
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_classify_runs_model_once() {
        let model = Arc::new(mixed_model());
        let classifier = SkinClassifier::new(model.clone());
        let result = classifier.classify(&image(), Species::Dog).unwrap();
        assert_eq!(result.prediction, "healthy");
        assert_eq!(result.species, Species::Dog);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classify_path_with_bad_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile()?;
        std::io::Write::write_all(&mut file, b"definitely not a jpeg")?;

        let classifier = SkinClassifier::new(Arc::new(mixed_model()));
        let err = classifier.classify_path(file.path(), Species::Dog).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidImage(_)));
        Ok(())
    }
}
