use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StampConfig {
    /// Minimum correlation coefficient for the stamp to count as present.
    pub threshold: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Documents with a longer side above this are downscaled before matching.
    pub max_match_side: u32,
    /// References with a longer side above this are downscaled, together with
    /// the document, before matching.
    pub max_stamp_side: u32,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            threshold: Self::get_default_threshold(),
            canny_low: 50.0,
            canny_high: 200.0,
            max_match_side: Self::get_default_max_match_side(),
            max_stamp_side: Self::get_default_max_stamp_side(),
        }
    }
}

impl StampConfig {
    pub fn new(threshold: Option<f32>, max_match_side: Option<u32>, max_stamp_side: Option<u32>) -> Self {
        Self {
            threshold: threshold.unwrap_or(Self::get_default_threshold()),
            max_match_side: max_match_side.unwrap_or(Self::get_default_max_match_side()),
            max_stamp_side: max_stamp_side.unwrap_or(Self::get_default_max_stamp_side()),
            ..Default::default()
        }
    }

    pub fn get_default_threshold() -> f32 {
        0.05
    }

    pub fn get_default_max_match_side() -> u32 {
        1024
    }

    pub fn get_default_max_stamp_side() -> u32 {
        128
    }
}
