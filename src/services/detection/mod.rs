// Detection Module
// The classification core, organized into specialized submodules:
// - features: feature-ratio engine (numerator/denominator per feature)
// - calibration: per-feature separator thresholds from two reference corpora
// - scoring: per-feature votes for one document against a separator
// - aggregation: majority voting over the per-feature votes

pub mod aggregation;
pub mod calibration;
pub mod features;
pub mod scoring;

// Re-export commonly used items
pub use aggregation::aggregate;
pub use calibration::{calibrate, CalibrationError, FeatureSeparator, Orientation, Separator};
pub use features::{
    CommaPointRatio, CorefDensity, EntityDensity, FeatureEngine, FeatureExtractor, FeatureKey,
    FeatureProfile, FeatureValue, LexicalDiversity, PosTag, PosTagRatios, Ratio, SentimentSignal,
    VerbSenseAmbiguity,
};
pub use scoring::score;
