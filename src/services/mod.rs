// Core Services

pub mod annotation;
pub mod corpus;
pub mod detection;
pub mod senses;

pub use annotation::{normalize_punctuation, split_sentences, DocumentAnnotator, PlainTextAnnotator};
pub use corpus::{load_corpus, parse_corpus, CorpusError};
pub use senses::{JsonSenseInventory, SenseError, SenseInventory};

// Re-export the detection pipeline
pub use detection::{
    aggregate, calibrate, score, CalibrationError, FeatureEngine, FeatureKey, Separator,
};
