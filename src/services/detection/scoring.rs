// Scoring
// Compares one document's feature profile against a calibrated separator and
// casts one vote per feature. Reads only; neither the document nor the
// separator is ever mutated.

use super::calibration::{Orientation, Separator};
use super::features::{FeatureEngine, FeatureValue};
use crate::models::{AnnotatedDocument, Vote};

/// One vote per separator feature, in stable feature-key order.
///
/// Undefined features abstain, as does a feature the document never produced
/// at all (a POS tag unseen in this document). A value landing exactly on the
/// threshold also abstains; neither side of the calibration supports it.
pub fn score(engine: &FeatureEngine, doc: &AnnotatedDocument, separator: &Separator) -> Vec<Vote> {
    let profile = engine.profile(doc);
    separator
        .features()
        .map(|(key, sep)| match profile.get(key) {
            Some(FeatureValue::Defined(v)) => {
                if *v > sep.threshold {
                    match sep.orientation {
                        Orientation::HigherIsHuman => Vote::Human,
                        Orientation::HigherIsMachine => Vote::Ai,
                    }
                } else if *v < sep.threshold {
                    match sep.orientation {
                        Orientation::HigherIsHuman => Vote::Ai,
                        Orientation::HigherIsMachine => Vote::Human,
                    }
                } else {
                    Vote::Abstain
                }
            }
            Some(FeatureValue::Undefined) | None => Vote::Abstain,
        })
        .collect()
}
