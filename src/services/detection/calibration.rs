// Separator Calibration
// Derives a per-feature threshold and orientation from two reference corpora.
// Calibration is a pure function of its inputs: averages accumulate in
// document order, so two runs on identical corpora produce identical floats.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::features::{FeatureEngine, FeatureKey, FeatureValue};
use crate::models::AnnotatedDocument;

/// Which side of the threshold the human corpus sat on during calibration.
/// Observed, never assumed; it can differ per feature and flips whenever the
/// calibration corpora change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    HigherIsHuman,
    HigherIsMachine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSeparator {
    /// Midpoint of the two corpus averages.
    pub threshold: f64,
    pub orientation: Orientation,
}

/// Calibrated thresholds for every usable feature. Built once per run and
/// read-only while scoring.
#[derive(Debug, Clone, Default)]
pub struct Separator {
    thresholds: BTreeMap<FeatureKey, FeatureSeparator>,
}

impl Separator {
    pub fn get(&self, key: &FeatureKey) -> Option<&FeatureSeparator> {
        self.thresholds.get(key)
    }

    /// Features in stable key order.
    pub fn features(&self) -> impl Iterator<Item = (&FeatureKey, &FeatureSeparator)> {
        self.thresholds.iter()
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// No meaningful average exists over zero documents; this is a
    /// configuration error, not a per-document anomaly.
    #[error("cannot calibrate: the {0} corpus is empty")]
    EmptyCorpus(&'static str),
}

/// Derive a separator from a known-human and a known-machine corpus.
///
/// Per feature: average the defined values within each corpus, threshold at
/// the midpoint, and record which corpus averaged higher. Features that never
/// computed for one of the corpora are dropped with a diagnostic rather than
/// half-compared.
pub fn calibrate(
    engine: &FeatureEngine,
    human: &[AnnotatedDocument],
    machine: &[AnnotatedDocument],
) -> Result<Separator, CalibrationError> {
    if human.is_empty() {
        return Err(CalibrationError::EmptyCorpus("human"));
    }
    if machine.is_empty() {
        return Err(CalibrationError::EmptyCorpus("machine"));
    }

    let human_avg = corpus_averages(engine, human);
    let machine_avg = corpus_averages(engine, machine);

    let mut thresholds = BTreeMap::new();
    for (key, h) in &human_avg {
        let Some(m) = machine_avg.get(key) else {
            debug!(feature = %key, "never defined for the machine corpus; dropped");
            continue;
        };
        if h == m {
            warn!(feature = %key, average = *h, "identical corpus averages; no usable orientation, dropped");
            continue;
        }
        let orientation = if h > m {
            Orientation::HigherIsHuman
        } else {
            Orientation::HigherIsMachine
        };
        thresholds.insert(
            key.clone(),
            FeatureSeparator {
                threshold: (h + m) / 2.0,
                orientation,
            },
        );
    }
    for key in machine_avg.keys() {
        if !human_avg.contains_key(key) {
            debug!(feature = %key, "never defined for the human corpus; dropped");
        }
    }

    if thresholds.is_empty() {
        warn!("calibration produced no usable features; every document will score Unsure");
    } else {
        info!(features = thresholds.len(), "calibration complete");
    }
    Ok(Separator { thresholds })
}

/// Per-feature mean of defined values across a corpus. Features that abstain
/// on every document never enter the map. Accumulation is strictly
/// left-to-right over the input slice.
fn corpus_averages(
    engine: &FeatureEngine,
    docs: &[AnnotatedDocument],
) -> BTreeMap<FeatureKey, f64> {
    let mut sums: BTreeMap<FeatureKey, (f64, usize)> = BTreeMap::new();
    for doc in docs {
        for (key, value) in engine.profile(doc) {
            if let FeatureValue::Defined(v) = value {
                let entry = sums.entry(key).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }
    }
    sums.into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}
