// Aggregation
// Tallies per-feature votes into one verdict. Plain equal-weight majority:
// no per-feature multipliers, no learning, no cross-document state.

use crate::models::{Label, Verdict, Vote};

/// Majority rule over the non-abstaining votes.
///
/// A strict tie is Unsure with confidence winner/total (0.5 for one vote each
/// way); all-abstain is Unsure with confidence exactly 0. Order of the input
/// never affects the result.
pub fn aggregate(votes: &[Vote]) -> Verdict {
    let mut human = 0usize;
    let mut machine = 0usize;
    for vote in votes {
        match vote {
            Vote::Human => human += 1,
            Vote::Ai => machine += 1,
            Vote::Abstain => {}
        }
    }

    let total = human + machine;
    if total == 0 {
        return Verdict {
            label: Label::Unsure,
            confidence: 0.0,
        };
    }

    let (label, winning) = if human > machine {
        (Label::Human, human)
    } else if machine > human {
        (Label::Ai, machine)
    } else {
        (Label::Unsure, human)
    };

    Verdict {
        label,
        confidence: winning as f64 / total as f64,
    }
}
