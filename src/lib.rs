pub mod models;
pub mod services;

pub use models::{
    AnnotatedDocument, Authorship, CorefCluster, EntitySpan, Label, LabeledDocument, MentionSpan,
    Sentiment, Token, Verdict, Vote,
};
pub use services::detection::{
    aggregate, calibrate, score, CalibrationError, FeatureEngine, FeatureKey, FeatureValue,
    Orientation, Separator,
};

#[cfg(test)]
mod tests {
    use super::*;
    use services::annotation::{DocumentAnnotator, PlainTextAnnotator};
    use services::corpus::parse_corpus;

    // Calibrate on plain-text corpora, then classify: the whole pipeline end
    // to end through the public surface.
    #[test]
    fn test_pipeline_end_to_end() {
        let annotator = PlainTextAnnotator::new();
        // Human lines lean on commas; machine lines avoid them.
        let human = parse_corpus(
            concat!(
                "{\"text\": \"Well, you see, it rained, again.\"}\n",
                "{\"text\": \"Honestly, I waited, and waited.\"}\n",
            ),
            &annotator,
        );
        let machine = parse_corpus(
            concat!(
                "{\"text\": \"It rained. It was wet.\"}\n",
                "{\"text\": \"The event occurred. It concluded.\"}\n",
            ),
            &annotator,
        );
        let human_docs: Vec<_> = human.into_iter().map(|l| l.doc).collect();
        let machine_docs: Vec<_> = machine.into_iter().map(|l| l.doc).collect();

        let engine = FeatureEngine::standard(None);
        let separator = calibrate(&engine, &human_docs, &machine_docs).unwrap();
        assert!(!separator.is_empty());

        let comma_heavy = annotator.annotate("So, yes, we left, late, as always.");
        let votes = score(&engine, &comma_heavy, &separator);
        let verdict = aggregate(&votes);
        assert_eq!(verdict.label, Label::Human);
        assert!(verdict.confidence > 0.0 && verdict.confidence <= 1.0);
    }
}
