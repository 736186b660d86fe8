// Feature-Ratio Engine
// Every feature reduces one document to a numerator/denominator pair. A zero
// denominator makes the feature undefined for that document, which downstream
// turns into an Abstain vote rather than an error or a silent 0.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::models::AnnotatedDocument;
use crate::services::senses::SenseInventory;

/// Validated part-of-speech tag used to key per-tag frequency features.
/// Rejects the open-ended strings the raw annotation may carry so a typo in
/// the input cannot silently create a phantom feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PosTag(String);

impl PosTag {
    /// Accepts Penn Treebank and universal tags ("NN", "VBD", "PRP$",
    /// "-LRB-", "NOUN", ...). Returns None for anything else.
    pub fn new(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag.len() > 8 {
            return None;
        }
        let valid = tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '$' | '-' | '.' | ',' | ':'));
        if !valid {
            return None;
        }
        Some(Self(tag.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of one feature ratio. A closed set rather than free-form strings;
/// the only open dimension is the validated POS tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKey {
    /// count(',') / count('.') over the raw text.
    CommaPoint,
    /// token count / unique lemma count.
    TokenLemma,
    /// token count / unique surface form count.
    TokenType,
    /// named entity count / sentence count.
    EntitiesPerSentence,
    /// total coreference mentions / cluster count.
    MentionsPerCluster,
    /// summed dictionary sense counts over verb lemmas / verb token count.
    SensesPerVerb,
    /// sentiment polarity, when the annotation carries a reading.
    Polarity,
    /// sentiment subjectivity, when the annotation carries a reading.
    Subjectivity,
    /// frequency of one POS tag / token count.
    PosFrequency(PosTag),
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::CommaPoint => write!(f, "comma_point"),
            FeatureKey::TokenLemma => write!(f, "token_lemma"),
            FeatureKey::TokenType => write!(f, "token_type"),
            FeatureKey::EntitiesPerSentence => write!(f, "ne_per_sentence"),
            FeatureKey::MentionsPerCluster => write!(f, "mentions_per_cluster"),
            FeatureKey::SensesPerVerb => write!(f, "synsets_per_verb"),
            FeatureKey::Polarity => write!(f, "polarity"),
            FeatureKey::Subjectivity => write!(f, "subjectivity"),
            FeatureKey::PosFrequency(tag) => write!(f, "pos_{}", tag.as_str()),
        }
    }
}

/// Raw counts behind one feature value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    pub numerator: f64,
    pub denominator: f64,
}

impl Ratio {
    pub fn new(numerator: f64, denominator: f64) -> Self {
        Self { numerator, denominator }
    }

    /// The ratio that never computed (missing annotation counts as a zero
    /// denominator).
    pub fn undefined() -> Self {
        Self { numerator: 0.0, denominator: 0.0 }
    }

    pub fn value(&self) -> FeatureValue {
        if self.denominator == 0.0 {
            FeatureValue::Undefined
        } else {
            FeatureValue::Defined(self.numerator / self.denominator)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Defined(f64),
    /// Zero denominator; the feature is inapplicable to this document.
    Undefined,
}

impl FeatureValue {
    pub fn defined(&self) -> Option<f64> {
        match self {
            FeatureValue::Defined(v) => Some(*v),
            FeatureValue::Undefined => None,
        }
    }
}

/// Every feature value computed for one document, in stable key order.
pub type FeatureProfile = BTreeMap<FeatureKey, FeatureValue>;

/// A pluggable feature family. Most extractors yield one ratio; the POS
/// frequency extractor yields one per tag observed in the document.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)>;
}

// ============ Feature families ============

/// Comma-to-period ratio over the raw text (morphological heuristic).
pub struct CommaPointRatio;

impl FeatureExtractor for CommaPointRatio {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        let commas = doc.text.chars().filter(|c| *c == ',').count();
        let points = doc.text.chars().filter(|c| *c == '.').count();
        vec![(
            FeatureKey::CommaPoint,
            Ratio::new(commas as f64, points as f64),
        )]
    }
}

/// Token-to-unique-lemma and token-to-unique-surface-form ratios.
pub struct LexicalDiversity;

impl FeatureExtractor for LexicalDiversity {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        let total = doc.tokens.len() as f64;
        let lemmas: HashSet<&str> = doc.tokens.iter().map(|t| t.lemma.as_str()).collect();
        let surfaces: HashSet<&str> = doc.tokens.iter().map(|t| t.text.as_str()).collect();
        vec![
            (FeatureKey::TokenLemma, Ratio::new(total, lemmas.len() as f64)),
            (FeatureKey::TokenType, Ratio::new(total, surfaces.len() as f64)),
        ]
    }
}

/// Named entities per sentence.
pub struct EntityDensity;

impl FeatureExtractor for EntityDensity {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        vec![(
            FeatureKey::EntitiesPerSentence,
            Ratio::new(doc.entities.len() as f64, doc.sentences.len() as f64),
        )]
    }
}

/// Coreference mentions per cluster (semantic heuristic).
pub struct CorefDensity;

impl FeatureExtractor for CorefDensity {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        let mentions: usize = doc.coref_clusters.iter().map(|c| c.mentions.len()).sum();
        vec![(
            FeatureKey::MentionsPerCluster,
            Ratio::new(mentions as f64, doc.coref_clusters.len() as f64),
        )]
    }
}

/// Average dictionary sense count per verb. Needs an external sense
/// inventory; the engine leaves this family out entirely when none is
/// configured.
pub struct VerbSenseAmbiguity {
    senses: Arc<dyn SenseInventory>,
}

impl VerbSenseAmbiguity {
    pub fn new(senses: Arc<dyn SenseInventory>) -> Self {
        Self { senses }
    }
}

impl FeatureExtractor for VerbSenseAmbiguity {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        let mut verb_count = 0usize;
        let mut sense_sum = 0usize;
        for token in doc.tokens.iter().filter(|t| t.is_verb()) {
            verb_count += 1;
            sense_sum += self.senses.sense_count(&token.lemma);
        }
        vec![(
            FeatureKey::SensesPerVerb,
            Ratio::new(sense_sum as f64, verb_count as f64),
        )]
    }
}

/// Polarity and subjectivity as degenerate ratios over denominator 1, so the
/// sentiment reading calibrates and votes like any counted feature. Abstains
/// when the annotation carries no sentiment.
pub struct SentimentSignal;

impl FeatureExtractor for SentimentSignal {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        match doc.sentiment {
            Some(s) => vec![
                (FeatureKey::Polarity, Ratio::new(s.polarity, 1.0)),
                (FeatureKey::Subjectivity, Ratio::new(s.subjectivity, 1.0)),
            ],
            None => vec![
                (FeatureKey::Polarity, Ratio::undefined()),
                (FeatureKey::Subjectivity, Ratio::undefined()),
            ],
        }
    }
}

/// Per-tag frequency ratios (syntactic heuristic). Emits one feature per tag
/// observed in the document; tags that fail validation are ignored.
pub struct PosTagRatios;

impl FeatureExtractor for PosTagRatios {
    fn extract(&self, doc: &AnnotatedDocument) -> Vec<(FeatureKey, Ratio)> {
        let total = doc.tokens.len() as f64;
        let mut counts: BTreeMap<PosTag, usize> = BTreeMap::new();
        for token in &doc.tokens {
            if let Some(tag) = PosTag::new(&token.pos) {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(tag, n)| (FeatureKey::PosFrequency(tag), Ratio::new(n as f64, total)))
            .collect()
    }
}

// ============ Engine ============

/// Runs every configured extractor over a document and collects the results
/// into one deterministic profile.
pub struct FeatureEngine {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl FeatureEngine {
    /// The full standard feature set. Passing no sense inventory disables
    /// only the verb-sense family; everything else is unaffected.
    pub fn standard(senses: Option<Arc<dyn SenseInventory>>) -> Self {
        let mut extractors: Vec<Box<dyn FeatureExtractor>> = vec![
            Box::new(CommaPointRatio),
            Box::new(LexicalDiversity),
            Box::new(EntityDensity),
            Box::new(CorefDensity),
            Box::new(SentimentSignal),
            Box::new(PosTagRatios),
        ];
        match senses {
            Some(inventory) => extractors.push(Box::new(VerbSenseAmbiguity::new(inventory))),
            None => warn!("no word-sense inventory configured; synsets_per_verb disabled"),
        }
        Self { extractors }
    }

    /// An engine with no extractors, for callers assembling a custom set.
    pub fn empty() -> Self {
        Self { extractors: Vec::new() }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Compute every feature value for one document. Total for any document;
    /// inapplicable features come back Undefined, never as errors.
    pub fn profile(&self, doc: &AnnotatedDocument) -> FeatureProfile {
        let mut profile = FeatureProfile::new();
        for extractor in &self.extractors {
            for (key, ratio) in extractor.extract(doc) {
                profile.insert(key, ratio.value());
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorefCluster, EntitySpan, MentionSpan, Sentiment, Token};

    fn token(text: &str, lemma: &str, pos: &str) -> Token {
        Token {
            text: text.to_string(),
            lemma: lemma.to_string(),
            pos: pos.to_string(),
            dep: String::new(),
        }
    }

    fn bare_doc(text: &str) -> AnnotatedDocument {
        AnnotatedDocument {
            text: text.to_string(),
            tokens: vec![],
            sentences: vec![],
            entities: vec![],
            coref_clusters: vec![],
            sentiment: None,
        }
    }

    #[test]
    fn test_comma_point_ratio() {
        let doc = bare_doc("a, b, c.");
        let out = CommaPointRatio.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(2.0));
    }

    #[test]
    fn test_comma_point_abstains_without_points() {
        let doc = bare_doc("a, b, c");
        let out = CommaPointRatio.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Undefined);
    }

    #[test]
    fn test_lexical_diversity() {
        let mut doc = bare_doc("the cat saw the cats");
        doc.tokens = vec![
            token("the", "the", "DT"),
            token("cat", "cat", "NN"),
            token("saw", "see", "VBD"),
            token("the", "the", "DT"),
            token("cats", "cat", "NNS"),
        ];
        let out = LexicalDiversity.extract(&doc);
        // 5 tokens, 3 unique lemmas, 4 unique surface forms.
        assert_eq!(out[0].0, FeatureKey::TokenLemma);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(5.0 / 3.0));
        assert_eq!(out[1].0, FeatureKey::TokenType);
        assert_eq!(out[1].1.value(), FeatureValue::Defined(5.0 / 4.0));
    }

    #[test]
    fn test_lexical_diversity_undefined_for_empty_doc() {
        let doc = bare_doc("");
        for (_, ratio) in LexicalDiversity.extract(&doc) {
            assert_eq!(ratio.value(), FeatureValue::Undefined);
        }
    }

    #[test]
    fn test_entity_density_needs_sentences() {
        let mut doc = bare_doc("Paris");
        doc.entities = vec![EntitySpan {
            text: "Paris".to_string(),
            label: "GPE".to_string(),
        }];
        let out = EntityDensity.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Undefined);

        doc.sentences = vec!["Paris.".to_string(), "More.".to_string()];
        let out = EntityDensity.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(0.5));
    }

    #[test]
    fn test_coref_density() {
        let mut doc = bare_doc("He said he left.");
        doc.coref_clusters = vec![CorefCluster {
            mentions: vec![
                MentionSpan { start: 0, end: 2, text: "He".to_string() },
                MentionSpan { start: 8, end: 10, text: "he".to_string() },
            ],
        }];
        let out = CorefDensity.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(2.0));
    }

    #[test]
    fn test_coref_density_abstains_without_clusters() {
        let doc = bare_doc("Nothing here.");
        let out = CorefDensity.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Undefined);
    }

    struct FixedSenses;

    impl SenseInventory for FixedSenses {
        fn sense_count(&self, lemma: &str) -> usize {
            match lemma {
                "run" => 41,
                "see" => 25,
                _ => 0,
            }
        }
    }

    #[test]
    fn test_verb_sense_ambiguity() {
        let mut doc = bare_doc("She ran and saw.");
        doc.tokens = vec![
            token("She", "she", "PRP"),
            token("ran", "run", "VBD"),
            token("saw", "see", "VBD"),
        ];
        let extractor = VerbSenseAmbiguity::new(Arc::new(FixedSenses));
        let out = extractor.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(33.0));
    }

    #[test]
    fn test_verb_sense_abstains_without_verbs() {
        let mut doc = bare_doc("The cat.");
        doc.tokens = vec![token("The", "the", "DT"), token("cat", "cat", "NN")];
        let extractor = VerbSenseAmbiguity::new(Arc::new(FixedSenses));
        let out = extractor.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Undefined);
    }

    #[test]
    fn test_sentiment_signal() {
        let mut doc = bare_doc("Lovely.");
        doc.sentiment = Some(Sentiment { polarity: 0.8, subjectivity: 0.9 });
        let out = SentimentSignal.extract(&doc);
        assert_eq!(out[0].1.value(), FeatureValue::Defined(0.8));
        assert_eq!(out[1].1.value(), FeatureValue::Defined(0.9));

        let out = SentimentSignal.extract(&bare_doc("x"));
        assert_eq!(out[0].1.value(), FeatureValue::Undefined);
        assert_eq!(out[1].1.value(), FeatureValue::Undefined);
    }

    #[test]
    fn test_pos_tag_ratios_one_feature_per_tag() {
        let mut doc = bare_doc("The cat sat");
        doc.tokens = vec![
            token("The", "the", "DT"),
            token("cat", "cat", "NN"),
            token("sat", "sit", "VBD"),
            token("mat", "mat", "NN"),
        ];
        let out = PosTagRatios.extract(&doc);
        assert_eq!(out.len(), 3);
        let nn = out
            .iter()
            .find(|(k, _)| matches!(k, FeatureKey::PosFrequency(t) if t.as_str() == "NN"))
            .unwrap();
        assert_eq!(nn.1.value(), FeatureValue::Defined(0.5));
    }

    #[test]
    fn test_pos_tag_validation_rejects_junk() {
        assert!(PosTag::new("NN").is_some());
        assert!(PosTag::new("PRP$").is_some());
        assert!(PosTag::new("-LRB-").is_some());
        assert!(PosTag::new("").is_none());
        assert!(PosTag::new("not a tag").is_none());
        assert!(PosTag::new("WAYTOOLONG").is_none());
    }

    #[test]
    fn test_engine_profile_merges_all_families() {
        let mut doc = bare_doc("The cat sat, then slept.");
        doc.tokens = vec![
            token("The", "the", "DT"),
            token("cat", "cat", "NN"),
            token("sat", "sit", "VBD"),
        ];
        doc.sentences = vec!["The cat sat, then slept.".to_string()];
        let engine = FeatureEngine::standard(None);
        let profile = engine.profile(&doc);
        assert_eq!(
            profile.get(&FeatureKey::CommaPoint),
            Some(&FeatureValue::Defined(1.0))
        );
        // No sense inventory: the family is absent, not Undefined.
        assert!(!profile.contains_key(&FeatureKey::SensesPerVerb));
        // No clusters: present but Undefined.
        assert_eq!(
            profile.get(&FeatureKey::MentionsPerCluster),
            Some(&FeatureValue::Undefined)
        );
    }
}
