// Data Models
// Annotated documents as produced by the external NLP pipeline, plus the
// classification outcome types (votes and verdicts).

use serde::{Deserialize, Serialize};

// ============ Annotation ============

/// One token of an annotated document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    /// Part-of-speech tag; empty when the annotation source provides none.
    #[serde(default)]
    pub pos: String,
    /// Dependency label; empty when the annotation source provides none.
    #[serde(default)]
    pub dep: String,
}

impl Token {
    /// Verb check covering both universal POS ("VERB") and Penn Treebank
    /// ("VB", "VBD", ...) tag conventions.
    pub fn is_verb(&self) -> bool {
        self.pos == "VERB" || self.pos.starts_with("VB")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionSpan {
    /// Character offset (0-based) into the document text.
    pub start: usize,
    /// Character offset (0-based, end-exclusive) into the document text.
    pub end: usize,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorefCluster {
    pub mentions: Vec<MentionSpan>,
}

/// Document-level sentiment reading.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Sentiment {
    /// Polarity in [-1, 1].
    pub polarity: f64,
    /// Subjectivity in [0, 1].
    pub subjectivity: f64,
}

/// A fully annotated input text. Created once by the annotation adapter and
/// read-only thereafter; the classification core only ever borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDocument {
    pub text: String,
    pub tokens: Vec<Token>,
    pub sentences: Vec<String>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
    #[serde(default)]
    pub coref_clusters: Vec<CorefCluster>,
    /// Absent when the annotation source computes no sentiment; the
    /// sentiment features abstain in that case.
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

// ============ Corpus ============

/// True authorship of a labeled corpus line (`by` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authorship {
    Human,
    #[serde(rename = "AI")]
    Ai,
}

/// One corpus document together with its label, when known.
#[derive(Debug, Clone)]
pub struct LabeledDocument {
    pub doc: AnnotatedDocument,
    pub author: Option<Authorship>,
}

// ============ Classification Outcome ============

/// One feature's verdict on one document. Abstain means the feature could
/// not be computed (zero denominator or missing annotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Human,
    #[serde(rename = "AI")]
    Ai,
    Abstain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Human,
    #[serde(rename = "AI")]
    Ai,
    Unsure,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Human => write!(f, "Human"),
            Label::Ai => write!(f, "AI"),
            Label::Unsure => write!(f, "Unsure"),
        }
    }
}

/// Aggregated classification for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub label: Label,
    /// Votes for the winning label divided by non-abstaining votes; 0 when
    /// every feature abstained.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_verb_covers_both_tagsets() {
        let universal = Token {
            text: "runs".to_string(),
            lemma: "run".to_string(),
            pos: "VERB".to_string(),
            dep: "ROOT".to_string(),
        };
        let treebank = Token {
            text: "ran".to_string(),
            lemma: "run".to_string(),
            pos: "VBD".to_string(),
            dep: "ROOT".to_string(),
        };
        let noun = Token {
            text: "run".to_string(),
            lemma: "run".to_string(),
            pos: "NOUN".to_string(),
            dep: "nsubj".to_string(),
        };
        assert!(universal.is_verb());
        assert!(treebank.is_verb());
        assert!(!noun.is_verb());
    }

    #[test]
    fn test_document_deserializes_camel_case() {
        let json = r#"{
            "text": "He ran.",
            "tokens": [{"text": "He", "lemma": "he", "pos": "PRON", "dep": "nsubj"}],
            "sentences": ["He ran."],
            "entities": [],
            "corefClusters": [{"mentions": [{"start": 0, "end": 2, "text": "He"}]}],
            "sentiment": {"polarity": 0.1, "subjectivity": 0.2}
        }"#;
        let doc: AnnotatedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.coref_clusters.len(), 1);
        assert_eq!(doc.coref_clusters[0].mentions[0].text, "He");
        assert!(doc.sentiment.is_some());
    }

    #[test]
    fn test_authorship_label_spelling() {
        let ai: Authorship = serde_json::from_str("\"AI\"").unwrap();
        assert_eq!(ai, Authorship::Ai);
        assert_eq!(serde_json::to_string(&Label::Ai).unwrap(), "\"AI\"");
    }
}
