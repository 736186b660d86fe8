// Corpus Loading
// Newline-delimited JSON: one object per line with at least a `text` field.
// Labeled data carries `by` ("Human" or "AI"); pre-annotated data carries an
// `annotation` object from the external NLP pipeline. A malformed line is a
// skipped line with a diagnostic, never a failed batch.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{
    AnnotatedDocument, Authorship, CorefCluster, EntitySpan, LabeledDocument, Sentiment, Token,
};
use crate::services::annotation::DocumentAnnotator;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CorpusLine {
    text: String,
    #[serde(default)]
    by: Option<Authorship>,
    #[serde(default)]
    annotation: Option<Annotation>,
}

/// The annotation payload as the external pipeline serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Annotation {
    #[serde(default)]
    tokens: Vec<Token>,
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(default)]
    entities: Vec<EntitySpan>,
    #[serde(default)]
    coref_clusters: Vec<CorefCluster>,
    #[serde(default)]
    sentiment: Option<Sentiment>,
}

/// Load one JSONL corpus. Lines with no `annotation` fall back to the given
/// annotator; lines that fail to parse or carry empty text are skipped.
pub fn load_corpus(
    path: &Path,
    annotator: &dyn DocumentAnnotator,
) -> Result<Vec<LabeledDocument>, CorpusError> {
    let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = parse_corpus(&content, annotator);
    info!(path = %path.display(), documents = docs.len(), "corpus loaded");
    Ok(docs)
}

/// The line-by-line parse behind [`load_corpus`], separated so it can be fed
/// from memory.
pub fn parse_corpus(content: &str, annotator: &dyn DocumentAnnotator) -> Vec<LabeledDocument> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: CorpusLine = match serde_json::from_str(line) {
            Ok(p) => p,
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping malformed corpus line");
                continue;
            }
        };
        if parsed.text.trim().is_empty() {
            warn!(line = idx + 1, "skipping corpus line with empty text");
            continue;
        }
        let doc = match parsed.annotation {
            Some(a) => AnnotatedDocument {
                text: parsed.text,
                tokens: a.tokens,
                sentences: a.sentences,
                entities: a.entities,
                coref_clusters: a.coref_clusters,
                sentiment: a.sentiment,
            },
            None => annotator.annotate(&parsed.text),
        };
        out.push(LabeledDocument {
            doc,
            author: parsed.by,
        });
    }
    out
}
