// Annotation Adapter
// The injected collaborator that turns raw text into an AnnotatedDocument.
// Full annotation normally arrives precomputed from an external NLP pipeline;
// the built-in plain-text annotator backfills the rest with tokens and
// sentences only, so tag/entity/coreference/sentiment features abstain.

use regex::Regex;

use crate::models::{AnnotatedDocument, Token};

/// External collaborator boundary: anything that can produce an annotated
/// document from raw text. Constructed explicitly and passed in; never a
/// process-wide global.
pub trait DocumentAnnotator: Send + Sync {
    fn annotate(&self, text: &str) -> AnnotatedDocument;
}

/// Normalize punctuation so raw-text counting behaves across sources
/// (smart quotes, em dashes, exotic spaces).
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = text.to_string();

    // Smart quotes and em dash
    s = s
        .replace('\u{201c}', "\"")
        .replace('\u{201d}', "\"")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{2014}', "-");

    // Non-breaking and ideographic spaces
    s = s.replace(['\u{00A0}', '\u{3000}'], " ");

    // Line endings, then collapse horizontal whitespace
    s = s.replace("\r\n", "\n").replace('\r', "\n");
    let ws_re = Regex::new(r"[ \t\x0C\x0B]+").expect("static regex");
    s = ws_re.replace_all(&s, " ").to_string();

    s.lines()
        .map(|ln| ln.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Sentence splitting with quote and decimal-number awareness.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut buffer = String::new();
    let mut in_quote = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        if matches!(ch, '"' | '\u{201c}' | '\u{201d}') {
            in_quote = !in_quote;
        }

        let mut is_sentence_end = false;
        if matches!(ch, '.' | '!' | '?') && !in_quote {
            // A period between two digits is a decimal point, not an ending.
            let decimal = ch == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit();
            if !decimal {
                is_sentence_end = true;
            }
        }

        if is_sentence_end {
            while i + 1 < chars.len() && matches!(chars[i + 1], ' ' | '\t') {
                i += 1;
                buffer.push(chars[i]);
            }
            let sentence = buffer.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            buffer.clear();
        }

        i += 1;
    }

    let remaining = buffer.trim().to_string();
    if !remaining.is_empty() {
        sentences.push(remaining);
    }

    sentences
}

/// Minimal regex-based annotator for corpus lines that carry no precomputed
/// annotation. Produces tokens (lemma = lowercased surface, no POS, no
/// dependency) and sentences; entities, coreference, and sentiment stay
/// empty so the dependent features abstain rather than guess.
pub struct PlainTextAnnotator {
    word_re: Regex,
}

impl PlainTextAnnotator {
    pub fn new() -> Self {
        Self {
            word_re: Regex::new(r"[A-Za-z0-9_']+").expect("static regex"),
        }
    }
}

impl Default for PlainTextAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAnnotator for PlainTextAnnotator {
    fn annotate(&self, text: &str) -> AnnotatedDocument {
        let text = normalize_punctuation(text);
        let tokens = self
            .word_re
            .find_iter(&text)
            .map(|m| Token {
                text: m.as_str().to_string(),
                lemma: m.as_str().to_lowercase(),
                pos: String::new(),
                dep: String::new(),
            })
            .collect();
        let sentences = split_sentences(&text);
        AnnotatedDocument {
            text,
            tokens,
            sentences,
            entities: vec![],
            coref_clusters: vec![],
            sentiment: None,
        }
    }
}
