// prosedetect CLI
// Calibrates a separator from a known-human and a known-machine JSONL corpus,
// then classifies every document of an unlabeled corpus and prints verdicts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prosedetect::models::{Authorship, Label, LabeledDocument, Verdict};
use prosedetect::services::annotation::PlainTextAnnotator;
use prosedetect::services::corpus::load_corpus;
use prosedetect::services::detection::{aggregate, calibrate, score, FeatureEngine};
use prosedetect::services::senses::{JsonSenseInventory, SenseInventory};
use prosedetect::Vote;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize logging with a timestamped per-session log file, falling back
/// to console-only when the log directory is not writable.
fn init_logging() {
    let disable_file_log = matches!(
        std::env::var("PROSEDETECT_DISABLE_FILE_LOG").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    );

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if disable_file_log {
        init_console_only_logging(env_filter);
        return;
    }

    let logs_dir = match std::env::var("PROSEDETECT_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("prosedetect_{}.log", timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    cleanup_old_logs(&logs_dir, 30);
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn get_logs_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("prosedetect").join("logs");
    }
    PathBuf::from("logs")
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with("prosedetect_") && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn check_corpus_path(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if !path.exists() {
        bail!("corpus file does not exist: {}", path.display());
    }
    if path.extension().map_or(true, |ext| ext != "jsonl") {
        bail!("corpus file must be .jsonl: {}", path.display());
    }
    Ok(path)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentReport {
    index: usize,
    verdict: Verdict,
    human_votes: usize,
    machine_votes: usize,
    abstentions: usize,
    by: Option<Authorship>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport {
    run_id: String,
    human_corpus: String,
    machine_corpus: String,
    unknown_corpus: String,
    calibrated_features: usize,
    documents: Vec<DocumentReport>,
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage:\n  prosedetect <human.jsonl> <machine.jsonl> <unknown.jsonl> [--senses <senses.json>] [--out <report.json>] [--limit <n>]\n\nNotes:\n  - Corpus lines are JSON objects with a `text` field; labeled lines add `by` (\"Human\"/\"AI\"),\n    pre-annotated lines add an `annotation` object.\n  - Without --senses the verb-sense feature is disabled; everything else still votes."
        );
        return Ok(());
    }

    let human_path = check_corpus_path(&args[1])?;
    let machine_path = check_corpus_path(&args[2])?;
    let unknown_path = check_corpus_path(&args[3])?;
    let senses_path = parse_arg_value(&args, "--senses");
    let out_path = parse_arg_value(&args, "--out");
    let limit: Option<usize> = parse_arg_value(&args, "--limit").and_then(|s| s.parse().ok());

    let annotator = PlainTextAnnotator::new();
    let human = load_corpus(&human_path, &annotator)?;
    let machine = load_corpus(&machine_path, &annotator)?;
    let mut unknown = load_corpus(&unknown_path, &annotator)?;
    if let Some(n) = limit {
        unknown.truncate(n);
    }

    let senses: Option<Arc<dyn SenseInventory>> = match senses_path {
        Some(p) => Some(Arc::new(
            JsonSenseInventory::from_file(Path::new(&p))
                .with_context(|| format!("loading sense inventory {}", p))?,
        )),
        None => None,
    };

    let engine = FeatureEngine::standard(senses);
    let human_docs: Vec<_> = human.into_iter().map(|l| l.doc).collect();
    let machine_docs: Vec<_> = machine.into_iter().map(|l| l.doc).collect();
    let separator = calibrate(&engine, &human_docs, &machine_docs)?;

    println!(
        "Calibrated {} features from {} human / {} machine documents",
        separator.len(),
        human_docs.len(),
        machine_docs.len()
    );
    println!();

    let mut reports = Vec::with_capacity(unknown.len());
    let mut label_counts = [0usize; 3];
    let mut labeled = 0usize;
    let mut agreed = 0usize;

    for (index, LabeledDocument { doc, author }) in unknown.iter().enumerate() {
        let votes = score(&engine, doc, &separator);
        let verdict = aggregate(&votes);

        let human_votes = votes.iter().filter(|v| **v == Vote::Human).count();
        let machine_votes = votes.iter().filter(|v| **v == Vote::Ai).count();
        let abstentions = votes.len() - human_votes - machine_votes;

        match verdict.label {
            Label::Human => label_counts[0] += 1,
            Label::Ai => label_counts[1] += 1,
            Label::Unsure => label_counts[2] += 1,
        }
        if let Some(author) = *author {
            labeled += 1;
            let matches = matches!(
                (verdict.label, author),
                (Label::Human, Authorship::Human) | (Label::Ai, Authorship::Ai)
            );
            if matches {
                agreed += 1;
            }
        }

        let by = (*author)
            .map(|a| match a {
                Authorship::Human => " by=Human",
                Authorship::Ai => " by=AI",
            })
            .unwrap_or("");
        println!(
            "[{:04}] {} confidence={:.2} votes(H/M/abstain)={}/{}/{}{}",
            index, verdict.label, verdict.confidence, human_votes, machine_votes, abstentions, by
        );

        reports.push(DocumentReport {
            index,
            verdict,
            human_votes,
            machine_votes,
            abstentions,
            by: *author,
        });
    }

    println!();
    println!(
        "Summary: {} documents — Human {}, AI {}, Unsure {}",
        unknown.len(),
        label_counts[0],
        label_counts[1],
        label_counts[2]
    );
    if labeled > 0 {
        println!(
            "Agreement with `by` labels: {}/{} ({:.0}%)",
            agreed,
            labeled,
            100.0 * agreed as f64 / labeled as f64
        );
    }

    if let Some(out_path) = out_path {
        let report = RunReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            human_corpus: human_path.display().to_string(),
            machine_corpus: machine_path.display().to_string(),
            unknown_corpus: unknown_path.display().to_string(),
            calibrated_features: separator.len(),
            documents: reports,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&out_path, json).with_context(|| format!("writing report {}", out_path))?;
        println!();
        println!("Wrote JSON report: {}", out_path);
    }

    Ok(())
}
