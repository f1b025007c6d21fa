use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use esoccer_terminal::batch::classify_batch;
use esoccer_terminal::config::AppConfig;
use esoccer_terminal::logging;
use esoccer_terminal::normalize::Normalized;
use esoccer_terminal::record::MatchRecord;
use esoccer_terminal::report;
use esoccer_terminal::source::{Source, fetch_tick, run_tick};

fn main() -> Result<()> {
    logging::init_stderr();
    let config = AppConfig::from_env()?;
    let outcome = match parse_value_arg("--from") {
        // Offline snapshot: a json array of records, classified without any fetch.
        Some(path) => run_tick(|| {
            let raw = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            let records: Vec<MatchRecord> =
                serde_json::from_str(&raw).context("invalid records json")?;
            Ok(Normalized {
                records,
                skipped: Vec::new(),
            })
        }),
        None => fetch_tick(&Source::from_config(&config)?),
    };
    if let Some(warning) = outcome.warning.as_ref() {
        eprintln!("warning: {warning}");
    }
    let batch = classify_batch(&outcome.normalized.records, &config.classifier);

    if has_flag("--json") {
        println!("{}", serde_json::to_string_pretty(batch.all())?);
        return Ok(());
    }

    println!(
        "{} | {} | {}",
        config.source.label(),
        outcome.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        outcome.normalized.summary()
    );
    if batch.is_empty() {
        println!("No matches available right now.");
    } else {
        if !has_flag("--matched-only") {
            println!();
            print!("{}", report::render_text(batch.all().iter()));
        }
        println!();
        println!("Matches meeting the pattern: {}", batch.matched_count());
        if batch.matched_count() > 0 {
            print!("{}", report::render_text(batch.matched()));
        }
    }
    for skipped in &outcome.normalized.skipped {
        eprintln!("skipped row {}: {}", skipped.index, skipped.reason);
    }

    if let Some(dir) = parse_report_arg(&config.report_dir) {
        let now = Local::now();
        let html = report::render_html(&batch, &config.classifier, now);
        let path = report::write_report(&dir, &html, now)?;
        println!("Report: {}", path.display());
        let link = report::write_download_link(&path, &html)?;
        println!("Download link: {}", link.display());
    }

    Ok(())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_value_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}

fn parse_report_arg(default_dir: &Path) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for arg in &args {
        if let Some(path) = arg.strip_prefix("--report=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--report" {
            return Some(default_dir.to_path_buf());
        }
    }
    None
}
