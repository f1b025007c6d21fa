use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};

use crate::batch::{Batch, ClassifiedRecord};
use crate::classifier::ClassifierConfig;
use crate::record::StatKey;

pub const REPORT_TITLE: &str = "eSoccer Report";

pub fn render_html(batch: &Batch, config: &ClassifierConfig, generated_at: DateTime<Local>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(REPORT_TITLE));
    html.push_str(
        "<style>table{border-collapse:collapse}td,th{border:1px solid #999;padding:2px 6px}\
         tr.match{background:#d9f7d9}</style>\n</head>\n<body>\n",
    );
    let _ = writeln!(html, "<h1>{}</h1>", escape(REPORT_TITLE));
    let _ = writeln!(
        html,
        "<p>Generated at {}</p>",
        escape(&generated_at.format("%Y-%m-%d %H:%M:%S").to_string())
    );
    let _ = writeln!(
        html,
        "<p>Attack margin &ge; {}, possession margin &ge; {}, {}</p>",
        config.delta_attacks,
        config.delta_possession,
        escape(config.mode_label())
    );

    push_table(&mut html, batch.all().iter());

    html.push_str("<h2>Matches meeting the pattern:</h2>\n");
    if batch.matched_count() == 0 {
        html.push_str("<p>None.</p>\n");
    } else {
        push_table(&mut html, batch.matched());
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn push_table<'a>(html: &mut String, rows: impl Iterator<Item = &'a ClassifiedRecord>) {
    html.push_str("<table>\n<tr><th>Team A</th><th>Team B</th>");
    for key in StatKey::ALL {
        let _ = write!(html, "<th>{}</th>", escape(key.column_label()));
    }
    html.push_str("<th>Pattern</th></tr>\n");

    for row in rows {
        let class = if row.pattern_matched { " class=\"match\"" } else { "" };
        let _ = write!(
            html,
            "<tr{class}><td>{}</td><td>{}</td>",
            escape(&row.record.team_a),
            escape(&row.record.team_b)
        );
        for key in StatKey::ALL {
            let _ = write!(html, "<td>{}</td>", row.record.stat(key));
        }
        let _ = writeln!(
            html,
            "<td>{}</td></tr>",
            if row.pattern_matched { "yes" } else { "no" }
        );
    }
    html.push_str("</table>\n");
}

/// Fixed-width plain text table, one line per record.
pub fn render_text<'a>(rows: impl Iterator<Item = &'a ClassifiedRecord>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<22} {:<22}", "Team A", "Team B");
    for key in StatKey::ALL {
        let _ = write!(out, " {:>7}", key.column_label());
    }
    out.push_str(" Pattern\n");
    for row in rows {
        let _ = write!(
            out,
            "{:<22} {:<22}",
            clip(&row.record.team_a, 22),
            clip(&row.record.team_b, 22)
        );
        for key in StatKey::ALL {
            let _ = write!(out, " {:>7}", row.record.stat(key));
        }
        out.push_str(if row.pattern_matched { " MATCH\n" } else { " -\n" });
    }
    out
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("esoccer_report_{}.html", now.format("%Y%m%d_%H%M%S"))
}

pub fn write_report(dir: &Path, html: &str, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create report dir {}", dir.display()))?;
    let path = dir.join(report_file_name(now));
    let tmp = path.with_extension("html.tmp");
    fs::write(&tmp, html).context("write report")?;
    fs::rename(&tmp, &path).context("swap report")?;
    Ok(path)
}

/// Self-contained link target for the report, usable as a download href.
pub fn data_uri(html: &str) -> String {
    format!("data:text/html;base64,{}", STANDARD.encode(html.as_bytes()))
}

/// Saves the data URI beside the report (`<name>.uri`) so it can be pasted
/// into a browser or an `href` without the html file.
pub fn write_download_link(report_path: &Path, html: &str) -> Result<PathBuf> {
    let path = report_path.with_extension("uri");
    let tmp = path.with_extension("uri.tmp");
    fs::write(&tmp, data_uri(html)).context("write download link")?;
    fs::rename(&tmp, &path).context("swap download link")?;
    Ok(path)
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
