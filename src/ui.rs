//! Terminal output for the `bigram` binary

use crate::bigram::BigramRow;
use crate::ingest::IngestReport;
use crate::storage::StoreStats;
use owo_colors::{OwoColorize, Style};
use std::path::Path;
use std::sync::OnceLock;
use tabled::{settings::Style as TableStyle, Table, Tabled};

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
}

impl Theme {
    /// Colors only when stdout is a terminal
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const FILE: &str = "📄";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const DEL: &str = "🗑️";
}

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

/// One line per ingested document
pub fn file_ingested(path: &Path, report: &IngestReport) {
    println!(
        "{} {} {}",
        Icons::FILE,
        path.display(),
        format!("({} tokens, {} bigrams)", report.tokens, report.bigrams).style(theme().dim.clone())
    );
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn stats_table(stats: &StoreStats) -> String {
    let rows = [
        MetricRow { metric: "Words", value: stats.words.to_string() },
        MetricRow { metric: "Bigrams", value: stats.bigrams.to_string() },
        MetricRow { metric: "Observations", value: stats.observations.to_string() },
    ];
    Table::new(rows).with(TableStyle::rounded()).to_string()
}

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "First")]
    first: String,
    #[tabled(rename = "Second")]
    second: String,
    #[tabled(rename = "Count")]
    count: u64,
}

pub fn bigram_table(rows: &[BigramRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let rows: Vec<PairRow> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| PairRow {
            rank: i + 1,
            first: row.first.clone(),
            second: row.second.clone(),
            count: row.count,
        })
        .collect();
    Table::new(rows).with(TableStyle::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table_lists_metrics() {
        let table = stats_table(&StoreStats { words: 3, bigrams: 2, observations: 7 });
        assert!(table.contains("Words"));
        assert!(table.contains("Observations"));
        assert!(table.contains('7'));
    }

    #[test]
    fn test_bigram_table() {
        assert!(bigram_table(&[]).is_empty());

        let table = bigram_table(&[BigramRow {
            first_id: 1,
            second_id: 2,
            first: "the".into(),
            second: "cat".into(),
            count: 12,
        }]);
        assert!(table.contains("the"));
        assert!(table.contains("cat"));
        assert!(table.contains("12"));
    }
}
