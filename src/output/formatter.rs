use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::entity::{Entity, EntityScore};
use crate::scoring::ScoreResult;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score compactly: 1.5k, 2.3M, 847, 0.37
pub fn format_score(score: f64) -> String {
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = score.abs();
    let formatted = if magnitude >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}k", score / 1_000.0)
    } else if magnitude >= 100.0 {
        format!("{:.0}", score)
    } else {
        let s = format!("{:.2}", score);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    let trimmed = formatted.replace(".0M", "M").replace(".0k", "k");
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked entities as a table: index, score, name, id.
/// No headers. Index column is right-aligned with a trailing dot, score
/// column is 7 chars wide.
pub fn format_ranked_table(results: &[EntityScore], use_colors: bool) -> String {
    format_ranked_table_with_width(results, use_colors, get_terminal_width())
}

fn format_ranked_table_with_width(
    results: &[EntityScore],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if results.is_empty() {
        return "No candidates found.".to_string();
    }

    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    results
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>width$}", format_score(ranked.score), width = score_width);

            let id = &ranked.entity.id;
            let fixed_width = index_width + 1 + score_width + separator.len() * 2 + id.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&ranked.entity.name, width - fixed_width)
                }
                Some(_) => truncate_name(&ranked.entity.name, 20),
                None => ranked.entity.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    id.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked entities as tab-separated values for scripting
/// Columns: rank, score, id, name (no headers, no colors, full precision)
pub fn format_tsv(results: &[EntityScore]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            format!(
                "{}\t{}\t{}\t{}",
                idx + 1,
                ranked.score,
                ranked.entity.id,
                ranked.entity.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line entity description (for verbose mode)
pub fn format_entity_detail(entity: &Entity, use_colors: bool) -> String {
    let types = if entity.types.is_empty() {
        "-".to_string()
    } else {
        entity.types.join(", ")
    };
    let aliases = if entity.aliases.is_empty() {
        "-".to_string()
    } else {
        entity.aliases.join(", ")
    };
    let name = if use_colors {
        entity.name.bold().to_string()
    } else {
        entity.name.clone()
    };

    let mut out = format!(
        "{} ({})\n  Types: {}\n  Aliases: {}\n  Links: {}",
        name, entity.id, types, aliases, entity.link_count
    );
    if let Some(ref description) = entity.description {
        out.push_str(&format!("\n  Description: {}", description));
    }
    out
}

/// Per-factor explanation of a score, one line per factor
pub fn format_breakdown(result: &ScoreResult) -> String {
    let mut lines = vec![format!("  Base: {}", format_score(result.breakdown.base_score))];
    for factor in &result.breakdown.factors {
        lines.push(format!(
            "  {}: {} -> {} ({})",
            factor.label,
            format_score(factor.before),
            format_score(factor.after),
            factor.description
        ));
    }
    lines.push(format!("  Score: {}", format_score(result.score)));
    lines.join("\n")
}
