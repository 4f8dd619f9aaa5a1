// Colored terminal output for search results, generated names and
// n-gram analysis.
//
// This module handles all terminal-specific formatting: colors, tables,
// bar charts. The main.rs command handlers delegate here.

use colored::Colorize;

use crate::db::models::SearchHit;
use crate::names::GeneratedName;
use crate::vectorize::analyzer::{
    CharacterAnalysis, CharacterAnalyzer, MatrixKind, MatrixStats, TermComparison,
};
use crate::vectorize::similarity::top_indices;
use crate::vectorize::VectorizeResult;

const BAR_WIDTH: usize = 30;
/// Names shown in full in the generate report; the next ten are listed briefly.
const FEATURED_NAMES: usize = 5;
const HONORABLE_MENTIONS: usize = 10;
/// Shown for an empty hit list, whether the store is empty or the filter excluded everything.
const NO_MATCHES: &str = "No matching characters.";

fn banner(title: &str) {
    println!("\n{}", "=".repeat(80).dimmed());
    println!("{}", title.bold());
    println!("{}", "=".repeat(80).dimmed());
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), " ".repeat(BAR_WIDTH.saturating_sub(filled)))
}

/// Display store search hits.
pub fn display_search_hits(query: &str, hits: &[SearchHit]) {
    banner(&format!("SEARCHING FOR: '{}'", query));
    if hits.is_empty() {
        println!("{}", NO_MATCHES);
        return;
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "\n{}. [{}] {}",
            i + 1,
            hit.category.as_str().to_uppercase().cyan(),
            hit.name.bold()
        );
        println!("   {}", super::truncate_chars(&hit.description, 150).dimmed());
        println!("   Similarity: {:.3}", hit.similarity);
    }
    println!();
}

/// Display ranked blend names: the first few in detail, then a short list.
pub fn display_generated_names(query: Option<&str>, names: &[GeneratedName]) {
    match query {
        Some(q) => banner(&format!("TOP BLENDED NAMES FOR: '{}'", q)),
        None => banner("TOP UNIQUE BLENDED NAMES"),
    }

    if names.is_empty() {
        println!("No pronounceable blends found. Try a larger --samples value.");
        return;
    }

    for (i, name) in names.iter().take(FEATURED_NAMES).enumerate() {
        let marker = if name.query_match {
            " ★ QUERY MATCH".yellow().to_string()
        } else {
            String::new()
        };
        println!("\n{}. {}{}", i + 1, name.name.bold().bright_green(), marker);
        println!(
            "   └─ Blend of: {} (mythology) + {} (robot)",
            name.source_myth, name.source_robot
        );
        println!("   └─ Creativity Score: {:.1}", name.creativity_score);
        if !name.semantic_matches.is_empty() {
            println!("   └─ Semantically similar to:");
            for (j, m) in name.semantic_matches.iter().enumerate() {
                println!(
                    "      {}. [{}] {} (similarity: {:.3})",
                    j + 1,
                    m.category.as_str().to_uppercase(),
                    m.name,
                    m.similarity
                );
            }
        }
    }

    let rest: Vec<&GeneratedName> = names
        .iter()
        .skip(FEATURED_NAMES)
        .take(HONORABLE_MENTIONS)
        .collect();
    if !rest.is_empty() {
        banner(&format!(
            "HONORABLE MENTIONS (Names {}-{})",
            FEATURED_NAMES + 1,
            FEATURED_NAMES + rest.len()
        ));
        for (i, name) in rest.iter().enumerate() {
            let marker = if name.query_match { " ★" } else { "" };
            println!(
                "{}. {}{} - from {} + {}",
                FEATURED_NAMES + i + 1,
                name.name,
                marker,
                name.source_myth,
                name.source_robot
            );
        }
    }
    println!();
}

/// Horizontal bar chart of (term, value) pairs, largest first.
pub fn display_term_chart(title: &str, terms: &[(String, f64)]) {
    banner(title);
    if terms.is_empty() {
        println!("  (no terms met the document-frequency threshold)");
        return;
    }
    let max = terms.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let width = terms.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0);
    for (i, (term, value)) in terms.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {} {}",
            i + 1,
            term,
            bar(*value, max).bright_blue(),
            format_value(*value),
            width = width
        );
    }
}

/// Count totals print as integers, weights with four decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{:.4}", value)
    }
}

/// Table of the first `rows` characters against the heaviest `cols` terms.
pub fn display_matrix_table(
    analyzer: &CharacterAnalyzer,
    kind: MatrixKind,
    rows: usize,
    cols: usize,
) -> VectorizeResult<()> {
    let vocabulary = analyzer.vocabulary(kind)?;
    let totals: Vec<f64> = {
        let mut sums = vec![0.0; vocabulary.len()];
        for i in 0..analyzer.characters().len() {
            for (c, v) in analyzer.dense_row(kind, i)?.into_iter().enumerate() {
                sums[c] += v;
            }
        }
        sums
    };
    let columns = top_indices(&totals, cols);

    banner(&format!(
        "DOCUMENT-TERM MATRIX ({}, first {} characters)",
        kind,
        rows.min(analyzer.characters().len())
    ));
    if columns.is_empty() {
        println!("  (empty vocabulary)");
        return Ok(());
    }

    print!("  {:<20}", "");
    for &c in &columns {
        let label = vocabulary.term(c).unwrap_or("");
        print!(" {:>14}", super::truncate_chars(label, 11).dimmed());
    }
    println!();

    for (i, character) in analyzer.characters().iter().take(rows).enumerate() {
        let row = analyzer.dense_row(kind, i)?;
        print!("  {:<20}", super::truncate_chars(&character.name, 17));
        for &c in &columns {
            let v = row[c];
            let cell = match kind {
                MatrixKind::Count => format!("{:>14}", v as u64),
                MatrixKind::TfIdf => format!("{:>14.2}", v),
            };
            if v > 0.0 {
                print!(" {}", cell.bright_white());
            } else {
                print!(" {}", cell.dimmed());
            }
        }
        println!();
    }
    Ok(())
}

/// Display one character's top terms and nearest neighbours.
pub fn display_analysis(analysis: &CharacterAnalysis) {
    banner(&format!("ANALYSIS: {}", analysis.name));
    println!("  {}", analysis.description.dimmed());

    println!("\n  Top terms:");
    if analysis.top_terms.is_empty() {
        println!("    (none)");
    }
    for (term, value) in &analysis.top_terms {
        println!("    - '{}': {}", term, format_value(*value));
    }

    println!("\n  Most similar characters:");
    for (name, sim) in &analysis.similar {
        println!("    - {} ({:.3})", name, sim);
    }
}

pub fn display_similar(name: &str, kind: MatrixKind, similar: &[(String, f64)]) {
    banner(&format!("CHARACTERS SIMILAR TO {} ({})", name, kind));
    if similar.is_empty() {
        println!("  No character named '{}' in the loaded set.", name);
        return;
    }
    for (i, (other, sim)) in similar.iter().enumerate() {
        println!("  {:>2}. {:<30} {:.3}", i + 1, other, sim);
    }
}

/// Side-by-side count and TF-IDF top terms.
pub fn display_comparison(comparison: &TermComparison) {
    println!("\n{}:", comparison.name.bold());
    println!("  Count-based top terms:");
    for (term, count) in comparison.count_terms.iter().take(FEATURED_NAMES) {
        println!("    - '{}': {}", term, format_value(*count));
    }
    println!("  TF-IDF-based top terms:");
    for (term, score) in comparison.tfidf_terms.iter().take(FEATURED_NAMES) {
        println!("    - '{}': {:.4}", term, score);
    }
}

pub fn display_matrix_stats(characters: usize, stats: &[MatrixStats]) {
    banner("STATISTICS");
    println!("Total characters analyzed: {}", characters);
    for s in stats {
        println!(
            "{} matrix: ({}, {}), {} non-zero, sparsity {:.2}%",
            s.kind,
            s.documents,
            s.features,
            s.non_zero,
            s.sparsity * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(10.0, 10.0).trim_end().len(), BAR_WIDTH);
        assert_eq!(bar(0.0, 10.0).trim_end().len(), 0);
        assert_eq!(bar(1.0, 0.0).len(), BAR_WIDTH);
    }

    #[test]
    fn test_no_matches_notice_is_store_neutral() {
        assert_eq!(NO_MATCHES, "No matching characters.");
        assert!(!NO_MATCHES.contains("populate"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.12345), "0.1235");
    }
}
