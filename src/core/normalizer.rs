//! Canonical rewriting of raw bet codes
//!
//! Every output line is either a canonical station selector or a canonical
//! bet line with exactly one bet type. Canonical bet lines are rendered
//! from the grammar's syntax tree, so normalizing canonical text again
//! leaves it unchanged.

use crate::core::catalog::Catalog;
use crate::core::grammar::{self, NumberItem, Segment, Suffix};
use crate::core::lexer::{tokenize, TokenKind};
use crate::core::line_parser::{expand_sequence, split_digit_run};
use crate::core::station_resolver::canonical_selector;
use crate::core::text::fold_line;
use tracing::debug;

/// Rewrite raw multi-line text into canonical form
///
/// Lines are folded (lowercase, no diacritics) and trimmed. Blank lines and
/// lines holding only separators are dropped. A station prefix on a bet line is moved onto its own line,
/// and a bet line with several bet types becomes one line per bet type.
pub fn normalize(raw: &str, catalog: &Catalog) -> String {
    raw.lines()
        .map(fold_line)
        .filter(|line| !line.is_empty())
        .flat_map(|line| normalize_line(&line, catalog))
        // separator-only lines clean up to nothing
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str, catalog: &Catalog) -> Vec<String> {
    if let Some(lines) = canonical_lines(line, catalog) {
        return lines;
    }
    if let Some(lines) = split_station_prefix(line, catalog) {
        return lines;
    }

    let cleaned = cleanup(line);
    debug!(line, cleaned = %cleaned, "line kept with separator cleanup");
    canonical_lines(&cleaned, catalog).unwrap_or_else(|| vec![cleaned])
}

fn canonical_lines(line: &str, catalog: &Catalog) -> Option<Vec<String>> {
    if let Some(selector) = canonical_selector(line, catalog) {
        return Some(vec![selector]);
    }
    render_bet_line(line, catalog)
}

/// Split `"<selector> <bets>"` into a selector line and the bet lines
fn split_station_prefix(line: &str, catalog: &Catalog) -> Option<Vec<String>> {
    let words: Vec<&str> = line.split(' ').collect();
    (1..words.len()).rev().find_map(|k| {
        let selector = canonical_selector(&words[..k].join(" "), catalog)?;
        let rest = words[k..].join(" ");
        let mut lines = vec![selector];
        lines.extend(normalize_line(&rest, catalog));
        Some(lines)
    })
}

/// Render a bet line from its syntax tree, one line per bet type
fn render_bet_line(line: &str, catalog: &Catalog) -> Option<Vec<String>> {
    let syntax = grammar::parse(line, catalog).ok()?;
    let mut lines = Vec::new();
    for segment in &syntax.segments {
        for suffix in &segment.suffixes {
            lines.push(render_suffix(segment, suffix, catalog)?);
        }
    }
    Some(lines)
}

fn render_suffix(segment: &Segment, suffix: &Suffix, catalog: &Catalog) -> Option<String> {
    let rule = catalog.rule(&suffix.alias);
    let mut numbers = Vec::new();
    for item in &segment.items {
        match item {
            NumberItem::Digits(run) => numbers.extend(split_digit_run(run, rule)),
            NumberItem::Sequence { start, next, end } => {
                numbers.extend(expand_sequence(start, next.as_deref(), end).ok()?)
            }
            NumberItem::Keyword(set) => numbers.push(set.keyword().to_string()),
        }
    }
    let numbers = numbers.join(".");

    let compact = format!("{}{}{}", numbers, suffix.alias, suffix.amount);
    if reads_back(&compact, suffix, catalog) {
        Some(compact)
    } else {
        // e.g. alias `dao` with amount `310` next to an alias `dao3`
        Some(format!("{}{} {}", numbers, suffix.alias, suffix.amount))
    }
}

fn reads_back(text: &str, suffix: &Suffix, catalog: &Catalog) -> bool {
    match grammar::parse(text, catalog) {
        Ok(syntax) => matches!(
            syntax.segments.as_slice(),
            [segment] if segment.suffixes.as_slice() == std::slice::from_ref(suffix)
        ),
        Err(_) => false,
    }
}

/// Collapse separator runs to `.`, dropping them before letters and at the ends
fn cleanup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending = false;
    for token in tokenize(line) {
        match token.kind {
            TokenKind::Separator => pending = true,
            kind => {
                if pending && !out.is_empty() && kind != TokenKind::Letters {
                    out.push('.');
                }
                pending = false;
                out.push_str(token.text);
            }
        }
    }
    out
}
