//! Fixed marker syntax scans
//!
//! The linear scans the context manager is built from: frontmatter fences,
//! ATX headings, `> [!star]` callouts, `==highlight==` spans, and
//! `[[wiki links]]`. Each scan is a single pass over the text and none of
//! them mutate anything.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::Heading;

static HIGHLIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"==([^=\n](?:[^=\n]|=[^=\n])*)==").unwrap());

static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]\[|#]+)(?:#[^\]\[|]*)?(?:\|[^\]\[]*)?\]\]").unwrap());

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*$").unwrap());

/// Split a document into its YAML frontmatter source and body. Returns
/// `(None, content)` when there is no leading `---` fence.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---\n") else {
        return (None, content);
    };
    // Closing fence is a line consisting of exactly `---`.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n') == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// Scan ATX headings, attaching to each one the body text running until the
/// next heading of any level.
pub fn scan_headings(body: &str) -> Vec<Heading> {
    let mut headings: Vec<Heading> = Vec::new();
    let mut current_body: Vec<&str> = Vec::new();

    let flush = |headings: &mut Vec<Heading>, current_body: &mut Vec<&str>| {
        if let Some(last) = headings.last_mut() {
            last.body = current_body.join("\n").trim().to_string();
        }
        current_body.clear();
    };

    for line in body.lines() {
        if let Some(caps) = HEADING_RE.captures(line) {
            flush(&mut headings, &mut current_body);
            headings.push(Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
                body: String::new(),
            });
        } else if !headings.is_empty() {
            current_body.push(line);
        }
    }
    flush(&mut headings, &mut current_body);
    headings
}

/// Extract the bodies of `> [!star]` callout blocks, quote markers
/// stripped. The opening line itself is not part of the body.
pub fn scan_starred_blocks(body: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut lines = body.lines().peekable();
    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with("> [!star]") {
            continue;
        }
        let mut block_lines = Vec::new();
        while let Some(next) = lines.peek() {
            let next_trimmed = next.trim_start();
            if let Some(quoted) = next_trimmed.strip_prefix('>') {
                block_lines.push(quoted.strip_prefix(' ').unwrap_or(quoted));
                lines.next();
            } else {
                break;
            }
        }
        blocks.push(block_lines.join("\n"));
    }
    blocks
}

/// Extract `==highlight==` spans in document order.
pub fn scan_highlights(body: &str) -> Vec<String> {
    HIGHLIGHT_RE
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .collect()
}

/// Extract wiki-link targets in document order, alias and section parts
/// dropped, duplicates removed.
pub fn scan_wiki_links(body: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in WIKI_LINK_RE.captures_iter(body) {
        let target = caps[1].trim().to_string();
        if !target.is_empty() && !seen.contains(&target) {
            seen.push(target);
        }
    }
    seen
}

/// The blank-line delimited paragraph containing the first occurrence of
/// `needle`.
pub fn paragraph_containing<'a>(content: &'a str, needle: &str) -> Option<String> {
    content
        .split("\n\n")
        .find(|para| para.contains(needle))
        .map(|para| para.trim().to_string())
}
