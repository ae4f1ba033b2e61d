//! Weighted interaction edge list: aggregation and CSV interchange.
//!
//! # Overview
//!
//! Upstream collaborators emit one [`RawEdge`] per interaction event (an
//! issue comment, a review, a merge, ...). [`EdgeList`] collapses events
//! that share an ordered `(source, target)` pair: weights sum, the event
//! count increments, and each interaction tag keeps its own occurrence
//! count.
//!
//! ## CSV Format
//!
//! ```text
//! source,target,weight,count,tags
//! alice,bob,7,2,issue_comment:1;pr_review:1
//! ```
//!
//! Quoting follows RFC 4180 via the `csv` crate. The reader also accepts
//! the minimal `source,target,weight` form, in which case each row counts
//! as a single event. Whether the first row is a header is the caller's
//! call; nothing is sniffed.
//!
//! Inside the tags column, `;`, `:` and `\` in a tag name are escaped with
//! a backslash.
//!
//! ## Content Hash
//!
//! [`EdgeList::content_hash`] is a BLAKE3 hash of the sorted aggregated
//! edge set. Two edge lists with equal hashes build identical graphs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::EdgeListError;

/// Column names written by [`EdgeList::write_csv`].
pub const CSV_COLUMNS: [&str; 5] = ["source", "target", "weight", "count", "tags"];

// ---------------------------------------------------------------------------
// RawEdge / AggregatedEdge
// ---------------------------------------------------------------------------

/// One interaction event between two identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    /// Login of the acting identity.
    pub source: String,
    /// Login of the identity acted upon.
    pub target: String,
    /// Strength of the interaction. Must be finite and positive.
    pub weight: f64,
    /// Interaction type, e.g. `issue_comment` or `pr_merged`.
    pub tag: Option<String>,
}

impl RawEdge {
    /// Convenience constructor for a tagged event.
    #[must_use]
    pub fn new(source: &str, target: &str, weight: f64, tag: Option<&str>) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            weight,
            tag: tag.map(str::to_string),
        }
    }
}

/// Accumulated totals for one ordered `(source, target)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEdge {
    /// Sum of event weights.
    pub weight: f64,
    /// Number of events folded in.
    pub count: usize,
    /// Occurrence count per interaction tag.
    pub tags: BTreeMap<String, usize>,
}

impl AggregatedEdge {
    /// Encode the tag counts as `tag:count` pairs joined by `;`.
    #[must_use]
    pub fn encoded_tags(&self) -> String {
        let mut out = String::new();
        for (i, (tag, count)) in self.tags.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            let _ = write!(out, "{}:{count}", escape_tag(tag));
        }
        out
    }

    fn merge(&mut self, weight: f64, count: usize, tags: BTreeMap<String, usize>) {
        self.weight += weight;
        self.count = self.count.saturating_add(count);
        for (tag, n) in tags {
            let slot = self.tags.entry(tag).or_insert(0);
            *slot = slot.saturating_add(n);
        }
    }
}

// ---------------------------------------------------------------------------
// InteractionKind
// ---------------------------------------------------------------------------

/// The per-kind interaction graphs built alongside the integrated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    /// Issue, pull-request and review-thread comments.
    Comments,
    /// Issues closed by someone other than the opener.
    IssueClosures,
    /// Reviews, approvals, change requests and merges.
    PrInteractions,
}

impl InteractionKind {
    /// Every kind, in report order.
    pub const ALL: [Self; 3] = [Self::Comments, Self::IssueClosures, Self::PrInteractions];

    /// Tags that make up this kind's graph.
    #[must_use]
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Comments => &["issue_comment", "pr_comment", "pr_review_comment"],
            Self::IssueClosures => &["issue_closed"],
            Self::PrInteractions => &[
                "pr_review",
                "pr_approved",
                "pr_changes_requested",
                "pr_merged",
            ],
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::IssueClosures => "issue-closures",
            Self::PrInteractions => "pr-interactions",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "comments" | "comment" => Ok(Self::Comments),
            "issue-closures" | "closures" => Ok(Self::IssueClosures),
            "pr-interactions" | "pr" => Ok(Self::PrInteractions),
            other => Err(format!(
                "unknown interaction kind '{other}' \
                 (expected comments, issue-closures or pr-interactions)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeList
// ---------------------------------------------------------------------------

/// Aggregated, deterministically ordered set of directed weighted edges
/// keyed by `(source login, target login)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    edges: BTreeMap<(String, String), AggregatedEdge>,
}

impl EdgeList {
    /// Create an empty edge list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of raw events into a new edge list.
    #[must_use]
    pub fn from_raw<'a>(events: impl IntoIterator<Item = &'a RawEdge>) -> Self {
        let mut list = Self::new();
        for event in events {
            list.push(event);
        }
        list
    }

    /// Fold one event into the list.
    ///
    /// Events with a blank identity, a self-interaction, or a weight that
    /// is not finite and positive are skipped. Tags are trimmed; a blank
    /// tag counts the event without tagging it.
    pub fn push(&mut self, event: &RawEdge) {
        if event.source.trim().is_empty() || event.target.trim().is_empty() {
            warn!(
                source = %event.source,
                target = %event.target,
                "skipping event with blank identity"
            );
            return;
        }
        if event.source == event.target {
            warn!(login = %event.source, "skipping self-interaction");
            return;
        }
        if !is_valid_weight(event.weight) {
            warn!(weight = event.weight, "skipping event with invalid weight");
            return;
        }

        let mut tags = BTreeMap::new();
        if let Some(tag) = event.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            tags.insert(tag.to_string(), 1);
        }
        self.merge_pair(&event.source, &event.target, event.weight, 1, tags);
    }

    fn merge_pair(
        &mut self,
        source: &str,
        target: &str,
        weight: f64,
        count: usize,
        tags: BTreeMap<String, usize>,
    ) {
        self.edges
            .entry((source.to_string(), target.to_string()))
            .or_default()
            .merge(weight, count, tags);
    }

    /// Number of distinct ordered pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` if no pairs are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Aggregated totals for `source → target`, if present.
    #[must_use]
    pub fn get(&self, source: &str, target: &str) -> Option<&AggregatedEdge> {
        self.edges.get(&(source.to_string(), target.to_string()))
    }

    /// Iterate `(source, target, totals)` ordered by source, then target.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &AggregatedEdge)> {
        self.edges
            .iter()
            .map(|((s, t), agg)| (s.as_str(), t.as_str(), agg))
    }

    /// Every distinct identity that appears as a source or target, sorted.
    #[must_use]
    pub fn logins(&self) -> BTreeSet<&str> {
        self.edges
            .keys()
            .flat_map(|(s, t)| [s.as_str(), t.as_str()])
            .collect()
    }

    /// Keep only the interactions carrying one of `selected` tags.
    ///
    /// A pair survives if any selected tag occurred on it. Its count becomes
    /// the sum of the selected tag counts, and its weight the same share of
    /// the pair's total weight. Weights are not tracked per tag, so the
    /// share assumes every event on the pair weighed the same.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn filter_tags(&self, selected: &[&str]) -> Self {
        let mut edges = BTreeMap::new();
        for (key, agg) in &self.edges {
            let tags: BTreeMap<String, usize> = agg
                .tags
                .iter()
                .filter(|(tag, _)| selected.contains(&tag.as_str()))
                .map(|(tag, n)| (tag.clone(), *n))
                .collect();
            if tags.is_empty() {
                continue;
            }
            let count = tags.values().fold(0_usize, |acc, n| acc.saturating_add(*n));
            let share = if agg.count == 0 {
                1.0
            } else {
                (count as f64 / agg.count as f64).min(1.0)
            };
            edges.insert(
                key.clone(),
                AggregatedEdge {
                    weight: agg.weight * share,
                    count,
                    tags,
                },
            );
        }
        debug!(before = self.len(), after = edges.len(), ?selected, "filtered edge list by tag");
        Self { edges }
    }

    /// The sub-list for one [`InteractionKind`].
    #[must_use]
    pub fn for_kind(&self, kind: InteractionKind) -> Self {
        self.filter_tags(kind.tags())
    }

    /// BLAKE3 hash of the aggregated edge set, formatted `blake3:<hex>`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (source, target, agg) in self.iter() {
            hasher.update(source.as_bytes());
            hasher.update(b"\x00");
            hasher.update(target.as_bytes());
            hasher.update(b"\x00");
            hasher.update(&agg.weight.to_bits().to_le_bytes());
            hasher.update(&(agg.count as u64).to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    /// Write the list as CSV, header first, rows in key order.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), EdgeListError> {
        let mut out = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        out.write_record(CSV_COLUMNS)?;
        for (source, target, agg) in self.iter() {
            let weight = agg.weight.to_string();
            let count = agg.count.to_string();
            let tags = agg.encoded_tags();
            out.write_record([
                source,
                target,
                weight.as_str(),
                count.as_str(),
                tags.as_str(),
            ])?;
        }
        out.flush()?;
        Ok(())
    }

    /// Parse CSV produced by [`EdgeList::write_csv`] or the minimal
    /// three-column form. Repeated pairs accumulate. When `has_header` is
    /// set the first record is skipped unread.
    ///
    /// # Errors
    ///
    /// Returns an [`EdgeListError`] naming the offending line for short
    /// rows, unparsable numbers or tags, and malformed CSV.
    #[instrument(skip(reader))]
    pub fn read_csv<R: Read>(reader: R, has_header: bool) -> Result<Self, EdgeListError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_reader(reader);

        let mut list = Self::new();
        let mut skipped = 0_usize;

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, position_line);
            // A whitespace-only line reads as one blank field.
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            if record.len() < 3 {
                return Err(EdgeListError::MissingColumns {
                    line,
                    found: record.len(),
                });
            }

            let weight = parse_weight(&record[2], line)?;
            let count = match record.get(3).map(str::trim) {
                None | Some("") => 1,
                Some(raw) => raw.parse().map_err(|_| EdgeListError::InvalidCount {
                    line,
                    value: raw.to_string(),
                })?,
            };
            let tags = match record.get(4) {
                Some(raw) => decode_tags(raw, line)?,
                None => BTreeMap::new(),
            };

            let (source, target) = (&record[0], &record[1]);
            if source.is_empty() || target.is_empty() || source == target {
                warn!(line, "skipping row with blank or identical endpoints");
                skipped += 1;
                continue;
            }
            list.merge_pair(source, target, weight, count, tags);
        }

        debug!(pairs = list.len(), skipped, "parsed edge list");
        Ok(list)
    }

    /// Read an edge list CSV from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_csv_file(path: &Path, has_header: bool) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open edge list {}", path.display()))?;
        Self::read_csv(io::BufReader::new(file), has_header)
            .with_context(|| format!("Failed to parse edge list {}", path.display()))
    }

    /// Write the list as CSV to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_csv(io::BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

pub(crate) fn position_line(position: &csv::Position) -> usize {
    usize::try_from(position.line()).unwrap_or(usize::MAX)
}

fn parse_weight(raw: &str, line: usize) -> Result<f64, EdgeListError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| is_valid_weight(*w))
        .ok_or_else(|| EdgeListError::InvalidWeight {
            line,
            value: raw.to_string(),
        })
}

fn escape_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    for c in tag.chars() {
        if matches!(c, '\\' | ';' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape_tag(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(escaped) = chars.next()
        {
            out.push(escaped);
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte offsets of `sep` occurrences not preceded by an escaping backslash.
fn unescaped_positions(raw: &str, sep: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            positions.push(i);
        }
    }
    positions
}

fn split_unescaped(raw: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for i in unescaped_positions(raw, sep) {
        parts.push(&raw[start..i]);
        start = i + sep.len_utf8();
    }
    parts.push(&raw[start..]);
    parts
}

fn decode_tags(raw: &str, line: usize) -> Result<BTreeMap<String, usize>, EdgeListError> {
    let mut tags: BTreeMap<String, usize> = BTreeMap::new();
    for entry in split_unescaped(raw, ';')
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        let invalid = || EdgeListError::InvalidTag {
            line,
            value: entry.to_string(),
        };
        let (name, count) = match unescaped_positions(entry, ':').last() {
            Some(&i) => {
                let count = entry[i + 1..]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid())?;
                (&entry[..i], count)
            }
            None => (entry, 1),
        };
        let name = unescape_tag(name.trim());
        if name.is_empty() {
            return Err(invalid());
        }
        let slot: &mut usize = tags.entry(name).or_insert(0);
        *slot = slot.saturating_add(count);
    }
    Ok(tags)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
