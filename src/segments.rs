//! Transcript segments and the store that owns them.
//!
//! A `Transcription` is loaded wholesale from a backend payload and then only mutated in place
//! by the transcript editor (text and timing edits, or an atomic whole-sequence swap). It never
//! grows or shrinks one segment at a time.
//!
//! We don't require well-formed input. Instead we remember whether the sequence is sorted and
//! non-overlapping so the resolver can pick binary search when it is safe, and a first-match
//! linear scan when it is not.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;
use crate::error::{Error, ensure_segment};
use crate::opts::IngestPolicy;
use crate::resolver;
use crate::search::{Matches, search};

/// One timed caption unit.
///
/// `start_seconds` is inclusive and `end_seconds` is exclusive: a playback time equal to `end`
/// belongs to the next segment (or to nothing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identifier. Payloads without one get a fresh UUID on load.
    #[serde(default = "new_segment_id")]
    pub id: String,

    #[serde(rename = "start", alias = "start_seconds")]
    pub start_seconds: f64,

    #[serde(rename = "end", alias = "end_seconds")]
    pub end_seconds: f64,

    pub text: String,
}

impl Segment {
    pub fn new(
        id: impl Into<String>,
        start_seconds: f64,
        end_seconds: f64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }

    /// Whether `time` falls inside `[start, end)`. Always false for NaN.
    pub fn contains(&self, time: f64) -> bool {
        self.start_seconds <= time && time < self.end_seconds
    }

    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Check the invariants a single segment must hold on its own.
    pub fn validate(&self) -> Result<()> {
        ensure_segment!(
            self.start_seconds.is_finite() && self.end_seconds.is_finite(),
            self.id,
            "start and end must be finite"
        );
        ensure_segment!(
            self.end_seconds > self.start_seconds,
            self.id,
            format!(
                "end ({}) must be after start ({})",
                self.end_seconds, self.start_seconds
            )
        );
        ensure_segment!(!self.text.trim().is_empty(), self.id, "text is empty");
        Ok(())
    }
}

fn new_segment_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single invariant breach found while inspecting a segment sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// The segment is broken on its own (see [`Segment::validate`]).
    Invalid {
        index: usize,
        id: String,
        reason: String,
    },

    /// The segment starts before its predecessor.
    Unsorted { index: usize, id: String },

    /// The segment starts before its predecessor ends.
    Overlap {
        index: usize,
        id: String,
        previous_id: String,
    },

    /// Another segment earlier in the sequence already uses this id.
    DuplicateId { index: usize, id: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Invalid { index, id, reason } => {
                write!(f, "segment #{index} '{id}' is invalid: {reason}")
            }
            Issue::Unsorted { index, id } => {
                write!(f, "segment #{index} '{id}' starts before its predecessor")
            }
            Issue::Overlap {
                index,
                id,
                previous_id,
            } => write!(f, "segment #{index} '{id}' overlaps '{previous_id}'"),
            Issue::DuplicateId { index, id } => {
                write!(f, "segment #{index} reuses id '{id}'")
            }
        }
    }
}

/// Inspect a segment sequence and report every invariant breach, in sequence order.
pub fn find_issues(segments: &[Segment]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(segments.len());

    for (index, seg) in segments.iter().enumerate() {
        if let Err(Error::InvalidSegment { reason, .. }) = seg.validate() {
            issues.push(Issue::Invalid {
                index,
                id: seg.id.clone(),
                reason,
            });
        }

        if !seen.insert(seg.id.as_str()) {
            issues.push(Issue::DuplicateId {
                index,
                id: seg.id.clone(),
            });
        }

        let Some(prev) = index.checked_sub(1).map(|i| &segments[i]) else {
            continue;
        };

        if seg.start_seconds < prev.start_seconds {
            issues.push(Issue::Unsorted {
                index,
                id: seg.id.clone(),
            });
        } else if seg.start_seconds < prev.end_seconds {
            issues.push(Issue::Overlap {
                index,
                id: seg.id.clone(),
                previous_id: prev.id.clone(),
            });
        }
    }

    issues
}

/// An ordered transcript: the segment store the resolver and search run over.
#[derive(Debug, Clone)]
pub struct Transcription {
    segments: Vec<Segment>,

    /// Cached result of `find_issues(..).is_empty()`, refreshed on every mutation.
    well_formed: bool,
}

/// The object form of a payload, `{"segments": [...]}`. The other accepted form is a bare array.
#[derive(Deserialize)]
struct Wrapped {
    segments: Vec<Segment>,
}

impl Transcription {
    /// Build a transcription leniently: order is kept as given, malformed input is tolerated.
    pub fn new(segments: Vec<Segment>) -> Self {
        let mut t = Self {
            segments,
            well_formed: true,
        };
        t.refresh();
        t
    }

    /// Build a transcription, applying the given ingestion policy.
    pub fn from_segments(mut segments: Vec<Segment>, policy: IngestPolicy) -> Result<Self> {
        match policy {
            IngestPolicy::Lenient => {}
            IngestPolicy::Sort => {
                // Stable, so segments sharing a start keep their payload order.
                segments.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
            }
            IngestPolicy::Strict => {
                if let Some(issue) = find_issues(&segments).into_iter().next() {
                    return Err(Error::Malformed(issue.to_string()));
                }
            }
        }

        Ok(Self::new(segments))
    }

    /// Parse a backend transcription payload.
    ///
    /// The shape is picked from the first token rather than by trial, so a bad record fails with
    /// serde's own message (field name, line, and column) instead of a generic mismatch.
    pub fn from_json<R: Read>(mut r: R, policy: IngestPolicy) -> Result<Self> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;

        let segments = match buf.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => serde_json::from_slice::<Wrapped>(&buf)?.segments,
            _ => serde_json::from_slice::<Vec<Segment>>(&buf)?,
        };
        debug!(count = segments.len(), ?policy, "loaded transcription payload");
        Self::from_segments(segments, policy)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the sequence is sorted, non-overlapping, and every segment is valid.
    pub fn is_well_formed(&self) -> bool {
        self.well_formed
    }

    /// Every invariant breach in the current sequence.
    pub fn issues(&self) -> Vec<Issue> {
        find_issues(&self.segments)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// The segment active at `time`, if any.
    ///
    /// Uses binary search while the sequence is well formed, otherwise the first match in
    /// sequence order wins.
    pub fn active_at(&self, time: f64) -> Option<&Segment> {
        self.active_index_at(time).map(|i| &self.segments[i])
    }

    pub fn active_index_at(&self, time: f64) -> Option<usize> {
        if self.well_formed {
            resolver::resolve_sorted_index(&self.segments, time)
        } else {
            resolver::resolve_linear_index(&self.segments, time)
        }
    }

    /// Segments whose text contains `query`, case-insensitively.
    pub fn search<'a>(&'a self, query: &str) -> Matches<'a> {
        search(&self.segments, query)
    }

    /// Replace a segment's text. Empty text is rejected.
    pub fn edit_text(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        let index = self.require(id)?;
        let mut edited = self.segments[index].clone();
        edited.text = text.into();
        edited.validate()?;

        self.segments[index] = edited;
        self.refresh();
        Ok(())
    }

    /// Move a segment in time. The new range must satisfy `end > start`.
    ///
    /// The segment keeps its position in the sequence even if the new times make the sequence
    /// unsorted; the store then falls back to first-match resolution.
    pub fn retime(&mut self, id: &str, start_seconds: f64, end_seconds: f64) -> Result<()> {
        let index = self.require(id)?;
        let mut edited = self.segments[index].clone();
        edited.start_seconds = start_seconds;
        edited.end_seconds = end_seconds;
        edited.validate()?;

        self.segments[index] = edited;
        self.refresh();
        Ok(())
    }

    /// Swap in a whole new sequence at once and return the previous one.
    pub fn replace(&mut self, segments: Vec<Segment>) -> Vec<Segment> {
        let previous = std::mem::replace(&mut self.segments, segments);
        self.refresh();
        previous
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| Error::UnknownSegment(id.to_owned()))
    }

    fn refresh(&mut self) {
        let issues = find_issues(&self.segments);
        self.well_formed = issues.is_empty();
        if let Some(first) = issues.first() {
            warn!(
                issues = issues.len(),
                first = %first,
                "transcription is malformed; resolving by first match"
            );
        }
    }
}

impl Default for Transcription {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<'a> IntoIterator for &'a Transcription {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
