use crate::output_type::OutputType;

/// How a transcription payload is checked on the way in.
///
/// Backends are expected to send sorted, non-overlapping segments, but nothing guarantees it.
///
/// Notes:
/// - Every policy keeps the store usable. Only the resolution strategy differs: well-formed
///   stores get binary search, anything else falls back to a first-match scan.
/// - `Issue` diagnostics are available under all three via `Transcription::issues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum IngestPolicy {
    /// Keep the payload order. Malformed input resolves by first match in sequence order.
    #[default]
    Lenient,

    /// Stable-sort segments by start time. Overlaps are kept.
    ///
    /// Segments sharing a start keep their payload order, so the first-match tie-break still
    /// follows the backend's ordering.
    Sort,

    /// Reject any invalid, unsorted, overlapping, or duplicate-id segment.
    Strict,
}

/// Library-level configuration for loading and exporting transcripts.
///
/// This is not the CLI's flag set. The CLI maps its arguments into this type so that:
/// - the library stays usable without `clap`
/// - other frontends (services, tests) can build options programmatically
#[derive(Debug, Clone, Default)]
pub struct Opts {
    /// How to treat malformed segment sequences when loading.
    ///
    /// Defaults to [`IngestPolicy::Lenient`], which never rejects a payload.
    pub ingest: IngestPolicy,

    /// The caption format used by [`crate::export::export`].
    pub output_type: OutputType,
}
