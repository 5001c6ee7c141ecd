/// The supported caption formats for exported transcript segments.
///
/// With the `cli` feature this doubles as a `clap` value enum, so the CLI and library share one
/// set of names. Each variant maps to a concrete `SegmentEncoder` implementation.
///
/// Design:
/// - Every format is streamed segment by segment, so export memory does not grow with the
///   transcript.
/// - VTT is the default because browsers load it directly as a `<track>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Output segments as a JSON array.
    ///
    /// Records use the same field names the loader reads, so an export can be loaded back.
    Json,

    /// Output segments in WebVTT subtitle format.
    ///
    /// Segment ids become cue identifiers when they are safe to embed.
    #[default]
    Vtt,

    /// Output segments in SubRip subtitle format.
    ///
    /// Cues are numbered from 1; ids are not carried.
    Srt,
}
