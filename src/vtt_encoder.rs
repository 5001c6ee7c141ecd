use std::io::Write;

use tracing::debug;

use crate::Result;
use crate::error::Error;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes segments as WebVTT cues.
///
/// Design:
/// - We stream each cue straight to the underlying `Write`; nothing is buffered here.
/// - The `WEBVTT` header is written lazily with the first cue, so exporting an empty transcript
///   produces no output at all.
/// - Segment ids become cue identifiers when they are safe to use as one. Ids come from
///   backend payloads, so an id that is empty, spans lines, or contains `-->` is left off and
///   the cue goes out without an identifier.
/// - A segment whose text is blank (possible under lenient ingestion) is skipped. An empty cue
///   body would make the blank separator line ambiguous.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Whether the encoder has been closed. Writes after this fail.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    /// Write the WebVTT header if we haven't written it yet.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // The header line must be followed by a blank line before the first cue.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for VttEncoder<W> {
    /// Write a single cue: optional identifier, timing line, text, blank separator.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        let text = cue_text(&seg.text);
        if text.is_empty() {
            debug!(segment_id = %seg.id, "skipping cue with blank text");
            return Ok(());
        }

        self.start_if_needed()?;

        if is_valid_cue_identifier(&seg.id) {
            writeln!(&mut self.w, "{}", seg.id)?;
        }

        // WebVTT timestamps use `HH:MM:SS.mmm`.
        let start = format_timestamp(seg.start_seconds, '.');
        let end = format_timestamp(seg.end_seconds, '.');
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{text}")?;
        writeln!(&mut self.w)?;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

/// A WebVTT cue identifier is one non-empty line that must not contain `-->`.
fn is_valid_cue_identifier(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains(['\n', '\r']) && !id.contains("-->")
}

/// Blank lines end a cue early in both VTT and SRT, so collapse them.
pub(crate) fn cue_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format seconds as `HH:MM:SS<sep>mmm`, rounded to the nearest millisecond.
///
/// WebVTT separates milliseconds with `.`, SubRip with `,`. Negative times clamp to zero.
pub(crate) fn format_timestamp(seconds: f64, sep: char) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02}{sep}{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_without_segments_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn writes_header_once_and_identified_cues() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.write_segment(&Segment::new("s1", 0.0, 1.2345, "hello"))?;
        enc.write_segment(&Segment::new("s2", 61.2, 62.0, "world"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert_eq!(
            s,
            "WEBVTT\n\ns1\n00:00:00.000 --> 00:00:01.235\nhello\n\n\
             s2\n00:01:01.200 --> 00:01:02.000\nworld\n\n"
        );
        Ok(())
    }

    #[test]
    fn unsafe_ids_are_left_off_the_cue() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.write_segment(&Segment::new("a --> b", 0.0, 1.0, "arrow"))?;
        enc.write_segment(&Segment::new("two\nlines", 1.0, 2.0, "newline"))?;
        enc.write_segment(&Segment::new("", 2.0, 3.0, "empty"))?;
        enc.close()?;

        assert_eq!(
            std::str::from_utf8(&out)?,
            "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\narrow\n\n\
             00:00:01.000 --> 00:00:02.000\nnewline\n\n\
             00:00:02.000 --> 00:00:03.000\nempty\n\n"
        );
        Ok(())
    }

    #[test]
    fn blank_text_cues_are_skipped() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.write_segment(&Segment::new("blank", 0.0, 1.0, "  \n "))?;
        enc.write_segment(&Segment::new("s1", 1.0, 2.0, "kept"))?;
        enc.close()?;

        assert_eq!(
            std::str::from_utf8(&out)?,
            "WEBVTT\n\ns1\n00:00:01.000 --> 00:00:02.000\nkept\n\n"
        );
        Ok(())
    }

    #[test]
    fn blank_lines_in_text_are_collapsed() {
        assert_eq!(cue_text("one\n\n  \ntwo  "), "one\ntwo");
    }

    #[test]
    fn timestamps_round_and_clamp() {
        assert_eq!(format_timestamp(0.0004, '.'), "00:00:00.000");
        assert_eq!(format_timestamp(0.0006, '.'), "00:00:00.001");
        assert_eq!(format_timestamp(1.9996, ','), "00:00:02,000");
        assert_eq!(format_timestamp(3723.5, '.'), "01:02:03.500");
        assert_eq!(format_timestamp(-2.0, '.'), "00:00:00.000");
    }

    #[test]
    fn write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        assert!(matches!(
            enc.write_segment(&Segment::new("s1", 0.0, 1.0, "nope")),
            Err(Error::EncoderClosed)
        ));
        Ok(())
    }
}
