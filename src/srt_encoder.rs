use std::io::Write;

use tracing::debug;

use crate::Result;
use crate::error::Error;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::vtt_encoder::{cue_text, format_timestamp};

/// Writes segments as SubRip (`.srt`) cues.
///
/// SubRip has no header and numbers cues from 1, so segment ids are not carried over.
pub struct SrtEncoder<W: Write> {
    w: W,

    /// Sequence number for the next cue written.
    next_index: usize,
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        // Blank cues would leave a bare separator where the text belongs; drop them and keep
        // the numbering dense.
        let text = cue_text(&seg.text);
        if text.is_empty() {
            debug!(segment_id = %seg.id, "skipping cue with blank text");
            return Ok(());
        }

        let start = format_timestamp(seg.start_seconds, ',');
        let end = format_timestamp(seg.end_seconds, ',');
        writeln!(&mut self.w, "{}", self.next_index)?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{text}")?;
        writeln!(&mut self.w)?;

        self.next_index += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_cues_from_one() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        enc.write_segment(&Segment::new("intro", 0.0, 2.5, "Welcome back"))?;
        enc.write_segment(&Segment::new("next", 2.5, 4.0, "to the show"))?;
        enc.close()?;

        assert_eq!(
            std::str::from_utf8(&out)?,
            "1\n00:00:00,000 --> 00:00:02,500\nWelcome back\n\n\
             2\n00:00:02,500 --> 00:00:04,000\nto the show\n\n"
        );
        Ok(())
    }

    #[test]
    fn blank_text_is_skipped_without_a_numbering_gap() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        enc.write_segment(&Segment::new("a", 0.0, 1.0, "first"))?;
        enc.write_segment(&Segment::new("b", 1.0, 2.0, "   "))?;
        enc.write_segment(&Segment::new("c", 2.0, 3.0, "third"))?;
        enc.close()?;

        assert_eq!(
            std::str::from_utf8(&out)?,
            "1\n00:00:00,000 --> 00:00:01,000\nfirst\n\n\
             2\n00:00:02,000 --> 00:00:03,000\nthird\n\n"
        );
        Ok(())
    }

    #[test]
    fn close_is_idempotent_and_final() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = SrtEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert!(matches!(
            enc.write_segment(&Segment::new("a", 0.0, 1.0, "late")),
            Err(Error::EncoderClosed)
        ));
        Ok(())
    }
}
