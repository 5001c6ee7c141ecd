use std::io::Write;

use crate::Result;
use crate::error::Error;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// Writes segments back out in the same shape the loader accepts, as one JSON array.
///
/// Elements are streamed as they arrive; the opening bracket is deferred until the first
/// segment (or `close`) so an empty export is still `[]`.
///
/// ```json
/// [{"id":"s1","start":0.0,"end":1.2,"text":"hello"},{"id":"s2","start":1.2,"end":2.5,"text":"world"}]
/// ```
///
/// Why this exists:
/// - `serde_json::to_writer` on a whole `Vec` needs every segment up front. Exports are driven
///   one segment at a time through [`SegmentEncoder`], so the array framing is written by hand.
///
/// Design:
/// - No trailing newline. Callers that want one add it after `close`.
/// - Closing is idempotent, and writes after close fail with [`Error::EncoderClosed`].
pub struct JsonArrayEncoder<W: Write> {
    /// Destination writer. Not flushed until `close`.
    w: W,

    /// Whether `[` has been written.
    started: bool,

    /// Whether a comma is needed before the next element.
    wrote_any: bool,

    /// Set once `]` has been written.
    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            wrote_any: false,
            closed: false,
        }
    }

    fn open_array(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for JsonArrayEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        self.open_array()?;
        if self.wrote_any {
            self.w.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.w, seg)?;
        self.wrote_any = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.open_array()?;
        self.w.write_all(b"]")?;
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opts::IngestPolicy;
    use crate::segments::Transcription;

    #[test]
    fn empty_export_is_an_empty_array() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "[]");
        Ok(())
    }

    #[test]
    fn output_loads_back_as_a_transcription() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.write_segment(&Segment::new("s1", 0.0, 1.0, "hello"))?;
        enc.write_segment(&Segment::new("s2", 1.0, 2.5, "world"))?;
        enc.close()?;

        let t = Transcription::from_json(out.as_slice(), IngestPolicy::Strict)?;
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("s2").map(|s| s.end_seconds), Some(2.5));
        Ok(())
    }

    #[test]
    fn uses_short_field_names() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.write_segment(&Segment::new("s1", 0.5, 1.0, "hi"))?;
        enc.close()?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed[0]["start"], 0.5);
        assert_eq!(parsed[0]["end"], 1.0);
        assert_eq!(parsed[0]["id"], "s1");
        Ok(())
    }

    #[test]
    fn write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        let err = enc
            .write_segment(&Segment::new("s1", 0.0, 1.0, "late"))
            .unwrap_err();
        assert!(matches!(err, Error::EncoderClosed));
        Ok(())
    }
}
