use crate::Result;
use crate::segments::Segment;

/// A streaming sink for segments.
///
/// `close` is idempotent; writing after `close` fails with [`crate::Error::EncoderClosed`].
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
