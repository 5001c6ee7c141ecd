//! Still-frame capture for caption thumbnails.
//!
//! Grabbing a frame needs a decoder or a player, which is the host's business. We only decide
//! *when* to capture and hand that timestamp to an injected [`FrameExtractor`].

use tracing::debug;

use crate::Result;
use crate::error::Error;
use crate::segments::Segment;

/// Captures an encoded still image (PNG, JPEG, ...) from the video at a timestamp.
pub trait FrameExtractor {
    fn capture(&mut self, timestamp: f64) -> Result<Vec<u8>>;
}

/// A captured frame tied to the segment it illustrates.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub segment_id: String,
    pub timestamp: f64,
    pub bytes: Vec<u8>,
}

/// Capture the frame shown when `segment` starts.
pub fn capture_segment_frame<E>(extractor: &mut E, segment: &Segment) -> Result<Frame>
where
    E: FrameExtractor + ?Sized,
{
    let timestamp = segment.start_seconds;
    let bytes = extractor.capture(timestamp)?;
    if bytes.is_empty() {
        return Err(Error::msg(format!(
            "frame extractor returned no data for segment '{}' at {timestamp}s",
            segment.id
        )));
    }

    debug!(segment_id = %segment.id, timestamp, len = bytes.len(), "captured frame");
    Ok(Frame {
        segment_id: segment.id.clone(),
        timestamp,
        bytes,
    })
}

/// Capture one frame per segment, stopping at the first failure.
pub fn capture_frames<'a, E, I>(extractor: &mut E, segments: I) -> Result<Vec<Frame>>
where
    E: FrameExtractor + ?Sized,
    I: IntoIterator<Item = &'a Segment>,
{
    segments
        .into_iter()
        .map(|seg| capture_segment_frame(&mut *extractor, seg))
        .collect()
}
