//! Caption export: stream a transcript through the encoder for the requested format.

use std::io::{BufWriter, Write};

use tracing::debug;

use crate::Result;
use crate::error::Error;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::output_type::OutputType;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Transcription;
use crate::srt_encoder::SrtEncoder;
use crate::vtt_encoder::VttEncoder;

/// Write every segment of `transcript` to `w` in `output_type` format.
///
/// The encoder is always closed, even when a write fails, so partial output is flushed.
pub fn export<W: Write>(transcript: &Transcription, w: W, output_type: OutputType) -> Result<()> {
    let writer = BufWriter::new(w);
    debug!(segments = transcript.len(), ?output_type, "exporting transcript");

    match output_type {
        OutputType::Json => run_and_close(transcript, &mut JsonArrayEncoder::new(writer)),
        OutputType::Vtt => run_and_close(transcript, &mut VttEncoder::new(writer)),
        OutputType::Srt => run_and_close(transcript, &mut SrtEncoder::new(writer)),
    }
}

/// Feed segments to any encoder. The caller owns the encoder's lifecycle.
pub fn write_segments<E>(transcript: &Transcription, encoder: &mut E) -> Result<()>
where
    E: SegmentEncoder + ?Sized,
{
    for seg in transcript {
        encoder.write_segment(seg)?;
    }
    Ok(())
}

fn run_and_close<E: SegmentEncoder>(transcript: &Transcription, encoder: &mut E) -> Result<()> {
    let run_res = write_segments(transcript, encoder);
    let close_res = encoder.close();

    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => Err(Error::msg(format!(
            "{err} (while closing encoder: {close_err})"
        ))),
    }
}
