//! `cuetrack` keeps a video transcript in lockstep with playback.
//!
//! This crate provides:
//! - A segment store that loads backend transcription payloads and accepts editor changes
//! - Active segment resolution (which caption is on screen at time `t`)
//! - Case-insensitive segment search
//! - A playback sync controller that highlights and centers the active caption
//! - Caption export (JSON, WebVTT, SubRip)
//!
//! Nothing here touches a real player or UI. The media element, scroll container, and frame
//! grabber are traits the host implements, so everything runs (and is tested) headless.

// Segment data and the store that owns it.
pub mod segments;

// Lookups over segments.
pub mod resolver;
pub mod search;

// Playback sync and the host capabilities it drives.
pub mod frames;
pub mod playback;
pub mod scroll;
pub mod sync;

// Configuration.
pub mod opts;
pub mod output_type;

// Caption export.
pub mod export;
pub mod json_array_encoder;
pub mod segment_encoder;
pub mod srt_encoder;
pub mod vtt_encoder;

mod error;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{Error, Result};
pub use export::export;
pub use opts::{IngestPolicy, Opts};
pub use output_type::OutputType;
pub use playback::{ListenerId, MediaElement, PlaybackEventKind, SimulatedMedia};
pub use resolver::resolve;
pub use scroll::{Bounds, ContainerScroller, ScrollContainer, Scroller};
pub use search::search;
pub use segments::{Issue, Segment, Transcription};
pub use sync::{SyncController, SyncOutcome, SyncState};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
