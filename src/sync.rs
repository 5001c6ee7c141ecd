//! Playback sync: keep the highlighted caption in lockstep with the video.
//!
//! The controller owns one video/transcript pairing. While it is `Tracking` it holds two
//! listener registrations on the media element (time updates and seeks); both route through
//! [`SyncController::handle`]. Those registrations are released exactly once, by
//! [`SyncController::unmount`] or on drop, whichever comes first.
//!
//! Time updates fire several times per second, so the controller only scrolls when the active
//! segment actually changes.

use tracing::{debug, trace};

use crate::playback::{ListenerId, MediaElement, PlaybackEventKind};
use crate::scroll::Scroller;
use crate::segments::{Segment, Transcription};

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No listeners attached.
    Idle,

    /// Listening to the media element and resolving segments.
    Tracking,
}

/// What a single [`SyncController::handle`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The controller is idle; the event was dropped.
    Ignored,

    /// The resolved segment is the one already active. Nothing to do.
    Unchanged,

    /// A different segment became active and a scroll was requested.
    Activated { segment_id: String },

    /// Playback left the active segment for a gap; highlighting was cleared without scrolling.
    Cleared,
}

/// Drives highlight and scroll for one media element and one transcript.
///
/// Segment identity:
/// - The active segment is tracked by id, not by position. An edit that reorders or retimes
///   segments keeps the highlight on the same caption.
/// - Two adjacent segments that share an id therefore look like one segment: crossing from the
///   first into the second reports `Unchanged` and does not scroll again. Such input is flagged
///   as [`crate::Issue::DuplicateId`] and is rejected only by the strict ingest policy. Load
///   with `IngestPolicy::Strict` or give segments unique ids when every cue must scroll.
pub struct SyncController<M: MediaElement, S: Scroller> {
    media: Option<M>,
    scroller: S,
    transcript: Option<Transcription>,
    listeners: Vec<ListenerId>,
    active: Option<String>,
}

impl<M: MediaElement, S: Scroller> SyncController<M, S> {
    /// Create an idle controller. `media` may be absent (no video rendered yet).
    pub fn new(media: Option<M>, scroller: S) -> Self {
        Self {
            media,
            scroller,
            transcript: None,
            listeners: Vec::new(),
            active: None,
        }
    }

    /// Pair the controller with a transcript and start tracking.
    ///
    /// Stays idle if the media element is missing or the transcript is missing or empty. Any
    /// previous pairing is released first.
    pub fn mount(&mut self, transcript: Option<Transcription>) -> SyncState {
        self.unmount();

        let Some(transcript) = transcript.filter(|t| !t.is_empty()) else {
            debug!("no transcript to track; staying idle");
            return SyncState::Idle;
        };
        let Some(media) = self.media.as_mut() else {
            debug!("no media element; staying idle");
            return SyncState::Idle;
        };

        for kind in [PlaybackEventKind::TimeUpdate, PlaybackEventKind::Seeked] {
            self.listeners.push(media.attach(kind));
        }

        debug!(
            segments = transcript.len(),
            well_formed = transcript.is_well_formed(),
            "tracking playback"
        );
        self.transcript = Some(transcript);
        SyncState::Tracking
    }

    /// Handle a time-update or seek notification.
    ///
    /// Both kinds are treated the same: read the position, resolve, and scroll only if the
    /// active segment changed.
    pub fn handle(&mut self, kind: PlaybackEventKind) -> SyncOutcome {
        if self.state() == SyncState::Idle {
            return SyncOutcome::Ignored;
        }
        let (Some(media), Some(transcript)) = (self.media.as_ref(), self.transcript.as_ref())
        else {
            return SyncOutcome::Ignored;
        };

        let time = media.current_time();
        let resolved = transcript.active_at(time).map(|s| s.id.as_str());
        trace!(?kind, time, ?resolved, "playback event");

        if resolved == self.active.as_deref() {
            return SyncOutcome::Unchanged;
        }

        match resolved {
            Some(id) => {
                let id = id.to_owned();
                self.scroller.center_on(&id);
                self.active = Some(id.clone());
                debug!(segment_id = %id, time, "active segment changed");
                SyncOutcome::Activated { segment_id: id }
            }
            None => {
                self.active = None;
                debug!(time, "left active segment");
                SyncOutcome::Cleared
            }
        }
    }

    /// Swap in an edited transcript.
    ///
    /// The active segment is kept only if its id still exists; the next event re-resolves
    /// against the new sequence. No scroll happens here.
    pub fn replace_transcript(&mut self, transcript: Transcription) {
        if let Some(active) = self.active.as_deref() {
            if transcript.get(active).is_none() {
                self.active = None;
            }
        }
        self.transcript = Some(transcript);
    }

    /// Release listeners and return to idle. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(media) = self.media.as_mut() {
            for id in self.listeners.drain(..) {
                media.detach(id);
            }
        }
        self.listeners.clear();

        if self.transcript.take().is_some() {
            debug!("stopped tracking playback");
        }
        self.active = None;
    }

    pub fn state(&self) -> SyncState {
        if self.listeners.is_empty() {
            SyncState::Idle
        } else {
            SyncState::Tracking
        }
    }

    /// The currently highlighted segment.
    pub fn active_segment(&self) -> Option<&Segment> {
        let id = self.active.as_deref()?;
        self.transcript.as_ref()?.get(id)
    }

    pub fn transcript(&self) -> Option<&Transcription> {
        self.transcript.as_ref()
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    pub fn media_mut(&mut self) -> Option<&mut M> {
        self.media.as_mut()
    }

    pub fn scroller(&self) -> &S {
        &self.scroller
    }
}

impl<M: MediaElement, S: Scroller> Drop for SyncController<M, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
