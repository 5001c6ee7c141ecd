//! The media element contract the sync controller listens to.
//!
//! Hosts implement [`MediaElement`] over whatever actually plays the video. The controller only
//! needs the current position and a way to register and release listeners for two kinds of
//! notifications; how those notifications reach [`crate::SyncController::handle`] is up to the
//! host's event loop.

/// The notifications the sync controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEventKind {
    /// Position advanced during normal playback. Fires often (every ~250ms in browsers).
    TimeUpdate,

    /// Position jumped because the user or host seeked.
    Seeked,
}

/// Opaque handle for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A playable media handle.
pub trait MediaElement {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Start delivering notifications of `kind`.
    fn attach(&mut self, kind: PlaybackEventKind) -> ListenerId;

    /// Stop delivering notifications for a listener returned by [`MediaElement::attach`].
    fn detach(&mut self, id: ListenerId);
}

/// An in-memory media clock.
///
/// Used by the CLI to replay a transcript and by tests to drive the controller without a real
/// player. Position changes report which notification a real element would have fired, but
/// only when someone is listening for it.
#[derive(Debug, Default)]
pub struct SimulatedMedia {
    position: f64,
    listeners: Vec<(ListenerId, PlaybackEventKind)>,
    next_id: u64,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance playback to `position`, as a running player would.
    pub fn advance_to(&mut self, position: f64) -> Option<PlaybackEventKind> {
        self.position = position;
        self.pending(PlaybackEventKind::TimeUpdate)
    }

    /// Jump to `position`.
    pub fn seek(&mut self, position: f64) -> Option<PlaybackEventKind> {
        self.position = position;
        self.pending(PlaybackEventKind::Seeked)
    }

    pub fn listeners(&self) -> &[(ListenerId, PlaybackEventKind)] {
        &self.listeners
    }

    pub fn is_listening(&self, kind: PlaybackEventKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    fn pending(&self, kind: PlaybackEventKind) -> Option<PlaybackEventKind> {
        self.is_listening(kind).then_some(kind)
    }
}

impl MediaElement for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn attach(&mut self, kind: PlaybackEventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind));
        id
    }

    fn detach(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }
}
