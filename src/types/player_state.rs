use crate::types::track::TrackSource;

/// Transient state behind the single screen. Created with defaults at app
/// start, mutated only by control events, and discarded at teardown.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// True while audio is expected to be audible. Flips only on the
    /// play/pause control, never by querying the sink.
    pub is_playing: bool,
    pub looping: bool,
    /// Sink volume in [0.0, 1.0].
    pub volume: f32,
    pub track: TrackSource,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            is_playing: false,
            looping: true,
            volume: 1.0,
            track: TrackSource::Bundled,
        }
    }

    /// Clamp into the valid sink range before storing.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
