use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::audio::playback::{AudioOutput, PlaybackHandle};
use crate::types::player_state::PlayerState;
use crate::types::track::TrackSource;
use crate::ui::controls::{self, ControlEvent};

/// How long the advisory message stays on screen.
const NOTICE_DURATION: Duration = Duration::from_secs(3);

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];

/// Transient advisory message shown near the bottom of the screen.
struct Notice {
    text: String,
    expires_at: Instant,
}

impl Notice {
    fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// The single screen: owns the UI state, the audio output, and at most one
/// playback handle at a time.
pub struct LullApp {
    pub state: PlayerState,
    output: Option<AudioOutput>,
    playback: Option<PlaybackHandle>,
    notice: Option<Notice>,
}

impl LullApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let output = match AudioOutput::new() {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!("audio output unavailable: {e:#}");
                None
            }
        };
        let mut app = Self::with_output(output);
        app.reload_playback();
        app
    }

    /// Build the app around an (optional) audio output without loading the
    /// default track yet.
    fn with_output(output: Option<AudioOutput>) -> Self {
        Self {
            state: PlayerState::new(),
            output,
            playback: None,
            notice: None,
        }
    }

    /// Dispose the current handle, then build a fresh one for the selected
    /// track with the current loop flag and volume pre-applied. The old sink
    /// is always released before the new one exists.
    fn reload_playback(&mut self) {
        self.playback.take();
        let Some(output) = &self.output else {
            return;
        };
        match PlaybackHandle::new(output, &self.state.track, self.state.looping, self.state.volume)
        {
            Ok(handle) => self.playback = Some(handle),
            Err(e) => {
                tracing::warn!("could not load {}: {e:#}", self.state.track.display_name());
            }
        }
    }

    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::PlayPausePressed => self.toggle_play(),
            ControlEvent::LoopToggled(looping) => self.set_looping(looping),
            ControlEvent::VolumeChanged(volume) => self.set_volume(volume),
            // Opens a modal dialog, handled in `update`.
            ControlEvent::PickRequested => {}
        }
    }

    /// No-op when no handle exists (e.g. the track failed to load).
    fn toggle_play(&mut self) {
        let Some(playback) = &self.playback else {
            return;
        };
        if self.state.is_playing {
            playback.pause();
        } else {
            playback.play();
        }
        self.state.is_playing = !self.state.is_playing;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.looping = looping;
        if let Some(playback) = &self.playback {
            playback.set_looping(looping);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.set_volume(volume);
        if let Some(playback) = &self.playback {
            playback.set_volume(self.state.volume);
        }
    }

    /// Guard for the file picker: selection is blocked while audio plays.
    /// Returns whether the picker may open.
    fn try_begin_pick(&mut self) -> bool {
        if self.state.is_playing {
            self.show_notice("An audio file is already playing.");
            return false;
        }
        true
    }

    pub fn select_track(&mut self, path: PathBuf) {
        self.state.track = TrackSource::File(path);
        self.reload_playback();
    }

    fn show_notice(&mut self, text: &str) {
        self.notice = Some(Notice::new(text, NOTICE_DURATION));
    }

    fn pick_and_select(&mut self) {
        if !self.try_begin_pick() {
            return;
        }
        let picked = rfd::FileDialog::new()
            .add_filter("Audio", AUDIO_EXTENSIONS)
            .set_title("Select Audio")
            .pick_file();
        if let Some(path) = picked {
            self.select_track(path);
        }
    }
}

impl eframe::App for LullApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.notice.as_ref().is_some_and(|notice| notice.expired()) {
            self.notice = None;
        }

        let events = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                egui::Image::new(egui::include_image!("../../assets/backdrop.png"))
                    .paint_at(ui, ui.max_rect());
                controls::controls_panel(ui, &self.state)
            })
            .inner;

        for event in events {
            if event == ControlEvent::PickRequested {
                self.pick_and_select();
            } else {
                self.handle_event(event);
            }
        }

        if let Some(notice) = &self.notice {
            egui::Area::new(egui::Id::new("advisory_notice"))
                .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(&notice.text);
                    });
                });
            // Wake up again so the message clears once it expires.
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Release the sink before the output stream goes away.
        self.playback.take();
    }
}
