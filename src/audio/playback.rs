use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::audio::looping::LoopingSource;
use crate::types::track::TrackSource;

/// Keeps the device output stream alive for the whole app life; sinks are
/// created against its handle.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("failed to open default audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn stream_handle(&self) -> &OutputStreamHandle {
        &self.handle
    }
}

/// Decode a track into a buffered source that can be cloned for loop
/// restarts. Split out of `PlaybackHandle::new` so it is testable without an
/// audio device.
pub(crate) fn decode_track(track: &TrackSource) -> Result<Buffered<Decoder<Cursor<Vec<u8>>>>> {
    let bytes = track.read()?;
    let decoder = Decoder::new(Cursor::new(bytes))
        .with_context(|| format!("failed to decode {}", track.display_name()))?;
    Ok(decoder.buffered())
}

/// One loaded track on the audio device.
///
/// A fresh handle is prepared but silent; `play` starts audio. Dropping the
/// handle stops the sink and releases the device slot.
pub struct PlaybackHandle {
    sink: Sink,
    looping: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// Build a paused sink for `track` with the loop flag and volume already
    /// applied.
    pub fn new(
        output: &AudioOutput,
        track: &TrackSource,
        looping: bool,
        volume: f32,
    ) -> Result<Self> {
        let source = decode_track(track)?;
        let flag = Arc::new(AtomicBool::new(looping));
        let sink = Sink::try_new(output.stream_handle()).context("failed to create audio sink")?;
        sink.pause();
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(LoopingSource::new(source, Arc::clone(&flag)));
        tracing::info!(track = %track.display_name(), looping, "loaded track");
        Ok(Self {
            sink,
            looping: flag,
        })
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Takes effect at the next end-of-stream without rebuilding the sink.
    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Relaxed);
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Relaxed)
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.sink.stop();
        tracing::debug!(looping = self.is_looping(), "released playback handle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_test_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..800i32 {
            writer.write_sample(((i % 64) * 512 - 16_384) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_bundled_track() {
        let source = decode_track(&TrackSource::Bundled).unwrap();
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 22_050);
    }

    #[test]
    fn test_decode_picked_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path);

        let source = decode_track(&TrackSource::File(path)).unwrap();
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 8_000);
        assert!(source.count() > 0);
    }

    #[test]
    fn test_decode_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_audio.txt");
        std::fs::write(&path, b"definitely not audio").unwrap();

        assert!(decode_track(&TrackSource::File(path)).is_err());
    }

    #[test]
    fn test_decode_missing_file_is_an_error() {
        let missing = TrackSource::File("/no/such/dir/hiss.wav".into());
        assert!(decode_track(&missing).is_err());
    }
}
