use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default track shipped inside the binary.
static WHITE_NOISE: &[u8] = include_bytes!("../../assets/white_noise.wav");

/// Opaque locator for the currently selected track: either the bundled
/// default or a file the user picked from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    Bundled,
    File(PathBuf),
}

impl TrackSource {
    /// The track's raw (still encoded) bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            TrackSource::Bundled => Ok(WHITE_NOISE.to_vec()),
            TrackSource::File(path) => std::fs::read(path)
                .with_context(|| format!("failed to read audio file {}", path.display())),
        }
    }

    /// Short name shown under the controls.
    pub fn display_name(&self) -> String {
        match self {
            TrackSource::Bundled => "White noise (built-in)".to_string(),
            TrackSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

impl Default for TrackSource {
    fn default() -> Self {
        TrackSource::Bundled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_track_is_a_wav() {
        let bytes = TrackSource::Bundled.read().unwrap();
        assert!(bytes.len() > 44);
        assert_eq!(&bytes[..4], b"RIFF");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TrackSource::Bundled.display_name(), "White noise (built-in)");
        let picked = TrackSource::File(PathBuf::from("/sounds/rain at night.ogg"));
        assert_eq!(picked.display_name(), "rain at night.ogg");
    }

    #[test]
    fn test_missing_file_read_is_an_error() {
        let missing = TrackSource::File(PathBuf::from("/no/such/dir/hiss.wav"));
        assert!(missing.read().is_err());
    }

    #[test]
    fn test_default_is_bundled() {
        assert_eq!(TrackSource::default(), TrackSource::Bundled);
    }
}
