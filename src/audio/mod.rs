pub mod looping;
pub mod playback;
