use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::{Sample, Source};

/// Source adapter that restarts its inner source at end-of-stream while the
/// shared flag is set.
///
/// The flag can be flipped at any time from the UI thread; the audio thread
/// observes it the next time the inner source runs out, so toggling looping
/// on a live sink needs no rebuild. The pristine template is cloned for each
/// restart, which requires a cloneable source such as `Buffered`.
pub struct LoopingSource<S>
where
    S: Source + Clone,
    S::Item: Sample,
{
    template: S,
    inner: S,
    looping: Arc<AtomicBool>,
}

impl<S> LoopingSource<S>
where
    S: Source + Clone,
    S::Item: Sample,
{
    pub fn new(source: S, looping: Arc<AtomicBool>) -> Self {
        Self {
            inner: source.clone(),
            template: source,
            looping,
        }
    }
}

impl<S> Iterator for LoopingSource<S>
where
    S: Source + Clone,
    S::Item: Sample,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sample) = self.inner.next() {
            return Some(sample);
        }
        if !self.looping.load(Ordering::Relaxed) {
            return None;
        }
        // Restart from the pristine copy. An empty template stays finished,
        // so this cannot spin.
        self.inner = self.template.clone();
        self.inner.next()
    }
}

impl<S> Source for LoopingSource<S>
where
    S: Source + Clone,
    S::Item: Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        if self.looping.load(Ordering::Relaxed) {
            None
        } else {
            self.template.total_duration()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;
    use rodio::source::Buffered;

    fn short_source(samples: Vec<f32>) -> Buffered<SamplesBuffer<f32>> {
        SamplesBuffer::new(1, 44_100, samples).buffered()
    }

    #[test]
    fn test_plays_through_once_when_not_looping() {
        let flag = Arc::new(AtomicBool::new(false));
        let source = LoopingSource::new(short_source(vec![0.1, 0.2, 0.3]), flag);
        let out: Vec<f32> = source.collect();
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_repeats_while_flag_is_set() {
        let flag = Arc::new(AtomicBool::new(true));
        let source = LoopingSource::new(short_source(vec![0.1, 0.2, 0.3]), flag);
        let out: Vec<f32> = source.take(9).collect();
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_clearing_the_flag_ends_at_the_next_boundary() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut source = LoopingSource::new(short_source(vec![0.1, 0.2, 0.3]), Arc::clone(&flag));

        // First pass plus the restart into a second one.
        for _ in 0..4 {
            assert!(source.next().is_some());
        }
        flag.store(false, Ordering::Relaxed);

        // The second pass finishes, then the stream ends instead of
        // restarting again.
        assert_eq!(source.next(), Some(0.2));
        assert_eq!(source.next(), Some(0.3));
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_setting_the_flag_mid_stream_enables_the_restart() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut source = LoopingSource::new(short_source(vec![0.5, 0.6]), Arc::clone(&flag));

        assert_eq!(source.next(), Some(0.5));
        flag.store(true, Ordering::Relaxed);
        assert_eq!(source.next(), Some(0.6));
        // Instead of ending, the source restarts.
        assert_eq!(source.next(), Some(0.5));
    }

    #[test]
    fn test_empty_source_terminates_even_when_looping() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut source = LoopingSource::new(short_source(Vec::new()), flag);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_total_duration_is_unbounded_while_looping() {
        let flag = Arc::new(AtomicBool::new(true));
        let source = LoopingSource::new(short_source(vec![0.0; 441]), Arc::clone(&flag));
        assert!(source.total_duration().is_none());

        flag.store(false, Ordering::Relaxed);
        assert!(source.total_duration().is_some());
    }
}
