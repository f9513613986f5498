use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Horloge de flux partagée entre le callback audio et la boucle d'app.
///
/// Le callback cpal est le maître: il avance `sample_pos` à chaque buffer
/// rendu. La boucle d'app lit `elapsed()` pour dater les requêtes de
/// lecture et cadencer le scheduler.
///
/// Tous les champs sont atomiques — zero-alloc, zero-lock, `Send + Sync`.
///
/// # Example
/// ```
/// use dd_core::clock::StreamClock;
/// let clock = StreamClock::new(48_000);
/// clock.advance(24_000);
/// assert!((clock.elapsed_secs() - 0.5).abs() < 1e-9);
/// ```
pub struct StreamClock {
    /// Samples rendus depuis l'ouverture du flux (mono, device rate).
    sample_pos: AtomicU64,
    /// Sample rate du device (immuable après init).
    sample_rate: AtomicU32,
}

impl StreamClock {
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_pos: AtomicU64::new(0),
            sample_rate: AtomicU32::new(sample_rate),
        }
    }

    /// Avance la position de `frames` samples (appelé par le callback cpal).
    #[inline]
    pub fn advance(&self, frames: u64) {
        self.sample_pos.fetch_add(frames, Ordering::Relaxed);
    }

    /// Position courante en samples.
    #[inline]
    #[must_use]
    pub fn sample_pos(&self) -> u64 {
        self.sample_pos.load(Ordering::Relaxed)
    }

    /// Sample rate du flux.
    #[inline]
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    /// Position courante en secondes, dérivée de `sample_pos / sample_rate`.
    #[inline]
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        let rate = self.sample_rate.load(Ordering::Relaxed);
        if rate == 0 {
            return 0.0;
        }
        self.sample_pos.load(Ordering::Relaxed) as f64 / f64::from(rate)
    }

    /// Position courante en `Duration`.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_frames() {
        let clock = StreamClock::new(48_000);
        assert_eq!(clock.sample_pos(), 0);
        clock.advance(48_000);
        clock.advance(24_000);
        assert_eq!(clock.sample_pos(), 72_000);
        assert!((clock.elapsed_secs() - 1.5).abs() < 1e-9);
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn clock_zero_sample_rate() {
        let clock = StreamClock::new(0);
        clock.advance(1000);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }
}
