use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/*
Lock-Free Parameter Handoff
===========================

Two threads touch the tone parameters:

  control     UI key presses, ranging updates. Ordinary thread, may block.
  render      The audio callback. Must finish within its deadline every time.

A mutex shared between the two lets the control thread hold the lock while
it is descheduled, and the audio callback then waits on it. That wait is a
dropout.

Instead both values live in one 64-bit atomic word:

     63            32 31             0
    ┌────────────────┬────────────────┐
    │ frequency bits │  volume bits   │     (f32::to_bits of each)
    └────────────────┴────────────────┘

  - The render side does one `load` per callback. It always sees a pair
    that some control call stored as a whole, never half of an update.
  - The control side updates one half with a compare-and-swap loop that
    preserves the other half. Retrying only ever costs the control thread.
  - Writes overwrite. If several land between two callbacks, the render side
    sees the last one and nothing queues up.
*/

/// Lowest frequency the store accepts. Anything below (or NaN) is raised to it.
pub const MIN_FREQUENCY: f32 = 1.0;

/// One consistent frequency/volume pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    /// Hz
    pub frequency: f32,
    /// Engine volume, already scaled (0..=max_volume)
    pub volume: f32,
}

impl ToneParams {
    pub fn new(frequency: f32, volume: f32) -> Self {
        Self {
            frequency: sanitize_frequency(frequency),
            volume: sanitize_volume(volume),
        }
    }

    #[inline]
    fn pack(self) -> u64 {
        ((self.frequency.to_bits() as u64) << 32) | self.volume.to_bits() as u64
    }

    #[inline]
    fn unpack(word: u64) -> Self {
        Self {
            frequency: f32::from_bits((word >> 32) as u32),
            volume: f32::from_bits(word as u32),
        }
    }
}

fn sanitize_frequency(frequency: f32) -> f32 {
    if frequency.is_finite() {
        frequency.max(MIN_FREQUENCY)
    } else {
        MIN_FREQUENCY
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.max(0.0)
    } else {
        0.0
    }
}

/// State shared between [`ToneControl`](super::ToneControl) and
/// [`ToneRenderer`](super::ToneRenderer).
#[derive(Debug)]
pub struct SharedParams {
    tone: AtomicU64,
    shutdown: AtomicBool,
}

impl SharedParams {
    pub fn new(initial: ToneParams) -> Self {
        let initial = ToneParams::new(initial.frequency, initial.volume);
        Self {
            tone: AtomicU64::new(initial.pack()),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Read both values at once. Wait-free.
    #[inline]
    pub fn snapshot(&self) -> ToneParams {
        ToneParams::unpack(self.tone.load(Ordering::Acquire))
    }

    /// Returns the frequency as stored, after the floor is applied.
    pub fn set_frequency(&self, frequency: f32) -> f32 {
        let frequency = sanitize_frequency(frequency);
        self.update(|params| ToneParams { frequency, ..params });
        frequency
    }

    pub fn set_volume(&self, volume: f32) {
        let volume = sanitize_volume(volume);
        self.update(|params| ToneParams { volume, ..params });
    }

    fn update(&self, apply: impl Fn(ToneParams) -> ToneParams) {
        // The closure never returns None, so this cannot fail
        let _ = self
            .tone
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                Some(apply(ToneParams::unpack(word)).pack())
            });
    }

    /// Flag the engine as stopped. Returns `true` only for the first call.
    pub fn shut_down(&self) -> bool {
        !self.shutdown.swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_keeps_both_halves() {
        let params = ToneParams::new(622.25, 0.4);
        assert_eq!(ToneParams::unpack(params.pack()), params);
    }

    #[test]
    fn setters_touch_only_their_half() {
        let shared = SharedParams::new(ToneParams::new(440.0, 0.5));
        shared.set_frequency(880.0);
        assert_eq!(shared.snapshot(), ToneParams::new(880.0, 0.5));
        shared.set_volume(0.25);
        assert_eq!(shared.snapshot(), ToneParams::new(880.0, 0.25));
    }

    #[test]
    fn latest_write_wins() {
        let shared = SharedParams::new(ToneParams::new(440.0, 0.5));
        for hz in [300.0, 310.0, 320.0, 330.0] {
            shared.set_frequency(hz);
        }
        assert_eq!(shared.snapshot().frequency, 330.0);
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let shared = SharedParams::new(ToneParams::new(440.0, 0.5));
        assert_eq!(shared.set_frequency(0.0), MIN_FREQUENCY);
        assert_eq!(shared.snapshot().frequency, MIN_FREQUENCY);
        shared.set_frequency(-20.0);
        assert_eq!(shared.snapshot().frequency, MIN_FREQUENCY);
        shared.set_frequency(f32::NAN);
        assert_eq!(shared.snapshot().frequency, MIN_FREQUENCY);
        shared.set_volume(f32::NAN);
        assert_eq!(shared.snapshot().volume, 0.0);
    }

    #[test]
    fn shutdown_reports_first_call_only() {
        let shared = SharedParams::new(ToneParams::new(440.0, 0.5));
        assert!(!shared.is_shut_down());
        assert!(shared.shut_down());
        assert!(!shared.shut_down());
        assert!(shared.is_shut_down());
    }
}
