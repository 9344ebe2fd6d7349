use std::f64::consts::TAU;

/*
Phase Accumulator Sine
======================

The oscillator keeps a single running angle, `phase`, and advances it by a
fixed step every sample. The output is simply `sin(phase) * volume`.

Vocabulary
----------

  phase       Current angle in radians. Always kept in [0, 2π).

  increment   How far `phase` moves per sample:

                  increment = 2π * frequency / sample_rate

              At 440 Hz and 48 kHz: 2π * 440 / 48000 ≈ 0.0576 rad/sample,
              so one cycle takes ~109 samples.

  wrap        When `phase` reaches 2π it is pulled back by 2π. Sine is
              periodic, so the output does not change, but the number stays
              small and keeps its precision.


Why Wrap At All?
----------------

Without wrapping, `phase` grows forever. After an hour at 1 kHz it would be
around 2.3e7 radians. An f64 still represents that, but the spacing between
neighbouring values grows with magnitude, so every sample picks up a little
more rounding error and the pitch slowly smears. Wrapping keeps the value in
[0, 2π) where the spacing is as fine as it gets.

A single subtraction is enough as long as increment <= 2π. Frequencies are
clamped to Nyquist (sample_rate / 2), which caps increment at π.


Continuity Across Callbacks
---------------------------

The audio device asks for samples one buffer at a time. `phase` is stored in
the oscillator and carried into the next buffer, so consecutive buffers join
without a jump in the waveform:

    buffer n          buffer n+1
    ...╱‾‾╲__╱‾‾╲_  |  _╱‾‾╲__╱...     continuous

    (phase reset)   |
    ...╱‾‾╲__╱‾‾╲_  |‾‾╲__╱‾‾╲...      click at the boundary

A frequency change between buffers only changes the slope at the seam. That
is heard as a pitch step, never as a click.


Channels
--------

The tone is mono. Each frame's sample is copied into every channel of the
interleaved output buffer:

    [L0 R0 L1 R1 L2 R2 ...]   with L_i == R_i
*/

/// Sine oscillator driven by a phase accumulator.
///
/// Holds no parameters other than phase and sample rate. Frequency and volume
/// are passed per call so the caller decides when they are sampled.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    phase: f64,
    sample_rate: f32,
}

impl OscillatorBlock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current phase in radians, in `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Phase step per sample for `frequency`, clamped to `[0, nyquist]`.
    #[inline]
    pub fn phase_increment(&self, frequency: f32) -> f64 {
        let sample_rate = self.sample_rate as f64;
        let frequency = if frequency.is_finite() {
            (frequency as f64).clamp(0.0, sample_rate * 0.5)
        } else {
            0.0
        };
        TAU * frequency / sample_rate
    }

    /// Fill a mono buffer.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, volume: f32) {
        self.render_interleaved(out, 1, frequency, volume);
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    ///
    /// Trailing samples that do not make up a whole frame are zeroed.
    pub fn render_interleaved(
        &mut self,
        out: &mut [f32],
        channels: usize,
        frequency: f32,
        volume: f32,
    ) {
        let channels = channels.max(1);
        let increment = self.phase_increment(frequency);
        let volume = volume as f64;

        let mut frames = out.chunks_exact_mut(channels);
        for frame in &mut frames {
            let sample = (self.phase.sin() * volume) as f32;
            frame.fill(sample);

            self.phase += increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
        frames.into_remainder().fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = OscillatorBlock::new(sample_rate);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, 1.0);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * frequency as f64 * sample_index as f64 / sample_rate as f64).sin();
        let actual = buffer[sample_index] as f64;
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn phase_continues_across_blocks() {
        let mut split = OscillatorBlock::new(48_000.0);
        let mut whole = OscillatorBlock::new(48_000.0);

        let mut first = vec![0.0f32; 100];
        let mut second = vec![0.0f32; 100];
        split.render(&mut first, 523.25, 0.5);
        split.render(&mut second, 523.25, 0.5);

        let mut reference = vec![0.0f32; 200];
        whole.render(&mut reference, 523.25, 0.5);

        assert_eq!(&reference[..100], &first[..]);
        assert_eq!(&reference[100..], &second[..]);
    }

    #[test]
    fn fans_mono_out_to_all_channels() {
        let mut osc = OscillatorBlock::new(44_100.0);
        let mut buffer = vec![0.0f32; 3 * 64];
        osc.render_interleaved(&mut buffer, 3, 330.0, 0.7);

        for frame in buffer.chunks_exact(3) {
            assert_eq!(frame[0], frame[1]);
            assert_eq!(frame[1], frame[2]);
        }
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn partial_frame_is_zeroed() {
        let mut osc = OscillatorBlock::new(48_000.0);
        let mut buffer = vec![1.0f32; 7];
        osc.render_interleaved(&mut buffer, 2, 1000.0, 0.8);
        assert_eq!(buffer[6], 0.0);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = OscillatorBlock::new(48_000.0);
        let mut buffer = vec![0.0f32; 256];
        for &freq in &[20.0, 440.0, 12_000.0, 24_000.0, 96_000.0, f32::INFINITY, -50.0] {
            for _ in 0..50 {
                osc.render(&mut buffer, freq, 0.8);
                assert!(
                    (0.0..TAU).contains(&osc.phase()),
                    "phase {} out of range at {freq} Hz",
                    osc.phase()
                );
            }
        }
    }

    #[test]
    fn increment_is_clamped_to_nyquist() {
        let osc = OscillatorBlock::new(48_000.0);
        assert!((osc.phase_increment(24_000.0) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(osc.phase_increment(30_000.0), osc.phase_increment(24_000.0));
        assert_eq!(osc.phase_increment(f32::NAN), 0.0);
    }
}
