//! Simulated ranging peer
//!
//! Stands in for the device-to-device distance measurement. It reports
//! nothing while "disconnected", then the hand position plus uniform jitter.
//! The hand is moved from the keyboard or by an automatic sweep.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

use theremin_dsp::dsp::mapping::{MAX_DISTANCE, MIN_DISTANCE};

/// Hand travel, a little past the playable span on both ends
const HAND_MIN: f32 = 0.0;
const HAND_MAX: f32 = 1.5;

/// Sweep turning points
const SWEEP_LOW: f32 = MIN_DISTANCE - 0.05;
const SWEEP_HIGH: f32 = MAX_DISTANCE + 0.1;

const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(8);

pub struct SimulatedRanging {
    connected: bool,
    /// Hand distance in meters, before jitter
    hand: f32,
    /// Max noise amplitude in meters
    jitter: f32,
    sweeping: bool,
    /// Position within one sweep cycle (0.0-1.0)
    sweep_phase: f32,
    sweep_period: Duration,
    rng: StdRng,
    last_reading: Option<f32>,
}

impl SimulatedRanging {
    pub fn new(jitter: f32) -> Self {
        Self::with_rng(jitter, StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(jitter: f32, seed: u64) -> Self {
        Self::with_rng(jitter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(jitter: f32, rng: StdRng) -> Self {
        let jitter = if jitter.is_finite() { jitter.abs() } else { 0.0 };
        Self {
            connected: true,
            hand: 0.5,
            jitter,
            sweeping: false,
            sweep_phase: 0.0,
            sweep_period: DEFAULT_SWEEP_PERIOD,
            rng,
            last_reading: None,
        }
    }

    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    pub fn with_sweep(mut self, sweeping: bool) -> Self {
        self.sweeping = sweeping;
        self
    }

    /// Advance by `dt` and take a reading. `None` while disconnected.
    pub fn poll(&mut self, dt: Duration) -> Option<f32> {
        if self.sweeping {
            self.advance_sweep(dt);
        }

        if !self.connected {
            self.last_reading = None;
            return None;
        }

        let noise = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        let reading = (self.hand + noise).max(0.0);
        self.last_reading = Some(reading);
        Some(reading)
    }

    fn advance_sweep(&mut self, dt: Duration) {
        let period = self.sweep_period.as_secs_f32().max(f32::EPSILON);
        self.sweep_phase = (self.sweep_phase + dt.as_secs_f32() / period).fract();

        // Triangle: out and back once per period
        let tri = 1.0 - (2.0 * self.sweep_phase - 1.0).abs();
        self.hand = SWEEP_LOW + (SWEEP_HIGH - SWEEP_LOW) * tri;
    }

    /// Move the hand by `delta` meters. Stops the sweep.
    pub fn nudge(&mut self, delta: f32) {
        self.sweeping = false;
        self.hand = (self.hand + delta).clamp(HAND_MIN, HAND_MAX);
    }

    pub fn toggle_connection(&mut self) {
        self.connected = !self.connected;
    }

    pub fn toggle_sweep(&mut self) {
        self.sweeping = !self.sweeping;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeping
    }

    pub fn hand(&self) -> f32 {
        self.hand
    }

    pub fn last_reading(&self) -> Option<f32> {
        self.last_reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    #[test]
    fn disconnected_peer_reports_nothing() {
        let mut ranging = SimulatedRanging::seeded(0.01, 1).with_connected(false);
        assert_eq!(ranging.poll(TICK), None);
        assert_eq!(ranging.last_reading(), None);

        ranging.toggle_connection();
        assert!(ranging.poll(TICK).is_some());
    }

    #[test]
    fn without_jitter_reading_is_hand() {
        let mut ranging = SimulatedRanging::seeded(0.0, 1);
        ranging.nudge(0.25);
        assert_eq!(ranging.poll(TICK), Some(0.75));
    }

    #[test]
    fn jitter_is_bounded() {
        let mut ranging = SimulatedRanging::seeded(0.02, 7);
        for _ in 0..1_000 {
            let reading = ranging.poll(TICK).unwrap();
            assert!((reading - 0.5).abs() <= 0.02 + 1e-6, "reading {reading}");
        }
    }

    #[test]
    fn nudge_clamps_and_stops_sweep() {
        let mut ranging = SimulatedRanging::seeded(0.0, 1).with_sweep(true);
        ranging.nudge(10.0);
        assert_eq!(ranging.hand(), HAND_MAX);
        assert!(!ranging.is_sweeping());
        ranging.nudge(-10.0);
        assert_eq!(ranging.hand(), HAND_MIN);
    }

    #[test]
    fn sweep_covers_playable_span() {
        let mut ranging = SimulatedRanging::seeded(0.0, 1).with_sweep(true);
        let mut low = f32::MAX;
        let mut high = f32::MIN;
        for _ in 0..1_000 {
            let reading = ranging.poll(TICK).unwrap();
            low = low.min(reading);
            high = high.max(reading);
        }
        assert!(low < MIN_DISTANCE && low >= SWEEP_LOW - 1e-6, "low {low}");
        assert!(high > MAX_DISTANCE && high <= SWEEP_HIGH + 1e-6, "high {high}");
    }
}
