#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_VOLUME;

/*
Distance to Pitch
=================

A hand moving between 10 cm and 1 m should sweep the instrument from its
lowest to its highest note. The question is how the notes are spread across
that distance.

Linear vs Log-Uniform
---------------------

Pitch is heard in ratios, not in Hertz. 220 → 440 Hz and 880 → 1760 Hz are
both "one octave" even though the second step is four times wider in Hz.

A linear map (f = lo + (hi - lo) * t) packs the low octaves into a sliver at
the near end and stretches the top octave across most of the range:

    220 Hz ├─┬──┬────┬────────┤ 1760 Hz     (octaves, linear map)

A log-uniform map gives every octave the same slice of distance:

    220 Hz ├─────┬─────┬─────┤ 1760 Hz      (octaves, log-uniform map)

The formula:

    t = (d - d_min) / (d_max - d_min)        normalized distance, 0..1
    f = f_min * (f_max / f_min) ^ t

At t = 0.5 this gives sqrt(f_min * f_max), the geometric mean: 622.25 Hz
for 220..1760, which is the pitch exactly halfway in octaves.


Range Multiplier
----------------

The range control widens or narrows the span symmetrically in octaves:

    f_min' = f_min / range
    f_max' = f_max * range

range = 2.0 adds an octave at each end (110..3520 Hz), range = 0.5 removes
one (440..880 Hz). The span collapses to a single note when

    f_min / range == f_max * range   →   range == sqrt(f_min / f_max)

and below that the map would run backwards. The multiplier is therefore
floored at that collapse point, which keeps the map non-decreasing for any
input.
*/

pub const MIN_DISTANCE: f32 = 0.1;
pub const MAX_DISTANCE: f32 = 1.0;
/// A3
pub const BASE_MIN_FREQUENCY: f32 = 220.0;
/// A6
pub const BASE_MAX_FREQUENCY: f32 = 1760.0;

pub const DEFAULT_FREQUENCY_RANGE: f32 = 1.0;
/// Bounds of the range control exposed to users.
pub const FREQUENCY_RANGE_MIN: f32 = 0.5;
pub const FREQUENCY_RANGE_MAX: f32 = 2.0;

/// Clamped log-uniform mapping from distance (meters) to frequency (Hz).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMapper {
    pub min_distance: f32,
    pub max_distance: f32,
    pub base_min_frequency: f32,
    pub base_max_frequency: f32,
}

impl Default for FrequencyMapper {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            base_min_frequency: BASE_MIN_FREQUENCY,
            base_max_frequency: BASE_MAX_FREQUENCY,
        }
    }
}

impl FrequencyMapper {
    /// True when the bounds describe a playable map: finite distances with
    /// `min < max`, and finite frequencies with `0 < min < max`.
    pub fn is_valid(&self) -> bool {
        let distances = self.min_distance.is_finite()
            && self.max_distance.is_finite()
            && self.min_distance < self.max_distance;
        let frequencies = self.base_min_frequency.is_finite()
            && self.base_max_frequency.is_finite()
            && self.base_min_frequency > 0.0
            && self.base_min_frequency < self.base_max_frequency;
        distances && frequencies
    }

    /// `self` if [valid](Self::is_valid), otherwise the default bounds.
    pub fn validated(self) -> Self {
        if self.is_valid() {
            self
        } else {
            Self::default()
        }
    }

    /// Map a (smoothed) distance to a frequency.
    ///
    /// Distances outside `[min_distance, max_distance]` are clamped; NaN
    /// maps to the near end.
    pub fn map(&self, distance: f32, frequency_range: f32) -> f32 {
        let (low, high) = self.bounds(frequency_range);
        let t = self.normalize(distance);
        low * (high / low).powf(t)
    }

    /// Position of `distance` within the playable span, in `[0, 1]`.
    pub fn normalize(&self, distance: f32) -> f32 {
        let span = self.max_distance - self.min_distance;
        if span <= 0.0 {
            return 0.0;
        }
        let clamped = distance.max(self.min_distance).min(self.max_distance);
        (clamped - self.min_distance) / span
    }

    /// Lowest and highest reachable frequency for `frequency_range`.
    pub fn bounds(&self, frequency_range: f32) -> (f32, f32) {
        let range = self.sanitize_range(frequency_range);
        (
            self.base_min_frequency / range,
            self.base_max_frequency * range,
        )
    }

    /// Smallest multiplier that still spans more than one note.
    pub fn min_range(&self) -> f32 {
        (self.base_min_frequency / self.base_max_frequency)
            .sqrt()
            .max(f32::MIN_POSITIVE)
    }

    /// Floors the multiplier at [`min_range`](Self::min_range). Non-finite
    /// values fall back to the default.
    pub fn sanitize_range(&self, frequency_range: f32) -> f32 {
        if !frequency_range.is_finite() {
            return DEFAULT_FREQUENCY_RANGE;
        }
        frequency_range.max(self.min_range())
    }
}

/// Linear mapping from a normalized UI volume to the engine volume.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMapper {
    pub max_volume: f32,
}

impl Default for VolumeMapper {
    fn default() -> Self {
        Self {
            max_volume: MAX_VOLUME,
        }
    }
}

impl VolumeMapper {
    pub fn new(max_volume: f32) -> Self {
        Self {
            max_volume: max_volume.max(0.0).min(1.0),
        }
    }

    /// `normalized` is clamped into `[0, 1]`; NaN is treated as 0.
    pub fn map(&self, normalized: f32) -> f32 {
        normalized.max(0.0).min(1.0) * self.max_volume
    }

    /// Inverse of [`map`](Self::map), for displaying the current level.
    pub fn normalize(&self, volume: f32) -> f32 {
        if self.max_volume <= 0.0 {
            return 0.0;
        }
        (volume / self.max_volume).max(0.0).min(1.0)
    }
}
