#[cfg(feature = "rtrb")]
use rtrb::Producer;

/// Destination for a copy of the rendered mono signal (scopes, meters).
///
/// Called from the audio callback once per frame, so implementations must not
/// block or allocate. Dropping samples when full is fine.
pub trait SampleSink {
    fn push(&mut self, sample: f32);
}

/// Discards everything.
impl SampleSink for () {
    fn push(&mut self, _sample: f32) {}
}

#[cfg(feature = "rtrb")]
impl SampleSink for Producer<f32> {
    fn push(&mut self, sample: f32) {
        let _ = Producer::push(self, sample);
    }
}
