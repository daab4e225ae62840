mod acquire;
mod segment;

pub use acquire::{acquire_audio, AcquireError, AcquiredAudio};
pub use segment::{segment_audio, AudioSegment, SegmentError, SegmentLimits, SEGMENT_SAMPLE_RATE};
