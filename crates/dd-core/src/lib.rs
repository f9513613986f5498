/// Symbol table, transcoding, timing and playback scheduling for ditdah.
///
/// This crate contains the pure domain logic shared across the ditdah
/// workspace. It performs no I/O and never touches an audio device.

pub mod clock;
pub mod code;
pub mod config;
pub mod scheduler;
pub mod sheet;
pub mod timing;
pub mod transcode;

pub use clock::StreamClock;
pub use code::{CodeTable, Symbol};
pub use config::PlayerConfig;
pub use scheduler::{PlaybackScheduler, PlaybackState, ToneSink};
pub use sheet::TranscodeSheet;
pub use timing::MorseTiming;
pub use transcode::{morse_to_text, text_to_morse};
