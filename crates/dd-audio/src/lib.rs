// Sortie audio cpal et synthèse de tonalités pour ditdah.

pub mod error;
pub mod output;
pub mod synth;

pub use error::AudioError;
pub use output::ToneOutput;
