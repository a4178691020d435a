//! Speech synthesis backends

pub mod backends;
pub mod synth;

pub use synth::{create_local_synth, LocalBackend, LocalSynth, LocalVoice, SpeechSynthesizer};
