//! Speech synthesizer abstractions
//!
//! Two kinds of backend are used. The primary one is remote: it turns text
//! into compressed audio bytes that the reader decodes, post-processes and
//! plays or exports. The fallback is a local engine that speaks directly
//! through the platform's speech service and produces no audio buffer.

use crate::config::Config;
use crate::voices::VoiceProfile;
use crate::{NovelReaderError, Result};
use log::{info, warn};

/// Remote text-to-audio backend
pub trait SpeechSynthesizer {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Synthesize text in the given voice, returning encoded audio
    fn synthesize(&mut self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>>;
}

/// Local speech engine that plays directly
///
/// All backends implement this to provide text-to-speech.
pub trait LocalSynth {
    /// Set speech rate in words per minute
    fn set_rate(&mut self, wpm: u32) -> Result<()>;

    /// Set speech volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Set voice by index (platform-specific)
    fn set_voice_idx(&mut self, idx: usize) -> Result<()>;

    /// Speak text, blocking until the engine is done
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Names of the voices the engine offers
    fn voice_names(&self) -> Result<Vec<String>>;

    /// Apply a voice's settings and speak
    fn speak_as(&mut self, voice: &LocalVoice, text: &str) -> Result<()> {
        self.set_voice_idx(voice.voice_idx)?;
        self.set_rate(voice.rate_wpm)?;
        self.set_volume(voice.volume)?;
        self.speak(text)
    }
}

/// Settings for the local engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVoice {
    pub voice_idx: usize,
    pub rate_wpm: u32,
    pub volume: f32,
}

impl LocalVoice {
    /// Narrator and characters get different local voices and speeds
    pub fn for_speaker(is_narrator: bool, config: &Config) -> Self {
        if is_narrator {
            Self {
                voice_idx: config.fallback_narrator_voice(),
                rate_wpm: config.fallback_narrator_rate(),
                volume: config.fallback_volume(),
            }
        } else {
            Self {
                voice_idx: config.fallback_character_voice(),
                rate_wpm: config.fallback_character_rate(),
                volume: config.fallback_volume(),
            }
        }
    }
}

type LocalFactory = Box<dyn FnMut() -> Result<Box<dyn LocalSynth>>>;

/// Lazily started local engine
///
/// The engine is only brought up the first time it is needed. If it fails
/// to start, the failure is remembered and every later request is refused
/// without retrying.
pub struct LocalBackend {
    factory: Option<LocalFactory>,
    synth: Option<Box<dyn LocalSynth>>,
    failure: Option<String>,
}

impl LocalBackend {
    /// Platform engine, started on first use
    pub fn native() -> Self {
        Self::lazy(create_local_synth)
    }

    /// Engine built by a factory on first use
    pub fn lazy(factory: impl FnMut() -> Result<Box<dyn LocalSynth>> + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            synth: None,
            failure: None,
        }
    }

    /// An engine that is already running
    pub fn with(synth: Box<dyn LocalSynth>) -> Self {
        Self {
            factory: None,
            synth: Some(synth),
            failure: None,
        }
    }

    /// No local engine at all
    pub fn unavailable(reason: &str) -> Self {
        Self {
            factory: None,
            synth: None,
            failure: Some(reason.to_string()),
        }
    }

    /// Get the engine, starting it if needed
    pub fn get(&mut self) -> Result<&mut (dyn LocalSynth + 'static)> {
        if self.synth.is_none() {
            if let Some(reason) = &self.failure {
                return Err(NovelReaderError::Synthesis(reason.clone()));
            }
            let mut factory = self.factory.take().ok_or_else(|| {
                NovelReaderError::Synthesis("No local speech engine configured".to_string())
            })?;
            match factory() {
                Ok(synth) => {
                    info!("Local speech engine started");
                    self.synth = Some(synth);
                }
                Err(e) => {
                    warn!("Local speech engine unavailable: {}", e);
                    self.failure = Some(e.to_string());
                    return Err(e);
                }
            }
        }

        match self.synth.as_deref_mut() {
            Some(synth) => Ok(synth),
            None => Err(NovelReaderError::Synthesis(
                "Local speech engine unavailable".to_string(),
            )),
        }
    }
}

/// Create the platform's local speech engine
pub fn create_local_synth() -> Result<Box<dyn LocalSynth>> {
    info!(
        "Creating native speech synthesizer for platform: {}",
        std::env::consts::OS
    );
    use super::backends::native::NativeSynth;

    match NativeSynth::new() {
        Ok(synth) => {
            info!("✓ Successfully initialized native TTS backend");
            Ok(Box::new(synth))
        }
        Err(e) => Err(NovelReaderError::Synthesis(format!(
            "Failed to initialize speech backend for platform '{}': {}",
            std::env::consts::OS,
            e
        ))),
    }
}
