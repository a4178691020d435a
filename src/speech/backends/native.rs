//! Local TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - SAPI/WinRT on Windows
//!
//! It is the reader's fallback when the remote backend cannot be reached,
//! and the only backend with `--no-google`.

use crate::speech::LocalSynth;
use crate::{NovelReaderError, Result};
use log::{debug, error, warn};
use std::thread;
use std::time::Duration;
use tts::Tts as TtsCrate;

/// Words per minute the engine's normal rate corresponds to
const NORMAL_WPM: f32 = 200.0;

/// How often to check whether the engine is still talking
const SPEAKING_POLL: Duration = Duration::from_millis(50);

/// Local TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Cached rate setting (words per minute)
    rate: Option<u32>,

    /// Cached volume setting (0.0-1.0)
    volume: Option<f32>,

    /// Cached voice index
    voice_idx: Option<usize>,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    ///
    /// Initializes the platform-appropriate TTS backend
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| NovelReaderError::Synthesis(format!("Failed to initialize TTS: {}", e)))?;

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            rate: None,
            volume: None,
            voice_idx: None,
        })
    }

    /// Convert words per minute to the engine's rate scale
    ///
    /// The engine's normal rate is taken as 200 wpm and the result is kept
    /// inside the range the platform accepts.
    fn convert_rate(&self, wpm: u32) -> f32 {
        let normal = self.tts.normal_rate();
        let rate = normal * (wpm as f32 / NORMAL_WPM);
        rate.clamp(self.tts.min_rate(), self.tts.max_rate())
    }

    /// Block until the engine stops talking, if it can tell us
    fn wait_until_done(&self) -> Result<()> {
        if !self.tts.supported_features().is_speaking {
            return Ok(());
        }

        loop {
            let speaking = self.tts.is_speaking().map_err(|e| {
                NovelReaderError::Synthesis(format!("Failed to query speech state: {}", e))
            })?;
            if !speaking {
                return Ok(());
            }
            thread::sleep(SPEAKING_POLL);
        }
    }
}

impl LocalSynth for NativeSynth {
    fn set_rate(&mut self, wpm: u32) -> Result<()> {
        if self.rate == Some(wpm) {
            return Ok(());
        }
        debug!("Setting rate to {} wpm", wpm);
        self.rate = Some(wpm);

        // Check if rate control is supported
        let features = self.tts.supported_features();
        if !features.rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let converted_rate = self.convert_rate(wpm);
        self.tts
            .set_rate(converted_rate)
            .map_err(|e| NovelReaderError::Synthesis(format!("Failed to set rate: {}", e)))?;

        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        if self.volume == Some(volume) {
            return Ok(());
        }
        debug!("Setting volume to {}", volume);
        self.volume = Some(volume);

        // Check if volume control is supported
        let features = self.tts.supported_features();
        if !features.volume {
            warn!("Volume control not supported on this platform");
            return Ok(());
        }

        let converted = volume.clamp(self.tts.min_volume(), self.tts.max_volume());
        self.tts
            .set_volume(converted)
            .map_err(|e| NovelReaderError::Synthesis(format!("Failed to set volume: {}", e)))?;

        Ok(())
    }

    fn set_voice_idx(&mut self, idx: usize) -> Result<()> {
        if self.voice_idx == Some(idx) {
            return Ok(());
        }
        debug!("Setting voice index to {}", idx);
        self.voice_idx = Some(idx);

        if !self.tts.supported_features().voice {
            warn!("Voice selection not supported on this platform");
            return Ok(());
        }

        // Get available voices
        let voices = self
            .tts
            .voices()
            .map_err(|e| NovelReaderError::Synthesis(format!("Failed to get voices: {}", e)))?;

        // Fewer voices than requested: keep the first, like a one-voice system would
        match voices.get(idx).or_else(|| voices.first()) {
            Some(voice) => {
                debug!("Selecting voice: {:?}", voice.name());
                self.tts
                    .set_voice(voice)
                    .map_err(|e| NovelReaderError::Synthesis(format!("Failed to set voice: {}", e)))?;
            }
            None => warn!("No voices available"),
        }

        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        self.tts.speak(text, false).map_err(|e| {
            error!("Failed to speak: {}", e);
            NovelReaderError::Synthesis(format!("Speak failed: {}", e))
        })?;

        self.wait_until_done()
    }

    fn voice_names(&self) -> Result<Vec<String>> {
        if !self.tts.supported_features().voice {
            return Ok(Vec::new());
        }
        let voices = self
            .tts
            .voices()
            .map_err(|e| NovelReaderError::Synthesis(format!("Failed to get voices: {}", e)))?;
        Ok(voices.iter().map(|voice| voice.name()).collect())
    }
}
