//! Blocking audio playback

use super::AudioClip;
use crate::{NovelReaderError, Result};
use log::debug;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

/// Destination for decoded speech during live playback
pub trait AudioOutput {
    /// Play a clip, returning once it has finished
    fn play(&mut self, clip: &AudioClip) -> Result<()>;
}

/// Plays through the default output device
///
/// The device is opened on first use and kept for the rest of the run.
#[derive(Default)]
pub struct RodioOutput {
    stream: Option<OutputStream>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&mut self) -> Result<&OutputStream> {
        if self.stream.is_none() {
            debug!("Opening default audio output");
            let stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
                NovelReaderError::Playback(format!("Failed to open audio output: {}", e))
            })?;
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| NovelReaderError::Playback("Audio output unavailable".to_string()))
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, clip: &AudioClip) -> Result<()> {
        if clip.is_empty() {
            return Ok(());
        }

        let stream = self.stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(
            clip.channels(),
            clip.sample_rate(),
            clip.samples().to_vec(),
        ));
        sink.sleep_until_end();

        debug!("Played {:.2}s of audio", clip.duration().as_secs_f64());
        Ok(())
    }
}
