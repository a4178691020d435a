//! Audio buffers, decoding and WAV export
//!
//! Synthesized speech arrives as compressed bytes, is decoded into
//! interleaved `f32` samples, nudged per character and then either played
//! or appended to a track that is written out once at the end of a run.

pub mod effects;
pub mod playback;

pub use effects::CharacterEffects;
pub use playback::{AudioOutput, RodioOutput};

use crate::{NovelReaderError, Result};
use log::debug;
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Decoded audio: interleaved samples in -1.0..=1.0
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(channels: u16, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate: sample_rate.max(1),
        }
    }

    /// A clip of silence
    pub fn silence(duration: Duration, channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let frames = (duration.as_secs_f64() * sample_rate as f64).round() as usize;
        Self::new(channels, sample_rate, vec![0.0; frames * channels as usize])
    }

    /// Decode an audio file (MP3 or WAV)
    pub fn decode_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| NovelReaderError::Audio(format!("Failed to decode {:?}: {}", path, e)))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        if samples.is_empty() {
            return Err(NovelReaderError::Audio(format!(
                "Decoded no samples from {:?}",
                path
            )));
        }

        debug!(
            "Decoded {} samples ({} ch @ {} Hz) from {:?}",
            samples.len(),
            channels,
            sample_rate,
            path
        );
        Ok(Self::new(channels, sample_rate, samples))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Scale the signal by a gain in decibels
    pub fn with_gain_db(mut self, db: f32) -> Self {
        let factor = 10f32.powf(db / 20.0);
        for sample in &mut self.samples {
            *sample = (*sample * factor).clamp(-1.0, 1.0);
        }
        self
    }

    /// Reinterpret the samples at a scaled frame rate
    ///
    /// The samples are untouched, so a factor below 1.0 plays slower and
    /// lower once the clip is resampled back or played.
    pub fn with_rate_factor(mut self, factor: f32) -> Self {
        let scaled = (self.sample_rate as f64 * factor as f64).round() as u32;
        self.sample_rate = scaled.max(1);
        self
    }

    /// Convert to another channel count and sample rate
    ///
    /// Channels are mixed down to mono and spread back out when the counts
    /// differ; rates are converted by linear interpolation.
    pub fn converted(&self, channels: u16, sample_rate: u32) -> AudioClip {
        let channels = channels.max(1);
        let sample_rate = sample_rate.max(1);
        if channels == self.channels && sample_rate == self.sample_rate {
            return self.clone();
        }

        let src_channels = self.channels as usize;
        let frames: Vec<Vec<f32>> = self
            .samples
            .chunks_exact(src_channels)
            .map(|frame| {
                if channels == self.channels {
                    frame.to_vec()
                } else {
                    let mono = frame.iter().sum::<f32>() / src_channels as f32;
                    vec![mono; channels as usize]
                }
            })
            .collect();

        let resampled = if sample_rate == self.sample_rate || frames.is_empty() {
            frames
        } else {
            let ratio = self.sample_rate as f64 / sample_rate as f64;
            let out_len = (frames.len() as f64 / ratio).round() as usize;
            (0..out_len)
                .map(|i| {
                    let pos = i as f64 * ratio;
                    let idx = (pos.floor() as usize).min(frames.len() - 1);
                    let next = (idx + 1).min(frames.len() - 1);
                    let frac = (pos - idx as f64) as f32;
                    frames[idx]
                        .iter()
                        .zip(&frames[next])
                        .map(|(a, b)| a + (b - a) * frac)
                        .collect()
                })
                .collect()
        };

        AudioClip::new(channels, sample_rate, resampled.into_iter().flatten().collect())
    }
}

/// Accumulating output buffer for file export
///
/// The first clip appended fixes the track's channel count and sample
/// rate; later clips are converted to match.
#[derive(Debug, Default)]
pub struct AudioTrack {
    samples: Vec<f32>,
    format: Option<(u16, u32)>,
}

impl AudioTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clip, converting it to the track format
    pub fn append(&mut self, clip: &AudioClip) {
        let (channels, sample_rate) = *self
            .format
            .get_or_insert((clip.channels(), clip.sample_rate()));
        let converted = clip.converted(channels, sample_rate);
        self.samples.extend_from_slice(converted.samples());
    }

    /// Append silence; ignored until the first clip sets the format
    pub fn append_silence(&mut self, duration: Duration) {
        if let Some((channels, sample_rate)) = self.format {
            let silence = AudioClip::silence(duration, channels, sample_rate);
            self.samples.extend_from_slice(silence.samples());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn channels(&self) -> Option<u16> {
        self.format.map(|(channels, _)| channels)
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.format.map(|(_, rate)| rate)
    }

    pub fn duration(&self) -> Duration {
        match self.format {
            Some((channels, rate)) => Duration::from_secs_f64(
                self.samples.len() as f64 / channels as f64 / rate as f64,
            ),
            None => Duration::ZERO,
        }
    }

    /// Write the track as 16-bit PCM WAV
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let (channels, sample_rate) = self
            .format
            .ok_or_else(|| NovelReaderError::Audio("Nothing to export".to_string()))?;

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)?;
        for sample in &self.samples {
            writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;

        debug!(
            "Wrote {} samples ({:.1}s) to {:?}",
            self.samples.len(),
            self.duration().as_secs_f64(),
            path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_length() {
        let clip = AudioClip::silence(Duration::from_millis(800), 1, 24000);
        assert_eq!(clip.frames(), 19200);
        assert!(clip.samples().iter().all(|&s| s == 0.0));

        let stereo = AudioClip::silence(Duration::from_millis(500), 2, 1000);
        assert_eq!(stereo.samples().len(), 1000);
    }

    #[test]
    fn test_gain() {
        let clip = AudioClip::new(1, 8000, vec![0.5, -0.5]).with_gain_db(-6.0);
        assert!((clip.samples()[0] - 0.2506).abs() < 0.001);

        let loud = AudioClip::new(1, 8000, vec![0.9]).with_gain_db(20.0);
        assert_eq!(loud.samples()[0], 1.0);
    }

    #[test]
    fn test_rate_factor_changes_duration_only() {
        let clip = AudioClip::new(1, 1000, vec![0.1; 950]).with_rate_factor(0.95);
        assert_eq!(clip.sample_rate(), 950);
        assert_eq!(clip.samples().len(), 950);
        assert!((clip.duration().as_secs_f64() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversion() {
        let stereo = AudioClip::new(2, 100, vec![1.0, 0.0, 0.5, 0.5]);
        let mono = stereo.converted(1, 100);
        assert_eq!(mono.samples(), &[0.5, 0.5]);

        let clip = AudioClip::new(1, 100, vec![0.0, 1.0]);
        let up = clip.converted(1, 200);
        assert_eq!(up.frames(), 4);
        assert_eq!(up.samples()[1], 0.5);
    }

    #[test]
    fn test_track_fixes_format_from_first_clip() {
        let mut track = AudioTrack::new();
        track.append_silence(Duration::from_secs(1));
        assert!(track.is_empty());

        track.append(&AudioClip::new(1, 1000, vec![0.2; 1000]));
        track.append_silence(Duration::from_millis(500));
        track.append(&AudioClip::new(1, 500, vec![0.2; 500]));

        assert_eq!(track.channels(), Some(1));
        assert_eq!(track.sample_rate(), Some(1000));
        assert!((track.duration().as_secs_f64() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_write_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let mut track = AudioTrack::new();
        assert!(track.write_wav(&path).is_err());

        track.append(&AudioClip::new(1, 8000, vec![0.5; 80]));
        track.write_wav(&path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.len(), 80);
    }
}
