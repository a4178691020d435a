//! Synthesis orchestration
//!
//! The reader walks the segments of a manuscript one at a time, in source
//! order, and voices each one. Remote synthesis is preferred; if it fails
//! for a segment, that segment alone is handed to the local engine and the
//! run carries on with the next one.

pub mod analysis;

pub use analysis::{truncate, Analysis};

use crate::audio::{AudioClip, AudioOutput, AudioTrack, CharacterEffects, RodioOutput};
use crate::config::Config;
use crate::speech::backends::google::GoogleTts;
use crate::speech::{LocalBackend, LocalVoice, SpeechSynthesizer};
use crate::text::Segment;
use crate::voices::{narrator, VoiceAssigner, VoiceProfile};
use crate::{NovelReaderError, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;
use std::thread;

/// How a single segment ended up being voiced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// Synthesized by the remote backend
    Remote,
    /// Remote synthesis failed, spoken by the local engine instead
    Fallback,
    /// Spoken by the local engine, which is the only backend
    Local,
    /// Not voiced at all
    Skipped(String),
}

/// Tally of segment outcomes for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub segments: usize,
    pub remote: usize,
    pub fallback: usize,
    pub local: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &SegmentOutcome) {
        self.segments += 1;
        match outcome {
            SegmentOutcome::Remote => self.remote += 1,
            SegmentOutcome::Fallback => self.fallback += 1,
            SegmentOutcome::Local => self.local += 1,
            SegmentOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Drives synthesis for one processing run
///
/// Owns the run's voice assignment table, so two readers never share
/// speaker assignments.
pub struct NovelReader {
    config: Config,
    effects: CharacterEffects,
    remote: Option<Box<dyn SpeechSynthesizer>>,
    local: LocalBackend,
    output: Box<dyn AudioOutput>,
    voices: VoiceAssigner,
}

impl NovelReader {
    pub fn new(
        config: Config,
        remote: Option<Box<dyn SpeechSynthesizer>>,
        local: LocalBackend,
        output: Box<dyn AudioOutput>,
    ) -> Self {
        let effects = CharacterEffects::from_config(&config);
        Self {
            config,
            effects,
            remote,
            local,
            output,
            voices: VoiceAssigner::new(),
        }
    }

    /// Google voices with the platform engine as fallback
    pub fn with_google(config: Config) -> Result<Self> {
        let google = GoogleTts::from_config(&config)?;
        info!("Using Google Text-to-Speech");
        Ok(Self::new(
            config,
            Some(Box::new(google)),
            LocalBackend::native(),
            Box::new(RodioOutput::new()),
        ))
    }

    /// Platform engine only
    pub fn local_only(config: Config) -> Self {
        info!("Using system Text-to-Speech");
        Self::new(
            config,
            None,
            LocalBackend::native(),
            Box::new(RodioOutput::new()),
        )
    }

    pub fn uses_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Speaker assignments made so far in this run
    pub fn voices(&self) -> &VoiceAssigner {
        &self.voices
    }

    /// Play every segment live, echoing each one as it is spoken
    pub fn play(&mut self, segments: &[Segment], out: &mut dyn Write) -> Result<RunSummary> {
        let echo_chars = self.config.echo_chars();
        let pause = self.config.playback_pause();
        let mut summary = RunSummary::default();

        for (i, segment) in segments.iter().enumerate() {
            let label = if segment.is_narrator() {
                "[Narrator]".to_string()
            } else {
                format!("[{}]", segment.speaker)
            };
            writeln!(out, "{}: {}", label, truncate(&segment.text, echo_chars))?;
            out.flush()?;

            let outcome = self.speak_segment(segment);
            if let SegmentOutcome::Skipped(reason) = &outcome {
                warn!("Segment {}/{} skipped: {}", i + 1, segments.len(), reason);
            }
            summary.record(&outcome);

            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }

        Ok(summary)
    }

    /// Synthesize every segment into one audio file
    ///
    /// Each voiced segment is followed by a fixed silence gap. Only the
    /// remote backend can render audio, so segments it fails on are skipped.
    pub fn export(
        &mut self,
        segments: &[Segment],
        path: &Path,
        out: &mut dyn Write,
    ) -> Result<RunSummary> {
        if self.remote.is_none() {
            return Err(NovelReaderError::Config(
                "Exporting audio requires the remote backend (drop --no-google)".to_string(),
            ));
        }

        let gap = self.config.silence_gap();
        let mut track = AudioTrack::new();
        let mut summary = RunSummary::default();

        for (i, segment) in segments.iter().enumerate() {
            writeln!(out, "  Processing segment {}/{}...", i + 1, segments.len())?;

            let outcome = match self.render_segment(segment) {
                Ok(clip) => {
                    track.append(&clip);
                    track.append_silence(gap);
                    SegmentOutcome::Remote
                }
                Err(e) => SegmentOutcome::Skipped(e.to_string()),
            };
            if let SegmentOutcome::Skipped(reason) = &outcome {
                warn!(
                    "Segment {}/{} contributes no audio: {}",
                    i + 1,
                    segments.len(),
                    reason
                );
            }
            summary.record(&outcome);
        }

        if track.is_empty() {
            return Err(NovelReaderError::Synthesis(format!(
                "No audio was produced, nothing written to {}",
                path.display()
            )));
        }

        let is_wav = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);
        if !is_wav {
            warn!("{} will contain WAV audio", path.display());
        }

        track.write_wav(path)?;
        info!(
            "Exported {:.1}s of audio to {}",
            track.duration().as_secs_f64(),
            path.display()
        );
        Ok(summary)
    }

    /// Voice one segment live, falling back to the local engine
    fn speak_segment(&mut self, segment: &Segment) -> SegmentOutcome {
        // Every speaker takes a table slot, even one with nothing to say
        self.voices.assign_voice(&segment.speaker);
        if segment.text.trim().is_empty() {
            return SegmentOutcome::Skipped("nothing to speak".to_string());
        }

        if self.remote.is_none() {
            return match self.speak_locally(segment) {
                Ok(()) => SegmentOutcome::Local,
                Err(e) => SegmentOutcome::Skipped(e.to_string()),
            };
        }

        let played = self
            .render_segment(segment)
            .and_then(|clip| self.output.play(&clip));
        match played {
            Ok(()) => SegmentOutcome::Remote,
            Err(e) => {
                warn!("Remote speech failed: {}; falling back to system TTS", e);
                match self.speak_locally(segment) {
                    Ok(()) => SegmentOutcome::Fallback,
                    Err(local) => SegmentOutcome::Skipped(format!(
                        "remote: {}; local: {}",
                        e, local
                    )),
                }
            }
        }
    }

    /// Synthesize, decode and post-process one segment
    ///
    /// The downloaded audio lives in a scratch file that is removed when
    /// this returns, whether decoding worked or not.
    fn render_segment(&mut self, segment: &Segment) -> Result<AudioClip> {
        let voice = self.voices.assign_voice(&segment.speaker);
        if segment.text.trim().is_empty() {
            return Err(NovelReaderError::Synthesis("nothing to speak".to_string()));
        }

        let remote = self
            .remote
            .as_mut()
            .ok_or_else(|| NovelReaderError::Synthesis("No remote backend".to_string()))?;

        debug!(
            "Synthesizing {} chars for '{}' via {}",
            segment.text.len(),
            segment.speaker,
            remote.name()
        );
        let bytes = remote.synthesize(&segment.text, voice)?;

        let mut scratch = tempfile::Builder::new()
            .prefix("novelreader-")
            .suffix(audio_suffix(&bytes))
            .tempfile()?;
        scratch.write_all(&bytes)?;
        scratch.flush()?;

        let clip = AudioClip::decode_file(scratch.path())?;
        Ok(self.effects.apply(clip, &segment.speaker))
    }

    /// Speak a segment through the local engine
    fn speak_locally(&mut self, segment: &Segment) -> Result<()> {
        let voice = LocalVoice::for_speaker(segment.is_narrator(), &self.config);
        self.local.get()?.speak_as(&voice, &segment.text)
    }

    /// Narrator plus every assigned speaker with its accent
    pub fn write_voice_summary(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Voice assignments:")?;
        write_assignment(out, "Narrator", narrator())?;
        for (speaker, profile) in self.voices.assignments() {
            write_assignment(out, speaker, profile)?;
        }
        Ok(())
    }
}

fn write_assignment(out: &mut dyn Write, name: &str, profile: &VoiceProfile) -> Result<()> {
    writeln!(
        out,
        "  {}: {} English ({})",
        name, profile.accent, profile.description
    )?;
    Ok(())
}

/// File suffix for downloaded audio, from its magic bytes
fn audio_suffix(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"RIFF") {
        ".wav"
    } else {
        ".mp3"
    }
}
