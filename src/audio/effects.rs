//! Cosmetic per-character audio nudges

use super::AudioClip;
use crate::config::Config;
use crate::text::NARRATOR;

/// Effects applied to synthesized speech based on the speaker label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterEffects {
    pub enabled: bool,
    /// Frame-rate multiplier for the narrator
    pub narrator_rate_factor: f32,
    /// Gain for labels containing "elderly"
    pub elderly_gain_db: f32,
    /// Gain for labels containing "child"
    pub child_gain_db: f32,
}

impl Default for CharacterEffects {
    fn default() -> Self {
        Self {
            enabled: true,
            narrator_rate_factor: 0.95,
            elderly_gain_db: -2.0,
            child_gain_db: 1.0,
        }
    }
}

impl CharacterEffects {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.effects_enabled(),
            narrator_rate_factor: config.narrator_rate_factor(),
            elderly_gain_db: config.elderly_gain_db(),
            child_gain_db: config.child_gain_db(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Apply the effect matching a speaker, if any
    pub fn apply(&self, clip: AudioClip, speaker: &str) -> AudioClip {
        if !self.enabled {
            return clip;
        }

        if speaker == NARRATOR {
            return clip.with_rate_factor(self.narrator_rate_factor);
        }

        let label = speaker.to_lowercase();
        if label.contains("elderly") {
            clip.with_gain_db(self.elderly_gain_db)
        } else if label.contains("child") {
            clip.with_gain_db(self.child_gain_db)
        } else {
            clip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> AudioClip {
        AudioClip::new(1, 24000, vec![0.5; 10])
    }

    #[test]
    fn test_narrator_slowed() {
        let out = CharacterEffects::default().apply(clip(), "narrator");
        assert_eq!(out.sample_rate(), 22800);
        assert_eq!(out.samples(), clip().samples());
    }

    #[test]
    fn test_gain_by_label() {
        let effects = CharacterEffects::default();
        assert!(effects.apply(clip(), "elderly").samples()[0] < 0.5);
        assert!(effects.apply(clip(), "child").samples()[0] > 0.5);
        assert_eq!(effects.apply(clip(), "john"), clip());
    }

    #[test]
    fn test_disabled() {
        let effects = CharacterEffects::disabled();
        assert_eq!(effects.apply(clip(), "narrator"), clip());
        assert_eq!(effects.apply(clip(), "elderly"), clip());
    }
}
