//! Configuration management

use crate::{NovelReaderError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reader configuration
///
/// Persistent settings for playback pacing, export layout, preview size,
/// the remote backend, the local fallback voices and character effects.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.novelreader.cfg unless overridden)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| NovelReaderError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| NovelReaderError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Built-in defaults, without touching disk
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| NovelReaderError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.novelreader.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".novelreader.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("playback"))
            .set("pause_ms", "300")
            .set("echo_chars", "70");

        ini.with_section(Some("export"))
            .set("silence_gap_ms", "800");

        ini.with_section(Some("preview"))
            .set("segments", "3")
            .set("chars", "100");

        ini.with_section(Some("google"))
            .set("timeout_secs", "20")
            .set("chunk_chars", "100");

        ini.with_section(Some("fallback"))
            .set("narrator_voice", "0")
            .set("character_voice", "1")
            .set("narrator_rate", "170")
            .set("character_rate", "180")
            .set("volume", "0.9");

        ini.with_section(Some("effects"))
            .set("enabled", "true")
            .set("narrator_rate_factor", "0.95")
            .set("elderly_gain_db", "-2")
            .set("child_gain_db", "1");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Non-negative integer, or the default when missing or negative
    fn get_count(&self, section: &str, key: &str, default: u64) -> u64 {
        self.get_int(section, key, default as i64)
            .try_into()
            .unwrap_or(default)
    }

    /// Pause between segments during live playback
    pub fn playback_pause(&self) -> Duration {
        Duration::from_millis(self.get_count("playback", "pause_ms", 300))
    }

    /// Characters of each segment echoed to the terminal while playing
    pub fn echo_chars(&self) -> usize {
        self.get_count("playback", "echo_chars", 70) as usize
    }

    /// Silence appended after every segment in an exported file
    pub fn silence_gap(&self) -> Duration {
        Duration::from_millis(self.get_count("export", "silence_gap_ms", 800))
    }

    /// How many segments preview mode shows
    pub fn preview_segments(&self) -> usize {
        self.get_count("preview", "segments", 3) as usize
    }

    /// Characters of each previewed segment
    pub fn preview_chars(&self) -> usize {
        self.get_count("preview", "chars", 100) as usize
    }

    /// Remote request timeout
    pub fn google_timeout(&self) -> Duration {
        Duration::from_secs(self.get_count("google", "timeout_secs", 20).max(1))
    }

    /// Maximum characters per remote request
    pub fn google_chunk_chars(&self) -> usize {
        self.get_count("google", "chunk_chars", 100).max(1) as usize
    }

    /// Local engine voice index for the narrator
    pub fn fallback_narrator_voice(&self) -> usize {
        self.get_count("fallback", "narrator_voice", 0) as usize
    }

    /// Local engine voice index for every character
    pub fn fallback_character_voice(&self) -> usize {
        self.get_count("fallback", "character_voice", 1) as usize
    }

    /// Local engine narrator speed in words per minute
    pub fn fallback_narrator_rate(&self) -> u32 {
        self.get_count("fallback", "narrator_rate", 170) as u32
    }

    /// Local engine character speed in words per minute
    pub fn fallback_character_rate(&self) -> u32 {
        self.get_count("fallback", "character_rate", 180) as u32
    }

    /// Local engine volume (0.0-1.0)
    pub fn fallback_volume(&self) -> f32 {
        self.get_float("fallback", "volume", 0.9).clamp(0.0, 1.0)
    }

    /// Apply per-character audio effects?
    pub fn effects_enabled(&self) -> bool {
        self.get_bool("effects", "enabled", true)
    }

    /// Narrator frame-rate multiplier (below 1.0 reads lower and slower)
    pub fn narrator_rate_factor(&self) -> f32 {
        let factor = self.get_float("effects", "narrator_rate_factor", 0.95);
        if factor > 0.0 {
            factor
        } else {
            0.95
        }
    }

    /// Gain applied to elderly speakers, in dB
    pub fn elderly_gain_db(&self) -> f32 {
        self.get_float("effects", "elderly_gain_db", -2.0)
    }

    /// Gain applied to child speakers, in dB
    pub fn child_gain_db(&self) -> f32 {
        self.get_float("effects", "child_gain_db", 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults();
        assert_eq!(config.playback_pause(), Duration::from_millis(300));
        assert_eq!(config.silence_gap(), Duration::from_millis(800));
        assert_eq!(config.preview_segments(), 3);
        assert_eq!(config.preview_chars(), 100);
        assert_eq!(config.echo_chars(), 70);
        assert_eq!(config.fallback_narrator_rate(), 170);
        assert_eq!(config.fallback_character_rate(), 180);
        assert!((config.fallback_volume() - 0.9).abs() < f32::EPSILON);
        assert!(config.effects_enabled());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let mut config = Config::defaults();
        config.set("export", "silence_gap_ms", "-5");
        config.set("fallback", "volume", "7");
        config.set("effects", "narrator_rate_factor", "zero");
        config.set("google", "chunk_chars", "0");

        assert_eq!(config.silence_gap(), Duration::from_millis(800));
        assert_eq!(config.fallback_volume(), 1.0);
        assert!((config.narrator_rate_factor() - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.google_chunk_chars(), 1);
    }
}
