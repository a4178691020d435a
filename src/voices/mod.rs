//! Voice catalog
//!
//! A fixed set of synthetic voices. Remote voices differ by the regional
//! Google domain they are served from, which gives each a distinct accent.

pub mod assigner;

pub use assigner::VoiceAssigner;

use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Archetype of a catalog voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    Narrator,
    Male1,
    Female1,
    Male2,
    Female2,
    Child,
    Elderly,
}

impl VoiceKind {
    /// Catalog key, as shown to users
    pub fn key(self) -> &'static str {
        match self {
            VoiceKind::Narrator => "narrator",
            VoiceKind::Male1 => "male_1",
            VoiceKind::Female1 => "female_1",
            VoiceKind::Male2 => "male_2",
            VoiceKind::Female2 => "female_2",
            VoiceKind::Child => "child",
            VoiceKind::Elderly => "elderly",
        }
    }

    /// Look up the profile for this archetype
    pub fn profile(self) -> &'static VoiceProfile {
        CATALOG
            .iter()
            .find(|profile| profile.kind == self)
            .unwrap_or(&CATALOG[0])
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One synthetic voice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub kind: VoiceKind,
    /// Language code passed to the synthesizer
    pub locale: &'static str,
    /// Regional domain suffix selecting the accent (`com`, `co.uk`, ...)
    pub region_variant: &'static str,
    /// 1.0 is normal speed
    pub speaking_rate_factor: f32,
    /// Accent name used in summaries
    pub accent: &'static str,
    pub description: &'static str,
}

impl VoiceProfile {
    /// Whether the remote backend should use its slow reading mode
    pub fn is_slow(&self) -> bool {
        self.speaking_rate_factor < 1.0
    }
}

/// Speed used by the remote backend's slow mode
pub const SLOW_RATE_FACTOR: f32 = 0.3;

/// Every voice the reader can use
pub static CATALOG: [VoiceProfile; 7] = [
    VoiceProfile {
        kind: VoiceKind::Narrator,
        locale: "en",
        region_variant: "com",
        speaking_rate_factor: 1.0,
        accent: "US",
        description: "authoritative",
    },
    VoiceProfile {
        kind: VoiceKind::Male1,
        locale: "en",
        region_variant: "com",
        speaking_rate_factor: 1.0,
        accent: "US",
        description: "standard male",
    },
    VoiceProfile {
        kind: VoiceKind::Female1,
        locale: "en",
        region_variant: "co.uk",
        speaking_rate_factor: 1.0,
        accent: "British",
        description: "elegant",
    },
    VoiceProfile {
        kind: VoiceKind::Male2,
        locale: "en",
        region_variant: "com.au",
        speaking_rate_factor: 1.0,
        accent: "Australian",
        description: "casual",
    },
    VoiceProfile {
        kind: VoiceKind::Female2,
        locale: "en",
        region_variant: "ca",
        speaking_rate_factor: 1.0,
        accent: "Canadian",
        description: "friendly",
    },
    VoiceProfile {
        kind: VoiceKind::Child,
        locale: "en",
        region_variant: "co.uk",
        speaking_rate_factor: 1.0,
        accent: "British",
        description: "youthful",
    },
    VoiceProfile {
        kind: VoiceKind::Elderly,
        locale: "en",
        region_variant: "com",
        speaking_rate_factor: SLOW_RATE_FACTOR,
        accent: "US",
        description: "slower pace",
    },
];

/// The fixed narrator voice
pub fn narrator() -> &'static VoiceProfile {
    VoiceKind::Narrator.profile()
}

/// Print the voice catalog
pub fn write_catalog(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "NovelReader Voice Options:")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Using Google Text-to-Speech")?;
    writeln!(out)?;
    writeln!(out, "Available Voice Characteristics:")?;
    for profile in CATALOG.iter() {
        writeln!(
            out,
            "  {:<9} {} English ({}), {}.{}{}",
            profile.kind.key(),
            profile.accent,
            profile.description,
            profile.locale,
            profile.region_variant,
            if profile.is_slow() { ", slow" } else { "" }
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Characters are automatically assigned based on names and context"
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_complete() {
        let kinds = [
            VoiceKind::Narrator,
            VoiceKind::Male1,
            VoiceKind::Female1,
            VoiceKind::Male2,
            VoiceKind::Female2,
            VoiceKind::Child,
            VoiceKind::Elderly,
        ];
        for kind in kinds {
            assert_eq!(kind.profile().kind, kind);
        }
    }

    #[test]
    fn test_only_elderly_is_slow() {
        let slow: Vec<VoiceKind> = CATALOG.iter().filter(|p| p.is_slow()).map(|p| p.kind).collect();
        assert_eq!(slow, vec![VoiceKind::Elderly]);
    }

    #[test]
    fn test_catalog_listing() {
        let mut out = Vec::new();
        write_catalog(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("narrator"));
        assert!(text.contains("female_2  Canadian English"));
        assert!(text.contains("elderly   US English (slower pace), en.com, slow"));
    }
}
