//! Segmentation analysis shown before synthesis and in preview mode

use crate::text::{Segment, NARRATOR};
use crate::Result;
use serde::Serialize;
use std::io::Write;

/// Counts and speakers of a segmented manuscript
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub total: usize,
    pub narrative: usize,
    pub dialogue: usize,
    /// Non-narrator speakers in order of first appearance
    pub characters: Vec<String>,
    pub segments: Vec<Segment>,
}

impl Analysis {
    pub fn new(segments: &[Segment]) -> Self {
        let dialogue = segments.iter().filter(|s| s.is_dialogue()).count();

        let mut characters: Vec<String> = Vec::new();
        for segment in segments.iter().filter(|s| s.speaker != NARRATOR) {
            if !characters.contains(&segment.speaker) {
                characters.push(segment.speaker.clone());
            }
        }

        Self {
            total: segments.len(),
            narrative: segments.len() - dialogue,
            dialogue,
            characters,
            segments: segments.to_vec(),
        }
    }

    /// Segment counts and detected characters
    pub fn write_summary(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{} segments found:", self.total)?;
        writeln!(out, "  {} narrative segments", self.narrative)?;
        writeln!(out, "  {} dialogue segments", self.dialogue)?;
        if !self.characters.is_empty() {
            writeln!(out, "  Characters detected: {}", self.characters.join(", "))?;
        }
        Ok(())
    }

    /// The first `count` segments, each cut to `chars` characters
    pub fn write_preview(&self, out: &mut dyn Write, count: usize, chars: usize) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "--- PREVIEW (first {} segments) ---", count)?;
        for (i, segment) in self.segments.iter().take(count).enumerate() {
            writeln!(
                out,
                "{}. [{}] {}: {}",
                i + 1,
                segment.kind.tag(),
                segment.speaker,
                truncate(&segment.text, chars)
            )?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Cut text to `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::segment;

    #[test]
    fn test_counts_and_characters() {
        let segments = segment(
            "Night fell.\n\n\"Hello,\" John said.\n\n\"Hi!\" Mary replied.\n\n\"Again,\" John said.\n\n\"Who?\"",
        );
        let analysis = Analysis::new(&segments);
        assert_eq!(analysis.total, 5);
        assert_eq!(analysis.narrative, 1);
        assert_eq!(analysis.dialogue, 4);
        assert_eq!(analysis.characters, vec!["john", "mary", "unknown"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("naïve café", 4), "naïv...");
    }

    #[test]
    fn test_json_shape() {
        let segments = segment("\"Go,\" Sam said.");
        let json = Analysis::new(&segments).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["segments"][0]["kind"], "dialogue");
        assert_eq!(value["segments"][0]["speaker"], "sam");
        assert_eq!(value["segments"][0]["text"], "Go");
    }
}
