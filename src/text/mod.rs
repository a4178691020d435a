//! Manuscript analysis
//!
//! Splits prose into paragraph segments and works out who is speaking
//! in each piece of dialogue.

pub mod attribution;
pub mod segmenter;

pub use attribution::{attribute, extract_speaker, extract_utterance, SPEAKER_PATTERNS};
pub use segmenter::{is_dialogue, segment};

use serde::Serialize;

/// Speaker label used for every narrative segment
pub const NARRATOR: &str = "narrator";

/// Speaker label used when no dialogue tag could be matched
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// Classification of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Narrative,
    Dialogue,
}

impl SegmentKind {
    /// Upper-case tag shown in previews
    pub fn tag(self) -> &'static str {
        match self {
            SegmentKind::Narrative => "NARRATIVE",
            SegmentKind::Dialogue => "DIALOGUE",
        }
    }
}

/// One classified paragraph of the manuscript
///
/// Segments are produced once by [`segment`] and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Lower-cased speaker label, `"narrator"` for narrative
    pub speaker: String,
    /// Text to be spoken
    pub text: String,
    /// Trimmed source paragraph
    pub original: String,
}

impl Segment {
    /// Build a narrative segment from a trimmed paragraph
    pub fn narrative(paragraph: &str) -> Self {
        Self {
            kind: SegmentKind::Narrative,
            speaker: NARRATOR.to_string(),
            text: paragraph.to_string(),
            original: paragraph.to_string(),
        }
    }

    /// Build a dialogue segment, attributing speaker and utterance
    pub fn dialogue(paragraph: &str) -> Self {
        let (speaker, text) = attribute(paragraph);
        Self {
            kind: SegmentKind::Dialogue,
            speaker,
            text,
            original: paragraph.to_string(),
        }
    }

    pub fn is_dialogue(&self) -> bool {
        self.kind == SegmentKind::Dialogue
    }

    pub fn is_narrator(&self) -> bool {
        self.speaker == NARRATOR
    }
}
