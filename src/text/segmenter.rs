//! Paragraph segmentation
//!
//! A manuscript is split on blank lines. Every non-empty paragraph becomes
//! exactly one segment, in source order.

use super::Segment;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// A line break, optional horizontal whitespace, another line break
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n[ \t]*\r?\n").expect("paragraph break pattern is valid")
});

/// Any double-quoted substring, possibly empty
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*""#).expect("quoted text pattern is valid"));

/// Split text into ordered narrative and dialogue segments
pub fn segment(text: &str) -> Vec<Segment> {
    let segments: Vec<Segment> = PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|para| !para.is_empty())
        .map(|para| {
            if is_dialogue(para) {
                Segment::dialogue(para)
            } else {
                Segment::narrative(para)
            }
        })
        .collect();

    debug!("Segmented {} bytes into {} segments", text.len(), segments.len());
    segments
}

/// Does the paragraph contain a double-quoted substring?
pub fn is_dialogue(paragraph: &str) -> bool {
    QUOTED.is_match(paragraph)
}
