//! Speaker attribution for dialogue paragraphs
//!
//! Speakers are found with a closed, ordered list of dialogue-tag patterns.
//! The first pattern that matches decides the speaker; later patterns are
//! never consulted, even if they would also match.

use super::UNKNOWN_SPEAKER;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// One dialogue-tag rule
#[derive(Debug, Clone, Copy)]
pub struct SpeakerPattern {
    /// Reporting verb the rule is anchored on
    pub verb: &'static str,
    /// Regular expression, matched case-insensitively
    pub pattern: &'static str,
    /// Capture group holding the speaker's name
    pub group: usize,
}

/// Dialogue-tag rules in priority order
pub const SPEAKER_PATTERNS: &[SpeakerPattern] = &[
    // "Hello," John said
    SpeakerPattern { verb: "said", pattern: r#""[^"]*,"\s*(\w+)\s+said"#, group: 1 },
    // John said, "Hello"
    SpeakerPattern { verb: "said", pattern: r#"(\w+)\s+said,?\s*""#, group: 1 },
    // "Hello" John replied
    SpeakerPattern { verb: "replied", pattern: r#""[^"]*"\s*(\w+)\s+replied"#, group: 1 },
    // John replied, "Hello"
    SpeakerPattern { verb: "replied", pattern: r#"(\w+)\s+replied,?\s*""#, group: 1 },
    // "Hello," John asked
    SpeakerPattern { verb: "asked", pattern: r#""[^"]*,"\s*(\w+)\s+asked"#, group: 1 },
    // John asked, "Hello"
    SpeakerPattern { verb: "asked", pattern: r#"(\w+)\s+asked,?\s*""#, group: 1 },
    // "Hello," John whispered
    SpeakerPattern { verb: "whispered", pattern: r#""[^"]*,"\s*(\w+)\s+whispered"#, group: 1 },
    // John whispered, "Hello"
    SpeakerPattern { verb: "whispered", pattern: r#"(\w+)\s+whispered,?\s*""#, group: 1 },
];

static COMPILED_PATTERNS: Lazy<Vec<(Regex, usize)>> = Lazy::new(|| {
    SPEAKER_PATTERNS
        .iter()
        .map(|rule| {
            let regex = RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
                .expect("speaker patterns are valid");
            (regex, rule.group)
        })
        .collect()
});

static FIRST_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("quote pattern is valid"));

/// Attribute a dialogue paragraph: returns (speaker label, utterance)
pub fn attribute(paragraph: &str) -> (String, String) {
    (extract_speaker(paragraph), extract_utterance(paragraph))
}

/// Find the speaker named by the first matching dialogue tag
///
/// Returns the lower-cased name, or `"unknown"` when no tag matches.
pub fn extract_speaker(paragraph: &str) -> String {
    COMPILED_PATTERNS
        .iter()
        .find_map(|(regex, group)| {
            regex
                .captures(paragraph)
                .and_then(|caps| caps.get(*group))
                .map(|name| name.as_str().to_lowercase())
        })
        .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string())
}

/// Extract the spoken words from a dialogue paragraph
///
/// Takes the first quoted span. A comma closing the span belongs to the
/// dialogue tag and is not spoken. Paragraphs without quotes are returned
/// whole.
pub fn extract_utterance(paragraph: &str) -> String {
    match FIRST_QUOTE.captures(paragraph).and_then(|caps| caps.get(1)) {
        Some(quoted) => {
            let span = quoted.as_str().trim_end();
            span.strip_suffix(',').unwrap_or(span).trim().to_string()
        }
        None => paragraph.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_pattern_matches() {
        let cases = [
            (r#""Hello," John said."#, "john"),
            (r#"John said, "Hello.""#, "john"),
            (r#""Hello" Mary replied."#, "mary"),
            (r#"Mary replied, "Hello.""#, "mary"),
            (r#""Where," Sam asked."#, "sam"),
            (r#"Sam asked, "Where?""#, "sam"),
            (r#""Quiet," Lucy whispered."#, "lucy"),
            (r#"Lucy whispered "Quiet.""#, "lucy"),
        ];
        for (paragraph, expected) in cases {
            assert_eq!(extract_speaker(paragraph), expected, "paragraph: {}", paragraph);
        }
    }

    #[test]
    fn test_case_insensitive_and_lowercased() {
        assert_eq!(extract_speaker(r#""Stop," ROBERT SAID."#), "robert");
        assert_eq!(extract_speaker(r#"Anna Asked, "Why?""#), "anna");
    }

    #[test]
    fn test_earliest_pattern_wins() {
        // Pattern 1 ("...," NAME said) outranks pattern 4 (NAME replied, "...")
        let paragraph = r#"Tom replied, "Yes," Ann said."#;
        assert_eq!(extract_speaker(paragraph), "ann");

        // Pattern 2 (NAME said, "...") outranks pattern 5 ("...," NAME asked)
        let paragraph = r#""Well," Kate asked, and Ben said, "no.""#;
        assert_eq!(extract_speaker(paragraph), "ben");
    }

    #[test]
    fn test_unmatched_speaker_is_unknown() {
        assert_eq!(extract_speaker(r#""Run!" someone shouted."#), "unknown");
        assert_eq!(extract_speaker("No dialogue tag at all."), "unknown");
    }

    #[test]
    fn test_utterance_extraction() {
        assert_eq!(extract_utterance(r#""Hello," John said."#), "Hello");
        assert_eq!(extract_utterance(r#""Hi!" Mary replied."#), "Hi!");
        // Only the single comma closing the span is dropped
        assert_eq!(extract_utterance(r#""Wait,," John said."#), "Wait,");
        assert_eq!(extract_utterance(r#"" Well , " Tom said."#), "Well");
        assert_eq!(
            extract_utterance(r#"He said, "Wait, what?" and "later.""#),
            "Wait, what?"
        );
        assert_eq!(extract_utterance("no quotes"), "no quotes");
    }

    #[test]
    fn test_pattern_table_order() {
        let verbs: Vec<&str> = SPEAKER_PATTERNS.iter().map(|p| p.verb).collect();
        assert_eq!(
            verbs,
            vec!["said", "said", "replied", "replied", "asked", "asked", "whispered", "whispered"]
        );
        assert!(SPEAKER_PATTERNS.iter().all(|p| p.group == 1));
    }
}
