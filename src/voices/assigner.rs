//! Per-run speaker to voice assignment
//!
//! Assignment depends on the order speakers are first met: the table size
//! at the time of the first encounter picks the voice. Once assigned, a
//! speaker keeps its voice until the assigner is dropped.

use super::{narrator, VoiceKind, VoiceProfile};
use crate::text::NARRATOR;
use log::debug;
use std::collections::HashMap;

/// Given names that lean towards a female voice
pub const FEMALE_NAMES: &[&str] = &[
    "sarah", "anna", "emma", "lisa", "maria", "jane", "kate", "lucy", "amy",
];

/// Given names that lean towards a male voice
pub const MALE_NAMES: &[&str] = &[
    "john", "david", "mike", "james", "robert", "tom", "alex", "sam", "ben",
];

/// Rotation used for speakers with no recognisable name
const ROTATION: [VoiceKind; 4] = [
    VoiceKind::Female1,
    VoiceKind::Male1,
    VoiceKind::Female2,
    VoiceKind::Male2,
];

/// Speaker to voice table for one processing run
#[derive(Debug, Default)]
pub struct VoiceAssigner {
    assignments: HashMap<String, VoiceKind>,
    /// Speakers in first-encounter order
    order: Vec<String>,
}

impl VoiceAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the voice for a speaker label, assigning one on first sight
    ///
    /// Labels are case-insensitive: `John` and `john` are the same speaker.
    pub fn assign_voice(&mut self, speaker: &str) -> &'static VoiceProfile {
        let label = speaker.to_lowercase();
        if label == NARRATOR {
            return narrator();
        }

        if let Some(kind) = self.assignments.get(&label) {
            return kind.profile();
        }

        let kind = self.choose(&label);
        debug!("Assigned voice {} to speaker '{}'", kind, label);
        self.assignments.insert(label.clone(), kind);
        self.order.push(label);
        kind.profile()
    }

    /// Pick a voice for a new lower-cased label from the current table size
    fn choose(&self, label: &str) -> VoiceKind {
        let size = self.assignments.len();

        if FEMALE_NAMES.iter().any(|name| label.contains(name)) {
            if size % 2 == 0 {
                VoiceKind::Female1
            } else {
                VoiceKind::Female2
            }
        } else if MALE_NAMES.iter().any(|name| label.contains(name)) {
            if size % 2 == 0 {
                VoiceKind::Male1
            } else {
                VoiceKind::Male2
            }
        } else {
            ROTATION[size % ROTATION.len()]
        }
    }

    /// Voice already assigned to a speaker, without assigning one
    pub fn get(&self, speaker: &str) -> Option<&'static VoiceProfile> {
        self.assignments
            .get(&speaker.to_lowercase())
            .map(|kind| kind.profile())
    }

    /// Assigned speakers with their voices, in first-encounter order
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &'static VoiceProfile)> + '_ {
        self.order.iter().filter_map(move |speaker| {
            self.assignments
                .get(speaker)
                .map(|kind| (speaker.as_str(), kind.profile()))
        })
    }

    /// Number of assigned speakers (the narrator is never counted)
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(assigner: &mut VoiceAssigner, speaker: &str) -> VoiceKind {
        assigner.assign_voice(speaker).kind
    }

    #[test]
    fn test_narrator_never_stored() {
        let mut assigner = VoiceAssigner::new();
        assert_eq!(kind_of(&mut assigner, "narrator"), VoiceKind::Narrator);
        assert!(assigner.is_empty());

        kind_of(&mut assigner, "zed");
        assert_eq!(kind_of(&mut assigner, "narrator"), VoiceKind::Narrator);
        assert_eq!(assigner.len(), 1);
    }

    #[test]
    fn test_gendered_names_alternate_on_table_size() {
        let mut assigner = VoiceAssigner::new();
        assert_eq!(kind_of(&mut assigner, "sarah"), VoiceKind::Female1); // size 0
        assert_eq!(kind_of(&mut assigner, "emma"), VoiceKind::Female2); // size 1
        assert_eq!(kind_of(&mut assigner, "john"), VoiceKind::Male1); // size 2
        assert_eq!(kind_of(&mut assigner, "david"), VoiceKind::Male2); // size 3
    }

    #[test]
    fn test_rotation_for_unrecognised_names() {
        let mut assigner = VoiceAssigner::new();
        assert_eq!(kind_of(&mut assigner, "xavier"), VoiceKind::Female1);
        assert_eq!(kind_of(&mut assigner, "quill"), VoiceKind::Male1);
        assert_eq!(kind_of(&mut assigner, "unknown"), VoiceKind::Female2);
        assert_eq!(kind_of(&mut assigner, "she"), VoiceKind::Male2);
        assert_eq!(kind_of(&mut assigner, "zed"), VoiceKind::Female1);
    }

    #[test]
    fn test_substring_containment() {
        let mut assigner = VoiceAssigner::new();
        // "samantha" contains "sam"; female names are checked first but none match
        assert_eq!(kind_of(&mut assigner, "samantha"), VoiceKind::Male1);
        // "annabel" contains "anna"
        assert_eq!(kind_of(&mut assigner, "annabel"), VoiceKind::Female2);
    }

    #[test]
    fn test_repeat_lookups_are_stable() {
        let mut assigner = VoiceAssigner::new();
        let first = kind_of(&mut assigner, "mary");
        kind_of(&mut assigner, "tom");
        kind_of(&mut assigner, "lucy");
        assert_eq!(kind_of(&mut assigner, "mary"), first);
        assert_eq!(assigner.len(), 3);
        assert_eq!(assigner.get("tom").map(|p| p.kind), Some(VoiceKind::Male2));
        assert!(assigner.get("nobody").is_none());
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let mut assigner = VoiceAssigner::new();
        assert_eq!(kind_of(&mut assigner, "john"), VoiceKind::Male1);
        assert_eq!(kind_of(&mut assigner, "John"), VoiceKind::Male1);
        assert_eq!(kind_of(&mut assigner, "NARRATOR"), VoiceKind::Narrator);
        assert_eq!(assigner.len(), 1);
        assert_eq!(assigner.get("JOHN").map(|p| p.kind), Some(VoiceKind::Male1));

        let speakers: Vec<&str> = assigner.assignments().map(|(s, _)| s).collect();
        assert_eq!(speakers, vec!["john"]);
    }

    #[test]
    fn test_assignments_in_encounter_order() {
        let mut assigner = VoiceAssigner::new();
        for speaker in ["lucy", "ben", "lucy", "narrator", "unknown"] {
            assigner.assign_voice(speaker);
        }
        let speakers: Vec<&str> = assigner.assignments().map(|(s, _)| s).collect();
        assert_eq!(speakers, vec!["lucy", "ben", "unknown"]);
    }
}
