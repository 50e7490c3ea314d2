use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::SequenceError;

/// Ordered, immutable list of phases belonging to one routine or flow.
///
/// A `Sequence` always holds at least one phase and every breathing phase
/// has a runnable pattern; both are checked on construction and on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence", into = "RawSequence")]
pub struct Sequence {
    id: String,
    title: String,
    phases: Vec<Phase>,
}

#[derive(Serialize, Deserialize)]
struct RawSequence {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    phases: Vec<Phase>,
}

impl Sequence {
    /// Build a sequence, rejecting empty or malformed phase lists.
    ///
    /// # Errors
    /// Returns [`SequenceError::Empty`] for an empty phase list and
    /// [`SequenceError::InvalidPhase`] for a breathing phase with a zero
    /// inhale or exhale.
    pub fn new(id: impl Into<String>, title: impl Into<String>, phases: Vec<Phase>) -> Result<Self, SequenceError> {
        let id = id.into();
        if phases.is_empty() {
            return Err(SequenceError::Empty { id });
        }
        for (index, phase) in phases.iter().enumerate() {
            if let Some(pattern) = phase.breath_pattern() {
                pattern.validate().map_err(|reason| SequenceError::InvalidPhase {
                    index,
                    label: phase.label.clone(),
                    reason,
                })?;
            }
        }
        Ok(Self {
            id,
            title: title.into(),
            phases,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false for a constructed sequence.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }

    /// Copy of this sequence with every phase shortened to one second.
    pub fn quick(&self) -> Self {
        let phases = self
            .phases
            .iter()
            .cloned()
            .map(|mut p| {
                p.duration_secs = 1;
                p
            })
            .collect();
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            phases,
        }
    }
}

impl TryFrom<RawSequence> for Sequence {
    type Error = SequenceError;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        Sequence::new(raw.id, raw.title, raw.phases)
    }
}

impl From<Sequence> for RawSequence {
    fn from(seq: Sequence) -> Self {
        RawSequence {
            id: seq.id,
            title: seq.title,
            phases: seq.phases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::phase::BreathPattern;

    #[test]
    fn empty_sequence_is_rejected() {
        let err = Sequence::new("adhoc", "Ad hoc", vec![]).unwrap_err();
        assert_eq!(err, SequenceError::Empty { id: "adhoc".into() });
    }

    #[test]
    fn breathing_phase_with_zero_inhale_is_rejected() {
        let phases = vec![
            Phase::instructional("Intro", "", 3),
            Phase::breathing("Breathe", "", 30, BreathPattern::new(0, 6)),
        ];
        let err = Sequence::new("bad", "", phases).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidPhase { index: 1, .. }));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"id":"empty","title":"Nothing","phases":[]}"#;
        assert!(serde_json::from_str::<Sequence>(json).is_err());

        let json = r#"{"id":"one","phases":[{"label":"Rest","duration_secs":5,"kind":{"type":"instructional"}}]}"#;
        let seq: Sequence = serde_json::from_str(json).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.phase(0).unwrap().label, "Rest");
    }

    #[test]
    fn quick_copy_uses_one_second_phases() {
        let seq = Sequence::new(
            "x",
            "X",
            vec![
                Phase::instructional("A", "", 60),
                Phase::instructional("B", "", 90),
            ],
        )
        .unwrap();
        assert_eq!(seq.total_duration_secs(), 150);
        assert_eq!(seq.quick().total_duration_secs(), 2);
    }
}
