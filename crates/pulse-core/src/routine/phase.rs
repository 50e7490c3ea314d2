use serde::{Deserialize, Serialize};

/// Timing of one inhale/hold/exhale breath.
///
/// `hold_secs == 0` means the cycle goes straight from inhale to exhale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathPattern {
    pub inhale_secs: u64,
    #[serde(default)]
    pub hold_secs: u64,
    pub exhale_secs: u64,
}

impl BreathPattern {
    pub const fn new(inhale_secs: u64, exhale_secs: u64) -> Self {
        Self {
            inhale_secs,
            hold_secs: 0,
            exhale_secs,
        }
    }

    pub const fn with_hold(inhale_secs: u64, hold_secs: u64, exhale_secs: u64) -> Self {
        Self {
            inhale_secs,
            hold_secs,
            exhale_secs,
        }
    }

    /// Length of one full breath in seconds.
    pub fn cycle_secs(&self) -> u64 {
        self.inhale_secs
            .saturating_add(self.hold_secs)
            .saturating_add(self.exhale_secs)
    }

    /// Seconds spent in `step`.
    pub fn step_secs(&self, step: BreathStep) -> u64 {
        match step {
            BreathStep::Inhale => self.inhale_secs,
            BreathStep::Hold => self.hold_secs,
            BreathStep::Exhale => self.exhale_secs,
        }
    }

    /// The step that follows `step`, skipping an empty hold.
    pub fn next_step(&self, step: BreathStep) -> BreathStep {
        match step {
            BreathStep::Inhale if self.hold_secs > 0 => BreathStep::Hold,
            BreathStep::Inhale | BreathStep::Hold => BreathStep::Exhale,
            BreathStep::Exhale => BreathStep::Inhale,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.inhale_secs == 0 {
            return Err("inhale_secs must be greater than zero".into());
        }
        if self.exhale_secs == 0 {
            return Err("exhale_secs must be greater than zero".into());
        }
        Ok(())
    }
}

impl Default for BreathPattern {
    fn default() -> Self {
        Self::new(4, 6)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathStep {
    Inhale,
    Hold,
    Exhale,
}

impl BreathStep {
    pub fn label(&self) -> &'static str {
        match self {
            BreathStep::Inhale => "Inhale",
            BreathStep::Hold => "Hold",
            BreathStep::Exhale => "Exhale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PhaseKind {
    /// Static text shown for the phase duration.
    Instructional,
    /// Runs an inner inhale/exhale cycle for as long as the phase is shown.
    Breathing(BreathPattern),
}

/// One timed step of a guided sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub label: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub sub_instruction: String,
    /// Duration in seconds. Zero behaves like one: the phase is always
    /// shown for at least one tick.
    pub duration_secs: u64,
    pub kind: PhaseKind,
    /// Chain to the next phase without waiting for `advance()`.
    #[serde(default)]
    pub auto_advance: bool,
    /// Breathing phases rotate their instruction through these, one per
    /// completed breath.
    #[serde(default)]
    pub rotating_phrases: Vec<String>,
}

impl Phase {
    pub fn instructional(label: impl Into<String>, instruction: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            label: label.into(),
            instruction: instruction.into(),
            sub_instruction: String::new(),
            duration_secs,
            kind: PhaseKind::Instructional,
            auto_advance: false,
            rotating_phrases: Vec::new(),
        }
    }

    pub fn breathing(
        label: impl Into<String>,
        instruction: impl Into<String>,
        duration_secs: u64,
        pattern: BreathPattern,
    ) -> Self {
        Self {
            kind: PhaseKind::Breathing(pattern),
            ..Self::instructional(label, instruction, duration_secs)
        }
    }

    pub fn with_sub_instruction(mut self, sub_instruction: impl Into<String>) -> Self {
        self.sub_instruction = sub_instruction.into();
        self
    }

    pub fn auto_advancing(mut self) -> Self {
        self.auto_advance = true;
        self
    }

    pub fn with_rotating_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rotating_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Ticks needed before the phase counts as complete.
    pub fn required_ticks(&self) -> u64 {
        self.duration_secs.max(1)
    }

    pub fn breath_pattern(&self) -> Option<BreathPattern> {
        match self.kind {
            PhaseKind::Breathing(pattern) => Some(pattern),
            PhaseKind::Instructional => None,
        }
    }

    pub fn is_breathing(&self) -> bool {
        matches!(self.kind, PhaseKind::Breathing(_))
    }
}
