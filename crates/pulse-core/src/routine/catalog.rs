//! Built-in routines, the calming flow and the content pools behind them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::phase::{BreathPattern, Phase};
use super::sequence::Sequence;
use crate::error::{SequenceError, ValidationError};
use crate::random::{pick, Chooser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineId {
    Morning,
    Evening,
    Sleep,
}

impl RoutineId {
    pub const ALL: [RoutineId; 3] = [RoutineId::Morning, RoutineId::Evening, RoutineId::Sleep];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineId::Morning => "morning",
            RoutineId::Evening => "evening",
            RoutineId::Sleep => "sleep",
        }
    }
}

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(RoutineId::Morning),
            "evening" => Ok(RoutineId::Evening),
            "sleep" => Ok(RoutineId::Sleep),
            other => Err(ValidationError::UnknownId {
                kind: "routine",
                id: other.to_string(),
            }),
        }
    }
}

/// Catalog entry: display metadata plus the sequence it plays.
#[derive(Debug, Clone, Serialize)]
pub struct Routine {
    pub id: RoutineId,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub duration_display: &'static str,
    pub emoji: &'static str,
    pub sequence: Sequence,
}

impl Routine {
    pub fn get(id: RoutineId) -> Self {
        match id {
            RoutineId::Morning => morning(),
            RoutineId::Evening => evening(),
            RoutineId::Sleep => sleep(),
        }
    }

    pub fn all() -> Vec<Self> {
        RoutineId::ALL.iter().map(|id| Self::get(*id)).collect()
    }
}

fn build(id: RoutineId, title: &'static str, phases: Vec<Phase>) -> Sequence {
    // Catalog phases are static and always valid.
    match Sequence::new(id.as_str(), title, phases) {
        Ok(seq) => seq,
        Err(err) => unreachable!("built-in routine '{id}' is invalid: {err}"),
    }
}

fn morning() -> Routine {
    let title = "Morning Regulation";
    Routine {
        id: RoutineId::Morning,
        title,
        subtitle: "Start the day steady, not rushed",
        duration_display: "5 min",
        emoji: "🌤️",
        sequence: build(
            RoutineId::Morning,
            title,
            vec![
                Phase::breathing("Breath Sync", "Inhale slowly.\nExhale longer.", 90, BreathPattern::new(4, 6))
                    .with_sub_instruction("4 counts in · 6 counts out"),
                Phase::instructional(
                    "Body Wake-Up",
                    "Roll your shoulders back.\nGently stretch your neck.\nUnclench your jaw.",
                    60,
                )
                .with_sub_instruction("Release overnight tension"),
                Phase::instructional(
                    "Intentional Grounding",
                    "Feel your feet on the floor.\nNotice the temperature of the air.\nName one thing you're grateful for.",
                    60,
                )
                .with_sub_instruction("Stay present"),
                Phase::instructional(
                    "Nervous System Priming",
                    "Today, move slowly.\nYou don't need to rush.",
                    45,
                )
                .with_sub_instruction("Set the tone gently"),
                Phase::instructional("Closing Anchor", "You are steady.\nStart gently.", 45),
            ],
        ),
    }
}

fn evening() -> Routine {
    let title = "Evening Wind Down";
    Routine {
        id: RoutineId::Evening,
        title,
        subtitle: "Release the weight of the day",
        duration_display: "7 min",
        emoji: "🌇",
        sequence: build(
            RoutineId::Evening,
            title,
            vec![
                Phase::breathing("Slow Breathing", "Breathe in for 4.\nBreathe out for 6.", 120, BreathPattern::new(4, 6))
                    .with_sub_instruction("Let your body slow down"),
                Phase::instructional(
                    "Tension Release",
                    "Tighten your fists.\nRelease.\n\nLift your shoulders.\nDrop them.\n\nPress your toes.\nRelax.",
                    90,
                )
                .with_sub_instruction("Release residual tension"),
                Phase::instructional(
                    "Mental Unload",
                    "What felt heavy today?\nYou can let it rest for now.",
                    90,
                )
                .with_sub_instruction("No analysis needed"),
                Phase::instructional("Sensory Soften", "Let your breathing slow naturally.", 60)
                    .with_sub_instruction("Settle into stillness"),
                Phase::instructional("Closure", "Today is complete.\nYou did enough.", 60),
            ],
        ),
    }
}

fn sleep() -> Routine {
    let title = "Pre-Sleep Calm";
    Routine {
        id: RoutineId::Sleep,
        title,
        subtitle: "Activate deep rest",
        duration_display: "5 min",
        emoji: "🌙",
        sequence: build(
            RoutineId::Sleep,
            title,
            vec![
                Phase::breathing("Extended Exhale", "Breathe in for 4.\nBreathe out for 8.", 120, BreathPattern::new(4, 8))
                    .with_sub_instruction("Signal your vagus nerve"),
                Phase::instructional(
                    "Body Drop",
                    "Feel the weight of your body.\nLet the bed hold you.\nRelease your tongue.",
                    60,
                )
                .with_sub_instruction("A relaxed tongue means safety"),
                Phase::instructional(
                    "Narrow Attention",
                    "Focus only on your breath.\nIf thoughts come, let them pass.",
                    60,
                )
                .with_sub_instruction("No complexity needed"),
                Phase::instructional("Final Phrase", "Nothing else is needed tonight.\nRest.", 60),
            ],
        ),
    }
}

// ── Calming flow ─────────────────────────────────────────────────────

pub const CALMING_PHRASES: [&str; 8] = [
    "This is uncomfortable, not dangerous.",
    "You are safe right now.",
    "Nothing bad is happening.",
    "You’re not in danger.",
    "This will pass.",
    "It always peaks, then fades.",
    "This feeling won’t last.",
    "You’ve been here before. It ended.",
];

pub const GROUNDING_STEPS: [(&str, &str); 3] = [
    ("Sight", "Look around.\nName 3 things you can see."),
    ("Sound", "Notice 2 sounds around you."),
    ("Touch", "Touch 1 solid object near you."),
];

pub const BODY_RECONNECTION_STEPS: [&str; 3] = [
    "Press your feet gently into the floor.",
    "Relax your jaw. Let your tongue rest.",
    "Drop your shoulders.",
];

pub const COPING_PHRASES: [&str; 3] = [
    "Your body is settling now.",
    "You handled this.",
    "You’re back in control.",
];

pub const CLOSURE_ACTIONS: [&str; 3] = [
    "Sit here for a moment.",
    "Drink some water.",
    "Stay with the calm for 10 seconds.",
];

pub const AFFIRMATIONS: [&str; 6] = [
    "I am more than my circumstances dictate.",
    "I can take this one breath at a time.",
    "My feelings are valid, and they will pass.",
    "I am allowed to move slowly today.",
    "I have handled hard moments before.",
    "I deserve the same kindness I give others.",
];

/// Pick today's affirmation.
pub fn affirmation(chooser: &mut dyn Chooser) -> &'static str {
    pick(chooser, &AFFIRMATIONS).copied().unwrap_or(AFFIRMATIONS[0])
}

/// How residual tension is released in the calming flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseOption {
    Pressure,
    Hug,
}

impl ReleaseOption {
    pub fn title(&self) -> &'static str {
        match self {
            ReleaseOption::Pressure => "Pressure",
            ReleaseOption::Hug => "Self-hug",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            ReleaseOption::Pressure => "Press your palms together for 5 seconds.\n\nRelease.",
            ReleaseOption::Hug => "Wrap your arms around yourself.\n\nHold. Breathe.",
        }
    }
}

impl FromStr for ReleaseOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pressure" => Ok(ReleaseOption::Pressure),
            "hug" | "self-hug" => Ok(ReleaseOption::Hug),
            other => Err(ValidationError::UnknownId {
                kind: "release option",
                id: other.to_string(),
            }),
        }
    }
}

/// Timing knobs for the calming flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSettings {
    pub breath: BreathPattern,
    pub lead_in_secs: u64,
    pub coping_secs: u64,
    pub closure_secs: u64,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            breath: BreathPattern::with_hold(4, 4, 6),
            lead_in_secs: 5,
            coping_secs: 4,
            closure_secs: 6,
        }
    }
}

pub const CALMING_FLOW_ID: &str = "calming-flow";

/// The panic-relief flow: breathing, grounding, body reconnection, tension
/// release and cognitive reorientation as one sequence.
///
/// # Errors
/// Fails only when `settings.breath` has a zero inhale or exhale.
pub fn calming_flow(
    settings: &FlowSettings,
    release: ReleaseOption,
    chooser: &mut dyn Chooser,
) -> Result<Sequence, SequenceError> {
    let mut phases = Vec::new();

    if settings.lead_in_secs > 0 {
        phases.push(Phase::instructional("Prepare", "Prepare to breathe", settings.lead_in_secs).auto_advancing());
    }

    phases.push(
        Phase::breathing("Breathe", CALMING_PHRASES[0], 0, settings.breath)
            .with_sub_instruction("Go to grounding exercises when you are ready")
            .with_rotating_phrases(CALMING_PHRASES),
    );

    for (title, instruction) in GROUNDING_STEPS {
        phases.push(Phase::instructional(title, instruction, 0));
    }

    for step in BODY_RECONNECTION_STEPS {
        phases.push(Phase::instructional("Body Reconnection", step, 0));
    }

    phases.push(
        Phase::instructional(release.title(), release.instruction(), 0)
            .with_sub_instruction("Release residual adrenaline"),
    );

    let coping = pick(chooser, &COPING_PHRASES).copied().unwrap_or(COPING_PHRASES[0]);
    let closure = pick(chooser, &CLOSURE_ACTIONS).copied().unwrap_or(CLOSURE_ACTIONS[0]);
    phases.push(Phase::instructional("Reorientation", coping, settings.coping_secs).auto_advancing());
    phases.push(Phase::instructional("Safe Closure", closure, settings.closure_secs).auto_advancing());
    phases.push(Phase::instructional("Safe", "You’re safe.", 0));

    Sequence::new(CALMING_FLOW_ID, "Calming Flow", phases)
}

// ── Ambient sounds ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sound {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub filename: Option<&'static str>,
}

pub static SOUNDS: [Sound; 10] = [
    Sound { id: "rain", title: "Rain", description: "Soft summer rain or rain on a roof", filename: Some("rain") },
    Sound { id: "ocean", title: "Ocean Waves", description: "Rhythmic waves on the shore", filename: Some("ocean") },
    Sound { id: "stream", title: "Streams", description: "Constant murmur of running water", filename: Some("stream") },
    Sound { id: "wind", title: "Wind", description: "Soft breeze through the trees", filename: Some("wind") },
    Sound { id: "storm", title: "Distant Storm", description: "Soft, distant thunder and rain", filename: Some("storm") },
    Sound { id: "forest", title: "Forest", description: "Leaves rustling and morning birds", filename: Some("forest") },
    Sound { id: "cat", title: "Cat Purr", description: "Vibrant and comforting purring", filename: Some("cat") },
    Sound { id: "fire", title: "Fire", description: "Crackling logs in a fireplace", filename: Some("fire") },
    Sound { id: "noise", title: "Pink/White Noise", description: "Constant waterfall-like mask", filename: Some("noise") },
    Sound { id: "snow", title: "Snow Crunch", description: "Soft, crisp sound of walking on snow", filename: Some("snow") },
];

pub fn sound(id: &str) -> Result<&'static Sound, ValidationError> {
    SOUNDS.iter().find(|s| s.id == id).ok_or_else(|| ValidationError::UnknownId {
        kind: "sound",
        id: id.to_string(),
    })
}

// ── Articles ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArticleSource {
    pub label: &'static str,
    pub url: &'static str,
}

/// Short psychoeducation read shown in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: u32,
    pub title: &'static str,
    pub card_subtitle: &'static str,
    pub paragraphs: &'static [&'static str],
    pub sources: &'static [ArticleSource],
}

impl Article {
    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.split_whitespace().count()).sum()
    }
}

const MERRIAM_WEBSTER: ArticleSource = ArticleSource {
    label: "Merriam-Webster",
    url: "https://www.merriam-webster.com/dictionary/panic%20attack",
};
const TIMOTHY_CENTER: ArticleSource = ArticleSource {
    label: "Timothy Center",
    url: "https://timothycenter.com/what-does-a-panic-attack-feel-like-12-symptoms/",
};

const ARTICLE_SUBTITLE: &str = "I am more than my circumstances dictate.";

pub static ARTICLES: [Article; 3] = [
    Article {
        id: 1,
        title: "What is a Panic Attack and Why Does It Feel So Intense?",
        card_subtitle: ARTICLE_SUBTITLE,
        paragraphs: &[
            "A panic attack is a sudden episode of intense fear or discomfort that peaks within minutes, often without any real danger or obvious trigger. Common symptoms include rapid heartbeat, sweating, shortness of breath, chest pain, dizziness, trembling, and a sense of impending doom or loss of control.",
            "It feels so intense because it activates the body's fight-or-flight response, flooding the system with adrenaline and stress hormones like cortisol via the sympathetic nervous system and HPA axis. This causes exaggerated physical reactions, such as a pounding heart and hyperventilation, even without a threat, mimicking a heart attack and amplifying terror through amygdala hyperactivity. Attacks typically last 5-30 minutes but can leave lingering exhaustion.",
        ],
        sources: &[MERRIAM_WEBSTER, TIMOTHY_CENTER],
    },
    Article {
        id: 2,
        title: "Why does this happen to me \"out of nowhere\" if I'm not stressed?",
        card_subtitle: ARTICLE_SUBTITLE,
        paragraphs: &[
            "Panic attacks can strike without warning, even if you feel calm. They often seem to come \"out of nowhere\" because hidden triggers or body signals build up quietly.",
            "Your brain's fear center might misfire, spotting a false danger like a change in heartbeat or stomach flip. Past experiences, genes, or imbalances in brain chemicals can make this happen randomly, skipping obvious stress.",
            "Breathing shifts or caffeine can spark it too, turning a tiny sensation into full panic fast. These episodes peak quick but fade, showing your body just overreacted.",
        ],
        sources: &[
            ArticleSource {
                label: "Mayo Clinic",
                url: "https://www.mayoclinic.org/diseases-conditions/panic-attacks/symptoms-causes/syc-20376021",
            },
            MERRIAM_WEBSTER,
            ArticleSource {
                label: "Better Health",
                url: "https://www.betterhealth.vic.gov.au/health/conditionsandtreatments/panic-attack",
            },
        ],
    },
    Article {
        id: 3,
        title: "What happens in my brain during a panic attack?",
        card_subtitle: ARTICLE_SUBTITLE,
        paragraphs: &[
            "During a panic attack, your brain's fear center called the amygdala goes into overdrive, sounding a false alarm as if danger is near. It signals the release of stress hormones like adrenaline, ramping up your heart rate and breathing to prepare for \"fight or flight.\"",
            "This creates a feedback loop: the amygdala senses normal body changes, like a faster heartbeat, as threats, triggering more panic. The prefrontal cortex, which calms fear, gets overwhelmed and can't stop the surge, making everything feel out of control.",
            "Once the attack peaks in minutes, hormone levels drop, and calm returns as the brain resets.",
        ],
        sources: &[
            ArticleSource {
                label: "MindEase",
                url: "https://mindease.io/wellness-blog/panic-attack-neuroscience",
            },
            TIMOTHY_CENTER,
            MERRIAM_WEBSTER,
        ],
    },
];

pub fn article(id: u32) -> Result<&'static Article, ValidationError> {
    ARTICLES.iter().find(|a| a.id == id).ok_or_else(|| ValidationError::UnknownId {
        kind: "article",
        id: id.to_string(),
    })
}
