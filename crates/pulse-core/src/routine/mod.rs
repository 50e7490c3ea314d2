mod catalog;
mod phase;
mod sequence;

pub use catalog::{
    affirmation, article, calming_flow, sound, Article, ArticleSource, FlowSettings, ReleaseOption,
    Routine, RoutineId, Sound, AFFIRMATIONS, ARTICLES, BODY_RECONNECTION_STEPS, CALMING_FLOW_ID,
    CALMING_PHRASES, CLOSURE_ACTIONS, COPING_PHRASES, GROUNDING_STEPS, SOUNDS,
};
pub use phase::{BreathPattern, BreathStep, Phase, PhaseKind};
pub use sequence::Sequence;
