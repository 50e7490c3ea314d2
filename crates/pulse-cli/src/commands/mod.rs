pub mod affirmation;
pub mod article;
pub mod breathe;
pub mod completions;
pub mod config;
pub mod flow;
pub mod mood;
pub mod player;
pub mod routine;
pub mod sound;
