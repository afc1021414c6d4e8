pub mod coach;
pub mod config;
pub mod error;
pub mod pose;
pub mod replay;
pub mod synth;

pub use coach::{AnalysisResult, AnalyzerState, FeedbackCode, Session, SquatAnalyzer, Stance, VoiceCue};
pub use error::AnalyzeError;
pub use pose::{Landmark, LandmarkIndex};
