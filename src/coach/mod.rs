pub mod analyzer;
pub mod calibration;
pub mod cue;
pub mod geometry;
pub mod rep;
pub mod side;
pub mod smooth;
pub mod state;

pub use analyzer::{AnalysisResult, Session, SquatAnalyzer};
pub use calibration::CalibrationTracker;
pub use cue::CueQueue;
pub use geometry::angle;
pub use rep::{FeedbackCode, RepInput, RepStateMachine, Stance, VoiceCue};
pub use side::{select_joints, select_side, Side, SideJoints};
pub use smooth::Smoother;
pub use state::AnalyzerState;
