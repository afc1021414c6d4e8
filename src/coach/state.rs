use serde::Serialize;

use crate::coach::calibration::CalibrationTracker;
use crate::coach::rep::{FeedbackCode, Stance};

/// フレーム間で引き継ぐ解析状態
///
/// 呼び出し側が所有し、`analyze` のたびに渡す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyzerState {
    pub repetition_count: u32,
    pub stance: Stance,
    pub feedback: FeedbackCode,
    /// 初期値は膝が伸び切った状態
    pub smoothed_knee_angle: f32,
    pub smoothed_back_angle: f32,
    pub calibration: CalibrationTracker,
}

impl AnalyzerState {
    pub const INITIAL_KNEE_ANGLE: f32 = 180.0;
    pub const INITIAL_BACK_ANGLE: f32 = 0.0;

    pub fn new() -> Self {
        Self {
            repetition_count: 0,
            stance: Stance::Up,
            feedback: FeedbackCode::Ready,
            smoothed_knee_angle: Self::INITIAL_KNEE_ANGLE,
            smoothed_back_angle: Self::INITIAL_BACK_ANGLE,
            calibration: CalibrationTracker::new(),
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    pub fn standing_hip_height(&self) -> f32 {
        self.calibration.standing_hip_height()
    }
}

impl Default for AnalyzerState {
    fn default() -> Self {
        Self::new()
    }
}
