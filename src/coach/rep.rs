use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::coach::state::AnalyzerState;
use crate::config::AnalyzerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackCode {
    Ready,
    Good,
    Hold,
    ErrorBackRound,
    ErrorShallowDepth,
}

impl FeedbackCode {
    /// オーバーレイ表示用テキスト
    pub fn label(self) -> &'static str {
        match self {
            FeedbackCode::Ready => "READY",
            FeedbackCode::Good => "GOOD!",
            FeedbackCode::Hold => "HOLD...",
            FeedbackCode::ErrorBackRound => "KEEP YOUR BACK STRAIGHT!",
            FeedbackCode::ErrorShallowDepth => "LOWER YOUR HIPS!",
        }
    }

    /// オーバーレイ表示色 (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            FeedbackCode::Ready => [255, 255, 0],
            FeedbackCode::Good | FeedbackCode::Hold => [0, 255, 0],
            FeedbackCode::ErrorBackRound | FeedbackCode::ErrorShallowDepth => [255, 0, 0],
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, FeedbackCode::ErrorBackRound | FeedbackCode::ErrorShallowDepth)
    }
}

impl fmt::Display for FeedbackCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 外部の音声合成に渡すキュー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceCue {
    RoundBack,
    GoDeeper,
    /// 到達したレップ数
    Milestone(u32),
}

impl VoiceCue {
    pub fn token(&self) -> String {
        match self {
            VoiceCue::RoundBack => "round_back".to_string(),
            VoiceCue::GoDeeper => "go_deeper".to_string(),
            VoiceCue::Milestone(count) => format!("milestone_{}", count),
        }
    }

    /// 読み上げ用の文言
    pub fn phrase(&self) -> String {
        match self {
            VoiceCue::RoundBack => "Don't round your back".to_string(),
            VoiceCue::GoDeeper => "Lower your hips".to_string(),
            VoiceCue::Milestone(count) => format!("{} reps", count),
        }
    }

    /// マイルストーンは優先。警告はクールダウンで間引かれる
    pub fn is_priority(&self) -> bool {
        matches!(self, VoiceCue::Milestone(_))
    }
}

impl Serialize for VoiceCue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl fmt::Display for VoiceCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// 1フレーム分の入力（平滑化済み）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepInput {
    pub knee_angle: f32,
    pub back_angle: f32,
    pub hip_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepStateMachine {
    knee_up: f32,
    knee_down: f32,
    back_fail: f32,
    hip_drop_min: f32,
    milestone_interval: u32,
}

impl RepStateMachine {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            knee_up: config.knee_up,
            knee_down: config.knee_down,
            back_fail: config.back_fail,
            hip_drop_min: config.hip_drop_min,
            milestone_interval: config.milestone_interval,
        }
    }

    pub fn back_fail(&self) -> f32 {
        self.back_fail
    }

    /// `state` を1フレーム進め、読み上げるキューがあれば返す
    ///
    /// 判定順: 立位リセット → 背中の丸まり → 深さ不足 → Up→Down でカウント。
    /// 膝角度が2つのしきい値の間にある間は何も変えない（ヒステリシス）。
    pub fn step(&self, state: &mut AnalyzerState, input: RepInput) -> Option<VoiceCue> {
        if input.knee_angle > self.knee_up {
            if !state.calibration.is_calibrated() {
                info!(hip_y = input.hip_y, "calibrated standing hip height");
            }
            state.stance = Stance::Up;
            state.feedback = FeedbackCode::Ready;
            state.calibration.record_standing(input.hip_y);
            return None;
        }

        if input.knee_angle >= self.knee_down {
            return None;
        }

        if input.back_angle > self.back_fail {
            debug!(back_angle = input.back_angle, "rep vetoed: rounded back");
            state.feedback = FeedbackCode::ErrorBackRound;
            return Some(VoiceCue::RoundBack);
        }

        if let Some(drop) = state.calibration.hip_drop(input.hip_y) {
            if drop < self.hip_drop_min {
                debug!(hip_drop = drop, "rep vetoed: shallow depth");
                state.feedback = FeedbackCode::ErrorShallowDepth;
                return Some(VoiceCue::GoDeeper);
            }
        }

        match state.stance {
            Stance::Up => {
                state.stance = Stance::Down;
                state.repetition_count += 1;
                state.feedback = FeedbackCode::Good;
                info!(count = state.repetition_count, "rep counted");

                let count = state.repetition_count;
                (count.checked_rem(self.milestone_interval) == Some(0))
                    .then_some(VoiceCue::Milestone(count))
            }
            Stance::Down => {
                if state.feedback != FeedbackCode::Good {
                    state.feedback = FeedbackCode::Hold;
                }
                None
            }
        }
    }
}

impl Default for RepStateMachine {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}
