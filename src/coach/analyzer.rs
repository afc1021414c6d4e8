use serde::Serialize;
use tracing::{debug, warn};

use crate::coach::geometry::{angle, vertical_reference};
use crate::coach::rep::{FeedbackCode, RepInput, RepStateMachine, Stance, VoiceCue};
use crate::coach::side::{select_joints, SideJoints};
use crate::coach::smooth::Smoother;
use crate::coach::state::AnalyzerState;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::pose::Landmark;

/// 1フレームの解析結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub knee_angle: f32,
    pub back_angle: f32,
    /// 解析対象側の生の関節座標（平滑化前、オーバーレイ描画用）
    pub joints: SideJoints,
    pub feedback: FeedbackCode,
    pub repetition_count: u32,
    pub stance: Stance,
    pub voice_cue: Option<VoiceCue>,
    pub standing_hip_height: f32,
    pub is_calibrated: bool,
    /// 平滑化後の背中角度がしきい値を超えているか
    pub back_over_limit: bool,
}

/// 1フレームごとのスクワット解析器
///
/// 定数は構築時に固定。状態は呼び出し側が `AnalyzerState` として保持する。
#[derive(Debug, Clone)]
pub struct SquatAnalyzer {
    smoother: Smoother,
    rep: RepStateMachine,
    vertical_reference_offset: f32,
}

impl SquatAnalyzer {
    pub fn new() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            smoother: Smoother::new(config.smoothing_factor),
            rep: RepStateMachine::from_config(config),
            vertical_reference_offset: config.vertical_reference_offset,
        }
    }

    /// 1フレームを解析して `state` を進める
    ///
    /// エラー時は `state` を一切変更しない。
    pub fn analyze(
        &self,
        state: &mut AnalyzerState,
        landmarks: &[Landmark],
    ) -> Result<AnalysisResult, AnalyzeError> {
        let joints = select_joints(landmarks)?;

        let hip = joints.hip.xy();
        let raw_knee = angle(hip, joints.knee.xy(), joints.ankle.xy());
        let raw_back = angle(
            joints.shoulder.xy(),
            hip,
            vertical_reference(hip, self.vertical_reference_offset),
        );

        let mut next = *state;
        let knee_angle = self.smoother.apply(&mut next.smoothed_knee_angle, raw_knee);
        let back_angle = self.smoother.apply(&mut next.smoothed_back_angle, raw_back);

        debug!(
            side = ?joints.side,
            raw_knee,
            raw_back,
            knee_angle,
            back_angle,
            "frame angles"
        );

        let voice_cue = self.rep.step(
            &mut next,
            RepInput {
                knee_angle,
                back_angle,
                hip_y: joints.hip.y,
            },
        );
        *state = next;

        Ok(AnalysisResult {
            knee_angle,
            back_angle,
            joints,
            feedback: state.feedback,
            repetition_count: state.repetition_count,
            stance: state.stance,
            voice_cue,
            standing_hip_height: state.standing_hip_height(),
            is_calibrated: state.is_calibrated(),
            back_over_limit: back_angle > self.rep.back_fail(),
        })
    }

    /// フレーム列を順に畳み込む。解析できないフレームは読み飛ばす
    pub fn fold<'a, I>(&self, state: AnalyzerState, frames: I) -> AnalyzerState
    where
        I: IntoIterator<Item = &'a [Landmark]>,
    {
        frames.into_iter().fold(state, |mut acc, frame| {
            if let Err(e) = self.analyze(&mut acc, frame) {
                warn!("skipping frame: {}", e);
            }
            acc
        })
    }
}

impl Default for SquatAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析器と状態をまとめて保持するセッション
#[derive(Debug, Clone, Default)]
pub struct Session {
    analyzer: SquatAnalyzer,
    state: AnalyzerState,
}

impl Session {
    pub fn new(analyzer: SquatAnalyzer) -> Self {
        Self {
            analyzer,
            state: AnalyzerState::new(),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(SquatAnalyzer::from_config(config))
    }

    pub fn analyze(&mut self, landmarks: &[Landmark]) -> Result<AnalysisResult, AnalyzeError> {
        self.analyzer.analyze(&mut self.state, landmarks)
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = AnalyzerState::new();
    }
}
