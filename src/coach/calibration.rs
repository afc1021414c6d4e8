use serde::Serialize;

/// 立位時の腰の高さ（キャリブレーション基準）
///
/// 一度キャリブレーションされると未キャリブレーションには戻らない。
/// 立位を観測するたびに基準を更新する（外れ値除去なし）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalibrationTracker {
    standing_hip_y: Option<f32>,
}

impl CalibrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 立位で観測した腰のY座標を基準として記録
    pub fn record_standing(&mut self, hip_y: f32) {
        self.standing_hip_y = Some(hip_y);
    }

    pub fn is_calibrated(&self) -> bool {
        self.standing_hip_y.is_some()
    }

    /// 基準の腰Y座標。未キャリブレーションなら 0.0
    pub fn standing_hip_height(&self) -> f32 {
        self.standing_hip_y.unwrap_or(0.0)
    }

    /// 基準からの腰の下降量（画像Yは下向きが正）
    pub fn hip_drop(&self, hip_y: f32) -> Option<f32> {
        self.standing_hip_y.map(|standing| hip_y - standing)
    }
}
