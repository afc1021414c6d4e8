use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub cues: CueConfig,
}

/// 解析器の定数（構築時に固定、実行中は変更不可）
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// 平滑化係数（前回値の重み）
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,
    /// これより大きい膝角度で立位と判定（度）
    #[serde(default = "default_knee_up")]
    pub knee_up: f32,
    /// これより小さい膝角度でしゃがみ込みと判定（度）
    #[serde(default = "default_knee_down")]
    pub knee_down: f32,
    /// 背中角度の上限（度）
    #[serde(default = "default_back_fail")]
    pub back_fail: f32,
    /// 立位基準からの腰の最小下降量（正規化座標）
    #[serde(default = "default_hip_drop_min")]
    pub hip_drop_min: f32,
    /// 背中角度の鉛直参照点までの上方オフセット（正規化座標）
    #[serde(default = "default_vertical_reference_offset")]
    pub vertical_reference_offset: f32,
    /// 何回ごとに回数を読み上げるか
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: u32,
}

fn default_smoothing_factor() -> f32 { 0.5 }
fn default_knee_up() -> f32 { 160.0 }
fn default_knee_down() -> f32 { 110.0 }
fn default_back_fail() -> f32 { 45.0 }
fn default_hip_drop_min() -> f32 { 0.08 }
fn default_vertical_reference_offset() -> f32 { 0.5 }
fn default_milestone_interval() -> u32 { 5 }

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: default_smoothing_factor(),
            knee_up: default_knee_up(),
            knee_down: default_knee_down(),
            back_fail: default_back_fail(),
            hip_drop_min: default_hip_drop_min(),
            vertical_reference_offset: default_vertical_reference_offset(),
            milestone_interval: default_milestone_interval(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..1.0).contains(&self.smoothing_factor),
            "analyzer.smoothing_factor must be in [0, 1), got {}",
            self.smoothing_factor
        );
        ensure!(
            self.knee_down < self.knee_up,
            "analyzer.knee_down ({}) must be below analyzer.knee_up ({})",
            self.knee_down,
            self.knee_up
        );
        ensure!(
            (0.0..=180.0).contains(&self.knee_down) && (0.0..=180.0).contains(&self.knee_up),
            "analyzer knee thresholds must be within [0, 180] degrees"
        );
        ensure!(
            (0.0..=180.0).contains(&self.back_fail),
            "analyzer.back_fail must be within [0, 180] degrees, got {}",
            self.back_fail
        );
        ensure!(
            self.hip_drop_min.is_finite() && self.hip_drop_min >= 0.0,
            "analyzer.hip_drop_min must be a non-negative number, got {}",
            self.hip_drop_min
        );
        ensure!(
            self.vertical_reference_offset.is_finite() && self.vertical_reference_offset > 0.0,
            "analyzer.vertical_reference_offset must be positive, got {}",
            self.vertical_reference_offset
        );
        ensure!(
            self.milestone_interval > 0,
            "analyzer.milestone_interval must be at least 1"
        );
        Ok(())
    }
}

/// 音声キューの配信ポリシー
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CueConfig {
    /// 警告キューの最小間隔（秒）
    #[serde(default = "default_warning_cooldown_secs")]
    pub warning_cooldown_secs: f32,
}

fn default_warning_cooldown_secs() -> f32 { 3.0 }

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            warning_cooldown_secs: default_warning_cooldown_secs(),
        }
    }
}

impl CueConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.warning_cooldown_secs.is_finite() && self.warning_cooldown_secs > 0.0,
            "cues.warning_cooldown_secs must be positive, got {}",
            self.warning_cooldown_secs
        );
        Ok(())
    }

    pub fn warning_cooldown(&self) -> Duration {
        Duration::from_secs_f32(self.warning_cooldown_secs)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが無い・読めない場合はデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analyzer.validate()?;
        self.cues.validate()?;
        Ok(())
    }
}
