use crate::config::AnalyzerConfig;

/// EMAベースのスカラー平滑化フィルタ
///
/// `alpha` は前回出力の重み。前回値はフィルタ自身ではなく呼び出し側の
/// 状態（`AnalyzerState`）が保持する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    alpha: f32,
}

impl Smoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha }
    }

    /// `alpha * previous + (1 - alpha) * current`
    pub fn smooth(&self, current: f32, previous: f32) -> f32 {
        self.alpha * previous + (1.0 - self.alpha) * current
    }

    /// 前回値を更新しつつ平滑化
    pub fn apply(&self, previous: &mut f32, current: f32) -> f32 {
        let result = self.smooth(current, *previous);
        *previous = result;
        result
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default().smoothing_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_steady_state_is_fixed_point() {
        let s = Smoother::default();
        for v in [0.0, 12.5, 90.0, 179.9] {
            assert_eq!(s.smooth(v, v), v);
        }
    }

    #[test]
    fn test_default_matches_config() {
        let s = Smoother::default();
        assert!(approx_eq_f32(s.smooth(100.0, 180.0), 140.0, 1e-6));
    }

    #[test]
    fn test_half_alpha_is_midpoint() {
        let s = Smoother::new(0.5);
        assert!(approx_eq_f32(s.smooth(100.0, 180.0), 140.0, 1e-6));
    }

    #[test]
    fn test_no_smoothing() {
        let s = Smoother::new(0.0);
        assert!(approx_eq_f32(s.smooth(42.0, 180.0), 42.0, 1e-6));
    }

    #[test]
    fn test_apply_carries_previous() {
        let s = Smoother::new(0.5);
        let mut prev = 180.0;
        s.apply(&mut prev, 100.0);
        assert!(approx_eq_f32(prev, 140.0, 1e-6));
        let out = s.apply(&mut prev, 100.0);
        assert!(approx_eq_f32(out, 120.0, 1e-6));
        assert!(approx_eq_f32(prev, 120.0, 1e-6));
    }

    #[test]
    fn test_converges_towards_input() {
        let s = Smoother::default();
        let mut prev = 180.0;
        for _ in 0..30 {
            s.apply(&mut prev, 90.0);
        }
        assert!(approx_eq_f32(prev, 90.0, 1e-3));
    }
}
