use serde::{Deserialize, Serialize};

/// MediaPipe Pose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    /// 解析に必要な最小ランドマーク数（両腰まで）
    pub const MIN_FRAME_LEN: usize = LandmarkIndex::RightHip as usize + 1;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0, 下向きが正)
    pub y: f32,
    /// 相対深度（モデルが出力しない場合は None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// 可視性スコア (0.0〜1.0)
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, z: None, visibility }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    /// 2D 座標のみ
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// x, y と（あれば）z がすべて有限か
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f32::is_finite)
    }

    /// ピクセル座標に変換
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: None,
            visibility: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
        assert_eq!(LandmarkIndex::MIN_FRAME_LEN, 25);
    }

    #[test]
    fn test_landmark_to_pixel() {
        let lm = Landmark::new(0.5, 0.25, 1.0);
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
    }

    #[test]
    fn test_landmark_is_finite() {
        assert!(Landmark::new(0.1, 0.2, 0.9).is_finite());
        assert!(Landmark::new(0.1, 0.2, 0.9).with_z(-0.3).is_finite());
        assert!(!Landmark::new(f32::NAN, 0.2, 0.9).is_finite());
        assert!(!Landmark::new(0.1, f32::INFINITY, 0.9).is_finite());
        assert!(!Landmark::new(0.1, 0.2, 0.9).with_z(f32::NAN).is_finite());
    }

    #[test]
    fn test_landmark_deserialize_optional_fields() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.4,"y":0.6}"#).unwrap();
        assert_eq!(lm.z, None);
        assert_eq!(lm.visibility, 0.0);

        let lm: Landmark =
            serde_json::from_str(r#"{"x":0.4,"y":0.6,"z":-0.1,"visibility":0.8}"#).unwrap();
        assert_eq!(lm.z, Some(-0.1));
        assert_eq!(lm.visibility, 0.8);
    }
}
