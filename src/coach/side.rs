use serde::Serialize;

use crate::error::AnalyzeError;
use crate::pose::{Landmark, LandmarkIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 肩・腰・膝・足首のインデックス
    pub fn joints(self) -> [LandmarkIndex; 4] {
        use LandmarkIndex::*;
        match self {
            Side::Left => [LeftShoulder, LeftHip, LeftKnee, LeftAnkle],
            Side::Right => [RightShoulder, RightHip, RightKnee, RightAnkle],
        }
    }
}

/// 解析対象側の4関節（フレームからのコピー）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideJoints {
    pub side: Side,
    pub shoulder: Landmark,
    pub hip: Landmark,
    pub knee: Landmark,
    pub ankle: Landmark,
}

fn lookup(landmarks: &[Landmark], index: LandmarkIndex) -> Result<&Landmark, AnalyzeError> {
    landmarks
        .get(index.index())
        .ok_or(AnalyzeError::MissingLandmark {
            index: index.index(),
            len: landmarks.len(),
        })
}

/// 腰の可視性が高い側を選ぶ（同値なら左）
///
/// 可視性の下限は設けない。両側とも低くても高い方を採用する。
/// フレーム内の座標が一つでも非有限なら `NonFinite` を返す。
pub fn select_side(landmarks: &[Landmark]) -> Result<Side, AnalyzeError> {
    if landmarks.len() < LandmarkIndex::MIN_FRAME_LEN {
        return Err(AnalyzeError::TooFewLandmarks {
            expected: LandmarkIndex::MIN_FRAME_LEN,
            actual: landmarks.len(),
        });
    }
    if let Some(index) = landmarks.iter().position(|lm| !lm.is_finite()) {
        return Err(AnalyzeError::NonFinite { index });
    }

    let left = lookup(landmarks, LandmarkIndex::LeftHip)?.visibility;
    let right = lookup(landmarks, LandmarkIndex::RightHip)?.visibility;
    if !left.is_finite() {
        return Err(AnalyzeError::NonFinite { index: LandmarkIndex::LeftHip.index() });
    }
    if !right.is_finite() {
        return Err(AnalyzeError::NonFinite { index: LandmarkIndex::RightHip.index() });
    }

    Ok(if left >= right { Side::Left } else { Side::Right })
}

/// 解析する側を選び、その4関節を取り出す
pub fn select_joints(landmarks: &[Landmark]) -> Result<SideJoints, AnalyzeError> {
    let side = select_side(landmarks)?;
    let [shoulder, hip, knee, ankle] = side.joints();

    let fetch = |index: LandmarkIndex| lookup(landmarks, index).copied();

    Ok(SideJoints {
        side,
        shoulder: fetch(shoulder)?,
        hip: fetch(hip)?,
        knee: fetch(knee)?,
        ankle: fetch(ankle)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(left_vis: f32, right_vis: f32) -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.5, 0.9); LandmarkIndex::COUNT];
        lms[LandmarkIndex::LeftHip as usize].visibility = left_vis;
        lms[LandmarkIndex::RightHip as usize].visibility = right_vis;
        lms[LandmarkIndex::LeftKnee as usize] = Landmark::new(0.4, 0.7, 0.9);
        lms[LandmarkIndex::RightKnee as usize] = Landmark::new(0.6, 0.7, 0.9);
        lms
    }

    #[test]
    fn test_more_visible_side_wins() {
        assert_eq!(select_side(&frame(0.9, 0.2)).unwrap(), Side::Left);
        assert_eq!(select_side(&frame(0.2, 0.9)).unwrap(), Side::Right);
    }

    #[test]
    fn test_tie_goes_left() {
        assert_eq!(select_side(&frame(0.5, 0.5)).unwrap(), Side::Left);
    }

    #[test]
    fn test_low_visibility_still_selects() {
        assert_eq!(select_side(&frame(0.01, 0.02)).unwrap(), Side::Right);
    }

    #[test]
    fn test_select_joints_uses_side_indices() {
        let joints = select_joints(&frame(0.1, 0.9)).unwrap();
        assert_eq!(joints.side, Side::Right);
        assert_eq!(joints.knee.x, 0.6);

        let joints = select_joints(&frame(0.9, 0.1)).unwrap();
        assert_eq!(joints.side, Side::Left);
        assert_eq!(joints.knee.x, 0.4);
    }

    #[test]
    fn test_too_few_landmarks() {
        let lms = vec![Landmark::default(); 24];
        assert_eq!(
            select_side(&lms),
            Err(AnalyzeError::TooFewLandmarks { expected: 25, actual: 24 })
        );
    }

    #[test]
    fn test_missing_joint_of_selected_side() {
        // 両腰はあるが膝・足首が欠けている
        let lms = frame(0.9, 0.1)[..25].to_vec();
        assert_eq!(select_side(&lms), Ok(Side::Left));
        assert_eq!(
            select_joints(&lms),
            Err(AnalyzeError::MissingLandmark { index: 25, len: 25 })
        );
    }

    #[test]
    fn test_non_finite_joint_rejected() {
        let mut lms = frame(0.9, 0.1);
        lms[LandmarkIndex::LeftAnkle as usize].y = f32::NAN;
        assert_eq!(select_joints(&lms), Err(AnalyzeError::NonFinite { index: 27 }));
    }

    #[test]
    fn test_non_finite_anywhere_rejected() {
        let mut lms = frame(0.9, 0.1);
        lms[LandmarkIndex::RightHip as usize].y = f32::NAN;
        assert_eq!(select_joints(&lms), Err(AnalyzeError::NonFinite { index: 24 }));

        let mut lms = frame(0.9, 0.1);
        lms[LandmarkIndex::RightAnkle as usize].x = f32::INFINITY;
        assert_eq!(select_side(&lms), Err(AnalyzeError::NonFinite { index: 28 }));
    }

    #[test]
    fn test_first_non_finite_index_reported() {
        let mut lms = frame(0.9, 0.1);
        lms[LandmarkIndex::Nose as usize].x = f32::NAN;
        lms[LandmarkIndex::RightHip as usize].y = f32::NAN;
        assert_eq!(select_side(&lms), Err(AnalyzeError::NonFinite { index: 0 }));
    }

    #[test]
    fn test_non_finite_visibility_rejected() {
        let lms = frame(f32::NAN, 0.1);
        assert_eq!(select_side(&lms), Err(AnalyzeError::NonFinite { index: 23 }));
    }
}
