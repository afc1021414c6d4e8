use crate::pose::{Landmark, LandmarkIndex};
use crate::replay::FrameRecord;

const THIGH: f32 = 0.2;
const SHIN: f32 = 0.2;
const TORSO: f32 = 0.3;
const FRAME_MS: u64 = 33;

const STAND_KNEE: f32 = 175.0;
const STAND_BACK: f32 = 5.0;
const STAND_HIP_Y: f32 = 0.45;

/// 左側面から見たスクワット姿勢のランドマークを合成
///
/// 指定した膝角度・背中角度・腰の高さを正確に再現する。右側は少しずらして
/// 可視性を低くするため、解析されるのは左側。
pub fn squat_pose(knee_deg: f32, back_deg: f32, hip_y: f32) -> Vec<Landmark> {
    let mut lms = vec![Landmark::new(0.5, 0.2, 0.3); LandmarkIndex::COUNT];

    let hip = (0.45, hip_y);
    let knee = (hip.0 + THIGH, hip.1);
    // knee→hip points along -x; the shin swings down from +x
    let theta = (180.0 - knee_deg).to_radians();
    let ankle = (knee.0 + SHIN * theta.cos(), knee.1 + SHIN * theta.sin());
    let lean = back_deg.to_radians();
    let shoulder = (hip.0 + TORSO * lean.sin(), hip.1 - TORSO * lean.cos());

    let joints = [
        (LandmarkIndex::LeftShoulder, LandmarkIndex::RightShoulder, shoulder),
        (LandmarkIndex::LeftHip, LandmarkIndex::RightHip, hip),
        (LandmarkIndex::LeftKnee, LandmarkIndex::RightKnee, knee),
        (LandmarkIndex::LeftAnkle, LandmarkIndex::RightAnkle, ankle),
    ];
    for (left, right, (x, y)) in joints {
        lms[left.index()] = Landmark::new(x, y, 0.95).with_z(-0.1);
        lms[right.index()] = Landmark::new(x + 0.01, y, 0.4).with_z(0.1);
    }
    lms[LandmarkIndex::Nose.index()] = Landmark::new(shoulder.0 + 0.03, shoulder.1 - 0.1, 0.9);
    lms
}

/// 録画中の1回の試技
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rep {
    /// 十分深く背筋も伸びている: カウントされる
    Clean,
    /// 深いが前傾しすぎ: 却下
    RoundedBack,
    /// 背筋は伸びているが腰がほぼ下がらない: 却下
    Shallow,
}

impl Rep {
    /// 最下点の (膝角度, 背中角度, 腰の下降量)
    fn bottom(self) -> (f32, f32, f32) {
        match self {
            Rep::Clean => (95.0, 20.0, 0.15),
            Rep::RoundedBack => (95.0, 60.0, 0.15),
            Rep::Shallow => (95.0, 20.0, 0.04),
        }
    }
}

/// 試技の並びから録画フレームを生成する台本
#[derive(Debug, Clone)]
pub struct SquatScript {
    reps: Vec<Rep>,
    lead_in: usize,
    descent: usize,
    hold: usize,
    ascent: usize,
    rest: usize,
}

impl SquatScript {
    pub fn new(reps: Vec<Rep>) -> Self {
        Self {
            reps,
            lead_in: 30,
            descent: 20,
            hold: 15,
            ascent: 20,
            rest: 45,
        }
    }

    fn poses(&self) -> Vec<(f32, f32, f32)> {
        let standing = (STAND_KNEE, STAND_BACK, STAND_HIP_Y);
        let mut poses = vec![standing; self.lead_in];

        for rep in &self.reps {
            let (knee, back, drop) = rep.bottom();
            let bottom = (knee, back, STAND_HIP_Y + drop);
            poses.extend(ramp(standing, bottom, self.descent));
            poses.extend(std::iter::repeat(bottom).take(self.hold));
            poses.extend(ramp(bottom, standing, self.ascent));
            poses.extend(std::iter::repeat(standing).take(self.rest));
        }
        poses
    }

    /// t = 0 から 30fps 間隔のフレーム列
    pub fn frames(&self) -> Vec<FrameRecord> {
        self.poses()
            .into_iter()
            .enumerate()
            .map(|(i, (knee, back, hip_y))| {
                FrameRecord::new(i as u64 * FRAME_MS, squat_pose(knee, back, hip_y))
            })
            .collect()
    }
}

/// `from`（含まない）から `to`（含む）まで線形に補間した `steps` 個の姿勢
fn ramp(from: (f32, f32, f32), to: (f32, f32, f32), steps: usize) -> Vec<(f32, f32, f32)> {
    (1..=steps)
        .map(|j| {
            let t = j as f32 / steps as f32;
            (
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
                from.2 + (to.2 - from.2) * t,
            )
        })
        .collect()
}
