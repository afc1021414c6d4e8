use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::coach::{CueQueue, FeedbackCode, Session};
use crate::config::Config;
use crate::pose::Landmark;

pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

/// 録画ファイル (JSON Lines) の1行
///
/// `{"timestamp_ms": 33, "landmarks": [{"x":..,"y":..,"visibility":..}, ...]}`
/// `timestamp_ms` が無い場合は 30fps 間隔とみなす。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    pub landmarks: Vec<Landmark>,
}

impl FrameRecord {
    pub fn new(timestamp_ms: u64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            landmarks,
        }
    }
}

pub fn parse_frames<R: BufRead>(reader: R) -> Result<Vec<FrameRecord>> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", i + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame: FrameRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("Malformed frame on line {}", i + 1))?;
        frames.push(frame);
    }
    Ok(frames)
}

pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<FrameRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open frame file {}", path.display()))?;
    parse_frames(BufReader::new(file))
}

pub fn write_frames<P: AsRef<Path>>(path: P, frames: &[FrameRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create frame file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for frame in frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// 音声側に渡したキュー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpokenCue {
    pub at_ms: u64,
    pub token: String,
    pub phrase: String,
}

/// 連続する解析フレーム間でのフィードバック変化
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackChange {
    pub frame: usize,
    pub at_ms: u64,
    pub from: FeedbackCode,
    pub to: FeedbackCode,
    pub repetition_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub rejected_frames: usize,
    pub repetition_count: u32,
    pub final_feedback: FeedbackCode,
    pub is_calibrated: bool,
    pub standing_hip_height: f32,
    pub spoken: Vec<SpokenCue>,
    pub changes: Vec<FeedbackChange>,
}

/// 新しいセッションとキューで `frames` を再生
pub fn run(config: &Config, frames: &[FrameRecord]) -> ReplaySummary {
    let mut session = Session::from_config(&config.analyzer);
    let mut cues = CueQueue::from_config(&config.cues);
    let mut rejected_frames = 0;
    let mut spoken = Vec::new();
    let mut changes = Vec::new();

    for (i, frame) in frames.iter().enumerate() {
        let at_ms = frame
            .timestamp_ms
            .unwrap_or(i as u64 * DEFAULT_FRAME_INTERVAL_MS);
        let before = session.state().feedback;

        let result = match session.analyze(&frame.landmarks) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(frame = i, "frame rejected: {}", e);
                rejected_frames += 1;
                continue;
            }
        };

        if result.feedback != before {
            changes.push(FeedbackChange {
                frame: i,
                at_ms,
                from: before,
                to: result.feedback,
                repetition_count: result.repetition_count,
            });
        }

        if let Some(cue) = result.voice_cue {
            cues.push(cue, Duration::from_millis(at_ms));
        }
        // 音声側は1フレームに1件ずつ取り出す
        if let Some(cue) = cues.pop() {
            spoken.push(SpokenCue {
                at_ms,
                token: cue.token(),
                phrase: cue.phrase(),
            });
        }
    }

    let state = session.state();
    ReplaySummary {
        frames: frames.len(),
        rejected_frames,
        repetition_count: state.repetition_count,
        final_feedback: state.feedback,
        is_calibrated: state.is_calibrated(),
        standing_hip_height: state.standing_hip_height(),
        spoken,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{SquatScript, Rep};

    #[test]
    fn test_parse_frames_skips_blank_lines() {
        let input = concat!(
            r#"{"timestamp_ms":0,"landmarks":[{"x":0.1,"y":0.2,"visibility":0.9}]}"#,
            "\n\n   \n",
            r#"{"landmarks":[{"x":0.3,"y":0.4}]}"#,
            "\n"
        );
        let frames = parse_frames(input.as_bytes()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].timestamp_ms, Some(0));
        assert_eq!(frames[1].timestamp_ms, None);
        assert_eq!(frames[1].landmarks[0].x, 0.3);
    }

    #[test]
    fn test_parse_frames_reports_line() {
        let input = "{\"landmarks\":[]}\n{not json}\n";
        let err = parse_frames(input.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        let frames = SquatScript::new(vec![Rep::Clean]).frames();
        write_frames(&path, &frames).unwrap();
        assert_eq!(read_frames(&path).unwrap(), frames);
    }

    #[test]
    fn test_run_counts_clean_reps() {
        let frames = SquatScript::new(vec![Rep::Clean; 3]).frames();
        let summary = run(&Config::default(), &frames);
        assert_eq!(summary.repetition_count, 3);
        assert_eq!(summary.rejected_frames, 0);
        assert!(summary.is_calibrated);
        assert_eq!(summary.final_feedback, FeedbackCode::Ready);
        assert!(summary.spoken.is_empty());
    }

    #[test]
    fn test_run_voices_milestone_and_warnings() {
        let mut reps = vec![Rep::Clean; 5];
        reps.push(Rep::RoundedBack);
        reps.push(Rep::Shallow);
        let frames = SquatScript::new(reps).frames();
        let summary = run(&Config::default(), &frames);

        assert_eq!(summary.repetition_count, 5);
        let tokens: Vec<&str> = summary.spoken.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(tokens, vec!["milestone_5", "round_back", "go_deeper"]);
        assert!(summary
            .changes
            .iter()
            .any(|c| c.to == FeedbackCode::ErrorBackRound));
        assert!(summary
            .changes
            .iter()
            .any(|c| c.to == FeedbackCode::ErrorShallowDepth));
    }

    #[test]
    fn test_run_counts_rejected_frames() {
        let mut frames = SquatScript::new(vec![Rep::Clean]).frames();
        frames.insert(3, FrameRecord::new(100, vec![Landmark::default(); 5]));
        let summary = run(&Config::default(), &frames);
        assert_eq!(summary.rejected_frames, 1);
        assert_eq!(summary.repetition_count, 1);
    }
}
