use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use crate::coach::rep::VoiceCue;
use crate::config::CueConfig;

/// 音声キューの配信キュー
///
/// マイルストーンは未発話のキューを破棄して先頭に入る。警告はクールダウン内に
/// 別の警告を受け付けていれば捨てる。時刻はセッション開始からの経過時間を
/// 呼び出し側が渡す。
#[derive(Debug, Clone)]
pub struct CueQueue {
    cooldown: Duration,
    pending: VecDeque<VoiceCue>,
    last_warning_at: Option<Duration>,
}

impl CueQueue {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            pending: VecDeque::new(),
            last_warning_at: None,
        }
    }

    pub fn from_config(config: &CueConfig) -> Self {
        Self::new(config.warning_cooldown())
    }

    /// 時刻 `now` にキューを投入。受け付けたら true
    pub fn push(&mut self, cue: VoiceCue, now: Duration) -> bool {
        if cue.is_priority() {
            if !self.pending.is_empty() {
                debug!(dropped = self.pending.len(), "priority cue flushed pending cues");
            }
            self.pending.clear();
            self.pending.push_back(cue);
            return true;
        }

        let cooled_down = match self.last_warning_at {
            Some(last) => now.saturating_sub(last) > self.cooldown,
            None => true,
        };
        if !cooled_down {
            return false;
        }

        self.last_warning_at = Some(now);
        self.pending.push_back(cue);
        true
    }

    /// 次に読み上げるキュー
    pub fn pop(&mut self) -> Option<VoiceCue> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for CueQueue {
    fn default() -> Self {
        Self::from_config(&CueConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_first_warning_accepted() {
        let mut q = CueQueue::default();
        assert!(q.push(VoiceCue::GoDeeper, secs(0.0)));
        assert_eq!(q.pop(), Some(VoiceCue::GoDeeper));
        assert!(q.is_empty());
    }

    #[test]
    fn test_warnings_throttled_within_cooldown() {
        let mut q = CueQueue::new(secs(3.0));
        assert!(q.push(VoiceCue::RoundBack, secs(1.0)));
        assert!(!q.push(VoiceCue::RoundBack, secs(1.5)));
        assert!(!q.push(VoiceCue::GoDeeper, secs(3.9)));
        assert!(q.push(VoiceCue::GoDeeper, secs(4.5)));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_dropped_warning_does_not_restart_cooldown() {
        let mut q = CueQueue::new(secs(3.0));
        q.push(VoiceCue::RoundBack, secs(0.0));
        q.push(VoiceCue::RoundBack, secs(2.0));
        assert!(q.push(VoiceCue::RoundBack, secs(3.5)));
    }

    #[test]
    fn test_milestone_flushes_pending() {
        let mut q = CueQueue::new(secs(3.0));
        q.push(VoiceCue::RoundBack, secs(0.0));
        q.push(VoiceCue::GoDeeper, secs(5.0));
        assert_eq!(q.len(), 2);

        assert!(q.push(VoiceCue::Milestone(5), secs(5.1)));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(VoiceCue::Milestone(5)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_milestones_ignore_cooldown() {
        let mut q = CueQueue::new(secs(3.0));
        assert!(q.push(VoiceCue::Milestone(5), secs(0.0)));
        assert_eq!(q.pop(), Some(VoiceCue::Milestone(5)));
        assert!(q.push(VoiceCue::Milestone(10), secs(0.1)));
        assert_eq!(q.pop(), Some(VoiceCue::Milestone(10)));
    }

    #[test]
    fn test_milestone_does_not_reset_warning_cooldown() {
        let mut q = CueQueue::new(secs(3.0));
        q.push(VoiceCue::GoDeeper, secs(0.0));
        q.push(VoiceCue::Milestone(5), secs(1.0));
        assert!(!q.push(VoiceCue::GoDeeper, secs(2.0)));
    }
}
