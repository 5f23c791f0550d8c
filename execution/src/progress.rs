//! Daily progress track.
//!
//! A milestone is ready once `today_win` reaches its threshold and it has not been opened.
//! Opening yields the milestone's reward exactly once. Rewards are tallied separately and never
//! flow back into `today_win`.

use luckyeight_types::{MilestoneView, MILESTONE_COUNT};

use crate::{MilestoneSpec, Rejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub threshold: u64,
    pub reward: u64,
    pub opened: bool,
}

impl Milestone {
    #[inline]
    pub fn is_ready(&self, today_win: u64) -> bool {
        !self.opened && today_win >= self.threshold
    }
}

#[derive(Clone, Debug)]
pub struct ProgressTracker {
    milestones: [Milestone; MILESTONE_COUNT],
    bonus_claimed: u64,
}

impl ProgressTracker {
    pub fn new(specs: &[MilestoneSpec; MILESTONE_COUNT]) -> Self {
        Self {
            milestones: specs.map(|spec| Milestone {
                threshold: spec.threshold,
                reward: spec.reward,
                opened: false,
            }),
            bonus_claimed: 0,
        }
    }

    /// Adopt new thresholds/rewards while keeping opened flags.
    pub fn update_specs(&mut self, specs: &[MilestoneSpec; MILESTONE_COUNT]) {
        for (milestone, spec) in self.milestones.iter_mut().zip(specs) {
            milestone.threshold = spec.threshold;
            milestone.reward = spec.reward;
        }
    }

    pub fn milestones(&self) -> &[Milestone; MILESTONE_COUNT] {
        &self.milestones
    }

    pub fn bonus_claimed(&self) -> u64 {
        self.bonus_claimed
    }

    /// Indices of every milestone currently ready.
    pub fn ready(&self, today_win: u64) -> Vec<usize> {
        self.milestones
            .iter()
            .enumerate()
            .filter(|(_, milestone)| milestone.is_ready(today_win))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Open a ready milestone and return its reward.
    pub fn open(&mut self, index: usize, today_win: u64) -> Result<u64, Rejection> {
        let milestone = self
            .milestones
            .get_mut(index)
            .filter(|milestone| milestone.is_ready(today_win))
            .ok_or(Rejection::MilestoneNotReady(index))?;
        milestone.opened = true;
        self.bonus_claimed = self.bonus_claimed.saturating_add(milestone.reward);
        Ok(milestone.reward)
    }

    /// Clear every opened flag for a new day.
    pub fn reset(&mut self) {
        for milestone in &mut self.milestones {
            milestone.opened = false;
        }
    }

    /// Position within the segment `today_win` falls in: `(today_win - lower) / (upper - lower)`.
    ///
    /// Segment 0 runs from zero to the first threshold. Returns `None` past the last threshold.
    pub fn segment_ratio(&self, today_win: u64) -> Option<(usize, f64)> {
        let mut lower = 0u64;
        for (idx, milestone) in self.milestones.iter().enumerate() {
            let upper = milestone.threshold;
            if today_win < upper {
                let span = upper.saturating_sub(lower).max(1);
                let ratio = today_win.saturating_sub(lower) as f64 / span as f64;
                return Some((idx, ratio));
            }
            lower = upper;
        }
        None
    }

    /// Overall track fraction in `[0, 1]`, piecewise linear between thresholds.
    pub fn fraction(&self, today_win: u64) -> f64 {
        match self.segment_ratio(today_win) {
            Some((segment, ratio)) => (segment as f64 + ratio) / MILESTONE_COUNT as f64,
            None => 1.0,
        }
    }

    pub fn views(&self, today_win: u64) -> Vec<MilestoneView> {
        self.milestones
            .iter()
            .map(|milestone| MilestoneView {
                threshold: milestone.threshold,
                reward: milestone.reward,
                ready: milestone.is_ready(today_win),
                opened: milestone.opened,
            })
            .collect()
    }
}
