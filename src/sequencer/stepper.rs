use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 九宫格动画参数（毫秒）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SequencerConfig {
    /// 总圈数，最后一圈减速
    pub total_rounds: u32,
    /// 匀速阶段每步间隔
    pub base_delay_ms: u64,
    /// 最后一整圈每步增加的间隔
    pub slow_step_ms: u64,
    pub slow_cap_ms: u64,
    /// 圈数已满、寻找中奖格时每步增加的间隔
    pub final_step_ms: u64,
    pub final_cap_ms: u64,
    /// 停在中奖格后到回调结果的等待
    pub settle_delay_ms: u64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            total_rounds: 3,
            base_delay_ms: 100,
            slow_step_ms: 20,
            slow_cap_ms: 200,
            final_step_ms: 50,
            final_cap_ms: 300,
            settle_delay_ms: 500,
        }
    }
}

impl SequencerConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.total_rounds == 0 {
            return Err(AppError::ConfigError(
                "Animation total_rounds must be at least 1".into(),
            ));
        }
        if !(self.base_delay_ms <= self.slow_cap_ms && self.slow_cap_ms <= self.final_cap_ms) {
            return Err(AppError::ConfigError(
                "Animation delays must satisfy base <= slow_cap <= final_cap".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ConstantSpeed,
    Decelerating,
    Settled,
}

/// 一帧：高亮的格子，以及到下一帧（或结束回调）的间隔
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Frame {
    pub index: usize,
    pub phase: Phase,
    pub delay_ms: u64,
}

/// 有限状态步进器：游标在 `0..cells` 间循环，转满圈数后停在目标格
///
/// 游标回到 0 时计一圈。无论目标是哪一格，总帧数都是
/// `total_rounds * cells + target + 1`。
#[derive(Debug, Clone)]
pub struct Stepper {
    config: SequencerConfig,
    cells: usize,
    target: usize,
    cursor: usize,
    revolutions: u32,
    delay_ms: u64,
    finished: bool,
}

impl Stepper {
    pub fn new(config: SequencerConfig, cells: usize, target: usize) -> AppResult<Self> {
        config.validate()?;
        if cells == 0 {
            return Err(AppError::ValidationError(
                "Animation needs at least one cell".into(),
            ));
        }
        if target >= cells {
            return Err(AppError::ValidationError(format!(
                "Target cell {target} out of range (0..{cells})"
            )));
        }
        let delay_ms = config.base_delay_ms;
        Ok(Self {
            config,
            cells,
            target,
            cursor: 0,
            revolutions: 0,
            delay_ms,
            finished: false,
        })
    }

    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 完整动画的帧数
    pub fn total_frames(&self) -> usize {
        self.config.total_rounds as usize * self.cells + self.target + 1
    }
}

impl Iterator for Stepper {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }

        let index = self.cursor;
        let total = self.config.total_rounds;

        let phase = if self.revolutions >= total {
            if index == self.target {
                self.finished = true;
                return Some(Frame {
                    index,
                    phase: Phase::Settled,
                    delay_ms: self.config.settle_delay_ms,
                });
            }
            self.delay_ms = (self.delay_ms + self.config.final_step_ms).min(self.config.final_cap_ms);
            Phase::Decelerating
        } else if self.revolutions + 1 >= total {
            self.delay_ms = (self.delay_ms + self.config.slow_step_ms).min(self.config.slow_cap_ms);
            Phase::Decelerating
        } else {
            Phase::ConstantSpeed
        };

        self.cursor = (self.cursor + 1) % self.cells;
        if self.cursor == 0 {
            self.revolutions += 1;
        }

        Some(Frame {
            index,
            phase,
            delay_ms: self.delay_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(target: usize) -> Vec<Frame> {
        Stepper::new(SequencerConfig::default(), 9, target)
            .unwrap()
            .collect()
    }

    #[test]
    fn test_frame_count_is_uniform_across_targets() {
        for target in 0..9 {
            let stepper = Stepper::new(SequencerConfig::default(), 9, target).unwrap();
            let expected = stepper.total_frames();
            let list: Vec<Frame> = stepper.collect();
            assert_eq!(list.len(), expected);
            assert_eq!(list.len(), 3 * 9 + target + 1);
        }
    }

    #[test]
    fn test_stops_on_target_after_full_rounds() {
        for target in 0..9 {
            let list = frames(target);
            let last = list.last().unwrap();
            assert_eq!(last.index, target);
            assert_eq!(last.phase, Phase::Settled);
            assert_eq!(last.delay_ms, 500);
            // 只有最后一帧处于 Settled
            assert_eq!(
                list.iter().filter(|f| f.phase == Phase::Settled).count(),
                1
            );
        }
    }

    #[test]
    fn test_cursor_walks_cells_in_order() {
        let list = frames(4);
        for (i, frame) in list.iter().enumerate() {
            assert_eq!(frame.index, i % 9);
        }
    }

    #[test]
    fn test_constant_speed_before_final_revolution() {
        let list = frames(0);
        assert!(
            list[..18]
                .iter()
                .all(|f| f.phase == Phase::ConstantSpeed && f.delay_ms == 100)
        );
        assert!(list[18..27].iter().all(|f| f.phase == Phase::Decelerating));
    }

    #[test]
    fn test_deceleration_is_monotonic_and_capped() {
        let list = frames(8);
        let moving: Vec<u64> = list
            .iter()
            .filter(|f| f.phase != Phase::Settled)
            .map(|f| f.delay_ms)
            .collect();
        assert!(moving.windows(2).all(|w| w[0] <= w[1]));

        // 最后一整圈：+20 封顶 200
        assert_eq!(list[18].delay_ms, 120);
        assert_eq!(list[22].delay_ms, 200);
        assert_eq!(list[26].delay_ms, 200);
        // 寻找目标格：+50 封顶 300
        assert_eq!(list[27].delay_ms, 250);
        assert_eq!(list[28].delay_ms, 300);
        assert_eq!(list[34].delay_ms, 300);
    }

    #[test]
    fn test_target_zero_settles_on_wrap() {
        let list = frames(0);
        assert_eq!(list.len(), 28);
        assert_eq!(list[27].index, 0);
        assert_eq!(list[27].phase, Phase::Settled);
    }

    #[test]
    fn test_single_round_decelerates_immediately() {
        let config = SequencerConfig {
            total_rounds: 1,
            ..Default::default()
        };
        let list: Vec<Frame> = Stepper::new(config, 3, 1).unwrap().collect();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].phase, Phase::Decelerating);
        assert_eq!(list[0].delay_ms, 120);
    }

    #[test]
    fn test_finished_stepper_yields_nothing() {
        let mut stepper = Stepper::new(SequencerConfig::default(), 9, 2).unwrap();
        stepper.by_ref().for_each(drop);
        assert!(stepper.is_finished());
        assert_eq!(stepper.revolutions(), 3);
        assert_eq!(stepper.next(), None);
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        assert!(Stepper::new(SequencerConfig::default(), 0, 0).is_err());
        assert!(Stepper::new(SequencerConfig::default(), 9, 9).is_err());

        let no_rounds = SequencerConfig {
            total_rounds: 0,
            ..Default::default()
        };
        assert!(Stepper::new(no_rounds, 9, 0).is_err());

        let inverted = SequencerConfig {
            slow_cap_ms: 400,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
