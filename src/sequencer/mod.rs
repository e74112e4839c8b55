pub mod scheduler;
pub mod stepper;
pub mod wheel;

pub use scheduler::*;
pub use stepper::*;
pub use wheel::*;

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::PrizeTable;

/// 动画运行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// `on_step` 返回 `Break` 提前结束，不触发完成回调
    Cancelled,
}

/// 九宫格动画驱动：把 `Stepper` 的帧按调度器节奏逐帧推送
///
/// 同一实例同一时间只允许一个动画在跑。
pub struct Sequencer {
    table: Arc<PrizeTable>,
    config: SequencerConfig,
    active: AtomicBool,
}

/// 动画结束（包括 future 被丢弃）时释放运行标记
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Sequencer {
    pub fn new(table: Arc<PrizeTable>, config: SequencerConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            table,
            config,
            active: AtomicBool::new(false),
        })
    }

    /// 同一奖品表与参数下的新实例
    pub fn fresh(&self) -> Self {
        Self {
            table: self.table.clone(),
            config: self.config.clone(),
            active: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 为中奖奖品构造步进器
    pub fn stepper(&self, winning_id: i64) -> AppResult<Stepper> {
        let target = self
            .table
            .index_of(winning_id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {winning_id} not found")))?;
        Stepper::new(self.config.clone(), self.table.len(), target)
    }

    /// 完整帧序列（交给前端自行播放）
    pub fn frames(&self, winning_id: i64) -> AppResult<Vec<Frame>> {
        Ok(self.stepper(winning_id)?.collect())
    }

    /// 逐帧播放动画，结束后调用 `on_complete(奖品文案)`
    pub async fn run<S, F, C>(
        &self,
        winning_id: i64,
        scheduler: &mut S,
        mut on_step: F,
        on_complete: C,
    ) -> AppResult<RunOutcome>
    where
        S: Scheduler,
        F: FnMut(&Frame) -> ControlFlow<()>,
        C: FnOnce(&str),
    {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(AppError::ValidationError(
                "Animation already in progress".into(),
            ));
        }
        let _guard = ActiveGuard(&self.active);

        let prize_text = self
            .table
            .get(winning_id)
            .map(|p| p.text.clone())
            .ok_or_else(|| AppError::NotFound(format!("Prize {winning_id} not found")))?;
        let stepper = self.stepper(winning_id)?;

        for frame in stepper {
            if on_step(&frame).is_break() {
                log::info!("Animation for prize {winning_id} cancelled at cell {}", frame.index);
                return Ok(RunOutcome::Cancelled);
            }
            scheduler.sleep(Duration::from_millis(frame.delay_ms)).await;
        }

        on_complete(&prize_text);
        Ok(RunOutcome::Completed)
    }
}
