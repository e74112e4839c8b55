use std::future::Future;
use std::time::Duration;

/// 动画步进之间的挂起原语
pub trait Scheduler {
    fn sleep(&mut self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// 基于 tokio 定时器的真实调度
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn sleep(&mut self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// 虚拟时钟：不真正等待，只累计时间（用于测试与时长预估）
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl Scheduler for VirtualScheduler {
    fn sleep(&mut self, delay: Duration) -> impl Future<Output = ()> + Send {
        self.elapsed += delay;
        self.sleeps.push(delay);
        std::future::ready(())
    }
}
