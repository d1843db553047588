//! 定时器抽象，测试中可替换为假实现

use std::future::Future;
use std::time::Duration;

/// 休眠能力
pub trait Timer: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// 基于 tokio 的定时器
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
