//! 单账号调度循环
//!
//! Pinging -> Sleeping -> Pinging -> ...，固定间隔，无退避、无抖动，
//! 失败只记录日志，不会终止循环

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::pool::Account;
use crate::publicai::Pinger;

use super::timer::Timer;

/// 调度状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Pinging,
    Sleeping,
}

/// 单个账号的调度器
pub struct AccountScheduler<P, T> {
    account: Account,
    pinger: Arc<P>,
    timer: Arc<T>,
    interval: Duration,
}

impl<P: Pinger, T: Timer> AccountScheduler<P, T> {
    pub fn new(account: Account, pinger: Arc<P>, timer: Arc<T>, interval: Duration) -> Self {
        Self {
            account,
            pinger,
            timer,
            interval,
        }
    }

    /// 运行直到 `shutdown` 被取消，返回发送的 ping 次数
    ///
    /// 取消只在休眠中或开始新一次 ping 之前生效，进行中的请求不会被打断
    pub async fn run(self, shutdown: CancellationToken) -> u64 {
        let mut state = SchedulerState::Pinging;
        let mut attempts = 0u64;

        loop {
            state = match state {
                SchedulerState::Pinging => {
                    if shutdown.is_cancelled() {
                        break;
                    }
                    let outcome = self.pinger.ping(&self.account).await;
                    attempts += 1;
                    tracing::debug!(
                        account = %self.account.name,
                        success = outcome.is_success(),
                        attempts,
                        "本次 ping 结束: {}",
                        outcome
                    );
                    SchedulerState::Sleeping
                }
                SchedulerState::Sleeping => {
                    tracing::info!(
                        account = %self.account.name,
                        "等待 {} 秒后进行下一次 ping...",
                        self.interval.as_secs()
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = self.timer.sleep(self.interval) => SchedulerState::Pinging,
                    }
                }
            };
        }

        tracing::info!(account = %self.account.name, attempts, "调度循环已停止");
        attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publicai::model::PingOutcome;
    use crate::scheduler::testing::{FakePinger, FakeTimer};

    const HOUR: Duration = Duration::from_secs(3600);

    fn account() -> Account {
        Account::new("a@example.com", "tok", false, false)
    }

    #[tokio::test]
    async fn test_every_outcome_leads_to_sleep() {
        let shutdown = CancellationToken::new();
        let pinger = Arc::new(FakePinger::scripted(vec![
            PingOutcome::Success {
                message: "ok".to_string(),
            },
            PingOutcome::HttpFailure {
                status: 429,
                message: "slow down".to_string(),
            },
            PingOutcome::TransportError {
                cause: "connection refused".to_string(),
            },
        ]));
        let timer = Arc::new(FakeTimer::cancel_after(3, shutdown.clone()));

        let scheduler = AccountScheduler::new(account(), pinger.clone(), timer.clone(), HOUR);
        let attempts = scheduler.run(shutdown).await;

        assert_eq!(attempts, 3);
        assert_eq!(pinger.calls().len(), 3);
        // 三种结果之后都进入了固定时长的休眠
        assert_eq!(timer.sleeps(), vec![HOUR, HOUR, HOUR]);
    }

    #[tokio::test]
    async fn test_fixed_interval_after_failures() {
        let shutdown = CancellationToken::new();
        let failures = (0..5)
            .map(|_| PingOutcome::TransportError {
                cause: "timeout".to_string(),
            })
            .collect();
        let pinger = Arc::new(FakePinger::scripted(failures));
        let timer = Arc::new(FakeTimer::cancel_after(5, shutdown.clone()));

        let interval = Duration::from_secs(90);
        let attempts = AccountScheduler::new(account(), pinger, timer.clone(), interval)
            .run(shutdown)
            .await;

        assert_eq!(attempts, 5);
        assert!(timer.sleeps().iter().all(|d| *d == interval));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let pinger = Arc::new(FakePinger::default());
        let timer = Arc::new(FakeTimer::blocking());

        let attempts = AccountScheduler::new(account(), pinger.clone(), timer, HOUR)
            .run(shutdown)
            .await;

        assert_eq!(attempts, 0);
        assert!(pinger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_interrupts_sleep() {
        let shutdown = CancellationToken::new();
        let pinger = Arc::new(FakePinger::default());
        let timer = Arc::new(FakeTimer::blocking());

        let handle = tokio::spawn(
            AccountScheduler::new(account(), pinger.clone(), timer.clone(), HOUR)
                .run(shutdown.clone()),
        );

        while timer.sleeps().is_empty() {
            tokio::task::yield_now().await;
        }
        shutdown.cancel();

        let attempts = handle.await.unwrap();
        assert_eq!(attempts, 1);
        assert_eq!(pinger.calls(), vec!["a@example.com".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_real_timer_cadence() {
        let shutdown = CancellationToken::new();
        let pinger = Arc::new(FakePinger::default());
        let handle = tokio::spawn(
            AccountScheduler::new(
                account(),
                pinger.clone(),
                Arc::new(crate::scheduler::TokioTimer),
                HOUR,
            )
            .run(shutdown.clone()),
        );

        // 暂停的时钟下推进约两个半小时：首次立即 ping，之后每小时一次
        tokio::time::sleep(Duration::from_secs(9000)).await;
        shutdown.cancel();

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(pinger.calls().len(), 3);
    }
}
