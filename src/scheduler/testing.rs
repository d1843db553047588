//! 调度器测试用的假定时器与假 Pinger

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::pool::Account;
use crate::publicai::model::PingOutcome;
use crate::publicai::Pinger;

use super::timer::Timer;

/// 记录每次休眠的定时器
///
/// - `cancel_after(n, token)`：立即返回，第 n 次休眠时取消 token
/// - `blocking()`：永不醒来，只能被取消打断
pub(crate) struct FakeTimer {
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeTimer {
    pub(crate) fn cancel_after(limit: usize, token: CancellationToken) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Some((limit, token)),
        }
    }

    pub(crate) fn blocking() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Timer for FakeTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        let wakes = match &self.cancel_after {
            Some((limit, token)) => {
                if count >= *limit {
                    token.cancel();
                }
                true
            }
            None => false,
        };
        async move {
            if !wakes {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// 按脚本返回结果的 Pinger，脚本用完后一律返回成功
#[derive(Default)]
pub(crate) struct FakePinger {
    calls: Mutex<Vec<String>>,
    script: Mutex<VecDeque<PingOutcome>>,
}

impl FakePinger {
    pub(crate) fn scripted(outcomes: Vec<PingOutcome>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(outcomes.into()),
        }
    }

    /// 按调用顺序记录的账号名
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Pinger for FakePinger {
    fn ping(&self, account: &Account) -> impl Future<Output = PingOutcome> + Send {
        self.calls.lock().unwrap().push(account.name.clone());
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PingOutcome::Success {
                message: "ok".to_string(),
            });
        async move {
            tokio::task::yield_now().await;
            outcome
        }
    }
}
