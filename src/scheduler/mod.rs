//! 多账号调度
//!
//! 每个有凭证的账号启动一个独立任务，一个账号的失败不会影响其它账号

pub mod runner;
pub mod timer;

#[cfg(test)]
mod testing;

pub use runner::AccountScheduler;
pub use timer::{Timer, TokioTimer};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::model::config::AccountConfig;
use crate::pool::Account;
use crate::publicai::Pinger;

/// 账号调度编排
pub struct Orchestrator<P, T> {
    pinger: Arc<P>,
    timer: Arc<T>,
    interval: Duration,
}

impl<P: Pinger, T: Timer> Orchestrator<P, T> {
    pub fn new(pinger: Arc<P>, timer: Arc<T>, interval: Duration) -> Self {
        Self {
            pinger,
            timer,
            interval,
        }
    }

    /// 解析账号凭证，跳过缺少 token 的账号
    pub fn resolve_accounts(configs: &[AccountConfig]) -> Vec<Account> {
        configs
            .iter()
            .filter_map(|config| {
                let account = config.resolve();
                if account.is_none() {
                    tracing::warn!(
                        "跳过账号 {}: 未找到 Bearer Token，请检查配置或环境变量 {}",
                        config.name,
                        config.token_env
                    );
                }
                account
            })
            .collect()
    }

    /// 为每个账号启动调度循环并等待全部结束
    ///
    /// 正常情况下循环只会因 `shutdown` 取消而结束，返回所有账号的 ping 总次数。
    /// 没有可用账号或任一任务崩溃时返回错误
    pub async fn run(
        &self,
        configs: &[AccountConfig],
        shutdown: CancellationToken,
    ) -> anyhow::Result<u64> {
        let accounts = Self::resolve_accounts(configs);
        if accounts.is_empty() {
            anyhow::bail!("没有可用的账号，请检查账号配置和 Bearer Token");
        }

        tracing::info!("启动 {} 个账号的 ping 循环", accounts.len());

        let mut set = JoinSet::new();
        for account in accounts {
            let scheduler = AccountScheduler::new(
                account,
                self.pinger.clone(),
                self.timer.clone(),
                self.interval,
            );
            set.spawn(scheduler.run(shutdown.child_token()));
        }

        let mut total = 0u64;
        let mut fatal = None;
        while let Some(result) = set.join_next().await {
            match result {
                Ok(attempts) => total += attempts,
                Err(e) => {
                    tracing::error!("账号任务异常退出: {:?}", e);
                    // 其余账号随之停止
                    shutdown.cancel();
                    fatal.get_or_insert(e);
                }
            }
        }

        if let Some(e) = fatal {
            return Err(anyhow::Error::new(e).context("账号调度任务异常退出"));
        }
        Ok(total)
    }
}
