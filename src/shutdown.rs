//! 退出信号监听

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 监听 Ctrl+C 和 SIGTERM，收到任一信号后取消 `shutdown`
///
/// 信号处理在函数返回前就已注册，之后到达的信号不会使用系统默认行为直接结束进程。
/// `shutdown` 被其它地方取消时监听任务随之退出
pub fn spawn_listener(shutdown: CancellationToken) -> anyhow::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = interrupt.recv() => tracing::info!("收到 Ctrl+C，正在停止所有账号..."),
                _ = terminate.recv() => tracing::info!("收到 SIGTERM，正在停止所有账号..."),
            }
            shutdown.cancel();
        }))
    }

    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => tracing::info!("收到 Ctrl+C，正在停止所有账号..."),
                    Err(e) => {
                        tracing::error!("无法监听退出信号: {}", e);
                        return;
                    }
                },
            }
            shutdown.cancel();
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn send_to_self(signal: &str) {
        let status = std::process::Command::new("kill")
            .arg(format!("-{}", signal))
            .arg(std::process::id().to_string())
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn test_sigterm_cancels_shutdown() {
        let shutdown = CancellationToken::new();
        let handle = spawn_listener(shutdown.clone()).unwrap();

        send_to_self("TERM");

        tokio::time::timeout(Duration::from_secs(5), shutdown.cancelled())
            .await
            .expect("SIGTERM did not cancel the shutdown token");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_listener_exits_when_cancelled_elsewhere() {
        let shutdown = CancellationToken::new();
        let handle = spawn_listener(shutdown.clone()).unwrap();

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("listener kept running after shutdown")
            .unwrap();
    }
}
