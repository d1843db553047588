mod http_client;
mod model;
mod pool;
mod publicai;
mod scheduler;
mod shutdown;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::model::arg::Args;
use crate::model::config::Config;
use crate::pool::ProxyPool;
use crate::publicai::PingClient;
use crate::scheduler::{Orchestrator, TokioTimer};

#[tokio::main]
async fn main() {
    // .env 必须在读取任何环境变量之前加载
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("PublicAI ping 机器人异常退出: {:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    tracing::info!("[ PublicAI - BOT Started ]");

    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)?;
    config.override_from_env();
    if let Some(proxies) = args.proxies {
        config.proxy_file = proxies;
    }

    tracing::debug!(
        "配置: url={}, 间隔={}s, 超时={}s, User-Agent={}",
        config.ping_url,
        config.ping_interval_secs,
        config.request_timeout_secs,
        config.user_agent
    );

    let proxies = Arc::new(ProxyPool::load(&config.proxy_file)?);
    if proxies.is_empty() && config.accounts.iter().any(|a| a.use_proxy) {
        tracing::warn!("代理池为空，配置了代理的账号将使用直连");
    }

    let pinger = Arc::new(PingClient::new(&config, proxies)?);
    let orchestrator = Orchestrator::new(pinger, Arc::new(TokioTimer), config.ping_interval());

    let shutdown = CancellationToken::new();
    crate::shutdown::spawn_listener(shutdown.clone())?;

    let total = orchestrator.run(&config.accounts, shutdown.clone()).await?;

    if shutdown.is_cancelled() {
        tracing::info!("[ EXIT ] PublicAI - BOT stopped by user. 共发送 {} 次 ping", total);
    }
    Ok(())
}
