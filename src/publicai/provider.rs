//! PublicAI Ping Provider
//!
//! 负责构建带签名的 ping 请求、发送并对结果分类

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONNECTION, CONTENT_TYPE,
    ORIGIN, USER_AGENT,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::http_client::{build_client, ProxyConfig};
use crate::model::config::Config;
use crate::pool::{Account, ProxyMode, ProxyPool};

use super::model::{PingOutcome, PingQuery};

/// 单次 ping 能力，调度器只依赖这个接口
pub trait Pinger: Send + Sync + 'static {
    /// 发送一次 ping，永不返回错误，所有故障都体现在结果里
    fn ping(&self, account: &Account) -> impl Future<Output = PingOutcome> + Send;
}

/// PublicAI Ping 客户端
pub struct PingClient {
    ping_url: String,
    /// 启动时构建的静态请求头模板（User-Agent 在进程内保持不变）
    headers: HeaderMap,
    proxies: Arc<ProxyPool>,
    timeout: Duration,
}

impl PingClient {
    /// 创建新的 PingClient
    pub fn new(config: &Config, proxies: Arc<ProxyPool>) -> anyhow::Result<Self> {
        Ok(Self {
            ping_url: config.ping_url.clone(),
            headers: Self::build_header_template(config)?,
            proxies,
            timeout: config.request_timeout(),
        })
    }

    fn build_header_template(config: &Config) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9,id;q=0.8"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_str(&config.origin)?);
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        Ok(headers)
    }

    /// 模板加上账号的 Authorization
    fn build_headers(&self, token: &str) -> anyhow::Result<HeaderMap> {
        let mut headers = self.headers.clone();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    /// 按账号的代理模式取代理
    fn resolve_proxy(&self, account: &Account) -> Option<ProxyConfig> {
        match account.proxy_mode() {
            ProxyMode::Direct => None,
            ProxyMode::Sticky => self.proxies.next(false),
            ProxyMode::Rotate => self.proxies.next(true),
        }
    }

    /// 发送一次 ping 并记录结果
    ///
    /// 只尝试一次，不在内部重试；任何故障都转换为 `PingOutcome::TransportError`
    pub async fn send_ping(&self, account: &Account) -> PingOutcome {
        let proxy = self.resolve_proxy(account);
        let proxy_info = proxy
            .as_ref()
            .map(ProxyConfig::display)
            .unwrap_or_else(|| "No Proxy".to_string());

        tracing::info!(
            account = %account.name,
            proxy = %proxy_info,
            mode = account.proxy_mode().as_str(),
            "发送 PublicAI ping..."
        );

        let outcome = match self.try_send(account, proxy.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => PingOutcome::TransportError {
                cause: format!("{:#}", e),
            },
        };

        match &outcome {
            PingOutcome::Success { message } => {
                tracing::info!(account = %account.name, "Ping 成功: {}", message);
            }
            PingOutcome::HttpFailure { status, message } => {
                tracing::warn!(
                    account = %account.name,
                    status = *status,
                    "Ping 失败，状态码 {}: {}",
                    status,
                    message
                );
            }
            PingOutcome::TransportError { cause } => {
                tracing::error!(
                    account = %account.name,
                    proxy = %proxy_info,
                    "发送 ping 出错: {}",
                    cause
                );
            }
        }

        outcome
    }

    async fn try_send(
        &self,
        account: &Account,
        proxy: Option<&ProxyConfig>,
    ) -> anyhow::Result<PingOutcome> {
        // 每次请求使用独立的 Client，函数返回时连接随之释放
        let client = build_client(proxy, self.timeout)?;
        let headers = self.build_headers(account.token())?;
        let query = PingQuery::generate();

        let response = client
            .post(&self.ping_url)
            .headers(headers)
            .query(&query)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(PingOutcome::classify(status.as_u16(), &body))
    }
}

impl Pinger for PingClient {
    fn ping(&self, account: &Account) -> impl Future<Output = PingOutcome> + Send {
        self.send_ping(account)
    }
}
