//! HTTP Client 构建模块
//!
//! 每次 ping 都构建一个新的 Client，请求结束后随之释放，支持代理配置

use reqwest::{Client, Proxy, Url};
use std::time::Duration;

/// 代理配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// 代理地址，支持 http/https/socks5，认证信息可写在地址中
    pub url: String,
}

impl ProxyConfig {
    /// 从 url 创建代理配置
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// 从代理文件中的一行解析，未写协议时按 http 处理
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        if line.contains("://") {
            Some(Self::new(line))
        } else {
            Some(Self::new(format!("http://{}", line)))
        }
    }

    /// 用于日志展示的地址，密码替换为 ***
    pub fn display(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.to_string()
            }
            _ => self.url.clone(),
        }
    }
}

/// 构建 HTTP Client
///
/// # Arguments
/// * `proxy` - 可选的代理配置
/// * `timeout` - 请求总超时
///
/// # Returns
/// 配置好的 reqwest::Client
pub fn build_client(proxy: Option<&ProxyConfig>, timeout: Duration) -> anyhow::Result<Client> {
    let mut builder = Client::builder().timeout(timeout);

    if let Some(proxy_config) = proxy {
        // 地址中的 user:pass 会被 reqwest 用作代理认证
        let proxy = Proxy::all(&proxy_config.url)?;
        builder = builder.proxy(proxy);
        tracing::debug!("HTTP Client 使用代理: {}", proxy_config.display());
    } else {
        builder = builder.no_proxy();
    }

    Ok(builder.build()?)
}
