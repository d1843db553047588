use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pool::Account;

/// 心跳机器人配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Ping 接口地址
    #[serde(default = "default_ping_url")]
    pub ping_url: String,

    /// 请求头中的 Origin（浏览器扩展 ID）
    #[serde(default = "default_origin")]
    pub origin: String,

    /// User-Agent，未配置时启动时随机选取一次，整个进程内保持不变
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// 两次 ping 之间的间隔（秒）
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,

    /// 单次请求总超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 代理列表文件，每行一个代理地址
    #[serde(default = "default_proxy_file")]
    pub proxy_file: String,

    /// 账号列表
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

/// 单个账号的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    /// 账号标识（通常是邮箱）
    pub name: String,

    /// 直接写在配置里的 Bearer Token（可选，优先于 token_env）
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// 存放 Bearer Token 的环境变量名
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default)]
    pub use_proxy: bool,

    #[serde(default)]
    pub rotate_proxy: bool,
}

impl AccountConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: None,
            token_env: default_token_env(),
            use_proxy: false,
            rotate_proxy: false,
        }
    }

    /// 设置 Token
    #[allow(dead_code)]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 设置代理模式
    #[allow(dead_code)]
    pub fn with_proxy(mut self, use_proxy: bool, rotate_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self.rotate_proxy = rotate_proxy;
        self
    }

    /// 解析凭证：先取配置中的 token，再取环境变量；空字符串视为缺失
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env::var(&self.token_env).ok())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// 转换为可运行的账号，缺少凭证时返回 None
    pub fn resolve(&self) -> Option<Account> {
        let token = self.resolve_token()?;
        Some(Account::new(
            self.name.clone(),
            token,
            self.use_proxy,
            self.rotate_proxy,
        ))
    }
}

impl Config {
    /// 从环境变量覆盖配置
    pub fn override_from_env(&mut self) {
        if let Ok(url) = env::var("PING_URL") {
            self.ping_url = url;
        }
        if let Ok(user_agent) = env::var("USER_AGENT") {
            self.user_agent = user_agent;
        }
        if let Ok(interval) = env::var("PING_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.ping_interval_secs = secs;
            }
        }
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = secs;
            }
        }
        if let Ok(proxy_file) = env::var("PROXY_FILE") {
            self.proxy_file = proxy_file;
        }
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_ping_url() -> String {
    "https://publicai.io/api/data_hunter/ping".to_string()
}

fn default_origin() -> String {
    "chrome-extension://icbbdbflabjciapbohkkmfjaangfjagf".to_string()
}

fn default_user_agent() -> String {
    const USER_AGENTS: &[&str] = &[
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    ];
    USER_AGENTS[fastrand::usize(..USER_AGENTS.len())].to_string()
}

fn default_ping_interval_secs() -> u64 {
    3600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_proxy_file() -> String {
    "proxies.txt".to_string()
}

fn default_token_env() -> String {
    "PUBLICAI_BEARER_TOKEN".to_string()
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![AccountConfig::new("default")]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ping_url: default_ping_url(),
            origin: default_origin(),
            user_agent: default_user_agent(),
            ping_interval_secs: default_ping_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy_file: default_proxy_file(),
            accounts: default_accounts(),
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
