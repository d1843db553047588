//! 账号信息

use std::fmt;

use super::strategy::ProxyMode;

/// 已解析出凭证、可以开始 ping 的账号
///
/// 加载后不可变，由对应的调度任务独占
#[derive(Clone)]
pub struct Account {
    /// 账号标识
    pub name: String,
    /// Bearer Token
    token: String,
    /// 是否走代理
    pub use_proxy: bool,
    /// 是否每次轮换代理
    pub rotate_proxy: bool,
}

impl Account {
    /// 创建新账号
    pub fn new(
        name: impl Into<String>,
        token: impl Into<String>,
        use_proxy: bool,
        rotate_proxy: bool,
    ) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            use_proxy,
            rotate_proxy,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// 代理使用模式
    pub fn proxy_mode(&self) -> ProxyMode {
        ProxyMode::from_flags(self.use_proxy, self.rotate_proxy)
    }
}

// 日志中不能出现 token
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("token", &"***")
            .field("use_proxy", &self.use_proxy)
            .field("rotate_proxy", &self.rotate_proxy)
            .finish()
    }
}
