//! 代理使用模式

/// 代理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    /// 直连
    Direct,
    /// 使用共享游标当前指向的代理，不推进游标
    Sticky,
    /// 轮询，每次取用后推进共享游标
    Rotate,
}

impl ProxyMode {
    pub fn from_flags(use_proxy: bool, rotate_proxy: bool) -> Self {
        match (use_proxy, rotate_proxy) {
            (false, _) => Self::Direct,
            (true, false) => Self::Sticky,
            (true, true) => Self::Rotate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Sticky => "sticky",
            Self::Rotate => "rotate",
        }
    }
}
