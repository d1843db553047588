//! 账号与代理池模块
//!
//! 提供账号定义、代理模式和多账号共享的代理池

pub mod account;
pub mod proxy;
pub mod strategy;

pub use account::Account;
pub use proxy::ProxyPool;
pub use strategy::ProxyMode;
