//! PublicAI 心跳接口
//!
//! - `signature`: 请求签名与随机串
//! - `model`: 查询参数、响应体和结果分类
//! - `provider`: 发送 ping 的客户端

pub mod model;
pub mod provider;
pub mod signature;

pub use provider::{PingClient, Pinger};
