//! Ping 请求与响应的数据模型

use serde::{Deserialize, Serialize};
use std::fmt;

use super::signature;

/// 响应中缺少 msg 时的占位文本
pub const NO_MESSAGE: &str = "No message";

/// Ping 请求的查询参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingQuery {
    /// 毫秒时间戳
    pub t: i64,
    /// 随机串
    pub n: String,
    /// 签名
    pub s: String,
}

impl PingQuery {
    /// 根据时间戳和随机串生成带签名的参数
    pub fn new(timestamp: i64, nonce: impl Into<String>) -> Self {
        let nonce = nonce.into();
        Self {
            s: signature::sign(timestamp, &nonce),
            t: timestamp,
            n: nonce,
        }
    }

    /// 使用当前时间和新随机串生成
    pub fn generate() -> Self {
        Self::new(
            chrono::Utc::now().timestamp_millis(),
            signature::generate_nonce(),
        )
    }
}

/// Ping 响应体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub msg: Option<serde_json::Value>,
}

impl PingResponse {
    /// 响应消息，字符串原样返回，其它类型按 JSON 文本返回
    pub fn message(&self) -> String {
        match &self.msg {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => NO_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// 单次 ping 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// HTTP 200
    Success { message: String },
    /// 非 200 状态码
    HttpFailure { status: u16, message: String },
    /// 连接、超时、代理、DNS 或响应格式错误
    TransportError { cause: String },
}

impl PingOutcome {
    /// 根据状态码和响应体分类
    ///
    /// 200 但响应体不是 JSON 视为格式错误，其余状态码尽量读取 msg
    pub fn classify(status: u16, body: &str) -> Self {
        if status == 200 {
            match serde_json::from_str::<PingResponse>(body) {
                Ok(response) => Self::Success {
                    message: response.message(),
                },
                Err(e) => Self::TransportError {
                    cause: format!("响应体解析失败: {}", e),
                },
            }
        } else {
            let response: PingResponse = serde_json::from_str(body).unwrap_or_default();
            Self::HttpFailure {
                status,
                message: response.message(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { message } => write!(f, "SUCCESS: {}", message),
            Self::HttpFailure { status, message } => {
                write!(f, "FAILED with status {}: {}", status, message)
            }
            Self::TransportError { cause } => write!(f, "ERROR: {}", cause),
        }
    }
}
