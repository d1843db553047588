//! 请求签名
//!
//! 签名串由参数按 key 字母序拼接 `key + value` 得到（无分隔符），
//! 再取 MD5 的小写十六进制

use md5::{Digest, Md5};

/// 随机串长度
pub const NONCE_LEN: usize = 4;

/// 随机串字符集（大小写字母 + 数字）
const NONCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成 ping 使用的随机串
pub fn generate_nonce() -> String {
    (0..NONCE_LEN)
        .map(|_| NONCE_CHARSET[fastrand::usize(..NONCE_CHARSET.len())] as char)
        .collect()
}

/// 按 key 排序后拼接成签名串
pub fn canonical_string(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted.iter().map(|(k, v)| format!("{}{}", k, v)).collect()
}

/// 计算签名
///
/// # Arguments
/// * `timestamp` - 毫秒时间戳（参数 `t`）
/// * `nonce` - 随机串（参数 `n`）
pub fn sign(timestamp: i64, nonce: &str) -> String {
    let timestamp = timestamp.to_string();
    md5_hex(&canonical_string(&[("t", &timestamp), ("n", nonce)]))
}

fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
