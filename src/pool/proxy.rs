//! 代理池
//!
//! 所有账号共享同一个游标：轮换模式取用后推进游标，固定模式只读取当前位置

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::http_client::ProxyConfig;

/// 代理池
#[derive(Debug, Default)]
pub struct ProxyPool {
    proxies: Vec<ProxyConfig>,
    cursor: AtomicUsize,
}

impl ProxyPool {
    pub fn new(proxies: Vec<ProxyConfig>) -> Self {
        Self {
            proxies,
            cursor: AtomicUsize::new(0),
        }
    }

    /// 从文本解析，每行一个代理，忽略空行和 # 注释
    pub fn from_lines(content: &str) -> Self {
        Self::new(content.lines().filter_map(ProxyConfig::parse).collect())
    }

    /// 从文件加载代理列表，文件不存在时返回空池
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("代理文件不存在，使用直连: {:?}", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let pool = Self::from_lines(&content);
        tracing::info!("从 {:?} 加载了 {} 个代理", path, pool.len());
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// 当前游标位置，空池时为 None
    #[allow(dead_code)]
    pub fn cursor(&self) -> Option<usize> {
        if self.proxies.is_empty() {
            None
        } else {
            Some(self.cursor.load(Ordering::SeqCst))
        }
    }

    /// 取一个代理
    ///
    /// - 空池返回 None（直连）
    /// - `rotate = true`：返回游标处的代理，游标前进一位（取模）
    /// - `rotate = false`：返回游标处的代理，游标不动
    pub fn next(&self, rotate: bool) -> Option<ProxyConfig> {
        let len = self.proxies.len();
        if len == 0 {
            return None;
        }

        let index = if rotate {
            // 读取与推进在同一次 CAS 中完成，并发取用不会重复或跳过
            self.cursor
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len))
                .unwrap_or_else(|current| current)
        } else {
            self.cursor.load(Ordering::SeqCst)
        };

        self.proxies.get(index % len).cloned()
    }
}
