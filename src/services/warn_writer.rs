//! 警告写入服务 - 业务能力层
//!
//! 只负责"把降级记录写入 warn.txt"能力，不关心流程。
//! 人工复核降级记录依赖这里保留的原文

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一条降级记录
    ///
    /// # 参数
    /// - `subcount_id`: 记录的速查标识
    /// - `block_index`: 题块位置（从 0 开始）
    /// - `diagnostic`: 诊断信息
    /// - `raw_content`: 题块原文
    pub fn write(
        &self,
        subcount_id: &str,
        block_index: usize,
        diagnostic: &str,
        raw_content: &str,
    ) -> Result<()> {
        debug!(
            "写入警告: {} | 题块 {} | 原文长度: {}",
            subcount_id,
            block_index + 1,
            raw_content.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!(
            "{}\n记录 {} | 题块 {} | {}\n原文:\n{}\n",
            "─".repeat(40),
            subcount_id,
            block_index + 1,
            diagnostic,
            raw_content
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}
