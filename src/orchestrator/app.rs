//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的"摄入 → 提取 → 提交"运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、创建管线和客户端
//! 2. **批量摄入**：读取文件夹内全部源文件并拼接为原始批次
//! 3. **提取**：调用同步的 BatchPipeline
//! 4. **提交**：每条记录一个保存请求，单条失败不影响其余
//! 5. **降级留痕**：降级记录写入 warn.txt 供人工复核
//! 6. **全局统计**：输出"成功 N / 降级 M / 拒绝 K"

use crate::clients::BankClient;
use crate::config::{Config, ExtractConfig};
use crate::models::{self, Creator, ExtractedQuestion, StatusCode};
use crate::orchestrator::batch_pipeline::{BatchPipeline, BatchResult};
use crate::services::WarnWriter;
use anyhow::{Context, Result};
use std::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: BatchPipeline,
    client: BankClient,
    warn_writer: WarnWriter,
}

/// 提交统计
#[derive(Debug, Default)]
struct SubmitStats {
    saved: usize,
    rejected: usize,
    degraded: usize,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let extract_config = ExtractConfig::default();
        let pipeline = BatchPipeline::new(&extract_config).context("无法创建提取管线")?;
        let client = BankClient::new(&config);
        let warn_writer = WarnWriter::with_path(&config.warn_file);

        Ok(Self {
            config,
            pipeline,
            client,
            warn_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 摄入：多文件拼接为一个原始批次
        info!("\n📁 正在扫描待处理的源文件...");
        let (raw_batch, file_count) =
            models::load_raw_batch(&self.config.input_folder).await?;

        if raw_batch.trim().is_empty() {
            warn!("⚠️ 没有找到待处理的源文件，程序结束");
            return Ok(());
        }
        info!("✓ 共加载 {} 个源文件", file_count);

        // 提取：同步纯函数，创建者来自配置（调用方会话）
        let creator = Creator {
            id: self.config.creator_id.clone(),
            display_name: self.config.creator_name.clone(),
        };
        let result = self.pipeline.run(&raw_batch, &creator);

        if result.questions.is_empty() {
            warn!("⚠️ 批次未产出任何记录，程序结束");
            return Ok(());
        }

        // 提交：逐条独立
        let stats = self.submit_all(&result).await;

        print_final_stats(&stats, result.total_blocks, &self.config);
        Ok(())
    }

    /// 逐条提交记录；降级记录先写 warn.txt 再照常提交
    async fn submit_all(&self, result: &BatchResult) -> SubmitStats {
        let mut stats = SubmitStats::default();

        for (index, question) in result.questions.iter().enumerate() {
            if question.status.code == StatusCode::Error {
                stats.degraded += 1;
                if let Err(e) = self.warn_writer.write(
                    &question.subcount.full_id,
                    index,
                    &question.content,
                    &question.raw_content,
                ) {
                    error!("[记录 {}] 警告写入失败: {}", index + 1, e);
                }
            }

            if self.config.verbose_logging {
                log_question(index, question);
            }

            match self.client.save_question(question).await {
                Ok(response) if BankClient::is_success_response(&response) => {
                    info!("[记录 {}] ✓ 保存成功", index + 1);
                    stats.saved += 1;
                }
                Ok(response) => {
                    warn!("[记录 {}] ⚠️ 保存被拒绝: {:?}", index + 1, response);
                    stats.rejected += 1;
                }
                Err(e) => {
                    error!("[记录 {}] ❌ 保存请求失败: {}", index + 1, e);
                    stats.rejected += 1;
                }
            }
        }

        stats
    }
}

// ========== 日志辅助函数 ==========

fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目提取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题目批量提取模式");
    info!("📁 源文件目录: {}", config.input_folder);
    info!("{}", "=".repeat(60));
}

fn log_question(index: usize, question: &ExtractedQuestion) {
    let preview = if question.content.chars().count() > 80 {
        question.content.chars().take(80).collect::<String>() + "..."
    } else {
        question.content.clone()
    };
    info!(
        "[记录 {}] {:?} | {} | 题干: {}",
        index + 1,
        question.question_type,
        question.subcount.full_id,
        preview
    );
}

fn print_final_stats(stats: &SubmitStats, total: usize, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 保存成功: {}/{}", stats.saved, total);
    info!("⚠️ 降级记录: {} (已写入 {})", stats.degraded, config.warn_file);
    info!("❌ 保存失败: {}", stats.rejected);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
