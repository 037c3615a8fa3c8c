//! 批次提取管线 - 编排层
//!
//! ## 职责
//!
//! 把原始批次文本一次性转换为记录列表：
//! 分段 → 逐题块（模式检测 → 提取 → 判型 → 装配）→ 汇总统计
//!
//! ## 设计特点
//!
//! - **同步纯函数**：不做任何网络/磁盘 I/O，(文本, 配置) → 记录
//! - **顺序稳定**：输出顺序与题块顺序一致，位置派生的 subcount 才稳定
//! - **块数守恒**：每个题块恰好产出一条记录，失败降级而不丢弃

use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::error::ExtractResult;
use crate::models::{BlockMode, Creator, ExtractedQuestion};
use crate::services::Segmenter;
use crate::workflow::{BlockCtx, BlockFlow};

/// 批次处理结果
#[derive(Debug)]
pub struct BatchResult {
    /// 全部记录，顺序与题块一致（含降级记录）
    pub questions: Vec<ExtractedQuestion>,
    /// 降级记录数
    pub error_count: usize,
    /// 分段出的题块总数
    pub total_blocks: usize,
}

/// 批次提取管线
pub struct BatchPipeline {
    segmenter: Segmenter,
    flow: BlockFlow,
}

impl BatchPipeline {
    /// 按提取配置创建管线
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        Ok(Self {
            segmenter: Segmenter::new(config)?,
            flow: BlockFlow::new(config)?,
        })
    }

    /// 处理一个原始批次
    ///
    /// 空输入产出空结果，不报错；单题块失败降级，绝不中断批次
    pub fn run(&self, raw: &str, creator: &Creator) -> BatchResult {
        let blocks = self.segmenter.segment(raw);
        let total_blocks = blocks.len();

        if total_blocks == 0 {
            info!("批次为空，产出 0 条记录");
            return BatchResult {
                questions: Vec::new(),
                error_count: 0,
                total_blocks: 0,
            };
        }

        info!("✂️ 分段完成，共 {} 个题块", total_blocks);

        // 自由文本只切出一块时无法与"本来就只有一道题"区分，仅留痕不报错
        if total_blocks == 1 && blocks[0].mode == BlockMode::FreeText {
            debug!("自由文本仅切出 1 个题块，可能存在欠切分");
        }

        let mut questions = Vec::with_capacity(total_blocks);
        let mut error_count = 0;

        for block in &blocks {
            let ctx = BlockCtx::new(block.index, total_blocks, creator.clone());
            let outcome = self.flow.run(block, &ctx);
            if outcome.is_degraded() {
                error_count += 1;
            }
            questions.push(outcome.into_question());
        }

        info!(
            "✓ 批次处理完成: 成功 {}, 降级 {}, 总计 {}",
            total_blocks - error_count,
            error_count,
            total_blocks
        );

        BatchResult {
            questions,
            error_count,
            total_blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCode;

    fn pipeline() -> BatchPipeline {
        BatchPipeline::new(&ExtractConfig::default()).expect("管线应能创建")
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let p = pipeline();
        let result = p.run("", &Creator::default());
        assert_eq!(result.total_blocks, 0);
        assert!(result.questions.is_empty());
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_block_count_conservation() {
        let p = pipeline();
        let raw = "\\begin{ex} một \\choice{\\True a}{b}{c}{d} \\end{ex}\n\\begin{ex} hỏng \\choice{a \\end{ex}\n\\begin{ex} ba \\choice{\\True a}{b}{c}{d} \\end{ex}";
        let result = p.run(raw, &Creator::default());
        assert_eq!(result.total_blocks, 3);
        assert_eq!(result.questions.len(), 3);
        assert_eq!(result.error_count, 1);
        // 降级记录在原位置，未被丢弃
        assert_eq!(result.questions[1].status.code, StatusCode::Error);
    }

    #[test]
    fn test_output_order_matches_block_order() {
        let p = pipeline();
        let raw = "Câu 1: một\nA. x\nB. y\nCâu 2: hai\nA. z\nB. w";
        let result = p.run(raw, &Creator::default());
        assert_eq!(result.questions[0].content, "một");
        assert_eq!(result.questions[1].content, "hai");
        assert_eq!(result.questions[0].subcount.full_id, "TL.000001");
        assert_eq!(result.questions[1].subcount.full_id, "TL.000002");
    }
}
