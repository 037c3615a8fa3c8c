//! 题块处理流程 - 流程层
//!
//! 核心职责：定义"一个题块"的完整处理流程
//!
//! 流程顺序：
//! 1. 按检测到的模式分派提取器（结构化 / 启发式）
//! 2. 题型判定
//! 3. 装配记录（失败降级，不向外抛）
//!
//! 不持有任何资源，只依赖业务能力（services）

use tracing::{debug, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::models::{BlockMode, ExtractedFields, QuestionBlock, QuestionType};
use crate::services::{
    Assembler, ExtractOutcome, HeuristicExtractor, StructuredExtractor, TypeClassifier,
};
use crate::workflow::block_ctx::BlockCtx;

/// 题块处理流程
pub struct BlockFlow {
    structured: StructuredExtractor,
    heuristic: HeuristicExtractor,
    classifier: TypeClassifier,
    assembler: Assembler,
}

impl BlockFlow {
    /// 按提取配置创建流程
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        Ok(Self {
            structured: StructuredExtractor::new(config)?,
            heuristic: HeuristicExtractor::new(config)?,
            classifier: TypeClassifier::new(config),
            assembler: Assembler::new(config),
        })
    }

    /// 处理单个题块，总是返回一条记录（成功或降级）
    pub fn run(&self, block: &QuestionBlock, ctx: &BlockCtx) -> ExtractOutcome {
        let extraction = self.extract_and_classify(block);

        match &extraction {
            Ok((_, question_type)) => {
                debug!("{} 提取完成，题型: {:?}", ctx.log_prefix(), question_type);
            }
            Err(e) => {
                warn!("{} ⚠️ 提取失败，降级处理: {}", ctx.log_prefix(), e);
            }
        }

        self.assembler.assemble(block, &ctx.creator, extraction)
    }

    /// 提取 + 判型；错误在此收束为单题块粒度
    fn extract_and_classify(
        &self,
        block: &QuestionBlock,
    ) -> Result<(ExtractedFields, QuestionType), ExtractError> {
        let fields = match block.mode {
            BlockMode::Structured => self.structured.extract(block)?,
            BlockMode::FreeText => self.heuristic.extract(block)?,
        };
        let question_type = self.classifier.classify(&block.text, &fields);
        Ok((fields, question_type))
    }
}
