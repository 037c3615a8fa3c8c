//! 记录装配服务 - 业务能力层
//!
//! 把提取器产物合成规范输出记录：
//! - 缺失标识按题块位置确定性合成（保证两个 full_id 非空）
//! - 固定初始化 usage_count / exam_references / feedback 占位
//! - 提取失败时装配降级记录（Error 状态 + 诊断 content），原文保留供人工复核
//!
//! 每个输入题块恰好产出一条记录，数量必须一致，绝不静默丢块

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::models::{
    CorrectAnswer, Creator, ExtractedFields, ExtractedQuestion, Feedback, ImageRefs,
    QuestionBlock, QuestionId, QuestionStatus, QuestionType, StatusCode, SubCount,
};

/// 单题块装配结果：成功或降级，都是一条完整记录
///
/// 用标签变体把"部分记录可能降级"做成可见契约，而不是异常路径
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    Ok(ExtractedQuestion),
    Degraded(ExtractedQuestion),
}

impl ExtractOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ExtractOutcome::Degraded(_))
    }

    pub fn question(&self) -> &ExtractedQuestion {
        match self {
            ExtractOutcome::Ok(q) | ExtractOutcome::Degraded(q) => q,
        }
    }

    pub fn into_question(self) -> ExtractedQuestion {
        match self {
            ExtractOutcome::Ok(q) | ExtractOutcome::Degraded(q) => q,
        }
    }
}

/// 记录装配服务
pub struct Assembler {
    subcount_prefix: String,
}

impl Assembler {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            subcount_prefix: config.subcount_prefix.clone(),
        }
    }

    /// 装配一条记录
    ///
    /// # 参数
    /// - `block`: 输入题块（原文与位置索引）
    /// - `creator`: 创建者，由调用方会话提供
    /// - `extraction`: 提取 + 判型结果；Err 走降级路径
    pub fn assemble(
        &self,
        block: &QuestionBlock,
        creator: &Creator,
        extraction: Result<(ExtractedFields, QuestionType), ExtractError>,
    ) -> ExtractOutcome {
        match extraction {
            Ok((fields, question_type)) => {
                ExtractOutcome::Ok(self.assemble_ok(block, creator, fields, question_type))
            }
            Err(e) => ExtractOutcome::Degraded(self.assemble_degraded(block, creator, &e)),
        }
    }

    fn assemble_ok(
        &self,
        block: &QuestionBlock,
        creator: &Creator,
        fields: ExtractedFields,
        question_type: QuestionType,
    ) -> ExtractedQuestion {
        let mut choices = fields.choices;

        // 最终保证：有选项的单选/配对题恰好一个正确项
        if matches!(
            question_type,
            QuestionType::MultipleChoice | QuestionType::Matching
        ) && !choices.is_empty()
            && !choices.iter().any(|c| c.is_correct)
        {
            choices[0].is_correct = true;
        }

        let correct_answer = resolve_correct_answer(question_type, &choices);

        ExtractedQuestion {
            raw_content: block.text.clone(),
            question_id: self.ensure_question_id(fields.question_id, block.index),
            subcount: self.ensure_subcount(fields.subcount, block.index),
            question_type,
            source: fields.source,
            content: fields.content,
            choices,
            correct_answer,
            solution: fields.solution,
            images: ImageRefs::default(),
            tags: fields.tags,
            usage_count: 0,
            creator: creator.clone(),
            status: QuestionStatus::now(StatusCode::Draft),
            exam_references: Vec::new(),
            feedback: Feedback::placeholder(),
        }
    }

    /// 降级记录：content 换成可读诊断，原文保留在 raw_content
    fn assemble_degraded(
        &self,
        block: &QuestionBlock,
        creator: &Creator,
        error: &ExtractError,
    ) -> ExtractedQuestion {
        ExtractedQuestion {
            raw_content: block.text.clone(),
            question_id: QuestionId::synthetic(block.index),
            subcount: SubCount::from_position(&self.subcount_prefix, block.index),
            question_type: QuestionType::Essay,
            source: String::new(),
            content: format!("提取失败: {}", error),
            choices: Vec::new(),
            correct_answer: CorrectAnswer::default(),
            solution: String::new(),
            images: ImageRefs::default(),
            tags: Vec::new(),
            usage_count: 0,
            creator: creator.clone(),
            status: QuestionStatus::now(StatusCode::Error),
            exam_references: Vec::new(),
            feedback: Feedback::placeholder(),
        }
    }

    fn ensure_question_id(&self, id: Option<QuestionId>, index: usize) -> QuestionId {
        match id {
            Some(id) if !id.full_id.is_empty() => id,
            _ => QuestionId::synthetic(index),
        }
    }

    fn ensure_subcount(&self, subcount: Option<SubCount>, index: usize) -> SubCount {
        match subcount {
            Some(sc) if !sc.full_id.is_empty() => sc,
            _ => SubCount::from_position(&self.subcount_prefix, index),
        }
    }
}

/// 正确答案形态随题型变化：判断/配对题取有序多值，其余取单值
fn resolve_correct_answer(
    question_type: QuestionType,
    choices: &[crate::models::Choice],
) -> CorrectAnswer {
    let labels: Vec<String> = choices
        .iter()
        .filter(|c| c.is_correct)
        .map(|c| c.label.clone())
        .collect();

    match question_type {
        QuestionType::TrueFalse | QuestionType::Matching => CorrectAnswer::Multiple(labels),
        _ => CorrectAnswer::Single(labels.into_iter().next().unwrap_or_default()),
    }
}
