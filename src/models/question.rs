//! 提取结果记录模型
//!
//! `ExtractedQuestion` 是管线的规范输出：16 个逻辑字段，
//! 直接序列化为题库保存接口的 JSON 载荷

use crate::models::question_id::{QuestionId, SubCount};
use serde::{Deserialize, Serialize};

/// 题目类型（五类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    /// 单选题
    MultipleChoice,
    /// 判断题
    TrueFalse,
    /// 简答/填空题
    ShortAnswer,
    /// 论述题
    Essay,
    /// 配对题
    Matching,
}

/// 选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// 选项标签（A/B/C/D 或位置序号）
    pub label: String,
    pub text: String,
    pub is_correct: bool,
}

/// 正确答案：单值或有序多值，取决于题目类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl Default for CorrectAnswer {
    fn default() -> Self {
        CorrectAnswer::Single(String::new())
    }
}

/// 记录状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// 提取成功，待人工确认
    Draft,
    /// 提取失败，content 为诊断信息
    Error,
}

/// 记录状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStatus {
    pub code: StatusCode,
    /// 最近更新时间（本地时间，"%Y-%m-%d %H:%M:%S"）
    pub last_updated: String,
}

impl QuestionStatus {
    pub fn now(code: StatusCode) -> Self {
        Self {
            code,
            last_updated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 图片引用（本核心不解析图片，只保留引用位）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_image: Option<String>,
}

/// 创建者（由调用方会话提供，不从文本推导）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: String,
    pub display_name: String,
}

/// 反馈聚合：固定形状的占位，不在本管线计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub count: u32,
    pub average_difficulty: u32,
    pub clarity: u32,
    pub correctness_rate: u32,
    pub feedback_count: u32,
    pub comments: Vec<String>,
}

impl Feedback {
    /// 提取阶段的占位值
    pub fn placeholder() -> Self {
        Self {
            count: 0,
            average_difficulty: 3,
            clarity: 3,
            correctness_rate: 0,
            feedback_count: 0,
            comments: Vec::new(),
        }
    }
}

/// 规范输出记录（16 个逻辑字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedQuestion {
    /// 题块原文，逐字保留，供审计与人工复核
    pub raw_content: String,
    pub question_id: QuestionId,
    pub subcount: SubCount,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub source: String,
    /// 清洗后的题干（标记已剥离）
    pub content: String,
    pub choices: Vec<Choice>,
    pub correct_answer: CorrectAnswer,
    pub solution: String,
    pub images: ImageRefs,
    pub tags: Vec<String>,
    pub usage_count: u32,
    pub creator: Creator,
    pub status: QuestionStatus,
    pub exam_references: Vec<String>,
    pub feedback: Feedback,
}

/// 提取器中间产物
///
/// 结构化与启发式两条提取路径的公共输出，由装配器合成最终记录
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub question_id: Option<QuestionId>,
    pub subcount: Option<SubCount>,
    pub content: String,
    pub choices: Vec<Choice>,
    pub solution: String,
    pub source: String,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_placeholder_shape() {
        let fb = Feedback::placeholder();
        assert_eq!(fb.count, 0);
        assert_eq!(fb.average_difficulty, 3);
        assert_eq!(fb.clarity, 3);
        assert_eq!(fb.correctness_rate, 0);
        assert!(fb.comments.is_empty());
    }

    #[test]
    fn test_correct_answer_serialization() {
        let single = CorrectAnswer::Single("B".to_string());
        assert_eq!(serde_json::to_string(&single).unwrap(), r#""B""#);

        let multiple = CorrectAnswer::Multiple(vec!["Đ".to_string(), "S".to_string()]);
        assert_eq!(serde_json::to_string(&multiple).unwrap(), r#"["Đ","S"]"#);
    }
}
