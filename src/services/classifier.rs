//! 题型判定服务 - 业务能力层
//!
//! 五条规则按特异性排序，首条命中即定型：
//! 结构性信号（配对/简答标记）优先于通用的选项计数启发式

use crate::config::ExtractConfig;
use crate::models::{ExtractedFields, QuestionType};

/// 题型判定服务
pub struct TypeClassifier {
    matching_keywords: Vec<String>,
    short_answer_keywords: Vec<String>,
    true_false_keywords: Vec<String>,
    matching_markers: Vec<String>,
    short_answer_markers: Vec<String>,
}

impl TypeClassifier {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            matching_keywords: config.matching_keywords.clone(),
            short_answer_keywords: config.short_answer_keywords.clone(),
            true_false_keywords: config.true_false_keywords.clone(),
            matching_markers: config.matching_markers.clone(),
            short_answer_markers: config.short_answer_markers.clone(),
        }
    }

    /// 判定题型
    ///
    /// # 参数
    /// - `block_text`: 题块原文（结构标记在原文中找）
    /// - `fields`: 提取出的字段（关键词在题干中找，选项计数用提取结果）
    pub fn classify(&self, block_text: &str, fields: &ExtractedFields) -> QuestionType {
        let stem = fields.content.to_lowercase();

        // 规则 1：配对题结构标记或题干关键词
        if self.matching_markers.iter().any(|m| block_text.contains(m.as_str()))
            || self.matching_keywords.iter().any(|k| stem.contains(k.as_str()))
        {
            return QuestionType::Matching;
        }

        // 规则 2：简答题结构标记或题干关键词
        if self.short_answer_markers.iter().any(|m| block_text.contains(m.as_str()))
            || self.short_answer_keywords.iter().any(|k| stem.contains(k.as_str()))
        {
            return QuestionType::ShortAnswer;
        }

        // 规则 3：没有提取到选项
        if fields.choices.is_empty() {
            return QuestionType::Essay;
        }

        // 规则 4：恰好两个选项且首选项文本含判断关键词
        if fields.choices.len() == 2 {
            let first = fields.choices[0].text.to_lowercase();
            if self.true_false_keywords.iter().any(|k| first.contains(k.as_str())) {
                return QuestionType::TrueFalse;
            }
        }

        // 规则 5：兜底
        QuestionType::MultipleChoice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Choice;

    fn classifier() -> TypeClassifier {
        TypeClassifier::new(&ExtractConfig::default())
    }

    fn fields_with_choices(stem: &str, choice_texts: &[&str]) -> ExtractedFields {
        ExtractedFields {
            content: stem.to_string(),
            choices: choice_texts
                .iter()
                .enumerate()
                .map(|(i, t)| Choice {
                    label: ((b'A' + i as u8) as char).to_string(),
                    text: t.to_string(),
                    is_correct: i == 0,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_matching_by_keyword_outranks_choice_count() {
        let c = classifier();
        let fields = fields_with_choices("Hãy ghép đôi các khái niệm sau", &["1-a", "2-b"]);
        assert_eq!(c.classify("", &fields), QuestionType::Matching);
    }

    #[test]
    fn test_matching_by_marker() {
        let c = classifier();
        let fields = fields_with_choices("đề bài", &[]);
        let block_text = r"\begin{matching} ... \end{matching}";
        assert_eq!(c.classify(block_text, &fields), QuestionType::Matching);
    }

    #[test]
    fn test_short_answer_by_keyword() {
        let c = classifier();
        let fields = fields_with_choices("Điền vào chỗ trống: 2+2=...", &[]);
        assert_eq!(c.classify("", &fields), QuestionType::ShortAnswer);
    }

    #[test]
    fn test_essay_when_no_choices() {
        let c = classifier();
        let fields = fields_with_choices("Trình bày suy nghĩ của em", &[]);
        assert_eq!(c.classify("", &fields), QuestionType::Essay);
    }

    #[test]
    fn test_true_false_two_choices() {
        let c = classifier();
        let fields = fields_with_choices("Khẳng định sau đúng hay sai?", &["Đúng", "Sai"]);
        assert_eq!(c.classify("", &fields), QuestionType::TrueFalse);
    }

    #[test]
    fn test_two_plain_choices_stay_multiple_choice() {
        let c = classifier();
        let fields = fields_with_choices("Chọn đáp án", &["3", "4"]);
        assert_eq!(c.classify("", &fields), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_four_choices_multiple_choice() {
        let c = classifier();
        let fields = fields_with_choices("Chọn đáp án", &["3", "4", "5", "6"]);
        assert_eq!(c.classify("", &fields), QuestionType::MultipleChoice);
    }
}
