//! 题目标识符模型
//!
//! 两套标识：
//! - `QuestionId`：结构化主标识，六段式位置编码（年级/科目/章/难度/课/题型）
//! - `SubCount`：次级速查标识（形如 `TL.069761`），缺失时按题块位置确定性生成

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 年级编码 → 描述
static GRADE_DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "0" => "Lớp 10",
    "1" => "Lớp 11",
    "2" => "Lớp 12",
    "6" => "Lớp 6",
    "7" => "Lớp 7",
    "8" => "Lớp 8",
    "9" => "Lớp 9",
};

/// 科目编码 → 描述
static SUBJECT_DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "D" => "Đại số",
    "H" => "Hình học",
    "G" => "Giải tích",
    "X" => "Xác suất - Thống kê",
    "S" => "Số học",
};

/// 难度编码 → 描述
static LEVEL_DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "N" => "Nhận biết",
    "H" => "Thông hiểu",
    "V" => "Vận dụng",
    "C" => "Vận dụng cao",
    "T" => "Tổng hợp",
};

/// 标识符子段：原始值 + 可读描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPart {
    pub value: String,
    pub description: String,
}

impl IdPart {
    fn new(value: impl Into<String>, description: &str) -> Self {
        Self {
            value: value.into(),
            description: description.to_string(),
        }
    }
}

/// 结构化主标识
///
/// 六段有序子段，缺失的子段取空值；`full_id` 保证非空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionId {
    pub grade: IdPart,
    pub subject: IdPart,
    pub chapter: IdPart,
    pub level: IdPart,
    pub lesson: IdPart,
    pub form: IdPart,
    pub full_id: String,
}

impl QuestionId {
    /// 从六段式位置编码解析（形如 `0D1V1-2`，末段可省略）
    ///
    /// 不符合编码形状时返回 None
    pub fn from_position_code(code: &str) -> Option<Self> {
        let code = code.trim().trim_start_matches('[').trim_end_matches(']');
        let (head, form) = match code.split_once('-') {
            Some((head, form)) => (head, Some(form)),
            None => (code, None),
        };

        let chars: Vec<char> = head.chars().collect();
        if chars.len() != 5 {
            return None;
        }
        // 形状校验：数字/字母/数字/字母/数字
        if !(chars[0].is_ascii_digit()
            && chars[1].is_ascii_uppercase()
            && chars[2].is_ascii_alphanumeric()
            && chars[3].is_ascii_uppercase()
            && chars[4].is_ascii_alphanumeric())
        {
            return None;
        }
        if let Some(form) = form {
            if form.is_empty() || !form.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
        }

        let lookup = |map: &phf::Map<&'static str, &'static str>, c: char| {
            map.get(c.to_string().as_str()).copied().unwrap_or("")
        };

        Some(Self {
            grade: IdPart::new(chars[0], lookup(&GRADE_DESCRIPTIONS, chars[0])),
            subject: IdPart::new(chars[1], lookup(&SUBJECT_DESCRIPTIONS, chars[1])),
            chapter: IdPart::new(chars[2], ""),
            level: IdPart::new(chars[3], lookup(&LEVEL_DESCRIPTIONS, chars[3])),
            lesson: IdPart::new(chars[4], ""),
            form: IdPart::new(form.unwrap_or(""), ""),
            full_id: code.to_string(),
        })
    }

    /// 保留原样的标识（无法按六段式分解时使用）
    pub fn opaque(full_id: impl Into<String>) -> Self {
        Self {
            full_id: full_id.into(),
            ..Default::default()
        }
    }

    /// 按题块位置生成合成标识（从 0 开始的位置索引）
    pub fn synthetic(index: usize) -> Self {
        Self::opaque(format!("AUTO-{:06}", index + 1))
    }
}

/// 次级速查标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCount {
    pub prefix: String,
    pub number: u32,
    pub full_id: String,
}

impl SubCount {
    /// 从原文中捕获的标识解析（形如 `TL.069761`）
    ///
    /// 不符合 `前缀.数字` 形状时整体放入 full_id
    pub fn from_text(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some((prefix, digits)) = raw.split_once('.') {
            if !prefix.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(number) = digits.parse::<u32>() {
                    return Self {
                        prefix: prefix.to_string(),
                        number,
                        full_id: raw.to_string(),
                    };
                }
            }
        }
        Self {
            prefix: String::new(),
            number: 0,
            full_id: raw.to_string(),
        }
    }

    /// 按题块位置确定性生成（从 0 开始的位置索引）
    pub fn from_position(prefix: &str, index: usize) -> Self {
        let number = (index + 1) as u32;
        Self {
            prefix: prefix.to_string(),
            number,
            full_id: format!("{}.{:06}", prefix, number),
        }
    }
}
