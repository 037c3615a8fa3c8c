//! 题库 API 客户端
//!
//! 封装提取记录的保存调用：每条记录一个创建请求，
//! 单条接受/拒绝互相独立，部分成功是预期情况

use crate::config::Config;
use crate::models::ExtractedQuestion;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// 题库 API 客户端
pub struct BankClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl BankClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.bank_api_base_url.clone(),
            token: config.bank_token.clone(),
        }
    }

    /// 保存一条提取记录
    ///
    /// # 返回
    /// 返回接口响应 JSON
    pub async fn save_question(&self, question: &ExtractedQuestion) -> Result<Value> {
        let url = format!("{}/question/extract/save", self.base_url);

        debug!("保存记录: {}", question.subcount.full_id);

        let response = self
            .client
            .post(&url)
            .header("banktoken", &self.token)
            .json(question)
            .send()
            .await
            .with_context(|| format!("保存请求失败: {}", url))?;

        let result: Value = response
            .json()
            .await
            .context("保存响应不是合法 JSON")?;

        debug!("保存结果: {}", result);

        Ok(result)
    }

    /// 检查接口响应是否成功
    pub fn is_success_response(result: &Value) -> bool {
        result
            .get("code")
            .and_then(|v| v.as_u64())
            .map(|code| code == 200)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_success_response() {
        assert!(BankClient::is_success_response(&json!({"code": 200})));
        assert!(!BankClient::is_success_response(&json!({"code": 500})));
        assert!(!BankClient::is_success_response(&json!({"error": "x"})));
        assert!(!BankClient::is_success_response(&Value::Null));
    }
}
