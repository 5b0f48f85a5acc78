use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use salario_core::{Currency, Employee};
use serde_json::{json, Value};
use tracing::debug;

use crate::remote::RemoteChat;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Returned when the model answers without any candidate text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("SALARIO_GEMINI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;
        let model = env::var("SALARIO_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("SALARIO_GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Some(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeminiChatClient {
    http_client: Client,
    config: GeminiConfig,
    currency: Currency,
}

impl GeminiChatClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(Duration::from_secs(20))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http_client,
            config,
            currency: Currency::default(),
        })
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl RemoteChat for GeminiChatClient {
    async fn get_chat_response(&self, message: &str, employees: &[Employee]) -> Result<String> {
        let payload = json!({
            "systemInstruction": {
                "parts": [{ "text": system_instruction(employees, self.currency) }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": message }]
                }
            ]
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        debug!(model = %self.config.model, "requesting gemini completion");

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini non-success status {}: {}", status.as_u16(), body);
        }

        let body: Value = response.json().await.context("Gemini parse failed")?;
        Ok(extract_candidate_text(&body)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}

pub fn system_instruction(employees: &[Employee], currency: Currency) -> String {
    let total_expenditure = employees
        .iter()
        .map(|employee| employee.monthly_income)
        .sum::<Decimal>();

    format!(
        "You are an expert AI assistant for \"Salario\", a payroll management system.\n\
         Current context:\n\
         - There are {} employees.\n\
         - Total monthly expenditure is {}.\n\n\
         User features available:\n\
         1. Dashboard: Financial analytics and charts.\n\
         2. Employees: Add, edit, or remove staff.\n\
         3. Payroll: Generate and download PDF payslips.\n\n\
         Help users navigate these features and answer questions about their payroll data.\n\
         Keep answers professional, concise, and helpful. All currency values are in {} ({}).",
        employees.len(),
        currency.format_amount(total_expenditure),
        currency.as_code(),
        currency.symbol(),
    )
}

/// Joins the text parts of the first candidate.
pub fn extract_candidate_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let chunks = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|value| value.as_str()))
        .collect::<Vec<_>>();

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join(""))
    }
}
