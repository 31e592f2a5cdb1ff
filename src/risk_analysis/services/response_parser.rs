use crate::risk_analysis::domain::{RiskAssessment, RiskLevel};
use crate::shared::error::AiError;
use chrono::Utc;
use serde::Deserialize;

/// Parser for model completions that are supposed to contain JSON
///
/// Models routinely wrap their JSON in markdown fences or surround it
/// with prose. The parser tries the raw text, then fenced blocks, then
/// the first balanced JSON object found anywhere in the text.
pub struct ResponseParser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvisorPayload {
    risk_level: String,
    risk_score: f64,
    explanation: String,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    exploitation_likelihood: Option<String>,
}

impl ResponseParser {
    /// Turns a raw completion into a structured assessment.
    ///
    /// # Errors
    /// Returns `AiError::MalformedResponse` when no JSON object can be
    /// recovered or a required field is missing or out of range.
    pub fn parse_assessment(
        raw: &str,
        provider: &str,
        model: &str,
    ) -> Result<RiskAssessment, AiError> {
        let json = Self::extract_json(raw).ok_or_else(|| {
            AiError::MalformedResponse("no JSON object found in completion".to_string())
        })?;
        let payload: AdvisorPayload =
            serde_json::from_str(&json).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let level = RiskLevel::parse(&payload.risk_level).ok_or_else(|| {
            AiError::MalformedResponse(format!("unknown riskLevel: {}", payload.risk_level))
        })?;
        if !payload.risk_score.is_finite() || payload.risk_score < 0.0 {
            return Err(AiError::MalformedResponse(format!(
                "riskScore out of range: {}",
                payload.risk_score
            )));
        }
        if payload.explanation.trim().is_empty() {
            return Err(AiError::MalformedResponse(
                "empty explanation".to_string(),
            ));
        }

        let score = payload.risk_score.round().min(100.0) as u8;

        let mut explanation = payload.explanation.trim().to_string();
        if let Some(likelihood) = payload
            .exploitation_likelihood
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            explanation.push_str(&format!(" Exploitation likelihood: {}.", likelihood));
        }

        Ok(RiskAssessment {
            level,
            score,
            explanation,
            recommendations: payload
                .recommendations
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            provider: provider.to_string(),
            model: model.to_string(),
            analyzed_at: Utc::now(),
            from_cache: false,
        })
    }

    /// Recovers a JSON object from a completion, in order of preference:
    /// the whole text, a fenced code block, the first balanced object.
    fn extract_json(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
            return Some(trimmed.to_string());
        }

        if let Some(fenced) = Self::extract_fenced_block(trimmed) {
            if serde_json::from_str::<serde_json::Value>(&fenced).is_ok() {
                return Some(fenced);
            }
        }

        Self::extract_first_object(trimmed)
    }

    /// Pulls the body out of a ```json ... ``` (or plain ```) fence
    fn extract_fenced_block(text: &str) -> Option<String> {
        let start = text.find("```")?;
        let after_fence = &text[start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        let end = body.find("```")?;
        Some(body[..end].trim().to_string())
    }

    /// Scans for the first balanced `{ ... }` region that parses as JSON
    fn extract_first_object(text: &str) -> Option<String> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[start..].char_indices() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..start + offset + ch.len_utf8()];
                        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                            return Some(candidate.to_string());
                        }
                        return None;
                    }
                }
                _ => {}
            }
        }
        None
    }
}
