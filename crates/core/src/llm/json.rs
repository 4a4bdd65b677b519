use crate::domain::contract::LlmRecommendationList;
use crate::domain::recommendation::Recommendation;
use anyhow::Context;

/// Slice from the first `[` to the last `]`, inclusive.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Slice from the first `{` to the last `}`, looking inside a Markdown code
/// fence when the reply is wrapped in one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let body = strip_code_fence(text.trim());
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&body[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // The opening line may carry a language tag.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.rfind("```").map_or(body, |end| &body[..end])
}

pub fn parse_string_array(text: &str) -> anyhow::Result<Vec<String>> {
    let json_str = extract_json_array(text)
        .context("could not find a JSON array in the model response")?;
    serde_json::from_str::<Vec<String>>(json_str)
        .with_context(|| format!("model output is not a JSON array of strings: {json_str}"))
}

pub fn parse_recommendations(text: &str) -> anyhow::Result<Vec<Recommendation>> {
    let json_str = extract_json_object(text).unwrap_or(text.trim());
    let parsed = serde_json::from_str::<LlmRecommendationList>(json_str)
        .with_context(|| format!("model output is not valid recommendations JSON: {json_str}"))?;
    Ok(parsed.into_recommendations())
}
