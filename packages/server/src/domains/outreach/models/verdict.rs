use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentiment classification of a single post.
///
/// Every field is optional on the wire. Models routinely answer with quoted
/// booleans or `null` concerns, so the flag and list fields deserialize
/// leniently instead of failing the whole verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_negative: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sentiment: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub severity: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub concerns: Vec<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub needs_support: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: String,
}

impl SentimentVerdict {
    /// Outreach is drafted only when both flags are set.
    pub fn needs_outreach(&self) -> bool {
        self.is_negative && self.needs_support
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let verdict: SentimentVerdict = serde_json::from_str(r#"{"is_negative": true}"#).unwrap();
        assert!(verdict.is_negative);
        assert!(!verdict.needs_support);
        assert_eq!(verdict.sentiment, "");
        assert!(verdict.concerns.is_empty());
    }

    #[test]
    fn quoted_booleans_are_accepted() {
        let verdict: SentimentVerdict = serde_json::from_str(
            r#"{"is_negative": "true", "needs_support": "False", "concerns": null}"#,
        )
        .unwrap();
        assert!(verdict.is_negative);
        assert!(!verdict.needs_support);
        assert!(verdict.concerns.is_empty());
    }

    #[test]
    fn needs_outreach_requires_both_flags() {
        let mut verdict = SentimentVerdict {
            is_negative: true,
            ..Default::default()
        };
        assert!(!verdict.needs_outreach());
        verdict.needs_support = true;
        assert!(verdict.needs_outreach());
        verdict.is_negative = false;
        assert!(!verdict.needs_outreach());
    }
}
