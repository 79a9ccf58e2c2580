// Keyword context retriever
//
// Serves a fixed catalogue of support snippets plus per-user context notes.
// Matching is case-insensitive substring containment of query words; there is
// no embedding or ranking step.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BaseContextRetriever;
use crate::common::SupportResource;

/// Query words shorter than this are ignored when matching.
const MIN_QUERY_WORD_CHARS: usize = 3;

/// (id, category, kind, text)
const SUPPORT_CATALOGUE: &[(&str, &str, &str, &str)] = &[
    (
        "support_1",
        "emotional_support",
        "general_support",
        "It's okay to feel sad or anxious. These feelings are valid and temporary. Remember that you're not alone, and there are people who care about you.",
    ),
    (
        "support_2",
        "coping_strategies",
        "breathing_exercise",
        "If you're feeling overwhelmed, try taking deep breaths. Inhale for 4 counts, hold for 4, and exhale for 4. This can help calm your nervous system.",
    ),
    (
        "support_3",
        "encouragement",
        "hope",
        "Remember that difficult times don't last forever. You've gotten through tough situations before, and you can get through this too.",
    ),
    (
        "support_4",
        "self_compassion",
        "self_care",
        "It's important to be kind to yourself. Treat yourself with the same compassion you would show a friend going through a hard time.",
    ),
    (
        "support_5",
        "professional_help",
        "resources",
        "If you're struggling, consider reaching out to a mental health professional. Therapy and counseling can provide valuable support and tools.",
    ),
    (
        "support_6",
        "encouragement",
        "progress",
        "Small steps forward are still progress. Celebrate the little victories, even if they seem insignificant.",
    ),
    (
        "support_7",
        "validation",
        "emotional_validation",
        "Your feelings matter. It's okay to not be okay. Give yourself permission to feel what you're feeling without judgment.",
    ),
    (
        "support_8",
        "connection",
        "social_support",
        "Connecting with others, even briefly, can help. Sometimes just knowing someone is there can make a difference.",
    ),
];

/// Scores for the general resources returned when nothing matches.
const DEFAULT_SCORES: [f32; 3] = [0.9, 0.8, 0.7];

fn catalogue() -> Vec<SupportResource> {
    SUPPORT_CATALOGUE
        .iter()
        .map(|(id, category, kind, text)| SupportResource {
            id: Some(id.to_string()),
            text: text.to_string(),
            category: category.to_string(),
            metadata: serde_json::json!({ "type": kind }),
            score: 1.0,
        })
        .collect()
}

fn query_words(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| w.chars().count() >= MIN_QUERY_WORD_CHARS)
        .map(str::to_lowercase)
        .collect()
}

fn matches(resource: &SupportResource, words: &[String]) -> bool {
    let text = resource.text.to_lowercase();
    let category = resource.category.to_lowercase();
    words
        .iter()
        .any(|w| text.contains(w.as_str()) || category.contains(w.as_str()))
}

pub struct KeywordContextRetriever {
    resources: Vec<SupportResource>,
    user_context: RwLock<HashMap<String, Vec<SupportResource>>>,
}

impl KeywordContextRetriever {
    pub fn new() -> Self {
        Self {
            resources: catalogue(),
            user_context: RwLock::new(HashMap::new()),
        }
    }

    fn defaults(&self, limit: usize) -> Vec<SupportResource> {
        self.resources
            .iter()
            .take(DEFAULT_SCORES.len())
            .zip(DEFAULT_SCORES)
            .map(|(r, score)| SupportResource {
                score,
                ..r.clone()
            })
            .take(limit)
            .collect()
    }
}

impl Default for KeywordContextRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseContextRetriever for KeywordContextRetriever {
    fn is_ready(&self) -> bool {
        true
    }

    async fn get_relevant_context(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SupportResource>> {
        let words = query_words(query);
        let user_context = self.user_context.read().await;
        let personal = user_context.get(user_id).map(Vec::as_slice).unwrap_or(&[]);

        let hits: Vec<SupportResource> = self
            .resources
            .iter()
            .chain(personal.iter())
            .filter(|r| matches(r, &words))
            .take(limit)
            .cloned()
            .collect();

        if hits.is_empty() {
            return Ok(self.defaults(limit));
        }
        Ok(hits)
    }

    async fn add_user_context(
        &self,
        user_id: &str,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let mut user_context = self.user_context.write().await;
        let entries = user_context.entry(user_id.to_string()).or_default();
        entries.push(SupportResource {
            id: Some(format!("user_{}_{}", user_id, entries.len() + 1)),
            text: text.to_string(),
            category: "user_context".to_string(),
            metadata,
            score: 1.0,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyword_hits_in_catalogue_order() {
        let retriever = KeywordContextRetriever::new();
        let hits = retriever
            .get_relevant_context("u1", "overwhelmed, anxious", 3)
            .await
            .unwrap();

        let ids: Vec<_> = hits.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, ["support_1", "support_2"]);
    }

    #[tokio::test]
    async fn no_hit_returns_general_defaults() {
        let retriever = KeywordContextRetriever::new();
        let hits = retriever.get_relevant_context("u1", "zzz qqq", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category, "emotional_support");
        assert!((hits[0].score - 0.9).abs() < f32::EPSILON);
        assert!((hits[1].score - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn user_context_only_visible_to_owner() {
        let retriever = KeywordContextRetriever::new();
        retriever
            .add_user_context("u1", "Mentioned a marathon next month", serde_json::json!({}))
            .await
            .unwrap();

        let own = retriever.get_relevant_context("u1", "marathon", 3).await.unwrap();
        assert_eq!(own[0].category, "user_context");

        let other = retriever.get_relevant_context("u2", "marathon", 3).await.unwrap();
        assert!(other.iter().all(|r| r.category != "user_context"));
    }

    #[test]
    fn short_words_are_ignored() {
        assert_eq!(query_words("I am ok, so sad"), vec!["sad".to_string()]);
    }
}
