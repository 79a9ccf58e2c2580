use crate::common::Post;
use crate::domains::outreach::models::SentimentVerdict;

/// Keep the posts whose verdict asks for outreach, in their original order.
pub fn select_for_outreach(
    classified: Vec<(Post, SentimentVerdict)>,
) -> Vec<(Post, SentimentVerdict)> {
    classified
        .into_iter()
        .filter(|(_, verdict)| verdict.needs_outreach())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PostMetrics;

    fn pair(id: &str, is_negative: bool, needs_support: bool) -> (Post, SentimentVerdict) {
        (
            Post {
                id: id.into(),
                text: String::new(),
                author_id: None,
                username: "unknown".into(),
                name: "Unknown".into(),
                created_at: None,
                metrics: PostMetrics::default(),
            },
            SentimentVerdict {
                is_negative,
                needs_support,
                ..Default::default()
            },
        )
    }

    #[test]
    fn keeps_exactly_the_both_true_pairs() {
        let kept = select_for_outreach(vec![
            pair("a", true, true),
            pair("b", true, false),
            pair("c", false, true),
            pair("d", false, false),
            pair("e", true, true),
        ]);

        let ids: Vec<_> = kept.iter().map(|(p, _)| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "e"]);
    }
}
