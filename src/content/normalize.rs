//! Maps query records into posts

use std::collections::HashMap;

use super::Post;
use crate::config::PropertyNames;
use crate::notion::{PageObject, PropertyValue, QueryResult, RichText};

/// Turns raw database records into render-ready posts
pub struct Normalizer<'a> {
    names: &'a PropertyNames,
}

impl<'a> Normalizer<'a> {
    pub fn new(names: &'a PropertyNames) -> Self {
        Self { names }
    }

    /// Map records in order. Non-page records are dropped.
    pub fn normalize(&self, records: &[QueryResult]) -> Vec<Post> {
        let mut posts = Vec::with_capacity(records.len());

        for record in records {
            match record {
                QueryResult::Page(page) => posts.push(self.normalize_page(page)),
                QueryResult::Other => {
                    tracing::debug!("Skipping non-page record");
                }
            }
        }

        posts
    }

    /// Map a single page record
    pub fn normalize_page(&self, page: &PageObject) -> Post {
        let mut post = Post::new(page.id.clone());

        let Some(properties) = &page.properties else {
            tracing::debug!("Page {} has no properties", page.id);
            return post;
        };

        post.title = title_of(properties, &self.names.title);
        post.slug = rich_text_of(properties, &self.names.slug);
        post.created_ts = page.created_time.clone();
        post.last_edited_ts = page.last_edited_time.clone();

        post
    }
}

/// Map records using the default property names
pub fn normalize_pages(records: &[QueryResult]) -> Vec<Post> {
    let names = PropertyNames::default();
    Normalizer::new(&names).normalize(records)
}

fn title_of(properties: &HashMap<String, PropertyValue>, name: &str) -> Option<String> {
    match properties.get(name) {
        Some(PropertyValue::Title { title }) => first_plain_text(title),
        _ => None,
    }
}

fn rich_text_of(properties: &HashMap<String, PropertyValue>, name: &str) -> Option<String> {
    match properties.get(name) {
        Some(PropertyValue::RichText { rich_text }) => first_plain_text(rich_text),
        _ => None,
    }
}

// Later runs are dropped.
fn first_plain_text(runs: &[RichText]) -> Option<String> {
    runs.first().map(|run| run.plain_text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<QueryResult> {
        serde_json::from_value(value).unwrap()
    }

    fn page(id: &str, properties: serde_json::Value) -> serde_json::Value {
        json!({
            "object": "page",
            "id": id,
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z",
            "properties": properties
        })
    }

    #[test]
    fn test_full_page() {
        let input = records(json!([page(
            "p1",
            json!({
                "Name": { "type": "title", "title": [{ "plain_text": "A" }] },
                "Slug": { "type": "rich_text", "rich_text": [{ "plain_text": "a-slug" }] }
            })
        )]));

        let posts = normalize_pages(&input);
        assert_eq!(
            posts,
            vec![Post {
                id: "p1".to_string(),
                title: Some("A".to_string()),
                slug: Some("a-slug".to_string()),
                created_ts: Some("2024-01-01T00:00:00.000Z".to_string()),
                last_edited_ts: Some("2024-01-02T00:00:00.000Z".to_string()),
                contents: vec![],
            }]
        );
    }

    #[test]
    fn test_page_without_properties_is_degraded() {
        let input = records(json!([{
            "object": "page",
            "id": "p9",
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z"
        }]));

        let posts = normalize_pages(&input);
        assert_eq!(posts, vec![Post::new("p9")]);
        assert!(posts[0].created_ts.is_none());
        assert!(posts[0].contents.is_empty());
    }

    #[test]
    fn test_empty_runs_give_null() {
        let input = records(json!([page(
            "p1",
            json!({
                "Name": { "type": "title", "title": [] },
                "Slug": { "type": "rich_text", "rich_text": [] }
            })
        )]));

        let posts = normalize_pages(&input);
        assert_eq!(posts[0].title, None);
        assert_eq!(posts[0].slug, None);
        assert!(posts[0].created_ts.is_some());
    }

    #[test]
    fn test_mismatched_kind_gives_null() {
        let input = records(json!([page(
            "p1",
            json!({
                "Name": { "type": "rich_text", "rich_text": [{ "plain_text": "not a title" }] },
                "Slug": { "type": "title", "title": [{ "plain_text": "not a slug" }] }
            })
        )]));

        let posts = normalize_pages(&input);
        assert_eq!(posts[0].title, None);
        assert_eq!(posts[0].slug, None);
    }

    #[test]
    fn test_missing_properties_give_null() {
        let input = records(json!([page("p1", json!({}))]));
        let posts = normalize_pages(&input);
        assert_eq!(posts[0].title, None);
        assert_eq!(posts[0].slug, None);
        assert_eq!(
            posts[0].last_edited_ts.as_deref(),
            Some("2024-01-02T00:00:00.000Z")
        );
    }

    #[test]
    fn test_only_first_run_is_used() {
        let input = records(json!([page(
            "p1",
            json!({
                "Name": {
                    "type": "title",
                    "title": [{ "plain_text": "Hello" }, { "plain_text": " world" }]
                }
            })
        )]));

        assert_eq!(normalize_pages(&input)[0].title.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_order_preserved_and_non_pages_skipped() {
        let input = records(json!([
            page("p3", json!({})),
            { "object": "database", "id": "d1" },
            page("p1", json!({})),
            page("p2", json!({}))
        ]));

        let ids: Vec<_> = normalize_pages(&input)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_custom_property_names() {
        let names = PropertyNames {
            title: "Title".to_string(),
            slug: "Path".to_string(),
            published: "Public".to_string(),
        };
        let input = records(json!([page(
            "p1",
            json!({
                "Name": { "type": "title", "title": [{ "plain_text": "ignored" }] },
                "Title": { "type": "title", "title": [{ "plain_text": "Custom" }] },
                "Path": { "type": "rich_text", "rich_text": [{ "plain_text": "custom" }] }
            })
        )]));

        let posts = Normalizer::new(&names).normalize(&input);
        assert_eq!(posts[0].title.as_deref(), Some("Custom"));
        assert_eq!(posts[0].slug.as_deref(), Some("custom"));
    }
}
