//! Wire types for the Notion database query endpoint.
//!
//! Only the parts of the response the blog reads are modelled. Property
//! kinds are closed enums so a field can only be read under the kind that
//! declares it.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Request body for `POST /v1/databases/{id}/query`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseQuery {
    pub filter: PropertyFilter,
    pub sorts: Vec<Sort>,
}

impl DatabaseQuery {
    /// Entries whose checkbox `property` is ticked, newest first
    pub fn published(property: &str) -> Self {
        Self {
            filter: PropertyFilter {
                property: property.to_string(),
                checkbox: CheckboxCondition { equals: true },
            },
            sorts: vec![Sort {
                timestamp: TimestampKind::CreatedTime,
                direction: SortDirection::Descending,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub checkbox: CheckboxCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckboxCondition {
    pub equals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub timestamp: TimestampKind,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampKind {
    CreatedTime,
    LastEditedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Response body of a database query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(deserialize_with = "skip_null_records")]
    pub results: Vec<QueryResult>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One entry of `results`, tagged by its `object` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum QueryResult {
    Page(PageObject),
    /// Databases, blocks, and any object kind added later
    #[serde(other)]
    Other,
}

/// A page row. Partial page objects carry only `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub properties: Option<HashMap<String, PropertyValue>>,
}

/// A property value, tagged by its declared `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    #[serde(other)]
    Unsupported,
}

/// A single rich-text run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// Notion error payload (`{"object": "error", "code": ..., "message": ...}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn skip_null_records<'de, D>(deserializer: D) -> Result<Vec<QueryResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let records: Vec<Option<QueryResult>> = Vec::deserialize(deserializer)?;
    Ok(records.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_published_query_shape() {
        let body = serde_json::to_value(DatabaseQuery::published("Published")).unwrap();
        assert_eq!(
            body,
            json!({
                "filter": { "property": "Published", "checkbox": { "equals": true } },
                "sorts": [{ "timestamp": "created_time", "direction": "descending" }]
            })
        );
    }

    #[test]
    fn test_decode_mixed_results() {
        let raw = json!({
            "object": "list",
            "results": [
                {
                    "object": "page",
                    "id": "p1",
                    "created_time": "2024-01-01T00:00:00.000Z",
                    "last_edited_time": "2024-01-02T00:00:00.000Z",
                    "properties": {
                        "Name": { "id": "title", "type": "title", "title": [{ "plain_text": "A" }] },
                        "Slug": { "id": "x", "type": "rich_text", "rich_text": [] },
                        "Published": { "id": "y", "type": "checkbox", "checkbox": true },
                        "Tags": { "id": "z", "type": "multi_select", "multi_select": [] }
                    }
                },
                { "object": "database", "id": "d1" },
                null,
                { "object": "page", "id": "p2" }
            ],
            "has_more": true,
            "next_cursor": "cursor-1"
        });

        let response: QueryResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.results.len(), 3);
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("cursor-1"));

        let QueryResult::Page(page) = &response.results[0] else {
            panic!("expected page");
        };
        let props = page.properties.as_ref().unwrap();
        assert_eq!(
            props["Name"],
            PropertyValue::Title {
                title: vec![RichText {
                    plain_text: "A".to_string()
                }]
            }
        );
        assert_eq!(props["Published"], PropertyValue::Checkbox { checkbox: true });
        assert_eq!(props["Tags"], PropertyValue::Unsupported);

        assert_eq!(response.results[1], QueryResult::Other);

        let QueryResult::Page(stub) = &response.results[2] else {
            panic!("expected page");
        };
        assert_eq!(stub.id, "p2");
        assert!(stub.properties.is_none());
        assert!(stub.created_time.is_none());
    }

    #[test]
    fn test_record_without_object_tag_is_rejected() {
        let raw = json!({ "results": [{ "id": "p1" }] });
        assert!(serde_json::from_value::<QueryResponse>(raw).is_err());
    }

    #[test]
    fn test_response_without_results_is_rejected() {
        assert!(serde_json::from_value::<QueryResponse>(json!({})).is_err());
        assert!(serde_json::from_value::<QueryResponse>(json!({ "results": null })).is_err());
    }
}
