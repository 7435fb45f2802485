//! Wire types shared by the API client, the event stream and the panels
//!
//! Memory records use the backend's Go-style field names (`ID`, `Content`,
//! ...); agent status objects use snake_case. Both are owned by the backend;
//! the dashboard only ever holds the latest copy it was sent.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed page size for memory queries (no pagination controls)
pub const MEMORY_PAGE_SIZE: u32 = 25;

/// Display format for timestamps, rendered in the local timezone
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored memory as returned by `GET /api/memories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Content", default)]
    pub content: String,
    #[serde(rename = "ServerID", default)]
    pub server_id: String,
    #[serde(rename = "UserID", default)]
    pub user_id: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of memories plus the total match count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub memories: Vec<Memory>,
}

/// Query parameters for `GET /api/memories`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryQuery {
    pub server_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl MemoryQuery {
    /// First page for a server, no optional filters
    pub fn for_server(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            user_id: None,
            query: None,
            limit: MEMORY_PAGE_SIZE,
            offset: 0,
        }
    }

    /// Restrict to one user
    pub fn user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Free-text filter
    pub fn text(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }
}

/// Body of `PATCH /api/memories/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUpdate {
    pub content: String,
}

/// Live status of one agent, pushed in `status` events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub channel_id: String,
    pub server_id: String,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub queue_depth: u64,
}

/// Format an optional timestamp for a table cell; absent renders blank.
pub fn format_local_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_page_go_field_names() {
        let json = r#"{
            "total": 2,
            "memories": [
                {"ID": "abcdef1234", "Content": "<b>hi</b>", "ServerID": "s1", "UserID": "", "CreatedAt": null},
                {"ID": "0123456789", "Content": "likes tea", "ServerID": "s1", "UserID": "u7", "CreatedAt": "2024-05-01T12:30:00Z"}
            ]
        }"#;

        let page: MemoryPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.memories.len(), 2);
        assert_eq!(page.memories[0].id, "abcdef1234");
        assert_eq!(page.memories[0].user_id.as_deref(), Some(""));
        assert!(page.memories[0].created_at.is_none());
        assert!(page.memories[1].created_at.is_some());
    }

    #[test]
    fn test_memory_page_null_memories() {
        let page: MemoryPage = serde_json::from_str(r#"{"total": 0, "memories": null}"#).unwrap();
        assert!(page.memories.is_empty());

        let page: MemoryPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.total, 0);
        assert!(page.memories.is_empty());
    }

    #[test]
    fn test_memory_query_serialization_skips_absent_filters() {
        let query = MemoryQuery::for_server("s1");
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["server_id"], "s1");
        assert_eq!(value["limit"], 25);
        assert_eq!(value["offset"], 0);
        assert!(value.get("user_id").is_none());
        assert!(value.get("q").is_none());
    }

    #[test]
    fn test_memory_query_with_filters() {
        let query = MemoryQuery::for_server("s1")
            .user(Some("u1".to_string()))
            .text(Some("coffee".to_string()));
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["user_id"], "u1");
        assert_eq!(value["q"], "coffee");
    }

    #[test]
    fn test_agent_status_defaults() {
        let agent: AgentStatus =
            serde_json::from_str(r#"{"channel_id": "c1", "server_id": "s1"}"#).unwrap();
        assert_eq!(agent.queue_depth, 0);
        assert!(agent.last_active.is_none());
    }

    #[test]
    fn test_format_local_time() {
        assert_eq!(format_local_time(None), "");

        let time: DateTime<Utc> = "2024-05-01T12:30:00Z".parse().unwrap();
        let formatted = format_local_time(Some(&time));
        assert_eq!(
            formatted,
            time.with_timezone(&Local).format(TIME_FORMAT).to_string()
        );
        assert_eq!(formatted.len(), 19);
    }
}
