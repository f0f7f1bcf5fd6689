use serde::{Deserialize, Serialize};

/// An item owned by exactly one board.
///
/// `order` only defines a stable ascending sort within the board; it does not
/// have to be contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkEntry {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for a bookmark entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BookmarkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl BookmarkPatch {
    pub fn apply_to(&self, entry: &mut BookmarkEntry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some(url) = &self.url {
            entry.url = Some(url.clone());
        }
        if let Some(description) = &self.description {
            entry.description = Some(description.clone());
        }
        if let Some(icon) = &self.icon {
            entry.icon = Some(icon.clone());
        }
    }
}
