//! Archived tab snapshots
//!
//! An explicit save copies the tab into an archive from which it can later be
//! re-opened as a brand-new tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Language;
use crate::tab::Tab;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Archive entry id, unrelated to the source tab's id
    pub id: String,
    pub name: String,
    pub content: String,
    pub language: Language,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn of(tab: &Tab) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: tab.name.clone(),
            content: tab.content.clone(),
            language: tab.language,
            saved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reopens_as_new_tab() {
        let mut tab = Tab::new("main.lua").unwrap();
        tab.set_content("print(1)".to_string());

        let snapshot = Snapshot::of(&tab);
        assert_eq!(snapshot.name, "main.lua");
        assert_eq!(snapshot.content, "print(1)");
        assert_ne!(snapshot.id, tab.id);

        let reopened = Tab::from_snapshot(&snapshot);
        assert_ne!(reopened.id, tab.id);
        assert_eq!(reopened.content, "print(1)");
        assert_eq!(reopened.language, Language::Lua);
        assert!(reopened.saved);
        assert!(!reopened.is_protected);
    }

    #[test]
    fn test_saved_at_field_name() {
        let tab = Tab::new("a.json").unwrap();
        let json = serde_json::to_value(Snapshot::of(&tab)).unwrap();
        assert!(json.get("savedAt").is_some());
        assert_eq!(json["language"], "json");
    }
}
