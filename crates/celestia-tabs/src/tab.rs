//! Tab data structure
//!
//! A tab is identified by its `id` alone; names may collide.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TabError;
use crate::language::Language;
use crate::snapshot::Snapshot;
use crate::Result;

const SCRIPT_PREFIX: &str = "Script #";
const SCRIPT_EXTENSION: &str = ".lua";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier, stable for the tab's lifetime
    pub id: String,
    /// Display name, export filename and language key
    pub name: String,
    /// Full document text
    pub content: String,
    /// Derived from the name's extension
    pub language: Language,
    /// Whether content matches the last explicit save
    pub saved: bool,
    /// The welcome tab: never closed, renamed or moved
    pub is_protected: bool,
}

impl Tab {
    /// Create an empty, saved tab with a fresh id
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TabError::EmptyName);
        }

        Ok(Self {
            id: new_tab_id(),
            name: name.to_string(),
            content: String::new(),
            language: Language::from_name(name),
            saved: true,
            is_protected: false,
        })
    }

    /// Create the protected welcome tab
    pub fn welcome(id: &str, name: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            language: Language::from_name(name),
            saved: true,
            is_protected: true,
        }
    }

    /// Rebuild a tab from persisted fields
    pub fn restore(
        id: String,
        name: String,
        content: String,
        language: Language,
        saved: bool,
        is_protected: bool,
    ) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(TabError::EmptyId);
        }
        if name.trim().is_empty() {
            return Err(TabError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            content,
            language,
            saved,
            is_protected,
        })
    }

    /// Re-open an archived snapshot under a new id
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            id: new_tab_id(),
            name: snapshot.name.clone(),
            content: snapshot.content.clone(),
            language: snapshot.language,
            saved: true,
            is_protected: false,
        }
    }

    /// Rename and re-derive the language; marks the tab dirty
    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TabError::EmptyName);
        }

        tracing::debug!(tab_id = %self.id, from = %self.name, to = %name, "Tab renamed");

        self.name = name.to_string();
        self.language = Language::from_name(name);
        self.saved = false;
        Ok(())
    }

    /// Replace the content; any edit marks the tab dirty, even a no-op one
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.saved = false;
    }

    pub fn mark_saved(&mut self) {
        self.saved = true;
    }

    /// Auto-number carried by a `Script #<n>` name, if any
    pub fn script_number(&self) -> Option<u32> {
        script_number(&self.name)
    }
}

/// Generate a fresh tab id
pub fn new_tab_id() -> String {
    Uuid::new_v4().to_string()
}

/// Name given to the `n`th auto-numbered script tab
pub fn script_name(n: u32) -> String {
    format!("{}{}{}", SCRIPT_PREFIX, n, SCRIPT_EXTENSION)
}

/// Parse `Script #<n>` or `Script #<n>.lua` back into `n`
pub fn script_number(name: &str) -> Option<u32> {
    let rest = name.strip_prefix(SCRIPT_PREFIX)?;
    let digits = rest.strip_suffix(SCRIPT_EXTENSION).unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab() {
        let tab = Tab::new("  Script #1.lua ").unwrap();
        assert_eq!(tab.name, "Script #1.lua");
        assert_eq!(tab.language, Language::Lua);
        assert!(tab.content.is_empty());
        assert!(tab.saved);
        assert!(!tab.is_protected);
        assert!(!tab.id.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(Tab::new("   "), Err(TabError::EmptyName));
    }

    #[test]
    fn test_rename() {
        let mut tab = Tab::new("Script #1.lua").unwrap();

        tab.rename(" foo.py ").unwrap();
        assert_eq!(tab.name, "foo.py");
        assert_eq!(tab.language, Language::Python);
        assert!(!tab.saved);

        assert_eq!(tab.rename(""), Err(TabError::EmptyName));
        assert_eq!(tab.name, "foo.py");
    }

    #[test]
    fn test_set_content_marks_dirty() {
        let mut tab = Tab::new("notes.md").unwrap();
        tab.set_content(String::new());
        assert!(!tab.saved);

        tab.mark_saved();
        assert!(tab.saved);
    }

    #[test]
    fn test_restore_validates_identity() {
        let restored = Tab::restore(
            String::new(),
            "a.lua".to_string(),
            String::new(),
            Language::Lua,
            true,
            false,
        );
        assert_eq!(restored, Err(TabError::EmptyId));

        let restored = Tab::restore(
            "abc".to_string(),
            " ".to_string(),
            String::new(),
            Language::Lua,
            true,
            false,
        );
        assert_eq!(restored, Err(TabError::EmptyName));
    }

    #[test]
    fn test_script_numbers() {
        assert_eq!(script_name(3), "Script #3.lua");
        assert_eq!(script_number("Script #3.lua"), Some(3));
        assert_eq!(script_number("Script #12"), Some(12));
        assert_eq!(script_number("Script #"), None);
        assert_eq!(script_number("Script #3.py"), None);
        assert_eq!(script_number("Script #-1"), None);
        assert_eq!(script_number("My Script #3"), None);
        assert_eq!(script_number("Script #4294967295"), Some(u32::MAX));
        assert_eq!(script_number("Script #4294967296.lua"), None);
    }

    #[test]
    fn test_serialized_field_names() {
        let tab = Tab::welcome("welcome", "Welcome.lua", "-- hi");
        let json = serde_json::to_value(&tab).unwrap();
        assert_eq!(json["isProtected"], true);
        assert_eq!(json["language"], "lua");
        assert_eq!(json["saved"], true);
    }
}
