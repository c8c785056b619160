//! Session persistence
//!
//! The session lives under four fixed keys of the storage key-value table:
//!
//! ```text
//! celestia-editor-tabs             JSON [{id, name, content, language, saved, isProtected}]
//! celestia-editor-active-tab       tab id, empty when no tab is active
//! celestia-editor-last-tab-number  next auto-number, decimal
//! celestia-saved-tabs              JSON [{id, name, content, language, savedAt}]
//! ```
//!
//! Payloads written by older editor builds are migrated on read: they may lack
//! `isProtected` and `saved`, carry `null` content, use language tags outside
//! the current set, or store `savedAt` as a free-form local time string.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use celestia_storage::Database;
use celestia_tabs::{Language, Snapshot, Tab};

use crate::session::{Session, SessionOptions};
use crate::Result;

pub const TABS_KEY: &str = "celestia-editor-tabs";
pub const ACTIVE_TAB_KEY: &str = "celestia-editor-active-tab";
pub const AUTO_NUMBER_KEY: &str = "celestia-editor-last-tab-number";
pub const ARCHIVE_KEY: &str = "celestia-saved-tabs";

/// Tab as found in storage, before migration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTab {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    content: Option<String>,
    language: Option<String>,
    saved: Option<bool>,
    is_protected: Option<bool>,
}

/// Archive entry as found in storage, before migration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    id: String,
    name: String,
    content: Option<String>,
    language: Option<String>,
    saved_at: Option<String>,
}

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Write the whole session in one transaction
    pub fn persist(&self, session: &Session) -> Result<()> {
        let tabs_json = serde_json::to_string(&session.tabs)?;
        let archive_json = serde_json::to_string(&session.archive)?;
        let active = session.active_tab_id.clone().unwrap_or_default();

        self.db.set_many(&[
            (TABS_KEY, tabs_json),
            (ACTIVE_TAB_KEY, active),
            (AUTO_NUMBER_KEY, session.next_auto_number.to_string()),
            (ARCHIVE_KEY, archive_json),
        ])?;

        tracing::trace!(tab_count = session.tabs.len(), "Persisted session");

        Ok(())
    }

    /// Load the last persisted session.
    ///
    /// Returns `None` when nothing was ever persisted or the tab payload is
    /// unreadable. The result is migrated but not yet checked against the
    /// session invariants; see [`Session::from_restored`].
    pub fn restore(&self, options: &SessionOptions) -> Option<Session> {
        let stored: Vec<StoredTab> = match self.db.get_json(TABS_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Saved tabs are unreadable, starting a fresh session: {}", e);
                return None;
            }
        };

        let tabs = migrate_tabs(stored, options);

        let active_tab_id = match self.db.get(ACTIVE_TAB_KEY) {
            Ok(value) => value.filter(|id| !id.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read active tab: {}", e);
                None
            }
        };

        let next_auto_number = self
            .db
            .get(AUTO_NUMBER_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1);

        Some(Session {
            tabs,
            active_tab_id,
            next_auto_number,
            archive: self.restore_archive(),
        })
    }

    /// Load the snapshot archive on its own; unreadable archives come back empty
    pub fn restore_archive(&self) -> Vec<Snapshot> {
        match self.db.get_json::<Vec<StoredSnapshot>>(ARCHIVE_KEY) {
            Ok(Some(stored)) => stored.into_iter().map(migrate_snapshot).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Saved snapshots are unreadable, ignoring them: {}", e);
                Vec::new()
            }
        }
    }
}

fn migrate_tabs(stored: Vec<StoredTab>, options: &SessionOptions) -> Vec<Tab> {
    // Builds that predate the protected flag recognize the welcome tab by name
    let infer_protected = !stored.iter().any(|t| t.is_protected == Some(true));
    let mut welcome_assigned = false;

    let mut tabs = Vec::with_capacity(stored.len());
    for stored_tab in stored {
        let is_protected = match stored_tab.is_protected {
            Some(flag) => flag,
            None if infer_protected && !welcome_assigned => {
                stored_tab.name == options.welcome_name
            }
            None => false,
        };
        welcome_assigned |= is_protected;

        let (content, saved) = match stored_tab.content {
            Some(content) => (content, stored_tab.saved.unwrap_or(true)),
            None if is_protected => (options.welcome_content.clone(), true),
            None => (String::new(), stored_tab.saved.unwrap_or(true)),
        };

        let language = stored_tab
            .language
            .and_then(|tag| tag.parse::<Language>().ok())
            .unwrap_or_else(|| Language::from_name(&stored_tab.name));

        match Tab::restore(
            stored_tab.id,
            stored_tab.name,
            content,
            language,
            saved,
            is_protected,
        ) {
            Ok(tab) => tabs.push(tab),
            Err(e) => tracing::warn!("Dropping unreadable saved tab: {}", e),
        }
    }

    tabs
}

fn migrate_snapshot(stored: StoredSnapshot) -> Snapshot {
    let language = stored
        .language
        .and_then(|tag| tag.parse::<Language>().ok())
        .unwrap_or_else(|| Language::from_name(&stored.name));

    let saved_at = stored
        .saved_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Snapshot {
        id: stored.id,
        name: stored.name,
        content: stored.content.unwrap_or_default(),
        language,
        saved_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{WELCOME_CONTENT, WELCOME_ID};

    fn store() -> (SessionStore, Database) {
        let db = Database::open_in_memory().unwrap();
        (SessionStore::new(db.clone()), db)
    }

    fn raw_state(db: &Database) -> Vec<Option<String>> {
        [TABS_KEY, ACTIVE_TAB_KEY, AUTO_NUMBER_KEY, ARCHIVE_KEY]
            .iter()
            .map(|key| db.get(key).unwrap())
            .collect()
    }

    fn sample_session() -> Session {
        let options = SessionOptions::default();
        let mut session = Session::fresh(&options);
        let mut script = Tab::new("Script #1.lua").unwrap();
        script.set_content("print('hi')".to_string());
        session.archive_snapshot(Snapshot::of(&script));
        session.active_tab_id = Some(script.id.clone());
        session.add_tab(script);
        session.add_tab(Tab::new("notes.md").unwrap());
        session.next_auto_number = 2;
        session
    }

    #[test]
    fn test_restore_when_never_persisted() {
        let (store, _db) = store();
        assert!(store.restore(&SessionOptions::default()).is_none());
        assert!(store.restore_archive().is_empty());
    }

    #[test]
    fn test_persist_then_restore() {
        let (store, _db) = store();
        let session = sample_session();
        store.persist(&session).unwrap();

        let restored = store.restore(&SessionOptions::default()).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_restore_then_persist_is_idempotent() {
        let (store, db) = store();
        store.persist(&sample_session()).unwrap();
        let first = raw_state(&db);

        let restored = store.restore(&SessionOptions::default()).unwrap();
        store.persist(&restored).unwrap();
        assert_eq!(raw_state(&db), first);
    }

    #[test]
    fn test_empty_active_id_restores_as_none() {
        let (store, _db) = store();
        let mut session = sample_session();
        session.active_tab_id = None;
        store.persist(&session).unwrap();

        let restored = store.restore(&SessionOptions::default()).unwrap();
        assert_eq!(restored.active_tab_id, None);
    }

    #[test]
    fn test_corrupt_tabs_are_absent() {
        let (store, db) = store();
        db.set(TABS_KEY, "{not json").unwrap();
        assert!(store.restore(&SessionOptions::default()).is_none());

        db.set(TABS_KEY, r#"{"id": "x"}"#).unwrap();
        assert!(store.restore(&SessionOptions::default()).is_none());
    }

    #[test]
    fn test_corrupt_archive_keeps_tabs() {
        let (store, db) = store();
        store.persist(&sample_session()).unwrap();
        db.set(ARCHIVE_KEY, "[[[").unwrap();

        let restored = store.restore(&SessionOptions::default()).unwrap();
        assert_eq!(restored.tabs.len(), 3);
        assert!(restored.archive.is_empty());
    }

    #[test]
    fn test_legacy_payload_is_migrated() {
        let (store, db) = store();
        db.set(
            TABS_KEY,
            r#"[
                {"id": "1700000000000abcde", "name": "Script #2.lua", "content": "x = 1", "language": "lua", "saved": false},
                {"id": "welcome", "name": "Welcome.lua", "content": null, "language": "lua", "saved": false},
                {"id": "1700000000001fghij", "name": "data.json", "content": null, "language": "klingon"},
                {"id": "", "name": "orphan.lua", "content": ""}
            ]"#,
        )
        .unwrap();
        db.set(ACTIVE_TAB_KEY, "1700000000000abcde").unwrap();
        db.set(AUTO_NUMBER_KEY, "garbage").unwrap();
        db.set(
            ARCHIVE_KEY,
            r#"[{"id": "1700000000002", "name": "old.lua", "content": "--", "language": "lua", "savedAt": "1/2/2024, 10:00:00 AM"}]"#,
        )
        .unwrap();

        let restored = store.restore(&SessionOptions::default()).unwrap();
        assert_eq!(restored.tabs.len(), 3);

        let script = &restored.tabs[0];
        assert!(!script.is_protected);
        assert!(!script.saved);

        let welcome = &restored.tabs[1];
        assert_eq!(welcome.id, WELCOME_ID);
        assert!(welcome.is_protected);
        assert!(welcome.saved);
        assert_eq!(welcome.content, WELCOME_CONTENT);

        let data = &restored.tabs[2];
        assert_eq!(data.language, Language::Json);
        assert_eq!(data.content, "");
        assert!(data.saved);

        assert_eq!(restored.active_tab_id.as_deref(), Some("1700000000000abcde"));
        assert_eq!(restored.next_auto_number, 1);
        assert_eq!(restored.archive.len(), 1);
        assert_eq!(restored.archive[0].name, "old.lua");
    }

    #[test]
    fn test_explicit_protection_disables_name_inference() {
        let (store, db) = store();
        db.set(
            TABS_KEY,
            r#"[
                {"id": "home", "name": "Home.lua", "content": "", "language": "lua", "saved": true, "isProtected": true},
                {"id": "w", "name": "Welcome.lua", "content": "", "language": "lua", "saved": true}
            ]"#,
        )
        .unwrap();

        let restored = store.restore(&SessionOptions::default()).unwrap();
        assert!(restored.tabs[0].is_protected);
        assert!(!restored.tabs[1].is_protected);
    }
}
