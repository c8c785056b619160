//! Session data structure

use std::collections::HashSet;

use celestia_tabs::{new_tab_id, Snapshot, Tab};

use crate::error::SessionError;
use crate::Result;

/// Default tab quota
pub const MAX_TABS: usize = 6;

pub const WELCOME_ID: &str = "welcome";
pub const WELCOME_NAME: &str = "Welcome.lua";
pub const WELCOME_CONTENT: &str = r#"-- Welcome, User

-- Example Script
local player = game.Players.LocalPlayer
local character = player.Character or player.CharacterAdded:Wait()
local humanoid = character:WaitForChild("Humanoid")

humanoid.WalkSpeed = 50
"#;

/// Per-session settings fixed at initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Maximum number of simultaneously open tabs, welcome tab included
    pub max_tabs: usize,
    pub welcome_id: String,
    pub welcome_name: String,
    pub welcome_content: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_tabs: MAX_TABS,
            welcome_id: WELCOME_ID.to_string(),
            welcome_name: WELCOME_NAME.to_string(),
            welcome_content: WELCOME_CONTENT.to_string(),
        }
    }
}

impl SessionOptions {
    pub fn welcome_tab(&self) -> Tab {
        Tab::welcome(&self.welcome_id, &self.welcome_name, &self.welcome_content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Open tabs in display order
    pub tabs: Vec<Tab>,
    /// Tab bound to the editor, `None` only when `tabs` is empty
    pub active_tab_id: Option<String>,
    /// Seeds the next `Script #<n>.lua` name; `u32::MAX` means no numbers are left
    pub next_auto_number: u32,
    /// Explicitly saved snapshots, oldest first
    pub archive: Vec<Snapshot>,
}

impl Session {
    /// A session holding only the welcome tab
    pub fn fresh(options: &SessionOptions) -> Self {
        let welcome = options.welcome_tab();

        Self {
            active_tab_id: Some(welcome.id.clone()),
            tabs: vec![welcome],
            next_auto_number: 1,
            archive: Vec::new(),
        }
    }

    /// Bring restored state back within the session invariants.
    ///
    /// Duplicate ids keep their first occurrence, only the first protected tab
    /// stays protected and is moved to the front, tabs beyond the quota are
    /// archived, the auto-number is recomputed and a dangling active id falls
    /// back to the first tab.
    pub fn from_restored(restored: Session, options: &SessionOptions) -> Self {
        let Session {
            tabs: restored_tabs,
            active_tab_id,
            archive,
            ..
        } = restored;

        let mut seen = HashSet::new();
        let mut tabs: Vec<Tab> = Vec::with_capacity(restored_tabs.len());
        for tab in restored_tabs {
            if !seen.insert(tab.id.clone()) {
                tracing::warn!(tab_id = %tab.id, "Dropping restored tab with duplicate id");
                continue;
            }
            tabs.push(tab);
        }

        let mut protected_found = false;
        for tab in tabs.iter_mut() {
            if tab.is_protected {
                if protected_found {
                    tab.is_protected = false;
                }
                protected_found = true;
            }
        }

        match tabs.iter().position(|t| t.is_protected) {
            Some(0) => {}
            Some(index) => {
                let welcome = tabs.remove(index);
                tabs.insert(0, welcome);
            }
            None => {
                let mut welcome = options.welcome_tab();
                if tabs.iter().any(|t| t.id == welcome.id) {
                    welcome.id = new_tab_id();
                }
                tracing::info!(tab_id = %welcome.id, "Restored session had no welcome tab, recreating it");
                tabs.insert(0, welcome);
            }
        }

        let mut session = Self {
            tabs,
            active_tab_id,
            next_auto_number: 1,
            archive,
        };

        let quota = options.max_tabs.max(1);
        if session.tabs.len() > quota {
            let overflow = session.tabs.split_off(quota);
            tracing::warn!(
                count = overflow.len(),
                max_tabs = quota,
                "Restored session exceeds the tab limit, archiving the excess"
            );
            // Appended as-is: overflow tabs may share names with each other or with saves
            session
                .archive
                .extend(overflow.iter().map(Snapshot::of));
        }

        session.next_auto_number = session.highest_script_number().saturating_add(1);

        let active_is_live = session
            .active_tab_id
            .as_deref()
            .is_some_and(|id| session.contains(id));
        if !active_is_live {
            session.active_tab_id = session.tabs.first().map(|t| t.id.clone());
        }

        session
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.position(tab_id).is_some()
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_tab_id.clone()?;
        self.tab_mut(&id)
    }

    /// Append a tab at the end
    pub fn add_tab(&mut self, tab: Tab) {
        self.tabs.push(tab);
    }

    /// Remove a tab, returning it
    pub fn remove_tab(&mut self, tab_id: &str) -> Option<Tab> {
        let index = self.position(tab_id)?;
        Some(self.tabs.remove(index))
    }

    /// Move a tab to a new position, shifting the tabs in between
    pub fn move_tab(&mut self, tab_id: &str, new_index: usize) {
        if let Some(current_index) = self.position(tab_id) {
            let tab = self.tabs.remove(current_index);
            let insert_index = new_index.min(self.tabs.len());
            self.tabs.insert(insert_index, tab);
        }
    }

    /// A tab id not used by any open tab
    pub fn fresh_id(&self) -> String {
        loop {
            let id = new_tab_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Largest `Script #<n>` number among open tabs, 0 if none
    pub fn highest_script_number(&self) -> u32 {
        self.tabs
            .iter()
            .filter_map(|t| t.script_number())
            .max()
            .unwrap_or(0)
    }

    /// Keep the auto-number ahead of a `Script #<n>` name entering the session
    pub fn reserve_script_number(&mut self, name: &str) {
        if let Some(n) = celestia_tabs::script_number(name) {
            self.next_auto_number = self.next_auto_number.max(n.saturating_add(1));
        }
    }

    /// No `Script #<n>` name can be generated any more
    pub fn auto_number_exhausted(&self) -> bool {
        self.next_auto_number == u32::MAX
    }

    /// Archive a snapshot, replacing an older one with the same name
    pub fn archive_snapshot(&mut self, snapshot: Snapshot) {
        self.archive.retain(|s| s.name != snapshot.name);
        self.archive.push(snapshot);
    }

    pub fn snapshot(&self, snapshot_id: &str) -> Option<&Snapshot> {
        self.archive.iter().find(|s| s.id == snapshot_id)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Check every session invariant
    pub fn validate(&self, max_tabs: usize) -> Result<()> {
        let mut ids = HashSet::new();
        for tab in &self.tabs {
            if !ids.insert(tab.id.as_str()) {
                return Err(SessionError::InvariantViolated(format!(
                    "duplicate tab id {}",
                    tab.id
                )));
            }
        }

        if self.tabs.len() > max_tabs {
            return Err(SessionError::InvariantViolated(format!(
                "{} tabs open, limit is {}",
                self.tabs.len(),
                max_tabs
            )));
        }

        match self.tabs.first() {
            Some(first) => {
                let protected = self.tabs.iter().filter(|t| t.is_protected).count();
                if !first.is_protected || protected != 1 {
                    return Err(SessionError::InvariantViolated(
                        "exactly one protected tab must lead the session".to_string(),
                    ));
                }
                if self.active_tab().is_none() {
                    return Err(SessionError::InvariantViolated(
                        "active tab is not open".to_string(),
                    ));
                }
            }
            None => {
                if self.active_tab_id.is_some() {
                    return Err(SessionError::InvariantViolated(
                        "active tab set on an empty session".to_string(),
                    ));
                }
            }
        }

        let highest = self.highest_script_number();
        if highest > 0 && self.next_auto_number <= highest && !self.auto_number_exhausted() {
            return Err(SessionError::InvariantViolated(format!(
                "auto-number {} does not exceed Script #{}",
                self.next_auto_number, highest
            )));
        }

        Ok(())
    }
}
