//! Tab Session Manager
//!
//! Owns the session, keeps the editor binding on the active tab and
//! checkpoints every mutation to the session store.
//!
//! Operations never fail: a request that would break a session invariant
//! (unknown id, protected tab, quota, blank name) is refused and logged, and
//! the call returns `None`. Applied operations return the [`SessionEvent`]
//! describing the transition.

use celestia_tabs::{script_name, Snapshot, Tab};

use crate::binding::{EditorBinding, FileExporter};
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::session::{Session, SessionOptions};
use crate::store::SessionStore;
use crate::Result;

pub struct TabSessionManager<B: EditorBinding> {
    session: Session,
    store: SessionStore,
    binding: B,
    options: SessionOptions,
}

impl<B: EditorBinding> TabSessionManager<B> {
    /// Restore the last session, or start a fresh one, and bind its active tab.
    pub fn initialize(store: SessionStore, mut binding: B, options: SessionOptions) -> Self {
        let session = match store.restore(&options) {
            Some(restored) => Session::from_restored(restored, &options),
            None => {
                let mut session = Session::fresh(&options);
                session.archive = store.restore_archive();
                session
            }
        };

        if let Some(tab) = session.active_tab() {
            binding.bind(tab);
        }

        tracing::info!(
            tab_count = session.tab_count(),
            active_tab_id = ?session.active_tab_id,
            next_auto_number = session.next_auto_number,
            "Initialized tab session"
        );

        let manager = Self {
            session,
            store,
            binding,
            options,
        };
        manager.persist();
        manager
    }

    /// Checkpoint the session and release the editor binding.
    ///
    /// Returns the binding so the host can reuse the surface.
    pub fn teardown(mut self) -> B {
        self.persist();
        self.binding.unbind();

        tracing::info!(tab_count = self.session.tab_count(), "Tore down tab session");

        self.binding
    }

    /// Open a new `Script #<n>.lua` tab at the end and make it active
    pub fn create_tab(&mut self) -> Option<SessionEvent> {
        let result = self.try_create_tab();
        self.commit("create_tab", result)
    }

    fn try_create_tab(&mut self) -> Result<SessionEvent> {
        self.ensure_capacity()?;
        if self.session.auto_number_exhausted() {
            return Err(SessionError::AutoNumberExhausted);
        }

        let number = self.session.next_auto_number;
        let mut tab = Tab::new(&script_name(number))?;
        tab.id = self.session.fresh_id();
        let tab_id = tab.id.clone();

        self.session.reserve_script_number(&tab.name);
        tracing::info!(tab_id = %tab_id, name = %tab.name, "Created new tab");

        self.session.add_tab(tab);
        self.activate(&tab_id);

        Ok(SessionEvent::TabCreated { tab_id })
    }

    /// Close a tab; the first remaining tab takes over if it was active
    pub fn close_tab(&mut self, tab_id: &str) -> Option<SessionEvent> {
        let result = self.try_close_tab(tab_id);
        self.commit("close_tab", result)
    }

    fn try_close_tab(&mut self, tab_id: &str) -> Result<SessionEvent> {
        self.ensure_unprotected(tab_id)?;

        let was_active = self.session.active_tab_id.as_deref() == Some(tab_id);
        self.session
            .remove_tab(tab_id)
            .ok_or_else(|| SessionError::NotFound(tab_id.to_string()))?;

        let mut activated = None;
        if was_active {
            match self.session.tabs.first().map(|t| t.id.clone()) {
                Some(next_id) => {
                    self.activate(&next_id);
                    activated = Some(next_id);
                }
                None => {
                    self.session.active_tab_id = None;
                    self.binding.unbind();
                    tracing::debug!("Last tab closed, editor unbound");
                }
            }
        }

        tracing::info!(tab_id = %tab_id, "Closed tab");

        Ok(SessionEvent::TabClosed {
            tab_id: tab_id.to_string(),
            activated,
        })
    }

    /// Make a tab active and show it in the editor
    pub fn switch_tab(&mut self, tab_id: &str) -> Option<SessionEvent> {
        let result = self.try_switch_tab(tab_id);
        self.commit("switch_tab", result)
    }

    fn try_switch_tab(&mut self, tab_id: &str) -> Result<SessionEvent> {
        if self.session.active_tab_id.as_deref() == Some(tab_id) {
            return Err(SessionError::InvalidOperation(format!(
                "tab {} is already active",
                tab_id
            )));
        }
        if !self.session.contains(tab_id) {
            return Err(SessionError::NotFound(tab_id.to_string()));
        }

        let from = self.session.active_tab_id.clone();
        self.activate(tab_id);

        Ok(SessionEvent::TabSwitched {
            from,
            to: tab_id.to_string(),
        })
    }

    /// Move `dragged_id` into the slot currently held by `target_id`.
    ///
    /// The tabs in between shift by one; the two tabs are not swapped. Nothing
    /// can be moved to or from the first slot.
    pub fn reorder_tab(&mut self, dragged_id: &str, target_id: &str) -> Option<SessionEvent> {
        let result = self.try_reorder_tab(dragged_id, target_id);
        self.commit("reorder_tab", result)
    }

    fn try_reorder_tab(&mut self, dragged_id: &str, target_id: &str) -> Result<SessionEvent> {
        if dragged_id == target_id {
            return Err(SessionError::InvalidOperation(
                "tab dropped onto itself".to_string(),
            ));
        }

        let from = self
            .session
            .position(dragged_id)
            .ok_or_else(|| SessionError::NotFound(dragged_id.to_string()))?;
        let to = self
            .session
            .position(target_id)
            .ok_or_else(|| SessionError::NotFound(target_id.to_string()))?;

        if from == 0 || to == 0 {
            return Err(SessionError::InvalidOperation(
                "the first tab position is fixed".to_string(),
            ));
        }

        self.session.move_tab(dragged_id, to);

        tracing::debug!(tab_id = %dragged_id, from, to, "Moved tab");

        Ok(SessionEvent::TabMoved {
            tab_id: dragged_id.to_string(),
            from,
            to,
        })
    }

    /// Rename a tab and re-derive its language. Names need not be unique.
    pub fn rename_tab(&mut self, tab_id: &str, new_name: &str) -> Option<SessionEvent> {
        let result = self.try_rename_tab(tab_id, new_name);
        self.commit("rename_tab", result)
    }

    fn try_rename_tab(&mut self, tab_id: &str, new_name: &str) -> Result<SessionEvent> {
        self.ensure_unprotected(tab_id)?;

        let tab = self
            .session
            .tab_mut(tab_id)
            .ok_or_else(|| SessionError::NotFound(tab_id.to_string()))?;
        tab.rename(new_name)?;

        let event = SessionEvent::TabRenamed {
            tab_id: tab_id.to_string(),
            name: tab.name.clone(),
            language: tab.language,
        };

        let name = tab.name.clone();
        self.session.reserve_script_number(&name);

        Ok(event)
    }

    /// Record an edit reported by the editor binding against the active tab.
    ///
    /// Every notification marks the tab dirty, even when the text is unchanged.
    pub fn on_editor_content_changed(&mut self, content: impl Into<String>) -> Option<SessionEvent> {
        let result = self.try_update_active_content(content.into());
        self.commit("on_editor_content_changed", result)
    }

    /// Replace the active tab's text from outside the editor (file open,
    /// paste-replace, clear) and push it into the binding.
    pub fn set_content_programmatically(
        &mut self,
        content: impl Into<String>,
    ) -> Option<SessionEvent> {
        let content = content.into();
        let result = self.try_update_active_content(content.clone());
        if result.is_ok() {
            self.binding.set_current_content(&content);
        }
        self.commit("set_content_programmatically", result)
    }

    /// Empty the active tab
    pub fn clear_content(&mut self) -> Option<SessionEvent> {
        self.set_content_programmatically(String::new())
    }

    fn try_update_active_content(&mut self, content: String) -> Result<SessionEvent> {
        let tab = self
            .session
            .active_tab_mut()
            .ok_or(SessionError::NoActiveTab)?;
        tab.set_content(content);

        Ok(SessionEvent::ContentChanged {
            tab_id: tab.id.clone(),
        })
    }

    /// Mark a tab saved and archive a timestamped snapshot of it
    pub fn save_tab(&mut self, tab_id: &str) -> Option<SessionEvent> {
        let result = self.try_save_tab(tab_id);
        self.commit("save_tab", result)
    }

    fn try_save_tab(&mut self, tab_id: &str) -> Result<SessionEvent> {
        let tab = self
            .session
            .tab_mut(tab_id)
            .ok_or_else(|| SessionError::NotFound(tab_id.to_string()))?;
        tab.mark_saved();

        let snapshot = Snapshot::of(tab);
        let snapshot_id = snapshot.id.clone();

        tracing::info!(tab_id = %tab_id, name = %snapshot.name, "Saved tab snapshot");

        self.session.archive_snapshot(snapshot);

        Ok(SessionEvent::TabSaved {
            tab_id: tab_id.to_string(),
            snapshot_id,
        })
    }

    /// Re-open an archived snapshot as a new active tab
    pub fn load_snapshot(&mut self, snapshot_id: &str) -> Option<SessionEvent> {
        let result = self.try_load_snapshot(snapshot_id);
        self.commit("load_snapshot", result)
    }

    fn try_load_snapshot(&mut self, snapshot_id: &str) -> Result<SessionEvent> {
        self.ensure_capacity()?;

        let snapshot = self
            .session
            .snapshot(snapshot_id)
            .ok_or_else(|| SessionError::SnapshotNotFound(snapshot_id.to_string()))?;
        let mut tab = Tab::from_snapshot(snapshot);
        tab.id = self.session.fresh_id();
        let tab_id = tab.id.clone();

        self.session.reserve_script_number(&tab.name);
        tracing::info!(tab_id = %tab_id, name = %tab.name, "Opened saved snapshot");

        self.session.add_tab(tab);
        self.activate(&tab_id);

        Ok(SessionEvent::SnapshotLoaded {
            snapshot_id: snapshot_id.to_string(),
            tab_id,
        })
    }

    /// Drop an archived snapshot
    pub fn delete_snapshot(&mut self, snapshot_id: &str) -> Option<SessionEvent> {
        let result = self.try_delete_snapshot(snapshot_id);
        self.commit("delete_snapshot", result)
    }

    fn try_delete_snapshot(&mut self, snapshot_id: &str) -> Result<SessionEvent> {
        let before = self.session.archive.len();
        self.session.archive.retain(|s| s.id != snapshot_id);
        if self.session.archive.len() == before {
            return Err(SessionError::SnapshotNotFound(snapshot_id.to_string()));
        }

        Ok(SessionEvent::SnapshotDeleted {
            snapshot_id: snapshot_id.to_string(),
        })
    }

    /// Hand a tab's name and text to the exporter unchanged.
    ///
    /// Unknown ids are a no-op; exporter failures are returned.
    pub fn export_tab<E: FileExporter>(
        &self,
        tab_id: &str,
        exporter: &mut E,
    ) -> Result<Option<SessionEvent>> {
        let Some(tab) = self.session.tab(tab_id) else {
            tracing::debug!(tab_id = %tab_id, "Export of unknown tab ignored");
            return Ok(None);
        };

        exporter.export(&tab.name, &tab.content)?;

        tracing::info!(tab_id = %tab_id, file_name = %tab.name, "Exported tab");

        Ok(Some(SessionEvent::TabExported {
            tab_id: tab_id.to_string(),
            file_name: tab.name.clone(),
        }))
    }

    /// Open tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.session.tabs
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.session.tab(tab_id)
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.session.active_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.session.active_tab()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.session.archive
    }

    pub fn next_auto_number(&self) -> u32 {
        self.session.next_auto_number
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    fn ensure_capacity(&self) -> Result<()> {
        if self.session.tab_count() >= self.options.max_tabs {
            return Err(SessionError::QuotaExceeded {
                max: self.options.max_tabs,
            });
        }
        Ok(())
    }

    fn ensure_unprotected(&self, tab_id: &str) -> Result<()> {
        match self.session.tab(tab_id) {
            Some(tab) if tab.is_protected => Err(SessionError::ProtectedTab(tab_id.to_string())),
            Some(_) => Ok(()),
            None => Err(SessionError::NotFound(tab_id.to_string())),
        }
    }

    /// Point the session and the binding at `tab_id`
    fn activate(&mut self, tab_id: &str) {
        if let Some(tab) = self.session.tab(tab_id) {
            self.binding.bind(tab);
            tracing::debug!(tab_id = %tab_id, "Bound tab to editor");
        }
        self.session.active_tab_id = Some(tab_id.to_string());
    }

    fn commit(
        &mut self,
        operation: &'static str,
        result: Result<SessionEvent>,
    ) -> Option<SessionEvent> {
        match result {
            Ok(event) => {
                debug_assert!(
                    self.session.validate(self.options.max_tabs).is_ok(),
                    "{} left the session inconsistent",
                    operation
                );
                self.persist();
                Some(event)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "Refused tab operation");
                None
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.persist(&self.session) {
            tracing::warn!("Failed to persist tab session: {}", e);
        }
    }
}
