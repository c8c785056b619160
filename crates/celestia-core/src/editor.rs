//! Editor shell
//!
//! Owns the database and the tab session. The host drives the session through
//! [`Editor::session_mut`] and forwards widget change notifications to it.

use std::path::{Path, PathBuf};

use celestia_session::{EditorBinding, SessionStore, TabSessionManager};
use celestia_storage::Database;

use crate::config::Config;
use crate::export::DirectoryExporter;
use crate::Result;

pub struct Editor<B: EditorBinding> {
    config: Config,
    session: TabSessionManager<B>,
}

impl<B: EditorBinding> Editor<B> {
    /// Open the database named by `config` and restore the tab session
    pub fn open(config: Config, binding: B) -> Result<Self> {
        config.validate()?;

        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db, binding))
    }

    /// Run against a throwaway in-memory database
    pub fn in_memory(config: Config, binding: B) -> Result<Self> {
        config.validate()?;
        let db = Database::open_in_memory()?;
        Ok(Self::with_database(config, db, binding))
    }

    fn with_database(config: Config, db: Database, binding: B) -> Self {
        let store = SessionStore::new(db);
        let session = TabSessionManager::initialize(store, binding, config.session_options());

        tracing::info!(
            database = %config.database_path.display(),
            "Editor ready"
        );

        Self { config, session }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &TabSessionManager<B> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TabSessionManager<B> {
        &mut self.session
    }

    /// Write the active tab into `dir` under its own name.
    ///
    /// Returns the written path, or `None` when no tab is active.
    pub fn export_active_tab<P: AsRef<Path>>(&self, dir: P) -> Result<Option<PathBuf>> {
        let Some(tab_id) = self.session.active_tab_id() else {
            return Ok(None);
        };

        let mut exporter = DirectoryExporter::new(dir);
        self.session.export_tab(tab_id, &mut exporter)?;
        Ok(exporter.last_path().map(Path::to_path_buf))
    }

    /// Checkpoint the session and hand back the editor binding
    pub fn shutdown(self) -> B {
        self.session.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestia_session::{DetachedBinding, SessionEvent, WELCOME_NAME};

    #[test]
    fn test_session_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("data"));

        let tab_id = {
            let mut editor = Editor::open(config.clone(), DetachedBinding::new()).unwrap();
            let tab_id = match editor.session_mut().create_tab() {
                Some(SessionEvent::TabCreated { tab_id }) => tab_id,
                other => panic!("expected TabCreated, got {:?}", other),
            };
            editor.session_mut().on_editor_content_changed("print('saved')");
            editor.shutdown();
            tab_id
        };

        let editor = Editor::open(config, DetachedBinding::new()).unwrap();
        let names: Vec<&str> = editor
            .session()
            .tabs()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec![WELCOME_NAME, "Script #1.lua"]);
        assert_eq!(editor.session().active_tab_id(), Some(tab_id.as_str()));
        assert_eq!(
            editor.session().binding().current_content(),
            "print('saved')"
        );
    }

    #[test]
    fn test_config_shapes_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().to_path_buf());
        config.max_tabs = 2;
        config.welcome_name = "Start.md".to_string();

        let mut editor = Editor::in_memory(config, DetachedBinding::new()).unwrap();
        assert_eq!(editor.session().tabs()[0].name, "Start.md");
        assert!(editor.session_mut().create_tab().is_some());
        assert!(editor.session_mut().create_tab().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::new(PathBuf::from("/nonexistent"));
        config.max_tabs = 0;
        assert!(Editor::in_memory(config, DetachedBinding::new()).is_err());
    }

    #[test]
    fn test_export_active_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor =
            Editor::in_memory(Config::new(dir.path().to_path_buf()), DetachedBinding::new())
                .unwrap();
        editor.session_mut().create_tab();
        editor
            .session_mut()
            .set_content_programmatically("return true");

        let path = editor.export_active_tab(dir.path().join("exports")).unwrap().unwrap();
        assert!(path.ends_with("Script #1.lua"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "return true");
    }
}
