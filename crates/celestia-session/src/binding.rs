//! Collaborators the manager drives but does not own: the live editing
//! surface and the file download/export sink.

use celestia_tabs::{Language, Tab};

/// The embedded editing surface.
///
/// At most one tab is bound at a time. The manager calls `bind` when a tab
/// becomes active and `unbind` when no tab is left or on teardown. Content
/// change notifications flow the other way: the host forwards them to
/// [`TabSessionManager::on_editor_content_changed`](crate::TabSessionManager::on_editor_content_changed).
pub trait EditorBinding {
    /// Show `tab`, replacing whatever document was bound before
    fn bind(&mut self, tab: &Tab);

    /// Replace the bound document's text without re-binding
    fn set_current_content(&mut self, content: &str);

    /// Release the bound document
    fn unbind(&mut self);
}

/// Receives a document to be downloaded or written out.
pub trait FileExporter {
    fn export(&mut self, file_name: &str, content: &str) -> std::io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundDocument {
    tab_id: String,
    content: String,
    language: Language,
}

/// Headless binding that keeps the bound document in memory.
///
/// Used when no widget is attached (tests, scripted hosts).
#[derive(Debug, Default)]
pub struct DetachedBinding {
    bound: Option<BoundDocument>,
    binds: usize,
}

impl DetachedBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_tab_id(&self) -> Option<&str> {
        self.bound.as_ref().map(|doc| doc.tab_id.as_str())
    }

    pub fn language(&self) -> Option<Language> {
        self.bound.as_ref().map(|doc| doc.language)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// How many times a document has been bound
    pub fn bind_count(&self) -> usize {
        self.binds
    }

    /// Text currently shown; empty when nothing is bound
    pub fn current_content(&self) -> &str {
        self.bound
            .as_ref()
            .map(|doc| doc.content.as_str())
            .unwrap_or_default()
    }
}

impl EditorBinding for DetachedBinding {
    fn bind(&mut self, tab: &Tab) {
        self.binds += 1;
        self.bound = Some(BoundDocument {
            tab_id: tab.id.clone(),
            content: tab.content.clone(),
            language: tab.language,
        });
    }

    fn set_current_content(&mut self, content: &str) {
        if let Some(doc) = self.bound.as_mut() {
            doc.content = content.to_string();
        }
    }

    fn unbind(&mut self) {
        self.bound = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_binding() {
        let mut binding = DetachedBinding::new();
        assert!(!binding.is_bound());
        assert_eq!(binding.current_content(), "");

        let mut tab = Tab::new("a.py").unwrap();
        tab.set_content("print()".to_string());
        binding.bind(&tab);
        assert_eq!(binding.bound_tab_id(), Some(tab.id.as_str()));
        assert_eq!(binding.language(), Some(Language::Python));
        assert_eq!(binding.current_content(), "print()");

        binding.set_current_content("pass");
        assert_eq!(binding.current_content(), "pass");

        binding.unbind();
        assert!(!binding.is_bound());
        binding.set_current_content("ignored");
        assert_eq!(binding.current_content(), "");
        assert_eq!(binding.bind_count(), 1);
    }
}
