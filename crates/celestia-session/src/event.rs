//! Session transitions reported back to the presentation layer

use celestia_tabs::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TabCreated {
        tab_id: String,
    },
    TabClosed {
        tab_id: String,
        /// Active tab after the close, if the closed tab was the active one
        activated: Option<String>,
    },
    TabSwitched {
        from: Option<String>,
        to: String,
    },
    TabMoved {
        tab_id: String,
        from: usize,
        to: usize,
    },
    TabRenamed {
        tab_id: String,
        name: String,
        language: Language,
    },
    ContentChanged {
        tab_id: String,
    },
    TabSaved {
        tab_id: String,
        snapshot_id: String,
    },
    TabExported {
        tab_id: String,
        file_name: String,
    },
    SnapshotLoaded {
        snapshot_id: String,
        tab_id: String,
    },
    SnapshotDeleted {
        snapshot_id: String,
    },
}
