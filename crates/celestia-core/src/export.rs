//! Export tabs as files in a directory

use std::io;
use std::path::{Path, PathBuf};

use celestia_session::FileExporter;

/// Writes exported documents into a fixed directory, one file per export.
#[derive(Debug)]
pub struct DirectoryExporter {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl DirectoryExporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            last_path: None,
        }
    }

    /// Path written by the most recent successful export
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }
}

impl FileExporter for DirectoryExporter {
    fn export(&mut self, file_name: &str, content: &str) -> io::Result<()> {
        // Tab names are free text; keep only the final component
        let file_name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file name: {:?}", file_name),
                )
            })?
            .to_owned();

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, content)?;

        self.last_path = Some(path);
        Ok(())
    }
}
