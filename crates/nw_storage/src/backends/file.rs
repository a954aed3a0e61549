use nw_core::{Error, Notice, Result, SnapshotState, SnapshotStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Snapshot kept as a plain text file, one notice per line.
///
/// Lines are joined with `\n` and the file never ends with a newline, so an
/// empty file and an empty list are the same thing.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> SnapshotState {
        let content = content.trim();
        if content.is_empty() {
            return SnapshotState::Empty;
        }
        SnapshotState::Present(
            content
                .split('\n')
                .map(|line| Notice::new(line.trim_end_matches('\r')))
                .collect(),
        )
    }

    /// Every notice must survive `parse` unchanged: one line, not blank, no
    /// surrounding whitespace.
    fn render(notices: &[Notice]) -> Result<String> {
        for notice in notices {
            let line = notice.as_str();
            if line.contains(|c| c == '\n' || c == '\r') {
                return Err(Error::InvalidNotice(format!("notice spans more than one line: {:?}", line)));
            }
            if line.trim().is_empty() {
                return Err(Error::InvalidNotice("notice is blank".to_string()));
            }
            if line.trim() != line {
                return Err(Error::InvalidNotice(format!(
                    "notice has leading or trailing whitespace: {:?}",
                    line
                )));
            }
        }
        Ok(notices
            .iter()
            .map(Notice::as_str)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Temp files are created 0600; give the replacement the mode of the file
    /// it replaces, or 0644 for a new snapshot.
    #[cfg(unix)]
    fn copy_permissions(&self, file: &fs::File) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match fs::metadata(&self.path) {
            Ok(meta) => meta.permissions(),
            Err(_) => fs::Permissions::from_mode(0o644),
        };
        file.set_permissions(permissions)
    }

    #[cfg(not(unix))]
    fn copy_permissions(&self, _file: &fs::File) -> std::io::Result<()> {
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::SnapshotWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn probe(&self) -> Result<SnapshotState> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let state = Self::parse(&content);
                debug!("read snapshot {}: {:?}", self.path.display(), state);
                Ok(state)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no snapshot at {}", self.path.display());
                Ok(SnapshotState::Absent)
            }
            Err(source) => Err(Error::SnapshotUnreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn store(&self, notices: &[Notice]) -> Result<()> {
        let content = Self::render(notices)?;

        // A bare file name has an empty parent; write next to it in the cwd.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| self.copy_permissions(tmp.as_file()))
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        debug!("wrote {} notices to {}", notices.len(), self.path.display());
        Ok(())
    }
}
