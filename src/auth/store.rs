use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::AuthError;
use super::token::Credential;

/// Storage abstraction for the persisted credential.
pub trait TokenStore: Send + Sync {
    /// Fails with [`AuthError::NotFound`] when nothing usable is stored.
    fn read(&self) -> Result<Credential, AuthError>;
    fn write(&self, credential: &Credential) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed token store.
///
/// The file holds a single line (the credential) and is only accessible by
/// its owner. The containing directory is created owner-only when missing.
///
/// # Example
/// ```no_run
/// use repoinit::auth::{Credential, FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new(FileTokenStore::default_path());
/// store.write(&Credential::new("gho_abc").unwrap())?;
/// assert_eq!(store.read()?.expose(), "gho_abc");
/// # Ok::<(), repoinit::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user-config-dir>/repoinit/token`, falling back to the working
    /// directory when no home directory can be determined.
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(crate::APP_NAME))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", crate::APP_NAME)))
            .join("token")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.exists() {
            return Ok(());
        }
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);
        builder.create(parent)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Result<Credential, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %self.path.display(), error = %err, "stored credential unreadable");
                }
                return Err(AuthError::NotFound);
            }
        };
        Credential::new(raw).ok_or(AuthError::NotFound)
    }

    fn write(&self, credential: &Credential) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        atomic_write(&self.path, format!("{}\n", credential.expose()).as_bytes())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    let file_name = path.file_name().ok_or_else(|| {
        AuthError::Io(format!("Token path {} has no file name", path.display()))
    })?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("repoinit").join("token"));
        (dir, store)
    }

    fn credential(value: &str) -> Credential {
        Credential::new(value).unwrap()
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.read(), Err(AuthError::NotFound)));
    }

    #[test]
    fn read_blank_file_is_not_found() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), " \n\n").unwrap();
        assert!(matches!(store.read(), Err(AuthError::NotFound)));
    }

    #[test]
    fn read_trims_hand_edited_file() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "  gho_edited \r\n").unwrap();
        assert_eq!(store.read().unwrap().expose(), "gho_edited");
    }

    #[test]
    fn write_stores_single_newline_terminated_line() {
        let (_dir, store) = temp_store();
        store.write(&credential(" gho_abc \n")).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "gho_abc\n");
        assert_eq!(store.read().unwrap().expose(), "gho_abc");
    }

    #[test]
    fn write_overwrites_previous_value() {
        let (_dir, store) = temp_store();
        store.write(&credential("first-token-that-is-longer")).unwrap();
        store.write(&credential("second")).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "second\n");
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let (_dir, store) = temp_store();
        store.write(&credential("gho_abc")).unwrap();
        let entries: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("token")]);
    }

    #[cfg(unix)]
    #[test]
    fn write_uses_owner_only_permissions() {
        let (_dir, store) = temp_store();
        store.write(&credential("gho_abc")).unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode();
        let dir_mode = fs::metadata(store.path().parent().unwrap())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(file_mode & 0o777, 0o600);
        assert_eq!(dir_mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn write_tightens_permissions_of_existing_file() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "old\n").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.write(&credential("new")).unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600);
    }

    #[test]
    fn clear_removes_token_and_tolerates_missing_file() {
        let (_dir, store) = temp_store();
        store.write(&credential("gho_abc")).unwrap();
        store.clear().unwrap();
        assert!(matches!(store.read(), Err(AuthError::NotFound)));
        store.clear().unwrap();
    }
}
