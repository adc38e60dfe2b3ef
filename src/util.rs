use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Create `path`, failing if anything already exists there.
pub fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Remove a file. Succeeds if the file doesn't exist.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            Err(e).with_context(|| format!("remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

/// Move a finished temp file onto `dest`, replacing it.
pub fn promote_file(tmp: &Path, dest: &Path) -> Result<()> {
    fs::rename(tmp, dest).with_context(|| format!("rename {} -> {}", tmp.display(), dest.display()))
}

/// Create `dir` if needed and prove a file can be written inside it.
/// The check file is removed whether or not the write succeeded.
pub fn ensure_writable_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let check = dir.join(".ytetl_write_check");
    let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(&check)?;
    let written = file.write_all(b"ok").and_then(|()| file.sync_all());
    drop(file);
    let removed = fs::remove_file(&check);
    written.and(removed)
}
