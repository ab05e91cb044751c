//! Short-lived resources scoped to one session: a temp directory holding the
//! init script, and a free TCP port.

use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const TEMP_DIR_PREFIX: &str = "ob-ghci";
pub const INIT_SCRIPT_FILE: &str = ".ghci";

/// Run `action` inside a fresh, uniquely named temp directory.
///
/// The directory is removed when `action` returns, fails or panics.
pub fn with_temp_dir<T, F>(prefix: &str, action: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
    tracing::debug!("Created session directory {}", dir.path().display());

    let value = action(dir.path())?;
    dir.close()?;
    Ok(value)
}

/// Write `text` to `dir/.ghci` and return the file's path.
pub fn write_init_script(dir: &Path, text: &str) -> Result<PathBuf> {
    let path = dir.join(INIT_SCRIPT_FILE);
    fs::write(&path, text)?;
    Ok(path)
}

/// Run `action` with the path of a freshly written init script that is
/// removed together with its directory afterwards.
pub fn with_init_script<T, F>(text: &str, action: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    with_temp_dir(TEMP_DIR_PREFIX, |dir| {
        let script_path = write_init_script(dir, text)?;
        action(&script_path)
    })
}

/// Ask the OS for a currently unused port on the loopback interface.
///
/// The socket is closed before returning, so another process may take the
/// port before the caller binds it.
pub fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}
