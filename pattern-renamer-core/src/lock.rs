use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const LOCK_FILE_NAME: &str = "pattern-renamer.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300; // 5 minutes

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// The process recorded in a lock file, stored as `pid:timestamp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Holder {
    pid: u32,
    since: u64,
}

impl Holder {
    fn current() -> Self {
        Self {
            pid: process::id(),
            since: now_secs(),
        }
    }

    fn parse(content: &str) -> Option<Self> {
        let (pid, since) = content.trim().split_once(':')?;
        Some(Self {
            pid: pid.parse().ok()?,
            since: since.parse().ok()?,
        })
    }

    /// `Ok(None)` when there is no lock file
    fn read(path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn is_stale(self) -> bool {
        now_secs().saturating_sub(self.since) > STALE_LOCK_TIMEOUT_SECS
    }

    fn content(self) -> String {
        format!("{}:{}", self.pid, self.since)
    }
}

/// Serializes apply and undo across processes sharing a state directory.
/// Released when dropped.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    holder: Holder,
}

impl LockFile {
    /// Take the lock in `state_dir`, clearing one left behind by a process
    /// that is gone or has held it for more than five minutes
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(LOCK_FILE_NAME);
        fs::create_dir_all(state_dir).with_context(|| {
            format!("Failed to create state directory {}", state_dir.display())
        })?;
        clear_abandoned(&path)?;

        let holder = Holder::current();
        // create_new fails if another process won the race
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create lock file {}", path.display()))?;
        file.write_all(holder.content().as_bytes())
            .context("Failed to write lock file")?;

        tracing::debug!(path = %path.display(), pid = holder.pid, "lock acquired");
        Ok(Self { path, holder })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the lock file on disk is still the one this lock wrote
    fn is_owned(&self) -> bool {
        matches!(
            Holder::read(&self.path),
            Ok(Some(content)) if Holder::parse(&content) == Some(self.holder)
        )
    }

    /// Release the lock, reporting a failure to remove the file
    pub fn release(self) -> Result<()> {
        if self.is_owned() {
            fs::remove_file(&self.path).context("Failed to remove lock file")?;
        }
        Ok(())
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if self.is_owned() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn clear_abandoned(path: &Path) -> Result<()> {
    let Some(content) = Holder::read(path).context("Failed to read lock file")? else {
        return Ok(());
    };

    match Holder::parse(&content) {
        Some(holder) if holder.is_stale() => {
            tracing::warn!(pid = holder.pid, "removing stale lock file");
        },
        Some(holder) if is_process_running(holder.pid) => {
            bail!(
                "Another pattern-renamer process is already running (PID: {}). \
                If this is incorrect, remove the lock file at: {}",
                holder.pid,
                path.display()
            );
        },
        Some(holder) => tracing::debug!(pid = holder.pid, "removing orphaned lock file"),
        None => tracing::debug!("removing corrupt lock file"),
    }

    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            Err(e).context("Failed to remove abandoned lock file")
        },
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    // Signal 0 probes for existence without delivering anything
    #[allow(clippy::cast_possible_wrap)]
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
    }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_QUERY_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn is_process_running(_pid: u32) -> bool {
    true
}
