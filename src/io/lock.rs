use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lock file name inside `.taskflow/`
pub const LOCK_FILE: &str = ".lock";

const WAIT: Duration = Duration::from_secs(5);
const POLL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("todos are locked by another tf process{}", holder_suffix(.holder))]
    Busy { path: PathBuf, holder: Option<u32> },
}

fn holder_suffix(holder: &Option<u32>) -> String {
    holder.map(|pid| format!(" (pid {})", pid)).unwrap_or_default()
}

/// Exclusive hold on a board's todo file for one read-modify-write cycle.
///
/// The lock file records the holder's pid so a contending process can say
/// who it is waiting on. Dropping the guard closes the descriptor, which
/// releases the flock; the file itself stays for the next writer.
#[derive(Debug)]
pub struct WriteLock {
    _file: File,
    path: PathBuf,
}

impl WriteLock {
    /// Lock `board_dir/.lock`, waiting up to five seconds for a current holder
    pub fn for_board(board_dir: &Path) -> Result<Self, LockError> {
        Self::wait(&board_dir.join(LOCK_FILE), WAIT)
    }

    /// Lock `path`, polling until `patience` runs out
    pub fn wait(path: &Path, patience: Duration) -> Result<Self, LockError> {
        let open_err = |source| LockError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(open_err)?;

        let deadline = Instant::now() + patience;
        while !flock_exclusive(&file) {
            if Instant::now() >= deadline {
                let holder = read_pid(&mut file);
                tracing::warn!(path = %path.display(), ?holder, "gave up waiting for todo lock");
                return Err(LockError::Busy {
                    path: path.to_path_buf(),
                    holder,
                });
            }
            std::thread::sleep(POLL);
        }

        // Record ourselves; a failure here only loses the diagnostic
        if let Err(e) = write_pid(&mut file) {
            tracing::debug!(error = %e, "could not record lock holder");
        }
        Ok(WriteLock {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_pid(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}

fn read_pid(file: &mut File) -> Option<u32> {
    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut text).ok()?;
    text.trim().parse().ok()
}

/// Non-blocking exclusive flock; false while someone else holds it
#[cfg(unix)]
fn flock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> bool {
    true
}
