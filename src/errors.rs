use std::error::Error;

use crate::process::pcb::Pid;

/// Errors raised while staging or reading scripts from the backing store.
#[derive(Debug)]
pub enum BackingStoreError {
    /// Source file does not exist or could not be opened for reading.
    SourceNotFound,
    /// A backing-store file for this pid already exists.
    DuplicatePid(Pid),
    /// The pid's backing-store file is missing when a read/remove was
    /// attempted against it.
    ProcessFileMissing(Pid),
    IoError(std::io::Error),
}

impl std::fmt::Display for BackingStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackingStoreError::SourceNotFound => write!(
                f,
                "An error occured while trying to copy script contents to backing store"
            ),
            BackingStoreError::DuplicatePid(pid) => write!(
                f,
                "An error occured while trying to copy script contents to backing store \
                 (pid {pid} already present)"
            ),
            BackingStoreError::ProcessFileMissing(pid) => write!(
                f,
                "An error occured while attempting to read data from the backing store \
                 into main memory (no file for pid {pid})"
            ),
            BackingStoreError::IoError(err) => write!(f, "backing store I/O error: {err}"),
        }
    }
}

impl Error for BackingStoreError {}

impl From<std::io::Error> for BackingStoreError {
    fn from(err: std::io::Error) -> Self {
        BackingStoreError::IoError(err)
    }
}

/// Errors raised while admitting a new script as a process.
#[derive(Debug)]
pub enum LoadError {
    /// `copy_in` failed; the backing store's reason is preserved.
    BackingStore(BackingStoreError),
    /// The script contains zero lines. A PCB must have `bound >= 1`.
    EmptyScript,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::BackingStore(err) => write!(f, "{err}"),
            LoadError::EmptyScript => write!(f, "script contains no instructions"),
        }
    }
}

impl Error for LoadError {}

impl From<BackingStoreError> for LoadError {
    fn from(err: BackingStoreError) -> Self {
        LoadError::BackingStore(err)
    }
}

/// Errors raised by the scheduler's queue and execution machinery.
#[derive(Debug)]
pub enum SchedulerError {
    /// `set_policy` was called while `n_processes > 0`.
    PolicyChangeWhileBusy,
    /// The waiting queue's head/tail bookkeeping is inconsistent. This is
    /// the Rust analogue of the original shell's `exit(3)` on a broken
    /// linked list: it should never happen, and if it does, it is fatal.
    QueueInvariantViolated,
    /// A page fault's load could not be resolved after repeated retries.
    PageLoadFailed { pid: Pid, retries: u32 },
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::PolicyChangeWhileBusy => {
                write!(f, "Error: Attempted to switch mode while processes are running.")
            }
            SchedulerError::QueueInvariantViolated => {
                write!(f, "Error: Expected a process on queue but found none!")
            }
            SchedulerError::PageLoadFailed { pid, retries } => write!(
                f,
                "process {pid} failed to load its page after {retries} attempts; stalled"
            ),
        }
    }
}

impl Error for SchedulerError {}

/// Top-level error surfaced through the `Shell` public API.
#[derive(Debug)]
pub enum ShellError {
    Config(crate::config::ConfigError),
    Load(LoadError),
    Scheduler(SchedulerError),
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Config(err) => write!(f, "{err}"),
            ShellError::Load(err) => write!(f, "{err}"),
            ShellError::Scheduler(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {}

impl From<crate::config::ConfigError> for ShellError {
    fn from(err: crate::config::ConfigError) -> Self {
        ShellError::Config(err)
    }
}

impl From<LoadError> for ShellError {
    fn from(err: LoadError) -> Self {
        ShellError::Load(err)
    }
}

impl From<SchedulerError> for ShellError {
    fn from(err: SchedulerError) -> Self {
        ShellError::Scheduler(err)
    }
}
