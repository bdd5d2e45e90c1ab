use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::FRAMESIZE;
use crate::errors::BackingStoreError;
use crate::process::pcb::Pid;

/// Per-session, on-disk staging area mapping pid to an immutable copy of
/// a script's source text. Read-only once populated; wiped on `init()`
/// and `clear()`.
///
/// Grounded on the teacher's `storage/disk/disk_manager.rs` (a struct
/// holding the thing I/O goes through) and the original's
/// `backing_store.c`. Unlike the teacher's `DiskScheduler`, this store
/// does not hand I/O off to a background thread: there is only ever one
/// process advancing at a time here, so `copy_in`/`load_page`/`remove`
/// run synchronously on the caller's stack, exactly like the original C
/// functions they port.
pub struct BackingStore {
    dir: PathBuf,
}

impl BackingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BackingStore { dir: dir.into() }
    }

    /// Creates (or recreates, wiping prior content) the store directory.
    pub fn init(&self) -> Result<(), BackingStoreError> {
        self.clear()?;
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn file_path(&self, pid: Pid) -> PathBuf {
        self.dir.join(format!("{pid}.process"))
    }

    /// Copies `path` into the store under `pid`, returning the line
    /// count. Fails if `path` is unreadable or a file already exists
    /// for `pid`.
    ///
    /// Line count: number of `\n` bytes, plus one if the file does not
    /// end with `\n`. An empty source file yields a count of `0`, which
    /// the loader rejects before a process is ever constructed.
    pub fn copy_in(&self, path: &Path, pid: Pid) -> Result<usize, BackingStoreError> {
        if !path.is_file() {
            log::error!("backing store copy_in: {} is not readable", path.display());
            return Err(BackingStoreError::SourceNotFound);
        }

        let dest = self.file_path(pid);
        if dest.exists() {
            log::error!("backing store copy_in: pid {pid} already has a file");
            return Err(BackingStoreError::DuplicatePid(pid));
        }

        let contents = fs::read(path).map_err(|e| {
            log::error!("backing store copy_in: failed to read {}: {e}", path.display());
            BackingStoreError::IoError(e)
        })?;

        let mut file = fs::File::create(&dest)?;
        file.write_all(&contents)?;

        let n_lines = count_lines(&contents);
        Ok(n_lines)
    }

    /// Copies lines `[start_line, start_line + FRAMESIZE)` into `dest`.
    /// Remaining destination slots are cleared to `None` when fewer
    /// lines remain. Lines are stored with their trailing newline, if
    /// present.
    pub fn load_page(
        &self,
        pid: Pid,
        start_line: usize,
        dest: &mut [Option<String>; FRAMESIZE],
    ) -> Result<(), BackingStoreError> {
        let path = self.file_path(pid);
        if !path.exists() {
            log::error!(
                "backing store load_page: no file for pid {pid} (expected {})",
                path.display()
            );
            return Err(BackingStoreError::ProcessFileMissing(pid));
        }

        let mut contents = String::new();
        fs::File::open(&path)?.read_to_string(&mut contents)?;

        let mut lines = split_keeping_newlines(&contents).skip(start_line);

        for slot in dest.iter_mut() {
            *slot = lines.next();
        }

        Ok(())
    }

    /// Deletes the pid's file.
    pub fn remove(&self, pid: Pid) -> Result<(), BackingStoreError> {
        let path = self.file_path(pid);
        if !path.exists() {
            log::error!("backing store remove: no file for pid {pid}");
            return Err(BackingStoreError::ProcessFileMissing(pid));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Removes all files and the directory itself.
    pub fn clear(&self) -> Result<(), BackingStoreError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

fn count_lines(contents: &[u8]) -> usize {
    if contents.is_empty() {
        return 0;
    }
    let newlines = contents.iter().filter(|&&b| b == b'\n').count();
    if contents.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Splits `text` into lines, each retaining its trailing `\n` (the last
/// line keeps none if the source didn't end in one).
fn split_keeping_newlines(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find('\n') {
            Some(idx) => {
                let (line, tail) = rest.split_at(idx + 1);
                rest = tail;
                Some(line.to_string())
            }
            None => {
                let line = rest.to_string();
                rest = "";
                Some(line)
            }
        }
    })
}
