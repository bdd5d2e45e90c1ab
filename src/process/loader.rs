use std::path::Path;

use crate::config::FRAMESIZE;
use crate::errors::LoadError;
use crate::memory::PagingSystem;
use crate::process::pcb::{Pcb, Pid};

/// Admits scripts as processes. Grounded on the original's
/// `prepare_process`: assign the next pid, stage the script in the
/// backing store, reject empty scripts, then prefetch the first one or
/// two pages so the scheduler never has to fault before a process has
/// even been queued.
pub struct Loader {
    next_pid: Pid,
}

impl Loader {
    pub fn new() -> Self {
        Loader { next_pid: 1 }
    }

    /// Copies `path` into the backing store under a freshly assigned
    /// pid, builds its PCB, and prefetches page 0 (and page 1, if the
    /// script is longer than one page) into the frame store.
    pub fn load_script(&mut self, path: &Path, memory: &mut PagingSystem) -> Result<Pcb, LoadError> {
        let pid = self.next_pid;
        self.next_pid += 1;

        let bound = memory.backing_store.copy_in(path, pid)?;
        if bound == 0 {
            let _ = memory.backing_store.remove(pid);
            return Err(LoadError::EmptyScript);
        }

        let n_pages = (bound + FRAMESIZE - 1) / FRAMESIZE;
        let mut pcb = Pcb::new(pid, bound, n_pages);

        memory.load_page(&mut pcb, 0)?;
        if bound > FRAMESIZE {
            memory.load_page(&mut pcb, 1)?;
        }

        Ok(pcb)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
