use std::cell::Cell;
use std::path::Path;

use crate::config::{self, FRAMESTORESIZE};
use crate::errors::ShellError;
use crate::interpreter::CommandInterpreter;
use crate::memory::PagingSystem;
use crate::process::loader::Loader;
use crate::process::pcb::Pcb;
use crate::scheduler::policy::Policy;
use crate::scheduler::scheduler::Scheduler;
use crate::storage::backing_store::BackingStore;
use crate::storage::frame_store::FrameStore;

/// Top-level handle bundling the paging system, the scheduler, and the
/// loader. One `Shell` corresponds to one session and one
/// `backing_store/` directory.
///
/// Grounded on the teacher's `Database` facade (`dbms/database.rs`),
/// which similarly owns a `BufferPool` + `DiskManager` pair and exposes
/// a small capability surface rather than the subsystems themselves.
pub struct Shell {
    memory: PagingSystem,
    scheduler: Scheduler,
    loader: Loader,
    /// Guards against a nested `run()` invocation from inside the
    /// command interpreter. A script line that is itself `run`/`exec`
    /// must enqueue, never recurse. `true` while a `run()` call is on
    /// the stack.
    running: Cell<bool>,
}

impl Shell {
    /// Validates the compile-time frame constants, a configuration error
    /// is fatal at startup, and initializes a fresh `backing_store/`
    /// directory at `backing_store_dir`.
    pub fn new(backing_store_dir: impl Into<std::path::PathBuf>) -> Result<Self, ShellError> {
        config::validate()?;

        let backing_store = BackingStore::new(backing_store_dir);
        backing_store.init().map_err(crate::errors::LoadError::from)?;

        Ok(Shell {
            memory: PagingSystem::new(backing_store, FrameStore::new(config::NFRAMES)),
            scheduler: Scheduler::new(),
            loader: Loader::new(),
            running: Cell::new(false),
        })
    }

    /// Loads a script from `path`, yielding its PCB. Callers are
    /// expected to pass the PCB to [`Shell::submit`].
    pub fn load_script(&mut self, path: &Path) -> Result<Pcb, ShellError> {
        self.loader
            .load_script(path, &mut self.memory)
            .map_err(ShellError::from)
    }

    /// Submits a PCB to the scheduler under the currently selected
    /// policy.
    pub fn submit(&mut self, pcb: Pcb) {
        self.scheduler.add(pcb);
    }

    /// Sets the active scheduling policy. Fails if any process is
    /// resident, queued, or current.
    pub fn set_policy(&mut self, policy: Policy) -> Result<(), ShellError> {
        self.scheduler.set_policy(policy).map_err(ShellError::from)
    }

    pub fn policy(&self) -> Option<Policy> {
        self.scheduler.policy()
    }

    /// Whether any process is resident, queued, or current.
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn stalled_count(&self) -> usize {
        self.scheduler.stalled_count()
    }

    /// Runs the scheduler until quiescent. Panics if called re-entrantly
    /// from within the interpreter it drives, the outer run loop is the
    /// only legitimate caller.
    pub fn run(&mut self, interpreter: &mut dyn CommandInterpreter) -> Result<(), ShellError> {
        if self.running.replace(true) {
            panic!("Shell::run called re-entrantly; a script line must enqueue, not recurse");
        }
        let result = self.scheduler.run(&mut self.memory, interpreter);
        self.running.set(false);
        result.map_err(ShellError::from)
    }

    /// Clears the backing store. Called on the `quit` command.
    pub fn shutdown(self) -> Result<(), ShellError> {
        self.memory
            .backing_store
            .clear()
            .map_err(crate::errors::LoadError::from)
            .map_err(ShellError::from)
    }

    pub fn frame_store_size(&self) -> usize {
        FRAMESTORESIZE
    }

    /// Whenever `n_processes == 0`, every frame slot is empty and every
    /// frame key is null.
    pub fn all_frames_clean(&self) -> bool {
        self.memory.frame_store.all_clean()
    }
}
