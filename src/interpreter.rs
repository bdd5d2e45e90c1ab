use crate::process::pcb::Pid;
use crate::storage::backing_store::BackingStore;

/// Out-of-scope collaborator seam: command semantics themselves are not
/// this crate's concern. The scheduler drives this trait once per
/// successfully read instruction, and again once per process
/// termination, so an embedder can plug in a real command language
/// without the scheduler knowing anything about it.
pub trait CommandInterpreter {
    /// Called once per instruction line read from a process's script, in
    /// program order, after `pc` has already been advanced and
    /// termination has already been checked.
    fn execute(&mut self, line: &str);

    /// Called once, right after a process's last instruction has been
    /// read, before its frames are reclaimed. The default does nothing
    /// but remove the process's backing-store file, matching the
    /// original's `terminate_process`.
    fn on_process_finished(&mut self, pid: Pid, backing_store: &mut BackingStore) {
        if let Err(err) = backing_store.remove(pid) {
            log::warn!("on_process_finished: {err}");
        }
    }
}

/// Discards every line. Used where a caller only wants the scheduler's
/// side effects (eviction log, backing-store cleanup) and not command
/// execution.
#[derive(Default)]
pub struct NullInterpreter;

impl CommandInterpreter for NullInterpreter {
    fn execute(&mut self, _line: &str) {}
}

/// Records every line handed to it, in order. Used by tests to assert on
/// the exact interleaving the scheduler produces under each policy.
#[derive(Default)]
pub struct RecordingInterpreter {
    pub lines: Vec<String>,
    pub finished: Vec<Pid>,
}

impl CommandInterpreter for RecordingInterpreter {
    fn execute(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn on_process_finished(&mut self, pid: Pid, backing_store: &mut BackingStore) {
        self.finished.push(pid);
        let _ = backing_store.remove(pid);
    }
}
