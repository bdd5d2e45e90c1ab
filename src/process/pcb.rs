use crate::storage::frame::FrameId;

/// Process identifier. Monotonic within a `Shell` session, never reused
/// while that session is alive (mirrors the original's `p_t cur_pid`
/// global counter).
pub type Pid = u64;

/// Index of a page within a process's logical address space.
pub type PageIndex = usize;

/// Process control block. Mutated only by the scheduler (`pc` advance)
/// and by page-load operations (`page_table` updates).
pub struct Pcb {
    pub pid: Pid,
    /// Total instruction lines in the script. Always `>= 1`.
    pub bound: usize,
    /// Index of the next instruction to execute. `0 <= pc <= bound`.
    pub pc: usize,
    /// One entry per page (`ceil(bound / FRAMESIZE)`), `None` when the
    /// page is not resident.
    pub page_table: Vec<Option<FrameId>>,
}

impl Pcb {
    pub fn new(pid: Pid, bound: usize, n_pages: usize) -> Self {
        debug_assert!(bound >= 1, "a PCB must have at least one instruction");
        Pcb {
            pid,
            bound,
            pc: 0,
            page_table: vec![None; n_pages],
        }
    }

    /// Whether this process has executed its final instruction.
    pub fn is_finished(&self) -> bool {
        self.pc == self.bound
    }

    pub fn page_of(&self, pc: usize, framesize: usize) -> (PageIndex, usize) {
        (pc / framesize, pc % framesize)
    }
}
