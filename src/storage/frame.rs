use crate::config::FRAMESIZE;
use crate::process::pcb::{PageIndex, Pid};

/// Frame Store index. Not associated with any process' page numbering.
pub type FrameId = usize;

/// Identity `(pid, page)` a frame currently holds. Used at read time to
/// detect a page-table entry that outlived an eviction.
pub type FrameKey = (Pid, PageIndex);

/// Physical storage for up to `FRAMESIZE` script lines.
///
/// A frame with `key = None` is clean. A frame with `key = Some(_)` is
/// claimed by exactly one process' page table entry, though that entry
/// may be stale if the frame was since evicted and re-claimed (the key
/// is the source of truth, not the page table).
pub struct Frame {
    pub key: Option<FrameKey>,
    pub lines: [Option<String>; FRAMESIZE],
}

impl Frame {
    pub fn empty() -> Self {
        Frame {
            key: None,
            lines: std::array::from_fn(|_| None),
        }
    }

    /// Clears the frame back to the empty state, returning the lines it
    /// held in slot order (used by eviction to log victim contents).
    pub fn clear(&mut self) -> [Option<String>; FRAMESIZE] {
        self.key = None;
        std::mem::replace(&mut self.lines, std::array::from_fn(|_| None))
    }

    pub fn is_claimed(&self) -> bool {
        self.key.is_some()
    }
}
