use crate::config::FRAMESIZE;
use crate::errors::BackingStoreError;
use crate::process::pcb::{PageIndex, Pcb};
use crate::storage::backing_store::BackingStore;
use crate::storage::frame_store::FrameStore;

/// Outcome of an instruction-read attempt.
pub enum ReadOutcome {
    Instruction(String),
    /// The page was not resident, or its frame had been stolen by an
    /// eviction since the page table entry was written. A page-load was
    /// triggered as a side effect; the caller must requeue the process.
    PageFault,
}

/// Couples the Backing Store and the Frame Store into the page-fault and
/// instruction-read glue. Neither subsystem alone knows how to turn "my
/// page table says not-resident" into "ask disk, then ask memory", this
/// is that seam.
pub struct PagingSystem {
    pub backing_store: BackingStore,
    pub frame_store: FrameStore,
}

impl PagingSystem {
    pub fn new(backing_store: BackingStore, frame_store: FrameStore) -> Self {
        PagingSystem {
            backing_store,
            frame_store,
        }
    }

    /// Allocates a frame (possibly evicting), asks the backing store to
    /// fill it, stamps the frame's key, and updates the page table. Never
    /// checks whether the evicted frame belonged to some other PCB, the
    /// key-validation discipline in `read_instruction` makes stale
    /// page-table entries harmless.
    pub fn load_page(
        &mut self,
        pcb: &mut Pcb,
        page: PageIndex,
    ) -> Result<(), BackingStoreError> {
        let frame_id = self.frame_store.allocate();

        let mut lines: [Option<String>; FRAMESIZE] = Default::default();
        self.backing_store
            .load_page(pcb.pid, page * FRAMESIZE, &mut lines)?;

        self.frame_store.claim(frame_id, (pcb.pid, page), lines);
        pcb.page_table[page] = Some(frame_id);

        Ok(())
    }

    /// Reads the instruction at `pcb.pc`, faulting (and triggering a page
    /// load) if the page is not resident or its frame has since been
    /// stolen.
    pub fn read_instruction(&mut self, pcb: &mut Pcb) -> Result<ReadOutcome, BackingStoreError> {
        let (page, offset) = pcb.page_of(pcb.pc, FRAMESIZE);

        let frame_id = match pcb.page_table[page] {
            None => {
                self.load_page(pcb, page)?;
                return Ok(ReadOutcome::PageFault);
            }
            Some(frame_id) => frame_id,
        };

        if !self.frame_store.key_matches(frame_id, (pcb.pid, page)) {
            self.load_page(pcb, page)?;
            return Ok(ReadOutcome::PageFault);
        }

        self.frame_store.touch(frame_id);
        let line = self.frame_store.line_at(frame_id, offset).unwrap_or("");
        Ok(ReadOutcome::Instruction(line.to_string()))
    }
}
