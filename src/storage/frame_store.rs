use crate::storage::frame::{Frame, FrameId};
use crate::storage::lru::LruList;

/// Sink for the eviction victim-page log block. Its exact text is part of
/// the user-visible contract, so it is never routed through `log` (which
/// would prefix/timestamp it), only through this trait, defaulting to
/// stdout.
pub trait Emit {
    fn emit_line(&mut self, line: &str);
}

pub struct Stdout;

impl Emit for Stdout {
    fn emit_line(&mut self, line: &str) {
        print!("{line}");
    }
}

/// Fixed-size array of physical frames plus the LRU replacer over them.
///
/// Grounded on the teacher's `BufferPool` (frame vec + allocate-or-evict
/// flow), simplified: there is no separate free list, because the LRU
/// list always contains every frame index. `allocate` always takes the
/// current LRU head and evicts it if it was claimed.
pub struct FrameStore {
    frames: Vec<Frame>,
    lru: LruList,
    sink: Box<dyn Emit + Send>,
}

impl FrameStore {
    pub fn new(n_frames: usize) -> Self {
        Self::with_sink(n_frames, Box::new(Stdout))
    }

    pub fn with_sink(n_frames: usize, sink: Box<dyn Emit + Send>) -> Self {
        FrameStore {
            frames: (0..n_frames).map(|_| Frame::empty()).collect(),
            lru: LruList::new(n_frames),
            sink,
        }
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id]
    }

    /// Takes the LRU head. If it is occupied, evicts it first: prints the
    /// victim page contents block, then clears the frame.
    pub fn allocate(&mut self) -> FrameId {
        let frame_id = self.lru.front();
        self.lru.move_to_back(frame_id);

        if self.frames[frame_id].is_claimed() {
            self.evict(frame_id);
        }

        frame_id
    }

    fn evict(&mut self, frame_id: FrameId) {
        log::debug!("evicting frame {frame_id}");
        self.sink.emit_line("Page fault! Victim page contents:\n");
        let lines = self.frames[frame_id].clear();
        for line in lines.into_iter().flatten() {
            self.sink.emit_line(&line);
        }
        self.sink.emit_line("End of victim page contents.\n");
    }

    /// Claims `frame_id` for `(pid, page)` and writes `lines` into it.
    /// Called only immediately after `allocate` returned this frame id.
    pub fn claim(
        &mut self,
        frame_id: FrameId,
        key: crate::storage::frame::FrameKey,
        lines: [Option<String>; crate::config::FRAMESIZE],
    ) {
        let frame = &mut self.frames[frame_id];
        frame.key = Some(key);
        frame.lines = lines;
    }

    /// Moves `frame_id` to the tail of the LRU list (most recently used).
    /// Called on every successful instruction read.
    pub fn touch(&mut self, frame_id: FrameId) {
        self.lru.move_to_back(frame_id);
    }

    /// Checks whether `frame_id` still belongs to `(pid, page)`. Evictions
    /// leave stale page-table entries behind; this is the single source
    /// of truth a reader must consult.
    pub fn key_matches(&self, frame_id: FrameId, key: crate::storage::frame::FrameKey) -> bool {
        self.frames[frame_id].key == Some(key)
    }

    pub fn line_at(&self, frame_id: FrameId, offset: usize) -> Option<&str> {
        self.frames[frame_id].lines[offset].as_deref()
    }

    /// Clears every frame without printing victim contents. Correct only
    /// when no process holds a page-table entry into any frame, i.e.
    /// right after `n_processes` drops to zero.
    pub fn reset_all_frames(&mut self) {
        for frame in &mut self.frames {
            frame.clear();
        }
    }

    /// Testable property: every frame is clean (no key, no lines).
    pub fn all_clean(&self) -> bool {
        self.frames.iter().all(|f| !f.is_claimed())
    }
}
