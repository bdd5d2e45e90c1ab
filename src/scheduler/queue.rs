use std::collections::VecDeque;

use crate::process::pcb::Pcb;

/// One waiting entry. Priority is only meaningful under SJF/AGING; FCFS
/// and RR leave it at a placeholder (the original used `-1` for the
/// same purpose in `add_back`).
pub struct QueueEntry {
    pub pcb: Pcb,
    pub priority: i64,
}

/// The scheduler's waiting queue, grounded on the original's singly
/// linked `struct ll` + global `head`/`tail` pointers (`scheduler.c`),
/// reimplemented as an owned `VecDeque` behind explicit methods rather
/// than hand-rolled pointer bookkeeping.
#[derive(Default)]
pub struct WaitQueue {
    entries: VecDeque<QueueEntry>,
}

impl WaitQueue {
    pub fn new() -> Self {
        WaitQueue {
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// FCFS/RR enqueue: append to the tail. O(1).
    pub fn push_back(&mut self, pcb: Pcb, priority: i64) {
        self.entries.push_back(QueueEntry { pcb, priority });
    }

    /// SJF/AGING enqueue: insert in ascending-priority order. Ties keep
    /// FIFO order among equal priorities (inserted after the last entry
    /// with priority `<=` the new one). O(n).
    pub fn push_sorted(&mut self, pcb: Pcb, priority: i64) {
        let insert_at = self
            .entries
            .iter()
            .position(|e| e.priority > priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(insert_at, QueueEntry { pcb, priority });
    }

    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn front_priority(&self) -> Option<i64> {
        self.entries.front().map(|e| e.priority)
    }

    /// AGING: decrement every queued process's priority, floored at 0.
    pub fn decrement_all_priorities(&mut self) {
        for entry in &mut self.entries {
            if entry.priority > 0 {
                entry.priority -= 1;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pcb(pid: u64) -> Pcb {
        Pcb::new(pid, 1, 1)
    }

    #[test]
    fn push_back_preserves_fifo_order() {
        let mut q = WaitQueue::new();
        q.push_back(pcb(1), -1);
        q.push_back(pcb(2), -1);
        q.push_back(pcb(3), -1);

        assert_eq!(q.pop_front().unwrap().pcb.pid, 1);
        assert_eq!(q.pop_front().unwrap().pcb.pid, 2);
        assert_eq!(q.pop_front().unwrap().pcb.pid, 3);
    }

    #[test]
    fn push_sorted_orders_ascending_with_fifo_ties() {
        let mut q = WaitQueue::new();
        q.push_sorted(pcb(1), 5);
        q.push_sorted(pcb(2), 2);
        q.push_sorted(pcb(3), 2);
        q.push_sorted(pcb(4), 10);

        let order: Vec<_> = std::iter::from_fn(|| q.pop_front().map(|e| e.pcb.pid)).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
    }

    #[test]
    fn decrement_all_priorities_floors_at_zero() {
        let mut q = WaitQueue::new();
        q.push_back(pcb(1), 1);
        q.push_back(pcb(2), 0);

        q.decrement_all_priorities();
        assert_eq!(q.pop_front().unwrap().priority, 0);
        assert_eq!(q.pop_front().unwrap().priority, 0);
    }
}
