/// Scheduling discipline. The original shell also had a `NONE` sentinel
/// meaning "no policy chosen yet"; we model that as `Option<Policy>`
/// instead, which is the idiomatic Rust shape for "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// First-come first-served. Runs the current process to completion.
    Fcfs,
    /// Shortest job first. Priority is the initial `bound`; ties keep
    /// FIFO order among equal priorities. Never preempts.
    Sjf,
    /// Round robin. Preempts after `RR_PREEMPT_FREQ` successful
    /// instruction reads.
    RoundRobin,
    /// Aging. Preempts whenever a queued process's priority strictly
    /// undercuts the current process's snapshot priority; priorities of
    /// all queued processes decay by one (floored at 0) after each tick.
    Aging,
}

impl Policy {
    /// Whether this policy orders its waiting queue by priority (SJF,
    /// AGING) rather than plain FIFO append (FCFS, RR).
    pub fn is_priority_based(self) -> bool {
        matches!(self, Policy::Sjf | Policy::Aging)
    }
}
