use crate::config::{MAX_PAGE_LOAD_RETRIES, RR_PREEMPT_FREQ};
use crate::errors::SchedulerError;
use crate::interpreter::CommandInterpreter;
use crate::memory::{PagingSystem, ReadOutcome};
use crate::process::pcb::{Pcb, Pid};
use crate::scheduler::policy::Policy;
use crate::scheduler::queue::WaitQueue;

/// Drives execution. Grounded on the original's `struct scheduler_state`
/// (`scheduler.c`): waiting queue, a single "current" slot, the active
/// policy, and `np`/`n_processes`. Reimplemented with the queue and
/// current slot as owned fields on an explicit struct instead of a file
/// static.
pub struct Scheduler {
    policy: Option<Policy>,
    queue: WaitQueue,
    current: Option<(Pcb, i64)>,
    /// Resident + queued + current. Reaches zero exactly when the shell
    /// is quiescent.
    n_processes: usize,
    /// Processes whose page loads have failed `MAX_PAGE_LOAD_RETRIES`
    /// times in a row. Excluded from `n_processes`/`has_pending`
    /// bookkeeping once stalled, since they can make no further progress
    /// without intervention.
    stalled: Vec<(Pcb, SchedulerError)>,
    retries: std::collections::HashMap<Pid, u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            policy: None,
            queue: WaitQueue::new(),
            current: None,
            n_processes: 0,
            stalled: Vec::new(),
            retries: std::collections::HashMap::new(),
        }
    }

    pub fn policy(&self) -> Option<Policy> {
        self.policy
    }

    /// Policy change is permitted only while `n_processes == 0`. Setting
    /// the same policy again is always a no-op success, mirroring the
    /// original's early-return when `new_mode == mode`.
    pub fn set_policy(&mut self, policy: Policy) -> Result<(), SchedulerError> {
        if self.policy == Some(policy) {
            return Ok(());
        }
        if self.n_processes != 0 {
            return Err(SchedulerError::PolicyChangeWhileBusy);
        }
        self.policy = Some(policy);
        Ok(())
    }

    /// Submits `pcb` to the waiting queue under the active policy's
    /// enqueue discipline.
    pub fn add(&mut self, pcb: Pcb) {
        let priority = pcb.bound as i64;
        match self.policy {
            Some(p) if p.is_priority_based() => self.queue.push_sorted(pcb, priority),
            _ => self.queue.push_back(pcb, -1),
        }
        self.n_processes += 1;
    }

    pub fn has_pending(&self) -> bool {
        self.n_processes > 0
    }

    pub fn stalled_count(&self) -> usize {
        self.stalled.len()
    }

    fn requeue(&mut self, pcb: Pcb, priority: i64) {
        match self.policy {
            Some(p) if p.is_priority_based() => self.queue.push_sorted(pcb, priority),
            _ => self.queue.push_back(pcb, priority),
        }
    }

    /// Runs until quiescent (`n_processes == 0`) or every remaining
    /// process is stalled. Matches the original's `run_scheduler` loop
    /// structure: pop a current process if none is set, then dispatch
    /// to the active policy's tick function.
    pub fn run(
        &mut self,
        memory: &mut PagingSystem,
        interpreter: &mut dyn CommandInterpreter,
    ) -> Result<(), SchedulerError> {
        let Some(policy) = self.policy else {
            return Err(SchedulerError::QueueInvariantViolated);
        };

        while self.n_processes > 0 {
            if self.current.is_none() {
                let entry = self
                    .queue
                    .pop_front()
                    .ok_or(SchedulerError::QueueInvariantViolated)?;
                self.current = Some((entry.pcb, entry.priority));
            }

            match policy {
                Policy::Fcfs | Policy::Sjf => self.tick_basic(memory, interpreter),
                Policy::RoundRobin => self.tick_round_robin(memory, interpreter),
                Policy::Aging => self.tick_aging(memory, interpreter),
            }
        }

        Ok(())
    }

    fn tick_basic(&mut self, memory: &mut PagingSystem, interpreter: &mut dyn CommandInterpreter) {
        self.exec_current(memory, interpreter);
    }

    fn tick_round_robin(
        &mut self,
        memory: &mut PagingSystem,
        interpreter: &mut dyn CommandInterpreter,
    ) {
        for _ in 0..RR_PREEMPT_FREQ {
            if self.current.is_none() {
                break;
            }
            self.exec_current(memory, interpreter);
        }

        if let Some((pcb, priority)) = self.current.take() {
            self.requeue(pcb, priority);
        }
    }

    fn tick_aging(&mut self, memory: &mut PagingSystem, interpreter: &mut dyn CommandInterpreter) {
        self.exec_current(memory, interpreter);
        self.queue.decrement_all_priorities();

        if let Some((_, cur_priority)) = &self.current {
            if self.n_processes > 1 {
                if let Some(head_priority) = self.queue.front_priority() {
                    if head_priority < *cur_priority {
                        let (pcb, priority) = self.current.take().unwrap();
                        self.queue.push_sorted(pcb, priority);
                    }
                }
            }
        }
    }

    /// Executes one instruction for the current process: read, handle a
    /// page fault by requeueing, otherwise advance `pc`, check
    /// termination, and finally feed the line to the interpreter.
    fn exec_current(&mut self, memory: &mut PagingSystem, interpreter: &mut dyn CommandInterpreter) {
        let Some((mut pcb, priority)) = self.current.take() else {
            return;
        };

        let outcome = memory.read_instruction(&mut pcb);

        let line = match outcome {
            Err(err) => {
                let pid = pcb.pid;
                let attempts = self.retries.entry(pid).or_insert(0);
                *attempts += 1;
                if *attempts >= MAX_PAGE_LOAD_RETRIES {
                    log::error!("process {pid} stalled: {err}");
                    self.n_processes -= 1;
                    self.stalled
                        .push((pcb, SchedulerError::PageLoadFailed { pid, retries: *attempts }));
                } else {
                    log::warn!("process {pid} page load failed (attempt {attempts}): {err}");
                    self.requeue(pcb, priority);
                }
                return;
            }
            Ok(ReadOutcome::PageFault) => {
                self.requeue(pcb, priority);
                return;
            }
            Ok(ReadOutcome::Instruction(line)) => line,
        };

        self.retries.remove(&pcb.pid);
        pcb.pc += 1;

        if pcb.is_finished() {
            self.n_processes -= 1;
            let finished_pid = pcb.pid;
            interpreter.on_process_finished(finished_pid, &mut memory.backing_store);
            if self.n_processes == 0 {
                memory.frame_store.reset_all_frames();
            }
        } else {
            self.current = Some((pcb, priority));
        }

        interpreter.execute(&line);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
