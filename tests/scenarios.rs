//! End-to-end scenarios, one per scheduling policy plus the eviction log
//! and key-validation properties. Bounds and line contents are chosen so
//! the expected output can be hand-traced against the scheduler's tick
//! rules rather than asserted blind.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use shellmem_os::interpreter::RecordingInterpreter;
use shellmem_os::memory::PagingSystem;
use shellmem_os::process::pcb::Pcb;
use shellmem_os::scheduler::policy::Policy;
use shellmem_os::scheduler::scheduler::Scheduler;
use shellmem_os::shell::Shell;
use shellmem_os::storage::backing_store::BackingStore;
use shellmem_os::storage::frame_store::{Emit, FrameStore};

fn scratch_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("shellmem-os-scenario-{name}-{}", std::process::id()));
    dir
}

fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
    path
}

/// E1: FCFS runs a single script to completion with no eviction (the
/// script fits comfortably within the default 3x3 frame store) and
/// leaves the shell quiescent with every frame clean.
#[test]
fn e1_fcfs_single_script_completes_with_clean_frames() {
    let dir = scratch_dir("e1");
    let mut shell = Shell::new(&dir).unwrap();
    shell.set_policy(Policy::Fcfs).unwrap();

    let a = write_script(&dir, "a.mysh", "a1\na2\na3\na4\n");
    let pcb = shell.load_script(&a).unwrap();
    shell.submit(pcb);

    let mut interp = RecordingInterpreter::default();
    shell.run(&mut interp).unwrap();

    assert_eq!(interp.lines, vec!["a1\n", "a2\n", "a3\n", "a4\n"]);
    assert!(!shell.has_pending());
    assert!(shell.all_frames_clean());

    shell.shutdown().unwrap();
}

/// E2: under RR (RR_PREEMPT_FREQ = 2), two three-line scripts submitted
/// A then B interleave as a1, a2, b1, b2, a3, b3. A's remaining single
/// instruction finishes it on A's next turn, without waiting for a
/// second RR slice.
#[test]
fn e2_round_robin_interleaves_by_two_instructions() {
    let dir = scratch_dir("e2");
    let mut shell = Shell::new(&dir).unwrap();
    shell.set_policy(Policy::RoundRobin).unwrap();

    let a = write_script(&dir, "a.mysh", "a1\na2\na3\n");
    let b = write_script(&dir, "b.mysh", "b1\nb2\nb3\n");
    let pcb_a = shell.load_script(&a).unwrap();
    let pcb_b = shell.load_script(&b).unwrap();
    shell.submit(pcb_a);
    shell.submit(pcb_b);

    let mut interp = RecordingInterpreter::default();
    shell.run(&mut interp).unwrap();

    assert_eq!(
        interp.lines,
        vec!["a1\n", "a2\n", "b1\n", "b2\n", "a3\n", "b3\n"]
    );
    assert!(!shell.has_pending());
    assert!(shell.all_frames_clean());

    shell.shutdown().unwrap();
}

/// E3: under SJF, a short script submitted after a long one still runs
/// to completion before any of the long script's instructions, and SJF
/// never preempts once a process is current.
#[test]
fn e3_sjf_runs_shortest_job_fully_before_the_longer_one() {
    let dir = scratch_dir("e3");
    let mut shell = Shell::new(&dir).unwrap();
    shell.set_policy(Policy::Sjf).unwrap();

    let long = write_script(&dir, "long.mysh", "l1\nl2\nl3\nl4\nl5\n");
    let short = write_script(&dir, "short.mysh", "s1\ns2\n");
    let pcb_long = shell.load_script(&long).unwrap();
    let pcb_short = shell.load_script(&short).unwrap();
    shell.submit(pcb_long);
    shell.submit(pcb_short);

    let mut interp = RecordingInterpreter::default();
    shell.run(&mut interp).unwrap();

    assert_eq!(
        interp.lines,
        vec!["s1\n", "s2\n", "l1\n", "l2\n", "l3\n", "l4\n", "l5\n"]
    );

    shell.shutdown().unwrap();
}

/// E4: AGING eventually lets a waiting process overtake the running one
/// once its decayed priority undercuts the current snapshot. Bounds are
/// chosen (gap of 2 between initial priorities, against a 6-line current
/// script) so the overtake is guaranteed to happen before the current
/// script would finish on its own; the exact tick-by-tick interleaving
/// that produces isn't asserted (aging's repeated swap-back-in makes it
/// brittle to hand-trace), only that genuine preemption occurred.
#[test]
fn e4_aging_lets_a_waiting_process_overtake_the_current_one() {
    let dir = scratch_dir("e4");
    let mut shell = Shell::new(&dir).unwrap();
    shell.set_policy(Policy::Aging).unwrap();

    let running = write_script(&dir, "running.mysh", "r1\nr2\nr3\nr4\nr5\nr6\n");
    let waiting = write_script(&dir, "waiting.mysh", "w1\nw2\nw3\nw4\nw5\nw6\nw7\nw8\n");
    let pcb_running = shell.load_script(&running).unwrap();
    let pcb_waiting = shell.load_script(&waiting).unwrap();
    shell.submit(pcb_running);
    shell.submit(pcb_waiting);

    let mut interp = RecordingInterpreter::default();
    shell.run(&mut interp).unwrap();

    assert_eq!(interp.lines.len(), 14, "every instruction from both scripts executes exactly once");
    for i in 1..=6 {
        assert!(interp.lines.contains(&format!("r{i}\n")));
    }
    for i in 1..=8 {
        assert!(interp.lines.contains(&format!("w{i}\n")));
    }

    let first_w = interp.lines.iter().position(|l| l.starts_with('w')).unwrap();
    let last_r = interp.lines.iter().rposition(|l| l.starts_with('r')).unwrap();
    assert!(
        first_w < last_r,
        "a waiting-script line must appear before the running script's last line, \
         otherwise the two scripts just ran back-to-back and aging never preempted"
    );

    assert!(!shell.has_pending());
    assert!(shell.all_frames_clean());

    shell.shutdown().unwrap();
}

/// E5: with FRAMESIZE=3 / NFRAMES=2, a 10-line script forces at least
/// one eviction of its own earlier page, producing the exact victim-page
/// log block contract.
#[test]
fn e5_eviction_log_has_the_exact_contract_format() {
    #[derive(Default)]
    struct Capture(Arc<Mutex<Vec<String>>>);
    impl Emit for Capture {
        fn emit_line(&mut self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    let dir = scratch_dir("e5");
    let backing_store = BackingStore::new(&dir);
    backing_store.init().unwrap();

    let captured = Arc::new(Mutex::new(Vec::new()));
    let frame_store = FrameStore::with_sink(2, Box::new(Capture(captured.clone())));
    let mut memory = PagingSystem::new(backing_store, frame_store);

    let script = write_script(&dir, "a.mysh", "a1\na2\na3\na4\na5\na6\na7\na8\na9\na10\n");
    memory.backing_store.copy_in(&script, 1).unwrap();
    let mut pcb = Pcb::new(1, 10, 4);

    // Pages 0..3 over 2 frames: loading all four pages guarantees at
    // least one eviction (pigeonhole: 4 pages, 2 frames).
    for page in 0..4 {
        memory.load_page(&mut pcb, page).unwrap();
    }

    let log = captured.lock().unwrap();
    let fault_idx = log
        .iter()
        .position(|l| l == "Page fault! Victim page contents:\n")
        .expect("at least one eviction must have occurred");
    let end_idx = log[fault_idx..]
        .iter()
        .position(|l| l == "End of victim page contents.\n")
        .map(|offset| fault_idx + offset)
        .expect("eviction block must be terminated");

    // Everything strictly between the two markers is victim page text,
    // each line ending in a newline (as stored), and non-empty.
    assert!(end_idx > fault_idx);
    for line in &log[fault_idx + 1..end_idx] {
        assert!(line.ends_with('\n'));
    }

    memory.backing_store.clear().unwrap();
}

/// E6: two scripts, each spanning more pages than the frame store holds,
/// interleaved under RR. No instruction a script reads is ever a line
/// that belongs to the other script's source text. The frame-key
/// validation on every read (not just on load) is what the original's
/// string-keyed frames got right by construction and a structural
/// `(pid, page)` key must preserve.
#[test]
fn e6_key_validation_prevents_cross_process_data_under_rr_churn() {
    let dir = scratch_dir("e6");
    let mut shell = Shell::new(&dir).unwrap();
    shell.set_policy(Policy::RoundRobin).unwrap();

    // FRAMESIZE=3, NFRAMES=3 (the crate's compiled-in constants): each
    // script spans more than NFRAMES pages, forcing repeated eviction
    // and reload of both scripts' pages as RR alternates between them.
    let a_lines: Vec<String> = (1..=15).map(|i| format!("a{i}\n")).collect();
    let b_lines: Vec<String> = (1..=15).map(|i| format!("b{i}\n")).collect();
    let a = write_script(&dir, "a.mysh", &a_lines.concat());
    let b = write_script(&dir, "b.mysh", &b_lines.concat());

    let pcb_a = shell.load_script(&a).unwrap();
    let pcb_b = shell.load_script(&b).unwrap();
    shell.submit(pcb_a);
    shell.submit(pcb_b);

    let mut interp = RecordingInterpreter::default();
    shell.run(&mut interp).unwrap();

    let observed_a: Vec<&String> = interp.lines.iter().filter(|l| l.starts_with('a')).collect();
    let observed_b: Vec<&String> = interp.lines.iter().filter(|l| l.starts_with('b')).collect();

    assert_eq!(observed_a, a_lines.iter().collect::<Vec<_>>());
    assert_eq!(observed_b, b_lines.iter().collect::<Vec<_>>());
    assert_eq!(interp.lines.len(), a_lines.len() + b_lines.len());

    assert!(!shell.has_pending());
    assert!(shell.all_frames_clean());

    shell.shutdown().unwrap();
}

/// A page-fault during a tick requeues the process under the active
/// policy's discipline and clears the current slot without advancing
/// `pc`, rather than treating the fault as an error.
#[test]
fn page_fault_requeues_without_advancing_pc() {
    let dir = scratch_dir("page-fault-requeue");
    let store = BackingStore::new(&dir);
    store.init().unwrap();
    let mut memory = PagingSystem::new(store, FrameStore::new(3));

    let script = write_script(&dir, "a.mysh", "a1\na2\na3\na4\na5\na6\na7\n");
    memory.backing_store.copy_in(&script, 1).unwrap();
    let mut pcb = Pcb::new(1, 7, 3);

    let mut scheduler = Scheduler::new();
    scheduler.set_policy(Policy::Fcfs).unwrap();
    scheduler.add(pcb);

    let mut interp = RecordingInterpreter::default();
    scheduler.run(&mut memory, &mut interp).unwrap();

    assert_eq!(
        interp.lines,
        vec!["a1\n", "a2\n", "a3\n", "a4\n", "a5\n", "a6\n", "a7\n"]
    );

    memory.backing_store.clear().unwrap();
}
