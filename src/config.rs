use crate::macros::static_assert;

/// Package name as it appears in log target strings, used by
/// `shared::logger` to shorten `shellmem_os::foo::bar` targets to `foo::bar`.
pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Lines per frame. A page is `FRAMESIZE` consecutive script lines.
pub const FRAMESIZE: usize = 3;

/// Number of physical frames in the frame store.
pub const NFRAMES: usize = 3;

/// `FRAMESIZE * NFRAMES`. The suffix of shell memory reserved for paging.
pub const FRAMESTORESIZE: usize = FRAMESIZE * NFRAMES;

/// Slots reserved for the variable store (key/value map). Out of scope
/// here, but kept so `SHELLMEMSIZE` reflects the real host layout.
pub const VARMEMSIZE: usize = 100;

/// Total width of the shared shell memory array.
pub const SHELLMEMSIZE: usize = VARMEMSIZE + FRAMESTORESIZE;

/// Round robin preempts the current process after this many successful
/// instruction reads. Hard-coded in the original shell; kept as-is.
pub const RR_PREEMPT_FREQ: usize = 2;

/// Page loads that fail this many times in a row move the owning process
/// into the scheduler's stalled set instead of being retried forever.
pub const MAX_PAGE_LOAD_RETRIES: u32 = 3;

static_assert!(FRAMESIZE > 0);
static_assert!(NFRAMES >= 2);
static_assert!(FRAMESTORESIZE % FRAMESIZE == 0);
static_assert!(SHELLMEMSIZE == VARMEMSIZE + FRAMESTORESIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigError;

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid Frame size or Frame store size. Frame store must be a multiple of \
             Frame size and must be large enough to contain at least 2 frames"
        )
    }
}

impl std::error::Error for ConfigError {}

/// Validates the frame/memory layout invariants from spec. The constants
/// above already satisfy these at compile time via `static_assert!`, but a
/// host embedding this crate with its own constants should call this at
/// startup, mirroring the original shell's `main()` check.
pub fn validate() -> Result<(), ConfigError> {
    if FRAMESTORESIZE % FRAMESIZE != 0 || NFRAMES < 2 {
        return Err(ConfigError);
    }
    Ok(())
}
