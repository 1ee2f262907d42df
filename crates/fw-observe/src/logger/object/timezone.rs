use std::sync::{OnceLock, RwLock};

use time::UtcOffset;

/// Cached local UTC offset used for log timestamps.
static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);

/// Set once local offset detection has been attempted.
static INIT_DONE: OnceLock<()> = OnceLock::new();

/// Detects the local timezone offset early in the program.
///
/// **CRITICAL**: Call in `main()` **before spawning any threads** (before the tokio runtime).
/// Offset detection fails in multi-thread contexts on most Unix platforms.
///
/// Falls back to UTC silently if detection fails.
///
/// # Example
/// ```no_run
/// fn main() {
///     fw_observe::init_local_offset();
///
///     tokio::runtime::Runtime::new()
///         .unwrap()
///         .block_on(async_main());
/// }
///
/// async fn async_main() {}
/// ```
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Ok(mut guard) = LOCAL_OFFSET.write() {
        *guard = offset;
    }
    let _ = INIT_DONE.set(());
}

/// Returns the local offset, detecting it lazily on first use.
pub(crate) fn get_or_detect_local_offset() -> UtcOffset {
    INIT_DONE.get_or_init(|| match UtcOffset::current_local_offset() {
        Ok(detected) => {
            if let Ok(mut guard) = LOCAL_OFFSET.write() {
                *guard = detected;
            }
        }
        Err(_) => {
            eprintln!(
                "WARNING: fw-observe local timezone detection failed. \
                 Call init_local_offset() in main() before tokio runtime. \
                 Falling back to UTC."
            );
        }
    });

    LOCAL_OFFSET
        .read()
        .map(|guard| *guard)
        .unwrap_or(UtcOffset::UTC)
}
