//! Shared memory: fastest base latency, optional lock overhead
//!
//! Without a mutex the write is reported as unsynchronized; the latency is
//! the bare base draw.

use super::TransferOutcome;
use crate::config::DelayRange;
use crate::models::ChannelConfig;
use crate::rng::RngManager;

/// Extra latency drawn for a mutex-guarded write (ms, inclusive)
pub const MUTEX_OVERHEAD_RANGE: DelayRange = DelayRange(10, 30);

pub(super) fn simulate(
    config: &ChannelConfig,
    range: DelayRange,
    rng: &mut RngManager,
) -> TransferOutcome {
    let base_delay = rng.range_inclusive(range.min_ms(), range.max_ms());

    if config.use_mutex() {
        let overhead =
            rng.range_inclusive(MUTEX_OVERHEAD_RANGE.min_ms(), MUTEX_OVERHEAD_RANGE.max_ms());
        TransferOutcome::delivered(
            base_delay.saturating_add(overhead),
            "Shared memory write with mutex",
        )
    } else {
        TransferOutcome::delivered(
            base_delay,
            "Shared memory write (no mutex - potential race condition)",
        )
    }
}
