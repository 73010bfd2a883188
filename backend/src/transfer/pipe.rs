//! Pipe: unidirectional byte stream with a fixed buffer
//!
//! A write larger than the buffer is rejected before any latency is drawn.

use super::{TransferError, TransferOutcome};
use crate::config::DelayRange;
use crate::models::ChannelConfig;
use crate::rng::RngManager;

pub(super) fn simulate(
    message: &str,
    config: &ChannelConfig,
    range: DelayRange,
    rng: &mut RngManager,
) -> Result<TransferOutcome, TransferError> {
    let buffer_size = config.buffer_size();
    let size = message.len();

    if size > buffer_size {
        return Err(TransferError::MessageTooLarge { size, buffer_size });
    }

    let delay = rng.range_inclusive(range.min_ms(), range.max_ms());
    Ok(TransferOutcome::delivered(delay, "Pipe transfer successful"))
}
