//! Message queue: priority-discounted latency
//!
//! Each priority step shaves 10% off the base draw, bottoming out at half.
//! `max_queue_size` is read from the channel config but capacity is not
//! enforced here.

use super::TransferOutcome;
use crate::config::DelayRange;
use crate::models::ChannelConfig;
use crate::rng::RngManager;

/// Latency multiplier for a queue priority: `max(0.5, 1 - priority * 0.1)`
pub fn priority_factor(priority: f64) -> f64 {
    (1.0 - priority * 0.1).max(0.5)
}

/// Apply the priority discount to a base draw, flooring to whole ms
pub fn discounted_delay(base_delay: u64, priority: f64) -> u64 {
    (base_delay as f64 * priority_factor(priority)).floor() as u64
}

pub(super) fn simulate(
    config: &ChannelConfig,
    range: DelayRange,
    rng: &mut RngManager,
) -> TransferOutcome {
    let priority = config.priority();
    let base_delay = rng.range_inclusive(range.min_ms(), range.max_ms());
    let delay = discounted_delay(base_delay, priority);

    TransferOutcome::delivered(delay, format!("Message queued with priority {}", priority))
}
