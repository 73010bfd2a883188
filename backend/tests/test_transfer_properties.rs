//! Property-based tests for the transfer latency model

use ipc_debugger_core_rs::config::DelayRange;
use ipc_debugger_core_rs::transfer::{priority_factor, MUTEX_OVERHEAD_RANGE};
use ipc_debugger_core_rs::{ChannelConfig, RngManager, TransferSimulator};
use proptest::prelude::*;

fn range_strategy() -> impl Strategy<Value = DelayRange> {
    (0u64..10_000, 0u64..10_000).prop_map(|(a, b)| DelayRange(a.min(b), a.max(b)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Pipe rejects exactly when the payload is larger than the buffer
    #[test]
    fn prop_pipe_rejects_iff_oversized(
        seed in any::<u64>(),
        len in 0usize..512,
        buffer in 0u64..512,
    ) {
        let simulator = TransferSimulator::default();
        let mut rng = RngManager::new(seed);
        let config = ChannelConfig::new().with("buffer_size", buffer);
        let message = "p".repeat(len);

        let outcome = simulator.transfer("pipe", &message, &config, &mut rng);
        prop_assert_eq!(outcome.success, len as u64 <= buffer);
        if outcome.success {
            prop_assert!((100..=300).contains(&outcome.delay_ms));
        } else {
            prop_assert_eq!(outcome.delay_ms, 0);
        }
    }

    /// Delays stay inside the configured range (plus mutex overhead)
    #[test]
    fn prop_delays_within_configured_ranges(
        seed in any::<u64>(),
        pipe in range_strategy(),
        queue in range_strategy(),
        shmem in range_strategy(),
    ) {
        let simulator = TransferSimulator::new(pipe, queue, shmem);
        let mut rng = RngManager::new(seed);
        let config = ChannelConfig::new();

        let p = simulator.transfer("pipe", "m", &config, &mut rng).delay_ms;
        prop_assert!(pipe.contains(p));

        let q = simulator.transfer("queue", "m", &config, &mut rng).delay_ms;
        prop_assert!(queue.contains(q));

        let s = simulator.transfer("shmem", "m", &config, &mut rng).delay_ms;
        prop_assert!(s >= shmem.min_ms() + MUTEX_OVERHEAD_RANGE.min_ms());
        prop_assert!(s <= shmem.max_ms() + MUTEX_OVERHEAD_RANGE.max_ms());
    }

    /// Higher priority never yields a longer queue delay for the same draw
    #[test]
    fn prop_queue_monotonic_in_priority(
        seed in any::<u64>(),
        low in -20.0f64..20.0,
        bump in 0.0f64..20.0,
    ) {
        let simulator = TransferSimulator::default();
        let rng = RngManager::new(seed);

        let mut rng_low = rng.clone();
        let mut rng_high = rng;
        let slow = simulator
            .transfer("queue", "m", &ChannelConfig::new().with("priority", low), &mut rng_low)
            .delay_ms;
        let fast = simulator
            .transfer("queue", "m", &ChannelConfig::new().with("priority", low + bump), &mut rng_high)
            .delay_ms;

        prop_assert!(fast <= slow);
    }

    #[test]
    fn prop_priority_factor_floor(priority in -100.0f64..100.0) {
        prop_assert!(priority_factor(priority) >= 0.5);
    }
}
