//! Transfer simulator behavior per IPC mechanism

use ipc_debugger_core_rs::config::DelayRange;
use ipc_debugger_core_rs::transfer::{discounted_delay, MUTEX_OVERHEAD_RANGE};
use ipc_debugger_core_rs::{
    ChannelConfig, IpcKind, RngManager, SimulatorConfig, TransferError, TransferSimulator,
};

fn simulator() -> TransferSimulator {
    TransferSimulator::from_config(&SimulatorConfig::default())
}

// ============================================================================
// Pipe
// ============================================================================

#[test]
fn test_pipe_rejects_oversized_message() {
    let mut rng = RngManager::new(42);
    let config = ChannelConfig::new().with("buffer_size", 4);

    let outcome = simulator().transfer("pipe", "hello", &config, &mut rng);

    assert!(!outcome.success);
    assert_eq!(outcome.delay_ms, 0);
    assert_eq!(outcome.info, "Message size (5) exceeds buffer size (4)");
}

#[test]
fn test_pipe_accepts_message_filling_buffer() {
    let mut rng = RngManager::new(42);
    let config = ChannelConfig::new().with("buffer_size", 5);

    let outcome = simulator().transfer("pipe", "hello", &config, &mut rng);

    assert!(outcome.success);
    assert!((100..=300).contains(&outcome.delay_ms));
    assert_eq!(outcome.info, "Pipe transfer successful");
}

#[test]
fn test_pipe_measures_bytes_not_chars() {
    let mut rng = RngManager::new(1);
    // 4 chars, 8 bytes
    let config = ChannelConfig::new().with("buffer_size", 7);

    let result = simulator().try_transfer("pipe", "ññññ", &config, &mut rng);
    assert_eq!(
        result,
        Err(TransferError::MessageTooLarge {
            size: 8,
            buffer_size: 7
        })
    );
}

#[test]
fn test_pipe_default_buffer_is_4096() {
    let mut rng = RngManager::new(3);
    let big = "x".repeat(4097);
    let fits = "x".repeat(4096);
    let config = ChannelConfig::new();

    assert!(!simulator().transfer("pipe", &big, &config, &mut rng).success);
    assert!(simulator().transfer("pipe", &fits, &config, &mut rng).success);
}

// ============================================================================
// Queue
// ============================================================================

#[test]
fn test_queue_delay_non_increasing_in_priority() {
    let base_rng = RngManager::new(2024);
    let mut previous = u64::MAX;

    for priority in 0..=8 {
        let mut rng = base_rng.clone();
        let config = ChannelConfig::new().with("priority", priority);
        let outcome = simulator().transfer("queue", "job", &config, &mut rng);

        assert!(outcome.success);
        assert!(
            outcome.delay_ms <= previous,
            "priority {} gave {} > {}",
            priority,
            outcome.delay_ms,
            previous
        );
        previous = outcome.delay_ms;
    }
}

#[test]
fn test_queue_discount_floors_at_half() {
    let base_rng = RngManager::new(99);

    let mut rng = base_rng.clone();
    let neutral = simulator()
        .transfer("queue", "m", &ChannelConfig::new(), &mut rng)
        .delay_ms;
    assert!((200..=500).contains(&neutral));

    for priority in [5, 9, 100] {
        let mut rng = base_rng.clone();
        let config = ChannelConfig::new().with("priority", priority);
        let delay = simulator().transfer("queue", "m", &config, &mut rng).delay_ms;
        assert_eq!(delay, discounted_delay(neutral, 5.0));
        assert_eq!(delay, neutral / 2);
    }
}

#[test]
fn test_queue_never_rejects_large_messages() {
    let mut rng = RngManager::new(5);
    let big = "q".repeat(100_000);
    let outcome = simulator().transfer("queue", &big, &ChannelConfig::new(), &mut rng);
    assert!(outcome.success);
}

// ============================================================================
// Shared memory
// ============================================================================

#[test]
fn test_shmem_mutex_adds_overhead() {
    for seed in 1..50 {
        let base_rng = RngManager::new(seed);

        let mut rng = base_rng.clone();
        let locked = simulator().transfer("shmem", "s", &ChannelConfig::new(), &mut rng);

        let mut rng = base_rng.clone();
        let unlocked_config = ChannelConfig::new().with("use_mutex", false);
        let unlocked = simulator().transfer("shmem", "s", &unlocked_config, &mut rng);

        let overhead = locked.delay_ms - unlocked.delay_ms;
        assert!(MUTEX_OVERHEAD_RANGE.contains(overhead));
        assert!((50..=150).contains(&unlocked.delay_ms));
        assert_eq!(locked.info, "Shared memory write with mutex");
        assert_eq!(
            unlocked.info,
            "Shared memory write (no mutex - potential race condition)"
        );
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_unknown_kind_rejected_without_draw() {
    let mut rng = RngManager::new(11);
    let before = rng.get_state();

    let outcome = simulator().transfer("socket", "x", &ChannelConfig::new(), &mut rng);

    assert!(!outcome.success);
    assert_eq!(outcome.delay_ms, 0);
    assert_eq!(outcome.info, "Unknown IPC type: socket");
    assert_eq!(rng.get_state(), before);
}

#[test]
fn test_kind_parsing_is_exact() {
    assert_eq!("shmem".parse::<IpcKind>(), Ok(IpcKind::Shmem));
    assert!("Pipe".parse::<IpcKind>().is_err());
    assert_eq!(IpcKind::Queue.to_string(), "queue");
}

#[test]
fn test_shmem_delay_saturates_on_extreme_valid_range() {
    let config = SimulatorConfig {
        shmem_delay_range: DelayRange(u64::MAX - 5, u64::MAX),
        ..Default::default()
    };
    assert!(config.validate().is_ok());

    let simulator = TransferSimulator::from_config(&config);
    for seed in 1..20 {
        let mut rng = RngManager::new(seed);
        let outcome = simulator.transfer("shmem", "s", &ChannelConfig::new(), &mut rng);
        assert!(outcome.success);
        assert_eq!(outcome.delay_ms, u64::MAX);
    }
}

#[test]
fn test_custom_ranges_respected() {
    let simulator = TransferSimulator::new(
        DelayRange(1, 1),
        DelayRange(10, 10),
        DelayRange(7, 7),
    );
    let mut rng = RngManager::new(8);
    let no_mutex = ChannelConfig::new().with("use_mutex", false);

    assert_eq!(simulator.transfer("pipe", "a", &no_mutex, &mut rng).delay_ms, 1);
    assert_eq!(simulator.transfer("queue", "a", &no_mutex, &mut rng).delay_ms, 10);
    assert_eq!(simulator.transfer("shmem", "a", &no_mutex, &mut rng).delay_ms, 7);
}
