//! Deadlock detection over the resource-allocation graph

use ipc_debugger_core_rs::deadlock::DEADLOCK_SUGGESTION;
use ipc_debugger_core_rs::{Channel, DeadlockDetector, Node, ProcessInfo};

fn processes() -> Vec<ProcessInfo> {
    vec![
        ProcessInfo::new(1, "A"),
        ProcessInfo::new(2, "B"),
        ProcessInfo::new(3, "C"),
    ]
}

#[test]
fn test_empty_graph_no_deadlock() {
    let detector = DeadlockDetector::new();
    let detection = detector.detect_cycle();

    assert!(!detection.found);
    assert!(detection.process_ids.is_empty());
    assert!(detection.path.is_empty());
}

#[test]
fn test_two_process_circular_wait() {
    let mut detector = DeadlockDetector::new();
    // A holds R2 and waits for R1; B holds R1 and waits for R2
    detector.add_hold(1, 20);
    detector.add_wait(1, 10);
    detector.add_hold(2, 10);
    detector.add_wait(2, 20);

    let detection = detector.detect_cycle();
    assert!(detection.found);
    assert_eq!(detection.process_ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        detection.path,
        vec![
            Node::Process(1),
            Node::Resource(10),
            Node::Process(2),
            Node::Resource(20)
        ]
    );

    let report = detector.analyze_deadlock(&processes());
    assert!(report.found);
    assert_eq!(report.process_names, vec!["A", "B"]);
    assert_eq!(report.suggestion.as_deref(), Some(DEADLOCK_SUGGESTION));
}

#[test]
fn test_chain_has_no_cycle() {
    let mut detector = DeadlockDetector::new();
    // A waits R1 (held by B), B waits R2 (held by C), C waits on nothing
    detector.add_wait(1, 10);
    detector.add_hold(2, 10);
    detector.add_wait(2, 20);
    detector.add_hold(3, 20);

    assert!(!detector.detect_cycle().found);
    assert!(!detector.analyze_deadlock(&processes()).found);
}

#[test]
fn test_three_process_ring() {
    let channels = vec![
        Channel::new(10, "pipe", 1, 2),
        Channel::new(11, "queue", 2, 3),
        Channel::new(12, "shmem", 3, 1),
    ];

    let mut detector = DeadlockDetector::new();
    detector.rebuild_from_channels(&channels);
    let report = detector.analyze_deadlock(&processes());

    assert!(report.found);
    assert_eq!(report.process_ids, vec![1, 2, 3]);
    assert_eq!(report.cycle.len(), 6);
}

#[test]
fn test_one_way_channels_do_not_deadlock() {
    let channels = vec![
        Channel::new(10, "pipe", 1, 2),
        Channel::new(11, "pipe", 1, 3),
        Channel::new(12, "pipe", 2, 3),
    ];

    let mut detector = DeadlockDetector::new();
    detector.rebuild_from_channels(&channels);
    assert!(!detector.detect_cycle().found);
}

#[test]
fn test_rebuild_replaces_previous_graph() {
    let mut detector = DeadlockDetector::new();
    detector.rebuild_from_channels(&[
        Channel::new(10, "pipe", 1, 2),
        Channel::new(11, "pipe", 2, 1),
    ]);
    assert!(detector.detect_cycle().found);

    detector.rebuild_from_channels(&[Channel::new(10, "pipe", 1, 2)]);
    assert!(!detector.detect_cycle().found);
    assert_eq!(detector.graph().edge_count(), 2);
}

#[test]
fn test_loopback_channel_is_self_deadlock() {
    let mut detector = DeadlockDetector::new();
    detector.rebuild_from_channels(&[Channel::new(40, "pipe", 4, 4)]);

    let detection = detector.detect_cycle();
    assert!(detection.found);
    assert_eq!(detection.path, vec![Node::Process(4), Node::Resource(40)]);
}

#[test]
fn test_unknown_ids_have_no_names() {
    let mut detector = DeadlockDetector::new();
    detector.add_wait(8, 1);
    detector.add_hold(9, 1);
    detector.add_wait(9, 2);
    detector.add_hold(8, 2);

    let report = detector.analyze_deadlock(&processes());
    assert!(report.found);
    assert_eq!(report.process_ids, vec![8, 9]);
    assert!(report.process_names.is_empty());
}

#[test]
fn test_reset_clears_graph() {
    let mut detector = DeadlockDetector::new();
    detector.add_wait(1, 10);
    detector.add_hold(2, 10);
    detector.add_wait(2, 20);
    detector.add_hold(1, 20);

    detector.reset();
    assert!(detector.graph().is_empty());
    assert!(!detector.detect_cycle().found);
}

#[test]
fn test_detection_is_stable_across_calls() {
    let mut detector = DeadlockDetector::new();
    detector.rebuild_from_channels(&[
        Channel::new(10, "pipe", 1, 2),
        Channel::new(11, "pipe", 2, 1),
        Channel::new(12, "pipe", 3, 3),
    ]);

    let first = detector.detect_cycle();
    for _ in 0..5 {
        assert_eq!(detector.detect_cycle(), first);
    }
}
