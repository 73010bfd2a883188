//! End-to-end session behavior: sends, detection, analysis, statistics

use ipc_debugger_core_rs::config::DelayRange;
use ipc_debugger_core_rs::{
    Channel, ChannelConfig, Event, ProcessInfo, ProcessState, SessionError, SessionRegistry,
    Severity, SimulationSession, SimulationStatus, SimulatorConfig, Topology,
};

fn fixed_config() -> SimulatorConfig {
    SimulatorConfig {
        pipe_delay_range: DelayRange(200, 200),
        queue_delay_range: DelayRange(400, 400),
        shmem_delay_range: DelayRange(50, 50),
        bottleneck_threshold_ms: 300.0,
        ..Default::default()
    }
}

fn topology() -> Topology {
    Topology::new(
        vec![
            ProcessInfo::new(1, "producer"),
            ProcessInfo::new(2, "consumer"),
            ProcessInfo::new(3, "logger"),
        ],
        vec![
            Channel::new(10, "pipe", 1, 2),
            Channel::new(11, "queue", 2, 3),
            Channel::new(12, "shmem", 1, 3)
                .with_config(ChannelConfig::new().with("use_mutex", false)),
        ],
    )
}

#[test]
fn test_lifecycle_status_and_events() {
    let mut session = SimulationSession::new(7, "demo", SimulatorConfig::default()).unwrap();
    assert_eq!(session.status(), SimulationStatus::Created);

    session.start();
    assert_eq!(session.status(), SimulationStatus::Running);
    session.stop();
    assert_eq!(session.status(), SimulationStatus::Stopped);

    let types: Vec<&str> = session
        .event_log()
        .events()
        .iter()
        .map(Event::event_type)
        .collect();
    assert_eq!(
        types,
        vec!["simulation_created", "simulation_started", "simulation_stopped"]
    );
    let seqs: Vec<usize> = session.event_log().events().iter().map(Event::seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[test]
fn test_send_records_latency_for_both_endpoints() {
    let mut session = SimulationSession::new(1, "s", fixed_config()).unwrap();
    let topology = topology();

    let delivery = session.send_message(&topology, 10, "hello").unwrap();

    assert!(delivery.outcome.success);
    assert_eq!(delivery.outcome.delay_ms, 200);
    assert_eq!(delivery.size_bytes, 5);
    assert_eq!((delivery.sender_id, delivery.receiver_id), (1, 2));
    assert_eq!(delivery.sender_state, Some(ProcessState::Running));
    assert_eq!(delivery.receiver_state, Some(ProcessState::Waiting));
    assert_eq!(delivery.message_id.len(), 36);

    let ledger = session.analyzer().ledger();
    assert_eq!(ledger.process_samples(1), &[200]);
    assert_eq!(ledger.process_samples(2), &[200]);
    assert_eq!(ledger.channel_samples(10), &[200, 200]);

    let last = session.event_log().events().last().unwrap();
    assert_eq!(last.message(), "producer → consumer (200ms)");
}

#[test]
fn test_bottlenecks_reported_and_logged() {
    let mut session = SimulationSession::new(1, "s", fixed_config()).unwrap();
    let topology = topology();

    session.send_message(&topology, 11, "job").unwrap(); // 400ms, 2 → 3
    session.send_message(&topology, 12, "blob").unwrap(); // 50ms, 1 → 3

    let report = session.analyze_bottlenecks(&topology);
    let flagged: Vec<&str> = report
        .bottlenecks()
        .map(|b| b.process_name.as_str())
        .collect();
    assert_eq!(flagged, vec!["consumer"]);

    // logger: (400 + 50) / 2 = 225
    let logger = report
        .process_analysis
        .iter()
        .find(|p| p.process_id == 3)
        .unwrap();
    assert_eq!(logger.avg_delay, 225.0);
    assert!(!logger.is_bottleneck);

    let events = session.event_log().events_of_type("bottleneck_detected");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message(), "Bottleneck: consumer (400.0ms avg)");
    assert_eq!(events[0].severity(), Severity::Warning);
}

#[test]
fn test_deadlock_detection_from_topology() {
    let mut session = SimulationSession::new(1, "s", SimulatorConfig::default()).unwrap();
    let mut topology = topology();

    assert!(!session.detect_deadlock(&topology).found);

    topology.channels.push(Channel::new(13, "pipe", 3, 1));
    let report = session.detect_deadlock(&topology);

    assert!(report.found);
    assert_eq!(report.process_ids, vec![1, 3]);
    assert_eq!(report.process_names, vec!["producer", "logger"]);
    assert_eq!(session.counters().deadlocks_detected, 1);

    let errors = session.event_log().events_with_severity(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Deadlock detected: producer, logger");
}

#[test]
fn test_statistics() {
    let mut session = SimulationSession::new(1, "s", fixed_config()).unwrap();
    let topology = topology();

    session.send_message(&topology, 10, "a").unwrap();
    session.send_message(&topology, 11, "b").unwrap();
    session.send_message(&topology, 12, "c").unwrap();
    session.send_message(&topology, 12, "d").unwrap();

    let stats = session.statistics(&topology);
    assert_eq!(stats.total_processes, 3);
    assert_eq!(stats.total_channels, 3);
    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.failed_transfers, 0);
    // (200 + 400 + 50 + 50) / 4
    assert_eq!(stats.avg_latency_ms, 175.0);
    assert_eq!(stats.ipc_distribution.get("pipe"), Some(&1));
    assert_eq!(stats.ipc_distribution.get("shmem"), Some(&1));
}

#[test]
fn test_statistics_empty_session() {
    let session = SimulationSession::new(1, "s", SimulatorConfig::default()).unwrap();
    let stats = session.statistics(&Topology::default());

    assert_eq!(stats.total_messages, 0);
    assert_eq!(stats.avg_latency_ms, 0.0);
    assert!(stats.ipc_distribution.is_empty());
}

#[test]
fn test_reset_clears_state_but_keeps_log() {
    let mut session = SimulationSession::new(1, "s", fixed_config()).unwrap();
    let mut topology = topology();
    topology.channels.push(Channel::new(13, "pipe", 3, 1));

    session.send_message(&topology, 11, "x").unwrap();
    session.detect_deadlock(&topology);
    let logged = session.event_log().len();

    session.reset();

    assert!(session.analyzer().ledger().is_empty());
    assert!(session.detector().graph().is_empty());
    assert_eq!(session.counters().messages_sent, 0);
    assert_eq!(session.counters().deadlocks_detected, 0);
    assert_eq!(session.event_log().len(), logged);

    let report = session.analyze_bottlenecks(&topology);
    assert!(report.process_analysis.is_empty());
}

#[test]
fn test_topology_events() {
    let mut session = SimulationSession::new(1, "s", SimulatorConfig::default()).unwrap();
    let topology = topology();

    session
        .register_process(&ProcessInfo::new(4, "cache"), &topology)
        .unwrap();
    session
        .register_channel(&topology.channels[0], &topology)
        .unwrap();
    session.change_process_state(&topology.processes[0], ProcessState::Blocked);
    session.remove_channel(12);

    let messages: Vec<String> = session
        .event_log()
        .recent(4)
        .iter()
        .map(|e| e.message())
        .collect();
    assert_eq!(
        messages,
        vec![
            "IPC channel deleted".to_string(),
            "Process \"producer\" state: ready → blocked".to_string(),
            "PIPE channel: producer → consumer".to_string(),
            "Process \"cache\" created".to_string(),
        ]
    );
    assert_eq!(session.event_log().events_for_process(4).len(), 1);
}

#[test]
fn test_remove_unknown_process() {
    let mut session = SimulationSession::new(1, "s", SimulatorConfig::default()).unwrap();
    assert_eq!(
        session.remove_process(99, &topology()),
        Err(SessionError::ProcessNotFound(99))
    );
}

#[test]
fn test_registry_keeps_sessions_independent() {
    let mut registry = SessionRegistry::new(fixed_config()).unwrap();
    let topology = topology();

    registry
        .get_or_create(1, "one")
        .unwrap()
        .send_message(&topology, 10, "a")
        .unwrap();
    registry.get_or_create(2, "two").unwrap();

    assert_eq!(registry.get(1).map(|s| s.counters().messages_sent), Some(1));
    assert_eq!(registry.get(2).map(|s| s.counters().messages_sent), Some(0));

    registry.remove(1);
    assert_eq!(registry.ids(), vec![2]);
}
