//! Benchmark driver: builds the fixed six-task graph and checks the counters.

use crate::error::SchedError;
use crate::log_dev;
use crate::packet::Packet;
use crate::records::{DeviceRecord, HandlerRecord, IdleRecord, TaskRecord, WorkerRecord};
use crate::scheduler::{ScheduleStats, schedule};
use crate::task_state::TaskState;
use crate::types::{
    DEVICE_A, DEVICE_B, EXPECTED_HOLD_COUNT, EXPECTED_QPKT_COUNT, HANDLER_A, HANDLER_B, IDLE,
    IterationReport, PacketId, PacketKind, TaskId, WORKER,
};
use crate::work_area::WorkArea;

/// Chain `count` fresh packets addressed to `ident` and return the head.
fn seed_queue(
    wa: &mut WorkArea,
    count: usize,
    ident: TaskId,
    kind: PacketKind,
) -> Option<PacketId> {
    let mut head = None;
    for _ in 0..count {
        head = Some(wa.packets.insert(Packet::new(head, ident, kind)));
    }
    head
}

/// Create the six benchmark tasks with their initial states and packets.
///
/// Creation order is idle, worker, handler A, handler B, device A, device B,
/// so the task list starts at device B.
pub fn build_task_graph(wa: &mut WorkArea) -> Result<(), SchedError> {
    wa.create_task(
        IDLE,
        1,
        None,
        *TaskState::default().running(),
        TaskRecord::Idle(IdleRecord::new()),
    )?;

    let work = seed_queue(wa, 2, 0, PacketKind::Work);
    wa.create_task(
        WORKER,
        1000,
        work,
        *TaskState::default().waiting_with_packet(),
        TaskRecord::Worker(WorkerRecord::new()),
    )?;

    let handlers = [(HANDLER_A, DEVICE_A, 2000), (HANDLER_B, DEVICE_B, 3000)];
    for (handler, device, priority) in handlers {
        let queue = seed_queue(wa, 3, device, PacketKind::Device);
        wa.create_task(
            handler,
            priority,
            queue,
            *TaskState::default().waiting_with_packet(),
            TaskRecord::Handler(HandlerRecord::default()),
        )?;
    }

    for (device, priority) in [(DEVICE_A, 4000), (DEVICE_B, 5000)] {
        wa.create_task(
            device,
            priority,
            None,
            *TaskState::default().waiting(),
            TaskRecord::Device(DeviceRecord::default()),
        )?;
    }
    Ok(())
}

/// Repeatable benchmark runner owning its work area.
#[derive(Debug)]
pub struct Richards {
    work_area: WorkArea,
    expected: IterationReport,
    last: Option<IterationReport>,
    last_stats: ScheduleStats,
}

impl Richards {
    pub fn new() -> Self {
        Self::with_tracing(false)
    }

    /// Runner whose trace (task ids and device payloads) is printed after
    /// each iteration.
    pub fn with_tracing(enabled: bool) -> Self {
        Self {
            work_area: WorkArea::with_tracing(enabled),
            expected: IterationReport {
                hold_count: EXPECTED_HOLD_COUNT,
                qpkt_count: EXPECTED_QPKT_COUNT,
            },
            last: None,
            last_stats: ScheduleStats::default(),
        }
    }

    /// Override the counters an iteration must reach to count as correct.
    pub fn with_expected(mut self, expected: IterationReport) -> Self {
        self.expected = expected;
        self
    }

    /// Reset the work area, rebuild the graph, and schedule it to completion.
    pub fn iterate(&mut self) -> Result<IterationReport, SchedError> {
        self.work_area.reset();
        build_task_graph(&mut self.work_area)?;
        self.last_stats = schedule(&mut self.work_area)?;
        let report = self.work_area.report();
        self.last = Some(report);
        Ok(report)
    }

    /// Run `iterations` iterations, stopping at the first counter mismatch.
    ///
    /// Returns `Ok(false)` on a mismatch (after reporting it on stderr) and
    /// `Ok(true)` when every iteration matched.
    pub fn run(&mut self, iterations: usize) -> Result<bool, SchedError> {
        for iteration in 0..iterations {
            let report = self.iterate()?;
            let trace = self.work_area.tracer.take();
            if !trace.is_empty() {
                println!("{trace}");
            }
            log_dev!(
                "[RICHARDS] iteration={iteration} hold_count={} qpkt_count={} runs={}",
                report.hold_count,
                report.qpkt_count,
                self.last_stats.runs
            );
            if report != self.expected {
                eprintln!(
                    "[RICHARDS] iteration {iteration} mismatch: hold_count={} (expected {}) qpkt_count={} (expected {})",
                    report.hold_count,
                    self.expected.hold_count,
                    report.qpkt_count,
                    self.expected.qpkt_count
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn last_report(&self) -> Option<IterationReport> {
        self.last
    }

    pub fn last_stats(&self) -> ScheduleStats {
        self.last_stats
    }

    pub fn work_area(&self) -> &WorkArea {
        &self.work_area
    }

    pub fn work_area_mut(&mut self) -> &mut WorkArea {
        &mut self.work_area
    }
}

impl Default for Richards {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the benchmark `iterations` times; true iff every iteration produced
/// the known-correct counters.
pub fn run(iterations: usize) -> Result<bool, SchedError> {
    Richards::new().run(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Every packet reachable from a task input, a handler queue, or a
    /// device's parked slot. Panics if one is reachable twice.
    fn reachable_packets(wa: &WorkArea) -> HashSet<PacketId> {
        let mut seen = HashSet::new();
        let mut visit = |ids: Vec<PacketId>| {
            for id in ids {
                assert!(seen.insert(id), "packet {id} reachable twice");
            }
        };
        for id in wa.task_ids().expect("task list") {
            let task = wa.find_task(id).expect("task");
            visit(wa.packets.queue_ids(task.input).expect("input"));
            match task.record.as_ref().expect("record") {
                TaskRecord::Device(device) => visit(device.pending.into_iter().collect()),
                TaskRecord::Handler(handler) => {
                    visit(wa.packets.queue_ids(handler.work_in).expect("work"));
                    visit(wa.packets.queue_ids(handler.device_in).expect("device"));
                }
                TaskRecord::Idle(_) | TaskRecord::Worker(_) => {}
            }
        }
        seen
    }

    #[test]
    fn graph_matches_benchmark_wiring() {
        let mut wa = WorkArea::new();
        build_task_graph(&mut wa).expect("build");
        assert_eq!(
            wa.task_ids(),
            Ok(vec![DEVICE_B, DEVICE_A, HANDLER_B, HANDLER_A, WORKER, IDLE])
        );

        let expected = [
            (IDLE, 1, 0, *TaskState::default().running()),
            (WORKER, 1000, 2, *TaskState::default().waiting_with_packet()),
            (HANDLER_A, 2000, 3, *TaskState::default().waiting_with_packet()),
            (HANDLER_B, 3000, 3, *TaskState::default().waiting_with_packet()),
            (DEVICE_A, 4000, 0, *TaskState::default().waiting()),
            (DEVICE_B, 5000, 0, *TaskState::default().waiting()),
        ];
        for (id, priority, queued, state) in expected {
            let task = wa.find_task(id).expect("task");
            assert_eq!(task.priority, priority, "priority of task {id}");
            assert_eq!(wa.packets.queue_len(task.input), Ok(queued), "queue of task {id}");
            assert_eq!(task.state, state, "state of task {id}");
        }
        assert_eq!(wa.packets.len(), 8);
    }

    #[test]
    fn handler_seed_packets_target_their_device() {
        let mut wa = WorkArea::new();
        build_task_graph(&mut wa).expect("build");
        for (handler, device) in [(HANDLER_A, DEVICE_A), (HANDLER_B, DEVICE_B)] {
            let input = wa.find_task(handler).expect("handler").input;
            for id in wa.packets.queue_ids(input).expect("queue") {
                let packet = wa.packets.get(id).expect("packet");
                assert_eq!(packet.ident, device);
                assert_eq!(packet.kind, PacketKind::Device);
            }
        }
    }

    #[test]
    fn single_iteration_reaches_expected_counters() {
        let mut richards = Richards::new();
        let report = richards.iterate().expect("iterate");
        assert_eq!(report.hold_count, 9297);
        assert_eq!(report.qpkt_count, 23246);
        assert!(report.is_expected());
    }

    #[test]
    fn every_iteration_is_independent() {
        let mut richards = Richards::new();
        assert_eq!(richards.run(3), Ok(true));
        assert_eq!(richards.last_report().map(|r| r.is_expected()), Some(true));
        assert!(run(1).expect("run"));
    }

    #[test]
    fn zero_iterations_trivially_pass() {
        let mut richards = Richards::new();
        assert_eq!(richards.run(0), Ok(true));
        assert_eq!(richards.last_report(), None);
    }

    #[test]
    fn mismatch_is_reported_not_raised() {
        let mut richards = Richards::new().with_expected(IterationReport {
            hold_count: 1,
            qpkt_count: 1,
        });
        assert_eq!(richards.run(2), Ok(false));
        assert_eq!(richards.last_report().map(|r| r.hold_count), Some(9297));
    }

    #[test]
    fn packets_are_conserved() {
        let mut richards = Richards::new();
        richards.iterate().expect("iterate");
        let wa = richards.work_area();
        let reachable = reachable_packets(wa);
        assert_eq!(wa.packets.len(), 8);
        assert_eq!(reachable.len(), wa.packets.len());
    }

    #[test]
    fn every_task_ends_suspended() {
        let mut richards = Richards::new();
        richards.iterate().expect("iterate");
        let wa = richards.work_area();
        for id in wa.task_ids().expect("task list") {
            let task = wa.find_task(id).expect("task");
            assert!(task.state.is_holding_or_waiting(), "task {id} still runnable");
        }
    }

    #[test]
    fn tracing_does_not_change_counters() {
        let mut plain = Richards::new();
        let mut traced = Richards::with_tracing(true);
        let plain_report = plain.iterate().expect("plain");
        let traced_report = traced.iterate().expect("traced");
        assert_eq!(plain_report, traced_report);
        assert_eq!(plain.last_stats(), traced.last_stats());

        let trace = traced.work_area_mut().tracer.take();
        assert!(trace.starts_with('\n'));
        let items = trace.chars().filter(|c| *c != '\n').count() as u64;
        // One digit per task run plus one letter per device hold.
        assert!(items > traced.last_stats().runs);
        assert!(trace.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn rebuilding_without_reset_is_rejected() {
        let mut wa = WorkArea::new();
        build_task_graph(&mut wa).expect("build");
        assert_eq!(build_task_graph(&mut wa), Err(SchedError::DuplicateTask(IDLE)));
    }
}
