//! Shared identifiers and fixed constants of the benchmark task graph.

/// Identifier of a task; also its slot in the work area's task table.
pub type TaskId = usize;
/// Scheduling priority; higher wins on release and packet delivery.
pub type Priority = i64;
/// Handle of a packet in the work area's packet arena.
pub type PacketId = usize;

pub const IDLE: TaskId = 1;
pub const WORKER: TaskId = 2;
pub const HANDLER_A: TaskId = 3;
pub const HANDLER_B: TaskId = 4;
pub const DEVICE_A: TaskId = 5;
pub const DEVICE_B: TaskId = 6;

/// Number of slots in the task table (ids 0..TASK_TAB_SIZE).
pub const TASK_TAB_SIZE: usize = 10;

/// Capacity of a packet's work buffer.
pub const BUFSIZE: usize = 4;

/// First byte of the alphabet the worker cycles through.
pub const ALPHABET_START: i64 = b'A' as i64;
/// Length of the worker's alphabet cycle.
pub const ALPHABET_LEN: i64 = 26;

/// Expected counters after one full scheduler run.
pub const EXPECTED_HOLD_COUNT: u64 = 9297;
pub const EXPECTED_QPKT_COUNT: u64 = 23246;

/// What a packet carries, which decides the handler queue it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketKind {
    Device,
    Work,
}

impl PacketKind {
    /// Raw kind code used by the classic benchmark.
    pub fn code(self) -> i64 {
        match self {
            PacketKind::Device => 1000,
            PacketKind::Work => 1001,
        }
    }
}

/// Counters produced by one scheduler run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterationReport {
    pub hold_count: u64,
    pub qpkt_count: u64,
}

impl IterationReport {
    /// True when both counters match the known-correct totals.
    pub fn is_expected(&self) -> bool {
        self.hold_count == EXPECTED_HOLD_COUNT && self.qpkt_count == EXPECTED_QPKT_COUNT
    }
}
