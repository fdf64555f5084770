//! Per-kind private data owned by each task.

use crate::error::SchedError;
use crate::packet::PacketArena;
use crate::types::{
    ALPHABET_LEN, ALPHABET_START, DEVICE_A, DEVICE_B, HANDLER_A, HANDLER_B, PacketId, TaskId,
};

/// Device task state: at most one packet parked until the next run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub pending: Option<PacketId>,
}

/// Idle task state: a pseudo-random control word and a countdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdleRecord {
    pub control: i64,
    pub count: i64,
}

/// What the idle task does on one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleAction {
    Hold,
    Release(TaskId),
}

impl IdleRecord {
    pub fn new() -> Self {
        Self {
            control: 1,
            count: 10_000,
        }
    }

    /// Advance the countdown and pick the device to wake.
    pub fn step(&mut self) -> IdleAction {
        self.count -= 1;
        if self.count == 0 {
            return IdleAction::Hold;
        }
        if self.control & 1 == 0 {
            self.control /= 2;
            IdleAction::Release(DEVICE_A)
        } else {
            self.control = (self.control / 2) ^ 0xD008;
            IdleAction::Release(DEVICE_B)
        }
    }
}

impl Default for IdleRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler task state: separate queues of work and device packets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandlerRecord {
    pub work_in: Option<PacketId>,
    pub device_in: Option<PacketId>,
}

impl HandlerRecord {
    pub fn work_in_add(
        &mut self,
        arena: &mut PacketArena,
        packet: PacketId,
    ) -> Result<PacketId, SchedError> {
        let head = arena.append_to(packet, self.work_in)?;
        self.work_in = Some(head);
        Ok(head)
    }

    pub fn device_in_add(
        &mut self,
        arena: &mut PacketArena,
        packet: PacketId,
    ) -> Result<PacketId, SchedError> {
        let head = arena.append_to(packet, self.device_in)?;
        self.device_in = Some(head);
        Ok(head)
    }
}

/// Worker task state: which handler gets the next packet, and the rolling
/// alphabet position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerRecord {
    pub destination: TaskId,
    pub count: i64,
}

impl WorkerRecord {
    pub fn new() -> Self {
        Self {
            destination: HANDLER_A,
            count: 0,
        }
    }

    /// Swap to the other handler and return it.
    pub fn flip_destination(&mut self) -> TaskId {
        self.destination = if self.destination == HANDLER_A {
            HANDLER_B
        } else {
            HANDLER_A
        };
        self.destination
    }

    /// Next byte of the A..Z cycle.
    pub fn next_byte(&mut self) -> i64 {
        self.count += 1;
        if self.count > ALPHABET_LEN {
            self.count = 1;
        }
        ALPHABET_START + self.count - 1
    }
}

impl Default for WorkerRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Private data of a task, one variant per task kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskRecord {
    Device(DeviceRecord),
    Idle(IdleRecord),
    Handler(HandlerRecord),
    Worker(WorkerRecord),
}
