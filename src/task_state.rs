/// Scheduling flags of a task.
///
/// `Task` embeds one of these directly; the scheduler reads the derived
/// predicates to decide whether a task may run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskState {
    pub packet_pending: bool,
    pub task_waiting: bool,
    pub task_holding: bool,
}

impl TaskState {
    fn set(&mut self, pending: bool, waiting: bool, holding: bool) -> &mut Self {
        self.packet_pending = pending;
        self.task_waiting = waiting;
        self.task_holding = holding;
        self
    }

    pub fn running(&mut self) -> &mut Self {
        self.set(false, false, false)
    }

    pub fn waiting(&mut self) -> &mut Self {
        self.set(false, true, false)
    }

    pub fn packet_pending(&mut self) -> &mut Self {
        self.set(true, false, false)
    }

    pub fn waiting_with_packet(&mut self) -> &mut Self {
        self.set(true, true, false)
    }

    pub fn is_packet_pending(&self) -> bool {
        self.packet_pending
    }

    pub fn is_task_waiting(&self) -> bool {
        self.task_waiting
    }

    pub fn is_task_holding(&self) -> bool {
        self.task_holding
    }

    /// Not runnable: held, or waiting with nothing to consume.
    pub fn is_holding_or_waiting(&self) -> bool {
        self.task_holding || (!self.packet_pending && self.task_waiting)
    }

    /// Runnable with a packet to hand to the behavior.
    pub fn is_waiting_with_packet(&self) -> bool {
        self.packet_pending && self.task_waiting && !self.task_holding
    }
}
