//! Richards cooperative task-scheduling benchmark.
//!
//! Six tasks (idle, worker, two handlers, two devices) pass packets through
//! intrusive queues under a priority-driven, non-preemptive scheduler. Each
//! run must end with exactly 9297 holds and 23246 queued packets.

pub mod logging;

mod behavior;
pub mod error;
pub mod packet;
pub mod records;
pub mod richards;
pub mod scheduler;
pub mod sim;
pub mod task;
pub mod task_state;
pub mod types;
pub mod work_area;

pub use error::SchedError;
pub use richards::{Richards, run};
pub use types::IterationReport;
