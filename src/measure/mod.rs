//! Timing measurements of the branch gadget.

pub mod timer;
pub use timer::{CycleTimer, HostTransition};

pub mod probe;
pub use probe::{BranchTimingProbe, ProbeError, TimingProbe};
