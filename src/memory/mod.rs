//! Executable memory placed at exact guest addresses.

pub mod gadget;
pub use gadget::BRANCH_GADGET;

pub mod region;
pub use region::{AllocationError, ExecutableMemory, GadgetEntry};
