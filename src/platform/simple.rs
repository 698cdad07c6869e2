//! This module contains best-effort abstraction over platform specific implementations
//! in the parent module.
//!
//! For each supported platform, this module exports uniformly named types for the
//! hardware facing parts of a run.

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
mod inner {
	use super::super::{mmap, tsc};

	pub type SimpleCycleTimer = tsc::TscTimer;
	pub type SimpleExecutableMemory = mmap::MmapMemory;
}

pub use inner::{SimpleCycleTimer, SimpleExecutableMemory};
