use thiserror::Error;

use crate::{
	common::Address,
	measure::CycleTimer,
	memory::{AllocationError, ExecutableMemory, BRANCH_GADGET}
};

#[derive(Debug, Error)]
pub enum ProbeError {
	#[error(transparent)]
	Allocation(#[from] AllocationError)
}

/// Trait implemented on sources of one noise-reduced timing sample per address.
pub trait TimingProbe {
	/// Returns the averaged cycle count of executing a branch placed at `address`.
	fn probe(&mut self, address: Address) -> Result<u64, ProbeError>;
}
impl<T: TimingProbe + ?Sized> TimingProbe for &mut T {
	fn probe(&mut self, address: Address) -> Result<u64, ProbeError> {
		(**self).probe(address)
	}
}

/// Times the branch gadget placed at each probed address.
///
/// Every call maps a fresh region, so exactly one region is alive at a time and nothing is
/// carried over between probes.
pub struct BranchTimingProbe<T: CycleTimer, M: ExecutableMemory> {
	timer: T,
	memory: M,
	trials: usize,
	region_size: usize
}
impl<T: CycleTimer, M: ExecutableMemory> BranchTimingProbe<T, M> {
	/// Creates a new probe averaging `trials` measurements per sample.
	///
	/// ## Panics
	/// * If `trials` is zero.
	pub fn new(timer: T, memory: M, trials: usize, region_size: usize) -> Self {
		assert!(trials > 0, "trials must be non-zero");

		BranchTimingProbe {
			timer,
			memory,
			trials,
			region_size
		}
	}

	pub fn timer(&self) -> &T {
		&self.timer
	}

	pub fn memory(&self) -> &M {
		&self.memory
	}
}
impl<T: CycleTimer, M: ExecutableMemory> TimingProbe for BranchTimingProbe<T, M> {
	fn probe(&mut self, address: Address) -> Result<u64, ProbeError> {
		let timer = &mut self.timer;
		let trials = self.trials;

		let total = self.memory.with_executable_region(
			address,
			self.region_size,
			&BRANCH_GADGET,
			|entry| {
				let mut total = 0u64;
				for _ in 0 .. trials {
					// Safe because the region holding the gadget stays mapped for this whole scope
					// and the gadget only falls through to `ret`.
					total = total.saturating_add(timer.measure(&mut || unsafe { entry() }));
				}

				total
			}
		)?;

		Ok(total / trials as u64)
	}
}
