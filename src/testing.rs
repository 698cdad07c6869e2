//! Deterministic stand-ins for the hardware facing parts, used by the unit tests.

use std::collections::{HashSet, VecDeque};

use crate::{
	common::Address,
	measure::{CycleTimer, ProbeError, TimingProbe},
	memory::{AllocationError, ExecutableMemory, GadgetEntry}
};

/// Timer returning a scripted sequence of samples.
pub struct ScriptedTimer {
	script: VecDeque<u64>,
	repeat: Option<u64>,
	measured: usize
}
impl ScriptedTimer {
	pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
		ScriptedTimer {
			script: script.into_iter().collect(),
			repeat: None,
			measured: 0
		}
	}

	pub fn repeat(value: u64) -> Self {
		ScriptedTimer {
			script: VecDeque::new(),
			repeat: Some(value),
			measured: 0
		}
	}

	pub fn measured(&self) -> usize {
		self.measured
	}
}
impl CycleTimer for ScriptedTimer {
	fn measure(&mut self, target: &mut dyn FnMut()) -> u64 {
		target();
		self.measured += 1;

		match self.script.pop_front().or(self.repeat) {
			Some(value) => value,
			None => panic!("timer script exhausted after {} samples", self.measured)
		}
	}
}

extern "C" fn noop_entry() {}

/// Memory that never maps anything and hands out a native no-op as the gadget entry.
#[derive(Default)]
pub struct FakeMemory {
	refused: HashSet<Address>,
	mapped: Vec<Address>,
	sizes: Vec<usize>,
	last_gadget: Option<Vec<u8>>,
	live: usize,
	max_live: usize
}
impl FakeMemory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every allocation at `address` fail.
	pub fn refuse(mut self, address: Address) -> Self {
		self.refused.insert(address);
		self
	}

	pub fn mapped(&self) -> &[Address] {
		&self.mapped
	}

	pub fn sizes(&self) -> &[usize] {
		&self.sizes
	}

	pub fn last_gadget(&self) -> Option<&[u8]> {
		self.last_gadget.as_deref()
	}

	pub fn live(&self) -> usize {
		self.live
	}

	pub fn max_live(&self) -> usize {
		self.max_live
	}
}
impl ExecutableMemory for FakeMemory {
	fn with_executable_region<R>(
		&mut self,
		address: Address,
		size: usize,
		gadget: &[u8],
		body: impl FnOnce(GadgetEntry) -> R
	) -> Result<R, AllocationError> {
		if self.refused.contains(&address) {
			return Err(AllocationError::Moved {
				requested: address,
				actual: address.wrapping_add(0x1000)
			})
		}

		self.mapped.push(address);
		self.sizes.push(size);
		self.last_gadget = Some(gadget.to_vec());

		self.live += 1;
		self.max_live = self.max_live.max(self.live);
		let result = body(noop_entry);
		self.live -= 1;

		Ok(result)
	}
}

/// Probe computing its samples from the address alone.
///
/// Addresses for which the function returns `None` behave as if they could not be mapped.
pub struct SyntheticProbe<F: FnMut(Address) -> Option<u64>> {
	timing: F,
	probed: Vec<Address>
}
impl<F: FnMut(Address) -> Option<u64>> SyntheticProbe<F> {
	pub fn new(timing: F) -> Self {
		SyntheticProbe {
			timing,
			probed: Vec::new()
		}
	}

	pub fn probed(&self) -> &[Address] {
		&self.probed
	}
}
impl<F: FnMut(Address) -> Option<u64>> TimingProbe for SyntheticProbe<F> {
	fn probe(&mut self, address: Address) -> Result<u64, ProbeError> {
		self.probed.push(address);

		(self.timing)(address).ok_or(ProbeError::Allocation(AllocationError::Moved {
			requested: address,
			actual: address.wrapping_add(0x1000)
		}))
	}
}
