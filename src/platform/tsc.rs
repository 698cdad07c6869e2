//! Timestamp counter based timer for x86_64.

use std::arch::asm;
use std::sync::atomic::{compiler_fence, Ordering};

use raw_cpuid::CpuId;

use crate::measure::{CycleTimer, HostTransition};

/// Resolves [`HostTransition::Auto`] to the hypercall instruction of the running CPU.
///
/// Unknown vendors resolve to [`HostTransition::Disabled`].
pub fn resolve_host_transition(requested: HostTransition) -> HostTransition {
	if requested != HostTransition::Auto {
		return requested
	}

	let vendor = CpuId::new().get_vendor_info();
	match vendor.as_ref().map(|vendor| vendor.as_str()) {
		Some("GenuineIntel") => HostTransition::Vmcall,
		Some("AuthenticAMD") | Some("HygonGenuine") => HostTransition::Vmmcall,
		other => {
			log::warn!(
				"unknown cpu vendor {:?}, host transitions disabled",
				other
			);

			HostTransition::Disabled
		}
	}
}

/// ## Safety
/// * Must run inside a guest unless `transition` is [`HostTransition::Disabled`],
/// otherwise the instruction raises an invalid opcode fault.
#[inline(always)]
unsafe fn host_transition(transition: HostTransition) {
	// From an unprivileged guest context the hypervisor refuses the call and
	// only the world switch itself matters.
	match transition {
		HostTransition::Vmcall => asm!("vmcall", inout("rax") 0u64 => _, options(nostack)),
		HostTransition::Vmmcall => asm!("vmmcall", inout("rax") 0u64 => _, options(nostack)),
		HostTransition::Auto | HostTransition::Disabled => ()
	}
}

/// Full serializing barrier.
#[inline(always)]
fn serialize() {
	compiler_fence(Ordering::SeqCst);
	unsafe {
		// rbx is reserved by the compiler, so it is preserved by hand
		asm!(
			"mov {tmp}, rbx",
			"cpuid",
			"mov rbx, {tmp}",
			tmp = out(reg) _,
			inout("eax") 0u32 => _,
			inout("ecx") 0u32 => _,
			out("edx") _,
			options(nostack, preserves_flags)
		);
	}
	compiler_fence(Ordering::SeqCst);
}

#[inline(always)]
fn read_timestamp() -> u64 {
	let low: u32;
	let high: u32;
	unsafe {
		asm!(
			"rdtscp",
			out("eax") low,
			out("edx") high,
			out("ecx") _,
			options(nostack, nomem, preserves_flags)
		);
	}

	((high as u64) << 32) | low as u64
}

/// Timer using `cpuid` as the serializing barrier and `rdtscp` as the clock.
pub struct TscTimer {
	warmup_iters: usize,
	transition: HostTransition
}
impl TscTimer {
	/// Creates a new timer, resolving the host transition instruction.
	///
	/// ## Safety
	/// * Unless `transition` is [`HostTransition::Disabled`], every measurement issues a
	/// hypercall instruction, which faults when not running inside a guest.
	pub unsafe fn new(warmup_iters: usize, transition: HostTransition) -> Self {
		let transition = resolve_host_transition(transition);
		log::debug!("host transition: {:?}", transition);

		TscTimer {
			warmup_iters,
			transition
		}
	}

	/// Creates a timer that never leaves the guest.
	pub fn without_transition(warmup_iters: usize) -> Self {
		TscTimer {
			warmup_iters,
			transition: HostTransition::Disabled
		}
	}
}
impl CycleTimer for TscTimer {
	fn measure(&mut self, target: &mut dyn FnMut()) -> u64 {
		for _ in 0 .. self.warmup_iters {
			target();
		}

		// Safe because the constructor contract covers running outside of a guest.
		unsafe {
			host_transition(self.transition);
		}

		serialize();
		let start = read_timestamp();
		target();
		let end = read_timestamp();
		serialize();

		end.wrapping_sub(start)
	}
}
