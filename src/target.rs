//! Descriptors of the hypervisor functions that get probed.

use std::borrow::Cow;

/// One hypervisor function to locate.
///
/// The offsets are specific to one build of the module and have to be looked up
/// for the target host beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
	/// Symbol name, used only for reporting.
	pub name: Cow<'static, str>,
	/// Offset of the function from the module base.
	pub function_offset: u64,
	/// Offsets inside the function at which a branch instruction is known to exist.
	pub probe_offsets: Cow<'static, [u16]>
}
impl TargetDescriptor {
	pub const fn new_static(
		name: &'static str,
		function_offset: u64,
		probe_offsets: &'static [u16]
	) -> Self {
		TargetDescriptor {
			name: Cow::Borrowed(name),
			function_offset,
			probe_offsets: Cow::Borrowed(probe_offsets)
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn probe_offsets(&self) -> &[u16] {
		&self.probe_offsets
	}
}
impl std::fmt::Display for TargetDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{} (+0x{:x})", self.name, self.function_offset)
	}
}

pub const KVM_CPUID: TargetDescriptor =
	TargetDescriptor::new_static("kvm_cpuid", 0x3ead0, &[0, 50, 69, 144]);

pub const KVM_EMULATE_HYPERCALL: TargetDescriptor =
	TargetDescriptor::new_static("kvm_emulate_hypercall", 0xf650, &[0, 47, 56, 66]);
