/// Instruction used to force a guest-to-host transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostTransition {
	/// Pick the instruction from the CPU vendor.
	Auto,
	/// Intel VT-x hypercall.
	Vmcall,
	/// AMD-V hypercall.
	Vmmcall,
	/// Do not transition at all.
	///
	/// Needed when not running inside a guest, where both hypercall instructions fault.
	Disabled
}

/// Trait implemented on cycle-accurate timers.
///
/// Implementations must be monotonic and serialize execution immediately before reading
/// the start timestamp and immediately after reading the end timestamp, so that out-of-order
/// execution can neither shrink nor pad the measured interval.
pub trait CycleTimer {
	/// Measures one execution of `target` in cycles.
	///
	/// `target` is first executed a number of untimed warm-up iterations to drive the branch
	/// predictor into a steady state, then a host transition is issued, then exactly one
	/// execution is timed.
	///
	/// Returns a single raw sample, averaging is left to the caller.
	fn measure(&mut self, target: &mut dyn FnMut()) -> u64;
}
impl<T: CycleTimer + ?Sized> CycleTimer for &mut T {
	fn measure(&mut self, target: &mut dyn FnMut()) -> u64 {
		(**self).measure(target)
	}
}
