//! Run configuration.

use thiserror::Error;

use crate::{
	common::Address,
	measure::HostTransition,
	scanner::AddressRange,
	target::{TargetDescriptor, KVM_CPUID, KVM_EMULATE_HYPERCALL}
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("step size must be non-zero")]
	ZeroStep,
	#[error("trial count must be non-zero")]
	ZeroTrials,
	#[error("warm-up iteration count must be non-zero")]
	ZeroWarmup,
	#[error("outlier multiplier must be non-zero")]
	ZeroOutlierMultiplier,
	#[error("top-k capacity must be non-zero")]
	ZeroTopK,
	#[error("executable region size must be non-zero")]
	ZeroRegionSize,
	#[error("exactly two targets are needed for cross-validation, got {0}")]
	TargetCount(usize),
	#[error("target {0} has no probe offsets")]
	NoProbeOffsets(String),
	#[error("targets {0} and {1} share the same function offset")]
	DuplicateOffset(String, String),
	#[error("search range of target {0} starts past the end of the address space")]
	RangeWraps(String),
	#[error("search range of target {0} holds more addresses than can be counted")]
	RangeTooLong(String)
}

/// All tunables of one run.
///
/// The default values are the ones known to work against a KVM host on Intel parts.
#[derive(Debug, Clone)]
pub struct Config {
	/// Lowest guessed module base. The scan of each target starts at this plus the function offset.
	pub search_low: Address,
	/// Highest address scanned (inclusive).
	pub search_high: Address,
	/// Distance between two scanned addresses.
	pub step_size: u64,
	/// Scores above `outlier_multiplier * baseline` are discarded as noise.
	pub outlier_multiplier: u64,
	/// Number of best candidates kept per target.
	pub top_k: usize,
	/// Untimed executions before each timed one.
	pub warmup_iters: usize,
	/// Timed measurements averaged into one probe sample.
	pub trials: usize,
	/// Size of the executable region mapped at each probed address.
	pub region_size: usize,
	/// Bits set on scanned addresses to render them as kernel-space addresses.
	pub kernel_high_bits: u64,
	/// Guest-to-host transition issued before each timed execution.
	pub host_transition: HostTransition,
	/// The two functions whose relative offset confirms a hit.
	pub targets: Vec<TargetDescriptor>
}
impl Config {
	pub const DEFAULT_SEARCH_LOW: u64 = 0xfc0000000;
	pub const DEFAULT_SEARCH_HIGH: u64 = 0xfc09f0000;
	pub const DEFAULT_KERNEL_HIGH_BITS: u64 = 0xffffffff00000000;

	pub fn validate(&self) -> Result<(), ConfigError> {
		self.validated_targets().map(|_| ())
	}

	/// Validates the configuration and returns the two targets to cross-validate.
	pub fn validated_targets(&self) -> Result<(&TargetDescriptor, &TargetDescriptor), ConfigError> {
		if self.step_size == 0 {
			return Err(ConfigError::ZeroStep)
		}
		if self.trials == 0 {
			return Err(ConfigError::ZeroTrials)
		}
		if self.warmup_iters == 0 {
			return Err(ConfigError::ZeroWarmup)
		}
		if self.outlier_multiplier == 0 {
			return Err(ConfigError::ZeroOutlierMultiplier)
		}
		if self.top_k == 0 {
			return Err(ConfigError::ZeroTopK)
		}
		if self.region_size == 0 {
			return Err(ConfigError::ZeroRegionSize)
		}

		let (first, second) = match self.targets.as_slice() {
			[first, second] => (first, second),
			targets => return Err(ConfigError::TargetCount(targets.len()))
		};
		for target in [first, second] {
			if target.probe_offsets().is_empty() {
				return Err(ConfigError::NoProbeOffsets(target.name().to_string()))
			}

			let low = self
				.search_low
				.get()
				.checked_add(target.function_offset)
				.ok_or_else(|| ConfigError::RangeWraps(target.name().to_string()))?;
			let range = AddressRange::new(Address::new(low), self.search_high, self.step_size);
			if range.checked_len().is_none() {
				return Err(ConfigError::RangeTooLong(target.name().to_string()))
			}
		}
		if first.function_offset == second.function_offset {
			return Err(ConfigError::DuplicateOffset(
				first.name().to_string(),
				second.name().to_string()
			))
		}

		Ok((first, second))
	}
}
impl Default for Config {
	fn default() -> Self {
		Config {
			search_low: Address::new(Self::DEFAULT_SEARCH_LOW),
			search_high: Address::new(Self::DEFAULT_SEARCH_HIGH),
			step_size: 0x1000,
			outlier_multiplier: 8,
			top_k: 8,
			warmup_iters: 50,
			trials: 50,
			region_size: 2048,
			kernel_high_bits: Self::DEFAULT_KERNEL_HIGH_BITS,
			host_transition: HostTransition::Auto,
			targets: vec![KVM_CPUID, KVM_EMULATE_HYPERCALL]
		}
	}
}
