//! Sweeping the guest address space for branch collisions with one host function.

pub mod candidate;
pub use candidate::{Candidate, CandidateTopK};

pub mod range;
pub use range::{AddressRange, AddressSweep};

use crate::{
	common::Address,
	config::Config,
	measure::TimingProbe,
	target::TargetDescriptor
};

/// Running mean of the timings of addresses that do not collide with anything.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
	pub sum: u64,
	pub count: u64,
	/// Addresses that could not be probed.
	pub skipped: u64
}
impl Baseline {
	/// Integer mean, zero if nothing was measured.
	pub fn average(&self) -> u64 {
		if self.count == 0 {
			0
		} else {
			self.sum / self.count
		}
	}
}

/// Counters of one scored pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
	pub baseline: u64,
	pub scored: u64,
	pub skipped: u64,
	pub outliers: u64
}

/// Scans the candidate range of a target in two passes.
///
/// The first pass measures every address once to establish the noise floor. The second
/// pass sums the timings at all probe offsets of the target and keeps the best scoring
/// addresses, discarding scores too far above the noise floor to be anything but
/// interference.
pub struct AddressSpaceScanner<'c, P: TimingProbe> {
	probe: P,
	config: &'c Config
}
impl<'c, P: TimingProbe> AddressSpaceScanner<'c, P> {
	pub fn new(probe: P, config: &'c Config) -> Self {
		AddressSpaceScanner { probe, config }
	}

	pub fn probe(&self) -> &P {
		&self.probe
	}

	pub fn into_probe(self) -> P {
		self.probe
	}

	/// Returns the addresses at which `target` could be located.
	///
	/// The low end wraps for a function offset that overflows the search start;
	/// [`Config::validate`] rejects such targets.
	pub fn range(&self, target: &TargetDescriptor) -> AddressRange {
		AddressRange::new(
			self.config.search_low.wrapping_add(target.function_offset),
			self.config.search_high,
			self.config.step_size
		)
	}

	/// Measures each address once, at the address itself.
	///
	/// Addresses that cannot be probed are counted as skipped and contribute nothing.
	pub fn baseline(&mut self, addresses: impl Iterator<Item = Address>) -> Baseline {
		let mut baseline = Baseline::default();

		for address in addresses {
			match self.probe.probe(address) {
				Ok(timing) => {
					baseline.sum = baseline.sum.saturating_add(timing);
					baseline.count += 1;
				}
				Err(err) => {
					log::debug!("skipping {} in baseline: {}", address, err);
					baseline.skipped += 1;
				}
			}
		}

		baseline
	}

	/// Scans for `target` and returns the best scoring candidates.
	pub fn scan(&mut self, target: &TargetDescriptor) -> CandidateTopK {
		let range = self.range(target);
		log::info!(
			"scanning {} over {}..={} in steps of 0x{:x}",
			target,
			range.low(),
			range.high(),
			self.config.step_size
		);

		let baseline = self.baseline(range.sweep());
		log::info!(
			"baseline for {}: {} cycles over {} addresses, {} skipped",
			target.name(),
			baseline.average(),
			baseline.count,
			baseline.skipped
		);

		let (candidates, stats) = self.scored_pass(target, range, baseline.average());
		log::info!(
			"scored {} addresses for {} against baseline {}: {} skipped, {} outliers, {} candidates kept",
			stats.scored,
			target.name(),
			stats.baseline,
			stats.skipped,
			stats.outliers,
			candidates.len()
		);

		candidates
	}

	fn scored_pass(
		&mut self,
		target: &TargetDescriptor,
		range: AddressRange,
		baseline: u64
	) -> (CandidateTopK, ScanStats) {
		let threshold = baseline.saturating_mul(self.config.outlier_multiplier);
		let mut candidates = CandidateTopK::new(self.config.top_k);
		let mut stats = ScanStats {
			baseline,
			..ScanStats::default()
		};

		'addresses: for address in range.sweep() {
			let mut score = 0u64;
			for offset in target.probe_offsets() {
				match self.probe.probe(address.wrapping_add(*offset as u64)) {
					Ok(timing) => score = score.saturating_add(timing),
					Err(err) => {
						// a partial score would be compared against full ones
						log::debug!("skipping {} at +{}: {}", address, offset, err);
						stats.skipped += 1;

						continue 'addresses
					}
				}
			}
			stats.scored += 1;

			if score > threshold {
				log::warn!("skipping outlier @ {} : {}", address, score);
				stats.outliers += 1;

				continue
			}

			let candidate = Candidate::new(address, score);
			if candidates.insert(candidate) {
				log::debug!("new candidate {}", candidate);
			}
		}

		(candidates, stats)
	}
}
