//! One complete run: scan both targets, then cross-validate.

use std::io::Write;

use crate::{
	config::{Config, ConfigError},
	measure::TimingProbe,
	report,
	scanner::{AddressSpaceScanner, CandidateTopK},
	target::TargetDescriptor,
	validate::{validate, ConfirmedHit, NoMatch}
};

/// Outcome of a run.
#[derive(Debug)]
pub struct Located<'c> {
	pub first: &'c TargetDescriptor,
	pub second: &'c TargetDescriptor,
	pub first_candidates: CandidateTopK,
	pub second_candidates: CandidateTopK,
	pub result: Result<Vec<ConfirmedHit>, NoMatch>
}
impl Located<'_> {
	pub fn hits(&self) -> &[ConfirmedHit] {
		match &self.result {
			Ok(hits) => hits,
			Err(_) => &[]
		}
	}

	pub fn write_report(&self, out: impl Write, kernel_high_bits: u64) -> std::io::Result<()> {
		report::write_report(out, self.first, self.second, &self.result, kernel_high_bits)
	}
}

/// Validates `config`, scans for both of its targets using `probe` and cross-validates
/// the candidates.
///
/// A run without a confirmed hit is not an error, it is reported in [`Located::result`].
pub fn locate_module_base<P: TimingProbe>(
	config: &Config,
	probe: P
) -> Result<Located<'_>, ConfigError> {
	let (first, second) = config.validated_targets()?;

	let mut scanner = AddressSpaceScanner::new(probe, config);
	let first_candidates = scanner.scan(first);
	let second_candidates = scanner.scan(second);

	let result = validate(first, &first_candidates, second, &second_candidates);
	match &result {
		Ok(hits) => log::info!("{} confirmed hit(s)", hits.len()),
		Err(no_match) => log::warn!("{}", no_match)
	}

	Ok(Located {
		first,
		second,
		first_candidates,
		second_candidates,
		result
	})
}

#[cfg(test)]
mod test {
	use super::locate_module_base;
	use crate::{
		common::Address,
		config::{Config, ConfigError},
		target::KVM_CPUID,
		testing::SyntheticProbe
	};

	fn config() -> Config {
		Config {
			search_low: Address::new(0x100000),
			search_high: Address::new(0x180000),
			top_k: 1,
			..Config::default()
		}
	}

	#[test]
	fn test_locate_finds_module_base() {
		let config = config();
		// module loaded at 0x120000
		let cpuid = Address::new(0x120000 + 0x3ead0);
		let hypercall = Address::new(0x120000 + 0xf650);
		let probe = SyntheticProbe::new(|address| {
			Some(if address == cpuid || address == hypercall { 40 } else { 10 })
		});

		let located = locate_module_base(&config, probe).unwrap();

		assert_eq!(located.first_candidates.best().unwrap().address, cpuid);
		assert_eq!(located.second_candidates.best().unwrap().address, hypercall);
		assert_eq!(located.hits().len(), 1);
		assert_eq!(located.hits()[0].module_base, Address::new(0x120000));

		let mut out = Vec::new();
		located.write_report(&mut out, config.kernel_high_bits).unwrap();
		assert!(String::from_utf8(out)
			.unwrap()
			.contains("[x] potential module base address @ ffffffff00120000"));
	}

	#[test]
	fn test_locate_reports_no_match() {
		let config = config();
		let cpuid = Address::new(0x120000 + 0x3ead0);
		// one page off from where the first target implies
		let hypercall = Address::new(0x121000 + 0xf650);
		let probe = SyntheticProbe::new(|address| {
			Some(if address == cpuid || address == hypercall { 40 } else { 10 })
		});

		let located = locate_module_base(&config, probe).unwrap();

		assert!(located.result.is_err());
		assert!(located.hits().is_empty());
	}

	#[test]
	fn test_locate_rejects_invalid_config() {
		let config = Config {
			trials: 0,
			..config()
		};
		let probe = SyntheticProbe::new(|_| Some(10));

		assert_eq!(
			locate_module_base(&config, probe).unwrap_err(),
			ConfigError::ZeroTrials
		);

		let config = Config {
			targets: vec![KVM_CPUID],
			..self::config()
		};
		let timings = SyntheticProbe::new(|_| Some(10));

		assert_eq!(
			locate_module_base(&config, timings).unwrap_err(),
			ConfigError::TargetCount(1)
		);
	}
}
