//! Cross-validation of the candidates of two functions of the same module.

use thiserror::Error;

use crate::{
	common::Address,
	scanner::CandidateTopK,
	target::TargetDescriptor
};

/// Returned when no pair of candidates is exactly the known distance apart.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
	"no candidate pair of {first} and {second} is 0x{delta:x} bytes apart; verify the function \
	 offsets for the target build and run again, or widen the search bound or the top-k capacity"
)]
pub struct NoMatch {
	pub first: String,
	pub second: String,
	pub delta: u64
}

/// Two candidates whose distance matches the known offset delta, and the module base they imply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfirmedHit {
	pub first_address: Address,
	pub second_address: Address,
	pub module_base: Address
}

/// Pairs every candidate of `first` with every candidate of `second`.
///
/// Each pair whose distance equals the distance of the two function offsets is a hit. All
/// hits are returned, highest scoring candidates of `first` first.
pub fn validate(
	first: &TargetDescriptor,
	first_candidates: &CandidateTopK,
	second: &TargetDescriptor,
	second_candidates: &CandidateTopK
) -> Result<Vec<ConfirmedHit>, NoMatch> {
	let delta = first.function_offset.wrapping_sub(second.function_offset);

	let mut hits = Vec::new();
	for a in first_candidates.iter().rev() {
		for b in second_candidates.iter().rev() {
			if a.address.delta(b.address) == delta {
				hits.push(ConfirmedHit {
					first_address: a.address,
					second_address: b.address,
					module_base: a.address.wrapping_sub(first.function_offset)
				});
			}
		}
	}

	if hits.is_empty() {
		return Err(NoMatch {
			first: first.name().to_string(),
			second: second.name().to_string(),
			delta
		})
	}

	Ok(hits)
}

#[cfg(test)]
mod test {
	use super::{validate, ConfirmedHit, NoMatch};
	use crate::{
		common::Address,
		scanner::{Candidate, CandidateTopK},
		target::{KVM_CPUID, KVM_EMULATE_HYPERCALL}
	};

	fn top_k(candidates: &[(u64, u64)]) -> CandidateTopK {
		let mut top = CandidateTopK::new(8);
		for (address, score) in candidates {
			top.insert(Candidate::new(Address::new(*address), *score));
		}

		top
	}

	#[test]
	fn test_validate_single_hit() {
		let address_a = 0x1000u64;
		let address_b = address_a.wrapping_sub(0x3ead0 - 0xf650);

		let first = top_k(&[(0x7000, 50), (address_a, 40), (0x9000, 30)]);
		let second = top_k(&[(0x5000, 60), (address_b, 20), (0x3000, 10)]);

		let hits = validate(&KVM_CPUID, &first, &KVM_EMULATE_HYPERCALL, &second).unwrap();

		assert_eq!(
			hits,
			&[ConfirmedHit {
				first_address: Address::new(address_a),
				second_address: Address::new(address_b),
				module_base: Address::new(address_a.wrapping_sub(0x3ead0))
			}]
		);
	}

	#[test]
	fn test_validate_reports_all_hits() {
		let delta = 0x3ead0 - 0xf650;
		let first = top_k(&[(0x10000 + delta, 10), (0x20000 + delta, 20)]);
		let second = top_k(&[(0x10000, 10), (0x20000, 20), (0x30000, 30)]);

		let hits = validate(&KVM_CPUID, &first, &KVM_EMULATE_HYPERCALL, &second).unwrap();

		let bases = hits.iter().map(|hit| hit.module_base.get()).collect::<Vec<_>>();
		assert_eq!(
			bases,
			&[
				0x20000 + delta - 0x3ead0,
				0x10000 + delta - 0x3ead0
			]
		);
	}

	#[test]
	fn test_validate_no_match() {
		let first = top_k(&[(0x1000, 40), (0x2000, 30)]);
		let second = top_k(&[(0x1000, 40), (0x3000, 30)]);

		let result = validate(&KVM_CPUID, &first, &KVM_EMULATE_HYPERCALL, &second);

		assert_eq!(
			result,
			Err(NoMatch {
				first: "kvm_cpuid".to_string(),
				second: "kvm_emulate_hypercall".to_string(),
				delta: 0x3ead0 - 0xf650
			})
		);
	}

	#[test]
	fn test_validate_empty_sets() {
		let empty = CandidateTopK::new(8);

		assert!(validate(&KVM_CPUID, &empty, &KVM_EMULATE_HYPERCALL, &empty).is_err());
	}
}
