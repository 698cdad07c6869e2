//! Human readable rendering of a run's result.

use std::io::Write;

use crate::{
	target::TargetDescriptor,
	validate::{ConfirmedHit, NoMatch}
};

/// Writes one block per hit, addresses rendered as kernel-space addresses.
pub fn write_hits(
	mut out: impl Write,
	first: &TargetDescriptor,
	second: &TargetDescriptor,
	hits: &[ConfirmedHit],
	kernel_high_bits: u64
) -> std::io::Result<()> {
	for hit in hits {
		writeln!(
			out,
			"[x] potential hit @ {} : {}",
			hit.first_address, hit.second_address
		)?;
		writeln!(
			out,
			"[x] {} @ {}",
			first.name(),
			hit.first_address.with_high_bits(kernel_high_bits)
		)?;
		writeln!(
			out,
			"[x] {} @ {}",
			second.name(),
			hit.second_address.with_high_bits(kernel_high_bits)
		)?;
		writeln!(
			out,
			"[x] potential module base address @ {}",
			hit.module_base.with_high_bits(kernel_high_bits)
		)?;
	}

	Ok(())
}

pub fn write_no_match(mut out: impl Write, no_match: &NoMatch) -> std::io::Result<()> {
	writeln!(out, "[!] did not find a possible match")?;
	writeln!(out, "[!] {}", no_match)?;

	Ok(())
}

/// Writes either the hits or the no match guidance.
pub fn write_report(
	out: impl Write,
	first: &TargetDescriptor,
	second: &TargetDescriptor,
	result: &Result<Vec<ConfirmedHit>, NoMatch>,
	kernel_high_bits: u64
) -> std::io::Result<()> {
	match result {
		Ok(hits) => write_hits(out, first, second, hits, kernel_high_bits),
		Err(no_match) => write_no_match(out, no_match)
	}
}
