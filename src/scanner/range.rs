use crate::common::Address;

/// Inclusive range of addresses visited in fixed steps.
///
/// The range is a value and can be swept any number of times, which is what lets the
/// baseline and the scored pass visit exactly the same addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressRange {
	low: Address,
	high: Address,
	step: u64
}
impl AddressRange {
	/// Creates a range covering `low`, `low + step`, ... up to and including `high`.
	///
	/// The range is empty if `low > high`.
	///
	/// ## Panics
	/// * If `step` is zero.
	pub fn new(low: Address, high: Address, step: u64) -> Self {
		assert!(step > 0, "step must be non-zero");

		AddressRange { low, high, step }
	}

	pub const fn low(&self) -> Address {
		self.low
	}

	pub const fn high(&self) -> Address {
		self.high
	}

	/// Index of the highest address in the range, or `None` if the range is empty.
	fn last_index(&self) -> Option<u64> {
		if self.low > self.high {
			None
		} else {
			Some((self.high.get() - self.low.get()) / self.step)
		}
	}

	/// Number of addresses in the range.
	///
	/// Returns `None` if the count does not fit in a `u64`, which only happens when the
	/// range covers the whole address space with a step of one.
	pub fn checked_len(&self) -> Option<u64> {
		match self.last_index() {
			None => Some(0),
			Some(last) => last.checked_add(1)
		}
	}

	pub fn is_empty(&self) -> bool {
		self.low > self.high
	}

	/// Returns a lazy sequence of the addresses in ascending order.
	pub fn sweep(&self) -> AddressSweep {
		AddressSweep {
			low: self.low,
			step: self.step,
			front: 0,
			back: self.last_index().unwrap_or(0),
			exhausted: self.is_empty()
		}
	}
}
impl IntoIterator for AddressRange {
	type IntoIter = AddressSweep;
	type Item = Address;

	fn into_iter(self) -> Self::IntoIter {
		self.sweep()
	}
}

/// Iterator over the addresses of an [`AddressRange`].
#[derive(Debug, Clone)]
pub struct AddressSweep {
	low: Address,
	step: u64,
	/// Index of the next address from the front.
	front: u64,
	/// Index of the next address from the back.
	back: u64,
	exhausted: bool
}
impl AddressSweep {
	fn address_at(&self, index: u64) -> Address {
		self.low.wrapping_add(index.wrapping_mul(self.step))
	}

	fn remaining(&self) -> Option<u64> {
		if self.exhausted {
			Some(0)
		} else {
			(self.back - self.front).checked_add(1)
		}
	}
}
impl Iterator for AddressSweep {
	type Item = Address;

	fn next(&mut self) -> Option<Self::Item> {
		if self.exhausted {
			return None
		}

		let address = self.address_at(self.front);
		if self.front == self.back {
			self.exhausted = true;
		} else {
			self.front += 1;
		}

		Some(address)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match self.remaining().and_then(|remaining| usize::try_from(remaining).ok()) {
			Some(remaining) => (remaining, Some(remaining)),
			None => (usize::MAX, None)
		}
	}
}
impl DoubleEndedIterator for AddressSweep {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.exhausted {
			return None
		}

		let address = self.address_at(self.back);
		if self.front == self.back {
			self.exhausted = true;
		} else {
			self.back -= 1;
		}

		Some(address)
	}
}
