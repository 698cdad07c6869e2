use thiserror::Error;

use crate::common::Address;

/// Entry point of a gadget installed in an executable region.
pub type GadgetEntry = unsafe extern "C" fn();

#[derive(Debug, Error)]
pub enum AllocationError {
	#[error("could not map executable region at {0}")]
	Map(Address, #[source] std::io::Error),
	#[error("region requested at {requested} was placed at {actual}")]
	Moved {
		requested: Address,
		actual: Address
	},
	#[error("gadget of {gadget} bytes does not fit into a region of {region} bytes")]
	GadgetTooLarge {
		gadget: usize,
		region: usize
	}
}

/// Trait implemented on abstractions over acquiring executable memory at exact addresses.
///
/// This is the only place where raw memory is touched; everything above it only ever
/// sees a [`GadgetEntry`] valid for the duration of the scope.
pub trait ExecutableMemory {
	/// Maps a read-write-execute region of `size` bytes starting at exactly `address`,
	/// copies `gadget` to its start and passes the entry point to `body`.
	///
	/// Fails if the region cannot be placed at `address`. The mapping must never be moved
	/// to a nearby address instead.
	///
	/// The region is released when this returns, including when `body` unwinds.
	fn with_executable_region<R>(
		&mut self,
		address: Address,
		size: usize,
		gadget: &[u8],
		body: impl FnOnce(GadgetEntry) -> R
	) -> Result<R, AllocationError>;
}
impl<T: ExecutableMemory> ExecutableMemory for &mut T {
	fn with_executable_region<R>(
		&mut self,
		address: Address,
		size: usize,
		gadget: &[u8],
		body: impl FnOnce(GadgetEntry) -> R
	) -> Result<R, AllocationError> {
		(**self).with_executable_region(address, size, gadget, body)
	}
}
