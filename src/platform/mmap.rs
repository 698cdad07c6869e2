//! Anonymous `mmap` implementation of executable memory.

use crate::{
	common::Address,
	memory::{AllocationError, ExecutableMemory, GadgetEntry}
};

/// One mapping, unmapped on drop.
struct MappedRegion {
	base: *mut libc::c_void,
	length: usize
}
impl MappedRegion {
	/// Maps `length` bytes read-write-execute at exactly `page`.
	///
	/// `MAP_FIXED_NOREPLACE` refuses to clobber existing mappings, and kernels that do not
	/// know the flag treat it as a hint, so the returned address is checked as well.
	fn map(page: Address, length: usize) -> Result<Self, AllocationError> {
		let base = unsafe {
			libc::mmap(
				page.get() as *mut libc::c_void,
				length,
				libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
				libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_FIXED_NOREPLACE,
				-1,
				0
			)
		};
		if base == libc::MAP_FAILED {
			return Err(AllocationError::Map(
				page,
				std::io::Error::last_os_error()
			))
		}

		// constructed first so that a misplaced mapping is released as well
		let region = MappedRegion { base, length };
		let actual = Address::new(base as u64);
		if actual != page {
			return Err(AllocationError::Moved {
				requested: page,
				actual
			})
		}

		Ok(region)
	}
}
impl Drop for MappedRegion {
	fn drop(&mut self) {
		if unsafe { libc::munmap(self.base, self.length) } != 0 {
			log::error!(
				"could not unmap region at {:p}: {}",
				self.base,
				std::io::Error::last_os_error()
			);
		}
	}
}

/// Places gadgets by mapping fresh anonymous pages at the requested address.
#[derive(Debug, Clone)]
pub struct MmapMemory {
	page_size: u64
}
impl MmapMemory {
	pub fn new() -> Result<Self, std::io::Error> {
		let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
		if page_size <= 0 {
			return Err(std::io::Error::last_os_error())
		}

		Ok(MmapMemory {
			page_size: page_size as u64
		})
	}
}
impl ExecutableMemory for MmapMemory {
	fn with_executable_region<R>(
		&mut self,
		address: Address,
		size: usize,
		gadget: &[u8],
		body: impl FnOnce(GadgetEntry) -> R
	) -> Result<R, AllocationError> {
		if gadget.len() > size {
			return Err(AllocationError::GadgetTooLarge {
				gadget: gadget.len(),
				region: size
			})
		}

		let page = address.page_floor(self.page_size);
		let offset = address.delta(page) as usize;
		let page_size = self.page_size as usize;
		let length = (offset + size + page_size - 1) / page_size * page_size;

		let region = MappedRegion::map(page, length)?;

		// Safe because the region is mapped writable from `page` for `length` bytes and
		// `offset + gadget.len() <= offset + size <= length`.
		let entry = unsafe {
			let start = (region.base as *mut u8).add(offset);
			std::ptr::copy_nonoverlapping(gadget.as_ptr(), start, gadget.len());

			std::mem::transmute::<*mut u8, GadgetEntry>(start)
		};

		let result = body(entry);
		drop(region);

		Ok(result)
	}
}
