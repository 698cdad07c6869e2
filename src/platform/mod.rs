#[cfg(target_arch = "x86_64")]
pub mod tsc;

#[cfg(target_os = "linux")]
pub mod mmap;

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub mod simple;
