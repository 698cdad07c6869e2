//! Hypervisor module base locator.
//!
//! Recovers the load address of a KVM module from inside an unprivileged guest by timing
//! branch target buffer collisions between a gadget mapped at guessed guest addresses and
//! known branches inside two host functions. The two resulting candidate sets are
//! cross-validated with the known distance of the two functions.

pub mod common;
pub mod config;
pub mod target;

pub mod measure;
pub mod memory;
pub mod platform;

pub mod scanner;
pub mod validate;

pub mod locate;
pub mod report;

pub mod prelude;

#[cfg(test)]
mod testing;
