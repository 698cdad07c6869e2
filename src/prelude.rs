pub use crate::{
	common::Address,
	config::{Config, ConfigError},
	locate::{locate_module_base, Located},
	measure::{BranchTimingProbe, CycleTimer, HostTransition, TimingProbe},
	memory::{ExecutableMemory, BRANCH_GADGET},
	scanner::{AddressSpaceScanner, Candidate, CandidateTopK},
	target::TargetDescriptor,
	validate::{ConfirmedHit, NoMatch}
};
