use anyhow::Context;
use kvm_baslr::{
	platform::simple::{SimpleCycleTimer, SimpleExecutableMemory},
	prelude::{locate_module_base, BranchTimingProbe, Config}
};

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::default();

	// Safe as long as this runs inside a guest, which is the only place the scan means anything.
	let timer = unsafe { SimpleCycleTimer::new(config.warmup_iters, config.host_transition) };
	let memory = SimpleExecutableMemory::new().context("could not query the page size")?;
	let probe = BranchTimingProbe::new(timer, memory, config.trials, config.region_size);

	let located = locate_module_base(&config, probe).context("invalid configuration")?;

	let stdout = std::io::stdout();
	located
		.write_report(stdout.lock(), config.kernel_high_bits)
		.context("could not write the report")?;

	Ok(())
}
