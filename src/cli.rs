use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::logic::LoopTiming;
use crate::pins::SysfsPins;

#[derive(Parser, Debug)]
#[command(
    name = "tempmon",
    version,
    about = "Drive GPIO outputs from temperature thresholds"
)]
pub struct Cli {
    /// Path to the JSON rule file [default: ./config.json]
    pub config: Option<PathBuf>,

    /// Milliseconds between evaluation passes
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Granularity of the inter-pass sleep, bounds shutdown latency
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub slice_ms: u64,

    /// Give up on a single sensor read after this many milliseconds
    #[arg(long, default_value_t = 500)]
    pub read_timeout_ms: u64,

    /// sysfs GPIO class directory
    #[arg(long, default_value = crate::pins::sysfs::DEFAULT_GPIO_ROOT)]
    pub gpio_root: PathBuf,

    /// First kernel line of the header's gpiochip [default: detected]
    #[arg(long)]
    pub gpio_base: Option<u32>,

    /// Drive in-memory outputs instead of real GPIO lines
    #[arg(long)]
    pub dry_run: bool,

    /// Validate the rule file, sample each source once and exit
    #[arg(long)]
    pub check: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn timing(&self) -> LoopTiming {
        LoopTiming::new(
            Duration::from_millis(self.interval_ms),
            Duration::from_millis(self.slice_ms),
        )
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn sysfs_pins(&self) -> SysfsPins {
        let pins = SysfsPins::new(self.gpio_root.clone());
        match self.gpio_base {
            Some(base) => pins.with_chip_base(base),
            None => pins,
        }
    }
}
