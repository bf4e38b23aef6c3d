use super::{wiring, PinError, PinInterface};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";
pub const DEFAULT_EXPORT_WAIT: Duration = Duration::from_secs(1);
const EXPORT_POLL: Duration = Duration::from_millis(20);

/// Labels of the SoC pin controllers that own the 40-pin header.
const HEADER_CHIP_LABELS: &[&str] = &["pinctrl-bcm", "pinctrl-rp1"];

/// Linux sysfs GPIO backend. Pins are wiringPi numbers; the kernel line is
/// the Broadcom number offset by the base of the header's gpiochip.
pub struct SysfsPins {
    root: PathBuf,
    chip_base: Option<u32>,
    export_wait: Duration,
}

impl SysfsPins {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chip_base: None,
            export_wait: DEFAULT_EXPORT_WAIT,
        }
    }

    /// Skip gpiochip discovery and use `base` as the header's first line.
    pub fn with_chip_base(mut self, base: u32) -> Self {
        self.chip_base = Some(base);
        self
    }

    /// How long to wait for a freshly exported line to become usable.
    pub fn with_export_wait(mut self, wait: Duration) -> Self {
        self.export_wait = wait;
        self
    }

    /// Kernel line number for wiringPi `pin`.
    pub fn line_number(&mut self, pin: u32) -> Result<u32, PinError> {
        let bcm = wiring::bcm_line(pin).ok_or(PinError::UnknownPin(pin))?;
        let base = match self.chip_base {
            Some(base) => base,
            None => {
                let base = self.discover_chip_base();
                self.chip_base = Some(base);
                base
            }
        };
        Ok(base + bcm)
    }

    /// Base of the header's gpiochip: the SoC pin controller when it can be
    /// identified, otherwise the lowest base present, otherwise 0.
    fn discover_chip_base(&self) -> u32 {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return 0;
        };

        let mut chips: Vec<(u32, String)> = entries
            .flatten()
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("gpiochip"))
            .filter_map(|entry| {
                let dir = entry.path();
                let base = fs::read_to_string(dir.join("base")).ok()?;
                let base = base.trim().parse::<u32>().ok()?;
                let label = fs::read_to_string(dir.join("label")).unwrap_or_default();
                Some((base, label.trim().to_string()))
            })
            .collect();
        chips.sort_by_key(|(base, _)| *base);

        let header = chips.iter().find(|(_, label)| {
            HEADER_CHIP_LABELS
                .iter()
                .any(|prefix| label.starts_with(prefix))
        });
        let base = header.or(chips.first()).map_or(0, |(base, _)| *base);

        tracing::debug!(
            base,
            chips = chips.len(),
            root = %self.root.display(),
            "GPIO chip base resolved"
        );
        base
    }

    fn line_dir(&mut self, pin: u32) -> Result<PathBuf, PinError> {
        let line = self.line_number(pin)?;
        Ok(self.root.join(format!("gpio{}", line)))
    }

    /// Poll until the exported line's `direction` attribute is writable.
    /// udev may create the directory and fix its permissions after a delay.
    fn wait_for_export(&self, dir: &Path) -> bool {
        let direction = dir.join("direction");
        let deadline = Instant::now() + self.export_wait;
        loop {
            if fs::OpenOptions::new().write(true).open(&direction).is_ok() {
                return true;
            }
            if Instant::now() >= deadline {
                return dir.exists();
            }
            std::thread::sleep(EXPORT_POLL);
        }
    }

    fn io_err(pin: u32) -> impl FnOnce(std::io::Error) -> PinError {
        move |source| PinError::Io { pin, source }
    }

    fn read_attr(path: &Path, pin: u32) -> Result<String, PinError> {
        fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(Self::io_err(pin))
    }
}

impl Default for SysfsPins {
    fn default() -> Self {
        Self::new(DEFAULT_GPIO_ROOT)
    }
}

impl PinInterface for SysfsPins {
    fn setup_output(&mut self, pin: u32) -> Result<(), PinError> {
        let line = self.line_number(pin)?;
        let dir = self.root.join(format!("gpio{}", line));
        if !dir.exists() {
            fs::write(self.root.join("export"), line.to_string()).map_err(Self::io_err(pin))?;
            if !self.wait_for_export(&dir) {
                return Err(PinError::NotExported(pin));
            }
        }

        // Rewriting "out" resets the line low, so leave an existing output alone.
        let direction = dir.join("direction");
        if Self::read_attr(&direction, pin)? != "out" {
            fs::write(&direction, "out").map_err(Self::io_err(pin))?;
        }

        tracing::debug!(pin, line, root = %self.root.display(), "GPIO configured as output");
        Ok(())
    }

    fn read(&mut self, pin: u32) -> Result<bool, PinError> {
        let value = self.line_dir(pin)?.join("value");
        match Self::read_attr(&value, pin)?.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(PinError::InvalidValue {
                pin,
                value: other.to_string(),
            }),
        }
    }

    fn write(&mut self, pin: u32, value: bool) -> Result<(), PinError> {
        let raw = if value { "1" } else { "0" };
        fs::write(self.line_dir(pin)?.join("value"), raw).map_err(Self::io_err(pin))
    }
}
