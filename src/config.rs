use serde::{Deserialize, Serialize};

use crate::compiler::arch::{WordSize, MAX_WORD_BITS, MIN_WORD_BITS};

/// The shape of the simulated machine and how long it may run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub word_bits: u32,
    pub memory_size: usize,
    /// The most ticks a batch run will take before giving up
    pub max_ticks: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            word_bits: MIN_WORD_BITS,
            memory_size: 256,
            max_ticks: 100_000,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Yaml(serde_yaml::Error),
    InvalidWordBits(u32),
    /// The requested size and the largest addressable size
    InvalidMemorySize(usize, usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Yaml(e) => write!(f, "Could not read machine configuration: {}", e),
            ConfigError::InvalidWordBits(bits) => write!(
                f,
                "Word size of {} bits is not supported (must be {} to {})",
                bits, MIN_WORD_BITS, MAX_WORD_BITS
            ),
            ConfigError::InvalidMemorySize(size, max) => write!(
                f,
                "Memory size of {} words is not supported (must be 1 to {})",
                size, max
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl MachineConfig {
    /// Loads a configuration from YAML.  Missing fields take their default.
    pub fn read<R: std::io::Read>(reader: R) -> Result<MachineConfig, ConfigError> {
        let config: MachineConfig = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Checks that the machine can be built and returns its word size.
    pub fn validate(&self) -> Result<WordSize, ConfigError> {
        let word_size =
            WordSize::new(self.word_bits).ok_or(ConfigError::InvalidWordBits(self.word_bits))?;
        let max = word_size.size() as usize;
        if self.memory_size == 0 || self.memory_size > max {
            return Err(ConfigError::InvalidMemorySize(self.memory_size, max));
        }
        Ok(word_size)
    }
}
