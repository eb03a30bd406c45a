use crate::error::ConfigError;
use crate::models::Algorithm;

/// Read granularity. Also bounds cancellation latency to one block read.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub block_size: usize,
    pub algorithms: Vec<Algorithm>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            block_size: DEFAULT_BLOCK_SIZE,
            algorithms: Algorithm::defaults(),
        }
    }
}

impl CheckConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        Ok(())
    }
}
