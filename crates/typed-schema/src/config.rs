//! Engine tunables.
//!
//! Every operation reads an [`EngineConfig`] once, at the moment it builds its internal
//! state: either the one passed in `OperationOptions::config` or the process-wide
//! default managed here.

use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ASYNC_MAX_WORK_INTERVAL_MS: u64 = 5;
pub const DEFAULT_ASYNC_TIME_COMPLEXITY_THRESHOLD: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long an async operation may work before yielding to the scheduler.
    pub async_max_work_interval_ms: u64,
    /// Upper bound on the summed estimated complexity of one traversal chunk; children
    /// costlier than this are validated through their own async contract.
    pub async_time_complexity_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            async_max_work_interval_ms: DEFAULT_ASYNC_MAX_WORK_INTERVAL_MS,
            async_time_complexity_threshold: DEFAULT_ASYNC_TIME_COMPLEXITY_THRESHOLD,
        }
    }
}

fn global_cell() -> &'static RwLock<EngineConfig> {
    static GLOBAL: OnceLock<RwLock<EngineConfig>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(EngineConfig::default()))
}

impl EngineConfig {
    pub fn async_max_work_interval(&self) -> Duration {
        Duration::from_millis(self.async_max_work_interval_ms)
    }

    /// The process-wide default.
    pub fn global() -> EngineConfig {
        match global_cell().read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set_global(config: EngineConfig) {
        match global_cell().write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}
