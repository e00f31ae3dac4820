use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::mode::ValidationMode;
use crate::state::{StateSettings, Transformation};

/// Options accepted by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationOptions {
    pub validation: ValidationMode,
    /// Report keys no schema declares. The failure is an error under hard validation and
    /// a warning otherwise.
    pub fail_on_unknown_keys: bool,
    /// Drop keys no schema declares from the output.
    pub remove_unknown_keys: bool,
    /// Inputs are only ever borrowed. When this is set, payloads copied from the input
    /// into the output (for retained unknown keys) may share custom payload storage with
    /// the input instead of being duplicated.
    pub ok_to_mutate_input_value: bool,
    /// Async operations never yield to the scheduler.
    pub force_sync: bool,
    /// Overrides the process-wide [`EngineConfig`] for this call.
    pub config: Option<EngineConfig>,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Hard,
            fail_on_unknown_keys: false,
            remove_unknown_keys: false,
            ok_to_mutate_input_value: false,
            force_sync: false,
            config: None,
        }
    }
}

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn fail_on_unknown_keys(mut self, fail: bool) -> Self {
        self.fail_on_unknown_keys = fail;
        self
    }

    pub fn remove_unknown_keys(mut self, remove: bool) -> Self {
        self.remove_unknown_keys = remove;
        self
    }

    pub fn ok_to_mutate_input_value(mut self, ok: bool) -> Self {
        self.ok_to_mutate_input_value = ok;
        self
    }

    pub fn force_sync(mut self, force: bool) -> Self {
        self.force_sync = force;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub(crate) fn settings(&self, transformation: Transformation, asynchronous: bool) -> StateSettings {
        let config = self.config.unwrap_or_else(EngineConfig::global);
        let max_work_interval = if asynchronous && !self.force_sync {
            Some(config.async_max_work_interval())
        } else {
            None
        };
        StateSettings {
            transformation,
            validation: self.validation,
            config,
            max_work_interval,
            fail_on_unknown_keys: self.fail_on_unknown_keys,
            remove_unknown_keys: self.remove_unknown_keys,
            ok_to_mutate_input_value: self.ok_to_mutate_input_value,
        }
    }
}
