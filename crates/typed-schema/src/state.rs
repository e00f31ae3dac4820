//! Per-operation mutable context.

use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::mode::{ModePreference, ModeResolver, ValidationMode};
use crate::path::LazyPath;
use crate::schema::SchemaType;
use crate::value::Value;

/// Which conversion an operation performs while it validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transformation {
    None,
    Serialize,
    Deserialize,
    Clone,
}

/// Side effect applied to the root output once the whole tree has been traversed.
pub(crate) type DeferredOperation = Box<dyn FnOnce(&mut Value) + Send>;

#[derive(Debug, Clone)]
pub(crate) enum KnownKeys {
    All,
    Declared(Vec<String>),
}

/// One schema's view of the keys of the object at `path`.
#[derive(Debug, Clone)]
pub(crate) struct UnknownKeysRecord {
    pub path: LazyPath,
    pub known: KnownKeys,
    pub observed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    deferred: usize,
    unknown_keys: usize,
}

/// Settings an operation starts from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StateSettings {
    pub transformation: Transformation,
    pub validation: ValidationMode,
    pub config: EngineConfig,
    /// `None` never yields.
    pub max_work_interval: Option<Duration>,
    pub fail_on_unknown_keys: bool,
    pub remove_unknown_keys: bool,
    pub ok_to_mutate_input_value: bool,
}

pub struct InternalState {
    settings: StateSettings,
    modes: ModeResolver,
    work_started: Instant,
    deferred: Vec<DeferredOperation>,
    unknown_keys: Vec<UnknownKeysRecord>,
    async_required: Option<SchemaType>,
}

impl InternalState {
    pub(crate) fn new(settings: StateSettings) -> Self {
        Self {
            modes: ModeResolver::new(settings.validation),
            settings,
            work_started: Instant::now(),
            deferred: Vec::new(),
            unknown_keys: Vec::new(),
            async_required: None,
        }
    }

    /// A throwaway state for probing a value against a schema without leaking deferred
    /// operations or unknown-key records into this operation.
    pub(crate) fn isolated(
        &self,
        transformation: Transformation,
        validation: ValidationMode,
    ) -> InternalState {
        let mut state = InternalState::new(StateSettings {
            transformation,
            validation,
            fail_on_unknown_keys: false,
            remove_unknown_keys: false,
            ..self.settings
        });
        state.work_started = self.work_started;
        state
    }

    /// Carries the yield clock and misuse markers of an isolated trial state back.
    pub(crate) fn absorb(&mut self, trial: InternalState) {
        self.work_started = self.work_started.max(trial.work_started);
        if self.async_required.is_none() {
            self.async_required = trial.async_required;
        }
    }

    pub fn transformation(&self) -> Transformation {
        self.settings.transformation
    }

    pub fn operation_validation(&self) -> ValidationMode {
        self.modes.base()
    }

    pub(crate) fn complexity_threshold(&self) -> u64 {
        self.settings.config.async_time_complexity_threshold
    }

    // ------------------------------------------------------------------
    // Cooperative yielding

    pub fn should_relax(&self) -> bool {
        match self.settings.max_work_interval {
            Some(interval) => self.work_started.elapsed() >= interval,
            None => false,
        }
    }

    /// Hands control back to the scheduler, then restarts the work clock.
    pub async fn relax(&mut self) {
        if self.settings.max_work_interval.is_none() {
            return;
        }
        tracing::trace!(target: "typed_schema", "relaxing validation");
        tokio::task::yield_now().await;
        self.work_started = Instant::now();
    }

    // ------------------------------------------------------------------
    // Deferred operations

    pub(crate) fn defer(&mut self, op: impl FnOnce(&mut Value) + Send + 'static) {
        self.deferred.push(Box::new(op));
    }

    /// Copies `value` into the output object at `path` under `key` unless that key was
    /// already produced by a schema.
    pub(crate) fn defer_retain(&mut self, path: &LazyPath, key: String, value: &Value) {
        let copy = if self.settings.ok_to_mutate_input_value {
            value.clone()
        } else {
            value.deep_clone()
        };
        let path = path.clone();
        self.defer(move |root| {
            if let Some(Value::Object(map)) = root.get_path_mut(&path.resolve().parts) {
                map.entry(key).or_insert(copy);
            }
        });
    }

    pub(crate) fn run_deferred(&mut self, output: &mut Value) {
        for op in self.deferred.drain(..) {
            op(output);
        }
    }

    // ------------------------------------------------------------------
    // Unknown keys

    pub(crate) fn tracks_unknown_keys(&self) -> bool {
        self.settings.fail_on_unknown_keys || self.settings.remove_unknown_keys
    }

    pub(crate) fn fail_on_unknown_keys(&self) -> bool {
        self.settings.fail_on_unknown_keys
    }

    pub(crate) fn remove_unknown_keys(&self) -> bool {
        self.settings.remove_unknown_keys
    }

    pub(crate) fn allow_all_keys(&mut self, path: &LazyPath) {
        if self.tracks_unknown_keys() {
            self.unknown_keys.push(UnknownKeysRecord {
                path: path.clone(),
                known: KnownKeys::All,
                observed: Vec::new(),
            });
        }
    }

    pub(crate) fn note_keys(&mut self, path: &LazyPath, declared: Vec<String>, observed: Vec<String>) {
        if self.tracks_unknown_keys() {
            self.unknown_keys.push(UnknownKeysRecord {
                path: path.clone(),
                known: KnownKeys::Declared(declared),
                observed,
            });
        }
    }

    pub(crate) fn take_unknown_keys(&mut self) -> Vec<UnknownKeysRecord> {
        std::mem::take(&mut self.unknown_keys)
    }

    // ------------------------------------------------------------------
    // Speculative branches

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            deferred: self.deferred.len(),
            unknown_keys: self.unknown_keys.len(),
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.deferred.truncate(checkpoint.deferred);
        self.unknown_keys.truncate(checkpoint.unknown_keys);
    }

    // ------------------------------------------------------------------
    // Validation modes

    pub(crate) fn push_preference(&mut self, preference: ModePreference) {
        self.modes.push(preference);
    }

    pub(crate) fn pop_preferences(&mut self, count: usize) {
        self.modes.pop(count);
    }

    pub(crate) fn resolve_mode(&self) -> ValidationMode {
        self.modes.resolve()
    }

    pub(crate) fn enter_container(&mut self) {
        self.modes.enter_container();
    }

    pub(crate) fn exit_container(&mut self) {
        self.modes.exit_container();
    }

    // ------------------------------------------------------------------
    // Misuse

    pub(crate) fn mark_async_required(&mut self, schema_type: SchemaType) {
        if self.async_required.is_none() {
            self.async_required = Some(schema_type);
        }
    }

    pub(crate) fn async_required(&self) -> Option<SchemaType> {
        self.async_required
    }
}
