//! Field and element action pipelines
//!
//! An action is either a filter, which may replace the value, or a
//! validator, which only inspects it. Validators are typed so they cannot
//! change the value they are given.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::errors::SchemaResult;
use super::path::FieldPath;

type FilterFn = dyn Fn(Value, &FieldPath) -> SchemaResult<Value> + Send + Sync;
type ValidatorFn = dyn Fn(&Value, &FieldPath) -> SchemaResult<()> + Send + Sync;

/// Whether an action may transform its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Filter,
    Validator,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Filter => write!(f, "filter"),
            ActionKind::Validator => write!(f, "validator"),
        }
    }
}

#[derive(Clone)]
enum Step {
    Filter(Arc<FilterFn>),
    Validator(Arc<ValidatorFn>),
}

/// A named step in a pipeline.
///
/// Cloning is cheap: the underlying closure is shared.
#[derive(Clone)]
pub struct Action {
    name: String,
    step: Step,
}

impl Action {
    /// Creates a filter action.
    pub fn filter<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &FieldPath) -> SchemaResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            step: Step::Filter(Arc::new(f)),
        }
    }

    /// Creates a validator action.
    pub fn validator<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &FieldPath) -> SchemaResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            step: Step::Validator(Arc::new(f)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActionKind {
        match self.step {
            Step::Filter(_) => ActionKind::Filter,
            Step::Validator(_) => ActionKind::Validator,
        }
    }

    /// Runs the action on `value` located at `path`.
    pub fn run(&self, value: Value, path: &FieldPath) -> SchemaResult<Value> {
        match &self.step {
            Step::Filter(f) => f(value, path),
            Step::Validator(v) => {
                v(&value, path)?;
                Ok(value)
            }
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind())
            .field("name", &self.name)
            .finish()
    }
}

/// Runs `actions` in order, feeding each result into the next.
pub fn run_pipeline(actions: &[Action], value: Value, path: &FieldPath) -> SchemaResult<Value> {
    actions
        .iter()
        .try_fold(value, |current, action| action.run(current, path))
}
