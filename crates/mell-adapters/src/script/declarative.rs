//! Scripts written as JSON step lists instead of code.
//!
//! Migration, one `set` per step, optionally repeated for every element of
//! a container:
//!
//! ```json
//! [
//!   {"set": "version", "value": 2},
//!   {"set": "active", "value": true, "foreach": "users"}
//! ]
//! ```
//!
//! Generator, one render per step (or per element with `foreach`):
//!
//! ```json
//! [
//!   {"template": "README.md", "output": "README.md"},
//!   {"asset": "project.txt", "foreach": "projects", "output": "project_{index}.txt"}
//! ]
//! ```
//!
//! In `output`, `{index}` is the 0-based position of the element and `{key}`
//! its map key (the position again for sequences).

use serde::Deserialize;
use thiserror::Error;

use mell_core::{
    application::{
        Generator, Invocation, Migration, ScriptResult,
        services::{Inflater, SourceKind},
    },
    domain::{Address, DomainError, MetaView, Value, path, type_name},
};

#[derive(Debug, Error)]
pub enum DeclarativeError {
    #[error("not a JSON step list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step {step}: {reason}")]
    Step { step: usize, reason: String },
}

impl DeclarativeError {
    fn step(step: usize, reason: impl Into<String>) -> Self {
        Self::Step {
            step,
            reason: reason.into(),
        }
    }
}

fn parse_address(step: usize, field: &str, text: &str) -> Result<Address, DeclarativeError> {
    Address::parse(text).map_err(|e| DeclarativeError::step(step, format!("{field}: {e}")))
}

// ── migrations ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSetStep {
    set: String,
    value: Value,
    #[serde(default)]
    foreach: Option<String>,
}

#[derive(Debug, Clone)]
struct SetStep {
    target: String,
    value: Value,
    foreach: Option<Address>,
}

/// Migration made of `set` steps.
#[derive(Debug, Clone)]
pub struct DeclarativeMigration {
    steps: Vec<SetStep>,
}

impl DeclarativeMigration {
    pub fn parse(source: &str) -> Result<Self, DeclarativeError> {
        let raw: Vec<RawSetStep> = serde_json::from_str(source)?;
        let steps = raw
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                parse_address(i, "set", &step.set)?;
                let foreach = step
                    .foreach
                    .as_deref()
                    .map(|text| parse_address(i, "foreach", text))
                    .transpose()?;
                Ok(SetStep {
                    target: step.set,
                    value: step.value,
                    foreach,
                })
            })
            .collect::<Result<_, DeclarativeError>>()?;
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Migration for DeclarativeMigration {
    fn migrate(&self, _args: &Invocation, meta: &mut MetaView<'_>) -> ScriptResult {
        for step in &self.steps {
            match &step.foreach {
                None => meta.set(&step.target, step.value.clone())?,
                Some(over) => {
                    for mut entry in meta.reborrow().into_at(over).into_entries()? {
                        entry.view().set(&step.target, step.value.clone())?;
                    }
                }
            }
        }
        Ok(())
    }
}

// ── generators ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRenderStep {
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    meta: Option<String>,
    #[serde(default)]
    foreach: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Debug, Clone)]
struct RenderStep {
    kind: SourceKind,
    source: String,
    meta: Option<Address>,
    foreach: Option<Address>,
    output: Option<String>,
}

impl RenderStep {
    fn from_raw(i: usize, raw: RawRenderStep) -> Result<Self, DeclarativeError> {
        let (kind, source) = match (raw.asset, raw.template) {
            (Some(asset), None) => (SourceKind::Asset, asset),
            (None, Some(template)) => (SourceKind::Template, template),
            _ => {
                return Err(DeclarativeError::step(
                    i,
                    "exactly one of 'asset' or 'template' is required",
                ));
            }
        };

        let address = |field: &str, text: Option<String>| {
            text.as_deref()
                .map(|text| parse_address(i, field, text))
                .transpose()
        };

        Ok(Self {
            kind,
            source,
            meta: address("meta", raw.meta)?,
            foreach: address("foreach", raw.foreach)?,
            output: raw.output,
        })
    }

    /// Node to render: `meta` below `base`, or `base` itself.
    fn node<'v>(&self, base: &'v Value) -> &'v Value {
        static NULL: Value = Value::Null;
        match &self.meta {
            Some(address) => path::lookup(base, address).unwrap_or(&NULL),
            None => base,
        }
    }

    fn render(
        &self,
        inflater: &Inflater<'_>,
        base: &Value,
        output: Option<&str>,
    ) -> ScriptResult {
        inflater.inflate_from(self.kind, &self.source, self.node(base), output)?;
        Ok(())
    }
}

/// Generator made of render steps.
#[derive(Debug, Clone)]
pub struct DeclarativeGenerator {
    steps: Vec<RenderStep>,
}

impl DeclarativeGenerator {
    pub fn parse(source: &str) -> Result<Self, DeclarativeError> {
        let raw: Vec<RawRenderStep> = serde_json::from_str(source)?;
        let steps = raw
            .into_iter()
            .enumerate()
            .map(|(i, step)| RenderStep::from_raw(i, step))
            .collect::<Result<_, _>>()?;
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Generator for DeclarativeGenerator {
    fn generate(
        &self,
        _args: &Invocation,
        meta: &mut MetaView<'_>,
        inflater: &Inflater<'_>,
    ) -> ScriptResult {
        let root = meta.value();

        for step in &self.steps {
            let Some(over) = &step.foreach else {
                step.render(inflater, root, step.output.as_deref())?;
                continue;
            };

            match path::lookup(root, over) {
                Some(Value::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        let key = index.to_string();
                        let target = expand_output(step.output.as_deref(), index, &key);
                        step.render(inflater, item, target.as_deref())?;
                    }
                }
                Some(Value::Object(map)) => {
                    for (index, (key, item)) in map.iter().enumerate() {
                        let target = expand_output(step.output.as_deref(), index, key);
                        step.render(inflater, item, target.as_deref())?;
                    }
                }
                None | Some(Value::Null) => {
                    return Err(DomainError::MissingValue {
                        operation: "iterate",
                    }
                    .into());
                }
                Some(other) => {
                    return Err(DomainError::NotAContainer {
                        operation: "iterate",
                        found: type_name(other),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn expand_output(pattern: Option<&str>, index: usize, key: &str) -> Option<String> {
    pattern.map(|p| {
        p.replace("{index}", &index.to_string())
            .replace("{key}", key)
    })
}
