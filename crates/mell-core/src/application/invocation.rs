//! Everything one run of mell was asked to do.

use crate::domain::{Action, ProjectLayout, RenderContext, SetOperation};

/// The arguments of one run, shared read-only with every script.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Comma-joined metadata document names, as given by the user.
    pub metadata: String,
    pub set_operations: Vec<SetOperation>,
    /// Actions in execution order. Empty means the default sequence.
    pub actions: Vec<Action>,
    pub layout: ProjectLayout,
    pub context: RenderContext,
}

impl Invocation {
    pub fn new(metadata: impl Into<String>, layout: ProjectLayout) -> Self {
        Self {
            metadata: metadata.into(),
            layout,
            ..Self::default()
        }
    }

    pub fn with_set(mut self, operation: SetOperation) -> Self {
        self.set_operations.push(operation);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key, value);
        self
    }

    /// Requested document names, trimmed, empty entries skipped.
    pub fn metadata_names(&self) -> Vec<&str> {
        split_names(&self.metadata, &[','])
    }

    /// The actions to run, falling back to the default sequence.
    pub fn effective_actions(&self) -> Vec<Action> {
        if self.actions.is_empty() {
            Action::DEFAULT_SEQUENCE.to_vec()
        } else {
            self.actions.clone()
        }
    }
}

/// Split a name list on any of `separators`, dropping blanks.
pub(crate) fn split_names<'a>(list: &'a str, separators: &[char]) -> Vec<&'a str> {
    list.split(|c: char| separators.contains(&c))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
