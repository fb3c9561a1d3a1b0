//! Variable substitution renderer with configurable delimiters.
//!
//! With the default delimiters:
//!
//! ```text
//! |= meta.user.name =|     metadata lookup by address
//! |= meta =|               the whole metadata node, as JSON
//! |= release =|            a context variable (--var release=2.1)
//! |# note #|               comment, dropped
//! |? for x in y ?|         control block, rejected
//! ```
//!
//! Scalars render as plain text, containers as compact JSON, and anything
//! absent renders as nothing.

use tracing::{debug, instrument};

use mell_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{Address, Delimiters, RenderContext, Value, path},
    error::{MellError, MellResult},
};

/// Name under which templates see the metadata node.
const META: &str = "meta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Block,
    Variable,
    Comment,
}

/// Renderer substituting `variable` tags and dropping `comment` tags.
#[derive(Debug, Clone, Default)]
pub struct DelimiterRenderer {
    delimiters: Delimiters,
}

impl DelimiterRenderer {
    /// Create a renderer, rejecting empty or clashing delimiters.
    pub fn new(delimiters: Delimiters) -> MellResult<Self> {
        delimiters.validate()?;
        Ok(Self { delimiters })
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    fn markers(&self, tag: Tag) -> (&str, &str) {
        let d = &self.delimiters;
        match tag {
            Tag::Block => (d.block_start.as_str(), d.block_end.as_str()),
            Tag::Variable => (d.variable_start.as_str(), d.variable_end.as_str()),
            Tag::Comment => (d.comment_start.as_str(), d.comment_end.as_str()),
        }
    }

    /// Earliest opening marker in `text`; the longer marker wins a tie.
    fn next_tag(&self, text: &str) -> Option<(usize, Tag)> {
        [Tag::Block, Tag::Variable, Tag::Comment]
            .into_iter()
            .filter_map(|tag| {
                let (start, _) = self.markers(tag);
                text.find(start).map(|pos| (pos, tag, start.len()))
            })
            .min_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)))
            .map(|(pos, tag, _)| (pos, tag))
    }

    fn evaluate(
        &self,
        name: &str,
        expression: &str,
        meta: &Value,
        context: &RenderContext,
    ) -> MellResult<String> {
        if let Some(rest) = expression.strip_prefix(META) {
            if rest.is_empty() {
                return Ok(stringify(meta));
            }
            if rest.starts_with('.') || rest.starts_with('[') {
                let address_text = rest.strip_prefix('.').unwrap_or(rest);
                let address = Address::parse(address_text)
                    .map_err(|e| rendering_failed(name, e.to_string()))?;
                return Ok(path::lookup(meta, &address)
                    .map(stringify)
                    .unwrap_or_default());
            }
        }

        match context.get(expression) {
            Some(value) => Ok(value.to_owned()),
            None => {
                debug!(template = name, expression, "Undefined variable renders empty");
                Ok(String::new())
            }
        }
    }
}

impl TemplateRenderer for DelimiterRenderer {
    #[instrument(skip(self, source, meta, context), fields(bytes = source.len()))]
    fn render(
        &self,
        name: &str,
        source: &str,
        meta: &Value,
        context: &RenderContext,
    ) -> MellResult<String> {
        let mut out = String::with_capacity(source.len());
        let mut rest = source;

        while let Some((pos, tag)) = self.next_tag(rest) {
            out.push_str(&rest[..pos]);

            let (start, end) = self.markers(tag);
            let after = &rest[pos + start.len()..];
            let Some(close) = after.find(end) else {
                let offset = source.len() - rest.len() + pos;
                return Err(rendering_failed(
                    name,
                    format!("'{start}' at byte {offset} is never closed by '{end}'"),
                ));
            };
            let inner = after[..close].trim();

            match tag {
                Tag::Variable => out.push_str(&self.evaluate(name, inner, meta, context)?),
                Tag::Comment => {}
                Tag::Block => {
                    return Err(rendering_failed(
                        name,
                        format!("control block '{start} {inner} {end}' is not supported"),
                    ));
                }
            }

            rest = &after[close + end.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Scalars as text, containers as compact JSON, null as nothing.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        container => container.to_string(),
    }
}

fn rendering_failed(template: &str, reason: String) -> MellError {
    ApplicationError::RenderingFailed {
        template: template.to_owned(),
        reason,
    }
    .into()
}
