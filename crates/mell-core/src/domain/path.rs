//! Walk an [`Address`] through a value tree, creating structure on demand.

use super::address::{Address, AddressStep};
use super::error::PathError;
use super::value::{Map, Value, type_name};

/// Assign `value` at `address`, creating intermediate containers.
///
/// A missing map key becomes a sequence when the following step is an index,
/// otherwise a map. A short sequence is padded the same way up to the index.
/// The final step pads with nulls.
pub fn set(root: &mut Value, address: &Address, value: Value) -> Result<(), PathError> {
    let steps = address.steps();
    let (last, parents) = address.split_last();

    let mut current = root;
    for (i, step) in parents.iter().enumerate() {
        current = descend(current, step, &steps[i + 1])?;
    }

    assign(current, last, value)
}

/// Read the node at `address`, if every step exists.
pub fn lookup<'a>(root: &'a Value, address: &Address) -> Option<&'a Value> {
    address
        .steps()
        .iter()
        .try_fold(root, |current, step| match (step, current) {
            (AddressStep::Field(name), Value::Object(map)) => map.get(name),
            (AddressStep::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        })
}

/// Mutable form of [`lookup`].
pub fn lookup_mut<'a>(root: &'a mut Value, address: &Address) -> Option<&'a mut Value> {
    let mut current = root;
    for step in address.steps() {
        current = match (step, current) {
            (AddressStep::Field(name), Value::Object(map)) => map.get_mut(name)?,
            (AddressStep::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn vivify(next: &AddressStep) -> Value {
    if next.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn descend<'a>(
    current: &'a mut Value,
    step: &AddressStep,
    next: &AddressStep,
) -> Result<&'a mut Value, PathError> {
    match (step, current) {
        (AddressStep::Field(name), Value::Object(map)) => {
            Ok(map.entry(name.clone()).or_insert_with(|| vivify(next)))
        }
        (AddressStep::Index(index), Value::Array(items)) => {
            if items.len() <= *index {
                items.resize_with(index + 1, || vivify(next));
            }
            Ok(&mut items[*index])
        }
        (step, other) => Err(mismatch(step, other)),
    }
}

fn assign(current: &mut Value, step: &AddressStep, value: Value) -> Result<(), PathError> {
    match (step, current) {
        (AddressStep::Field(name), Value::Object(map)) => {
            map.insert(name.clone(), value);
            Ok(())
        }
        (AddressStep::Index(index), Value::Array(items)) => {
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            items[*index] = value;
            Ok(())
        }
        (step, other) => Err(mismatch(step, other)),
    }
}

fn mismatch(step: &AddressStep, found: &Value) -> PathError {
    let step_text = step.to_string();
    match (step, found) {
        (AddressStep::Index(_), Value::Object(_)) => PathError::ExpectedField { step: step_text },
        (AddressStep::Field(_), Value::Array(_)) => PathError::ExpectedIndex { step: step_text },
        (_, other) => PathError::ExpectedNothing {
            step: step_text,
            found: type_name(other),
        },
    }
}
