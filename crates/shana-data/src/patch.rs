//! Ordered delete-then-merge modifications of generic data.

use crate::data::Data;
use crate::error::{DataError, DataResult};
use crate::merge::merge_object;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A series of modifications to a [`Data`].
///
/// A patch is plain data: it can be encoded into the generic model or
/// serialized like any other record, and holds no reference to the data it
/// will be applied to.
///
/// # Examples
///
/// ```
/// use shana_data::{Data, Patch};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut patch = Patch::new();
/// patch.add(&["v2", "v3.1"], HashMap::new());
/// patch.add(
///     &[],
///     HashMap::from([(
///         "v4".to_string(),
///         serde_json::from_value::<Data>(json!({"v4-1": "new"})).unwrap(),
///     )]),
/// );
///
/// let data: Data = serde_json::from_value(json!({
///     "v2": 123,
///     "v3": ["first", "second", "third"],
///     "v4": {"v4-1": "old"},
/// })).unwrap();
///
/// let patched = patch.apply(&data).unwrap();
/// assert_eq!(patched.to_string(), r#"{"v3":["first","third"],"v4":{"v4-1":"new"}}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, crate::Record)]
pub struct Patch {
    #[serde(default)]
    #[data("actions")]
    actions: Vec<PatchAction>,
}

/// One step of a [`Patch`]: deletions first, then merges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, crate::Record)]
pub struct PatchAction {
    /// Queries of the entries to delete.
    #[serde(default)]
    #[data("deletes")]
    pub deletes: Vec<String>,

    /// Objects to merge, keyed by the query of the object they merge into.
    #[serde(default)]
    #[data("updates")]
    pub updates: HashMap<String, Data>,
}

impl Patch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    ///
    /// Merging is deep, so an update cannot replace a sequence or an object
    /// wholesale. Delete the old entry in the same action to overwrite it.
    pub fn add(&mut self, deletes: &[&str], updates: HashMap<String, Data>) {
        self.actions.push(PatchAction {
            deletes: deletes.iter().map(|s| s.to_string()).collect(),
            updates,
        });
    }

    /// Append a prepared action.
    #[inline]
    pub fn push(&mut self, action: PatchAction) {
        self.actions.push(action);
    }

    #[inline]
    pub fn actions(&self) -> &[PatchAction] {
        &self.actions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Apply every action to a copy of `data`.
    ///
    /// On error the input is untouched and no partial result is returned.
    pub fn apply(&self, data: &Data) -> DataResult<Data> {
        let mut copy = data.clone();
        self.apply_to(&mut copy)?;
        Ok(copy)
    }

    /// Apply every action to `target` in order.
    ///
    /// The first failing action aborts the rest; actions applied before it
    /// are kept.
    pub fn apply_to(&self, target: &mut Data) -> DataResult<()> {
        for (index, action) in self.actions.iter().enumerate() {
            tracing::debug!(
                index,
                deletes = action.deletes.len(),
                updates = action.updates.len(),
                "applying patch action"
            );
            action.apply_to(target)?;
        }

        Ok(())
    }
}

impl PatchAction {
    /// Apply this action to `target`.
    ///
    /// Update queries are visited in ascending order so that an ancestor is
    /// merged before its descendants.
    pub fn apply_to(&self, target: &mut Data) -> DataResult<()> {
        for query in &self.deletes {
            target.delete_query(query);
        }

        let mut queries: Vec<&String> = self.updates.keys().collect();
        queries.sort();

        for query in queries {
            if query.is_empty() && target.is_nil() {
                target.object_mut();
            }

            let obj = match target.query_mut(query) {
                Some(Value::Object(obj)) => obj,
                Some(other) => {
                    return Err(DataError::unsupported_type(query.as_str(), other.type_name()))
                }
                None => return Err(DataError::invalid_query(query.as_str())),
            };

            if let Some(update) = self.updates[query].object() {
                merge_object(obj, update);
            }
        }

        Ok(())
    }
}
