//! # Layer Merging
//!
//! Configuration is assembled from several layers of increasing precedence.
//! Each layer is a partially filled typed structure; [`Merge`] folds a higher
//! layer into a lower one with two rules, applied per field:
//!
//! - **Structured values merge.** Nested structs and maps merge key by key.
//! - **Everything else is replaced.** Scalars and lists from the higher layer
//!   replace the lower value wholesale. Lists are never concatenated: a project
//!   whose marks list is defined in a higher layer loses every mark the lower
//!   layer had for it.
//!
//! Free-form JSON kept alongside the typed fields follows the same rules through
//! [`merge_values`].

use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub trait Merge {
    /// Folds `higher` into `self`; `higher` wins on conflicts.
    fn merge(&mut self, higher: Self);
}

/// Merges layers in order, later layers taking precedence.
pub fn merge_tables<T, I>(layers: I) -> T
where
    T: Merge + Default,
    I: IntoIterator<Item = T>,
{
    layers.into_iter().fold(T::default(), |mut acc, layer| {
        acc.merge(layer);
        acc
    })
}

/// Nested field: merges when both sides are present.
pub fn merge_nested<T: Merge>(lower: &mut Option<T>, higher: Option<T>) {
    match (lower.as_mut(), higher) {
        (Some(current), Some(higher)) => current.merge(higher),
        (None, Some(higher)) => *lower = Some(higher),
        (_, None) => {}
    }
}

/// Leaf field (scalar or list): the higher layer replaces when present.
pub fn replace<T>(lower: &mut Option<T>, higher: Option<T>) {
    if higher.is_some() {
        *lower = higher;
    }
}

impl<T: Merge> Merge for BTreeMap<String, T> {
    fn merge(&mut self, higher: Self) {
        for (key, value) in higher {
            match self.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(value),
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }
}

impl Merge for Map<String, Value> {
    fn merge(&mut self, higher: Self) {
        for (key, value) in higher {
            match self.get_mut(&key) {
                Some(current) => merge_values(current, value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

/// Merges free-form JSON: objects recursively, anything else replaced.
pub fn merge_values(lower: &mut Value, higher: Value) {
    match (lower, higher) {
        (Value::Object(current), Value::Object(higher)) => current.merge(higher),
        (current, higher) => *current = higher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Layer {
        name: Option<String>,
        marks: Option<Vec<&'static str>>,
        nested: Option<BTreeMap<String, Layer>>,
    }

    impl Merge for Layer {
        fn merge(&mut self, higher: Self) {
            replace(&mut self.name, higher.name);
            replace(&mut self.marks, higher.marks);
            merge_nested(&mut self.nested, higher.nested);
        }
    }

    #[test]
    fn lists_are_replaced_not_concatenated() {
        let lower = Layer {
            marks: Some(vec!["a", "b"]),
            ..Default::default()
        };
        let higher = Layer {
            marks: Some(vec!["c"]),
            ..Default::default()
        };
        let merged: Layer = merge_tables([lower, higher]);
        assert_eq!(merged.marks, Some(vec!["c"]));
    }

    #[test]
    fn absent_fields_do_not_override() {
        let lower = Layer {
            name: Some("low".into()),
            marks: Some(vec!["a"]),
            ..Default::default()
        };
        let merged: Layer = merge_tables([lower, Layer::default()]);
        assert_eq!(merged.name.as_deref(), Some("low"));
        assert_eq!(merged.marks, Some(vec!["a"]));
    }

    #[test]
    fn maps_merge_key_by_key() {
        let lower = Layer {
            nested: Some(BTreeMap::from([
                (
                    "one".to_string(),
                    Layer {
                        name: Some("first".into()),
                        marks: Some(vec!["x"]),
                        ..Default::default()
                    },
                ),
                (
                    "two".to_string(),
                    Layer {
                        name: Some("second".into()),
                        ..Default::default()
                    },
                ),
            ])),
            ..Default::default()
        };
        let higher = Layer {
            nested: Some(BTreeMap::from([(
                "one".to_string(),
                Layer {
                    name: Some("override".into()),
                    ..Default::default()
                },
            )])),
            ..Default::default()
        };

        let merged: Layer = merge_tables([lower, higher]);
        let nested = merged.nested.unwrap();
        assert_eq!(nested["one"].name.as_deref(), Some("override"));
        assert_eq!(nested["one"].marks, Some(vec!["x"]));
        assert_eq!(nested["two"].name.as_deref(), Some("second"));
    }

    #[test]
    fn json_values_merge_objects_and_replace_arrays() {
        let mut lower = json!({
            "term": {"cmds": ["make"], "shell": "bash"},
            "width": 60
        });
        merge_values(
            &mut lower,
            json!({"term": {"cmds": ["cargo test"]}, "width": 80}),
        );
        assert_eq!(
            lower,
            json!({
                "term": {"cmds": ["cargo test"], "shell": "bash"},
                "width": 80
            })
        );
    }

    #[test]
    fn json_scalar_replaced_by_object() {
        let mut lower = json!({"menu": 3});
        merge_values(&mut lower, json!({"menu": {"width": 10}}));
        assert_eq!(lower, json!({"menu": {"width": 10}}));
    }
}
