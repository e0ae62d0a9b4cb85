//! YAML to JSON-safe value normalization
//!
//! YAML allows non-string mapping keys and blank scalars that JSON handling
//! must never see. Normalizing prunes blanks, drops empty containers and
//! rejects non-string keys, so the result can be re-serialized as JSON.

use serde_json::{Map, Value as Json};
use serde_yaml::Value as Yaml;
use tracing::{debug, error};

use crate::error::{Result, UtilError};

/// Values that can be normalized into a JSON-safe tree
///
/// `Ok(None)` means the whole value was pruned.
pub trait Normalize {
    fn normalize(&self) -> Result<Option<Json>>;
}

impl Normalize for Yaml {
    fn normalize(&self) -> Result<Option<Json>> {
        normalize(self)
    }
}

impl Normalize for Json {
    fn normalize(&self) -> Result<Option<Json>> {
        Ok(normalize_json(self))
    }
}

/// Normalize a decoded YAML document
pub fn normalize(value: &Yaml) -> Result<Option<Json>> {
    match value {
        Yaml::Mapping(mapping) => {
            let mut copy = Map::new();
            for (key, val) in mapping {
                let Yaml::String(k) = key else {
                    let err = UtilError::TypeMismatch {
                        key: describe_key(key),
                        actual: type_name(key),
                    };
                    error!("{}", err);
                    return Err(err);
                };
                if let Some(fixed) = normalize(val)? {
                    copy.insert(k.clone(), fixed);
                }
            }
            Ok(non_empty_object(copy))
        }
        Yaml::Sequence(seq) => {
            let mut copy = Vec::with_capacity(seq.len());
            for val in seq {
                if let Some(fixed) = normalize(val)? {
                    copy.push(fixed);
                }
            }
            Ok(non_empty_array(copy))
        }
        Yaml::String(s) => Ok(non_blank(s).map(|s| Json::String(s.to_string()))),
        // NaN and infinities serialize to null and get pruned with it
        Yaml::Number(n) => match serde_json::to_value(n)? {
            Json::Null => Ok(None),
            json => Ok(Some(json)),
        },
        Yaml::Bool(b) => Ok(Some(Json::Bool(*b))),
        Yaml::Null => Ok(None),
        Yaml::Tagged(tagged) => {
            debug!(tag = %tagged.tag, "normalize: dropping tag");
            normalize(&tagged.value)
        }
    }
}

/// Normalize a value whose mapping keys are already strings
pub fn normalize_json(value: &Json) -> Option<Json> {
    match value {
        Json::Object(map) => {
            let copy: Map<String, Json> = map
                .iter()
                .filter_map(|(k, v)| normalize_json(v).map(|fixed| (k.clone(), fixed)))
                .collect();
            non_empty_object(copy)
        }
        Json::Array(items) => non_empty_array(items.iter().filter_map(normalize_json).collect()),
        Json::String(s) => non_blank(s).map(|s| Json::String(s.to_string())),
        Json::Null => None,
        other => Some(other.clone()),
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.is_empty() || s == "\n" { None } else { Some(s) }
}

fn non_empty_object(map: Map<String, Json>) -> Option<Json> {
    if map.is_empty() { None } else { Some(Json::Object(map)) }
}

fn non_empty_array(items: Vec<Json>) -> Option<Json> {
    if items.is_empty() { None } else { Some(Json::Array(items)) }
}

fn describe_key(key: &Yaml) -> String {
    serde_yaml::to_string(key)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", key))
}

fn type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(n) if n.is_f64() => "float",
        Yaml::Number(_) => "integer",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use serde_yaml::Mapping;

    fn yaml(src: &str) -> Yaml {
        serde_yaml::from_str(src).unwrap()
    }

    fn assert_pruned(value: &Json) {
        match value {
            Json::Null => panic!("null survived normalization"),
            Json::String(s) => assert!(!s.is_empty() && s != "\n", "blank string survived: {:?}", s),
            Json::Array(items) => {
                assert!(!items.is_empty(), "empty array survived");
                items.iter().for_each(assert_pruned);
            }
            Json::Object(map) => {
                assert!(!map.is_empty(), "empty object survived");
                map.values().for_each(assert_pruned);
            }
            _ => {}
        }
    }

    #[test]
    fn test_blank_leaves_are_dropped() {
        let doc = yaml(
            r#"
project: ABC
summary: ""
description: "\n"
labels: [one, "", two]
custom:
  empty: {}
  list: []
  nested:
    blank: ""
"#,
        );

        let fixed = normalize(&doc).unwrap().unwrap();
        assert_eq!(fixed, json!({"project": "ABC", "labels": ["one", "two"]}));
    }

    #[test]
    fn test_scalars_pass_through() {
        let doc = yaml("count: 3\nratio: 0.5\nenabled: false\nnothing: ~\n");

        let fixed = normalize(&doc).unwrap().unwrap();
        assert_eq!(fixed, json!({"count": 3, "ratio": 0.5, "enabled": false}));
    }

    #[test]
    fn test_non_string_key_fails() {
        let doc = yaml("fields:\n  name: ok\n  42: answer\n");

        let err = normalize(&doc).unwrap_err();
        match err {
            UtilError::TypeMismatch { key, actual } => {
                assert_eq!(key, "42");
                assert_eq!(actual, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bool_key_names_type() {
        let doc = yaml("true: yes\n");

        let err = normalize(&doc).unwrap_err();
        assert!(err.to_string().contains("'bool'"));
    }

    #[test]
    fn test_tagged_value_unwrapped() {
        let doc = yaml("when: !date 2024-01-01\n");

        let fixed = normalize(&doc).unwrap().unwrap();
        assert_eq!(fixed, json!({"when": "2024-01-01"}));
    }

    #[test]
    fn test_everything_blank_prunes_to_none() {
        assert_eq!(normalize(&yaml("a: ''\nb: [~, '']\n")).unwrap(), None);
        assert_eq!(normalize(&Yaml::String("\n".to_string())).unwrap(), None);
        assert_eq!(normalize(&Yaml::Null).unwrap(), None);
    }

    #[test]
    fn test_single_newline_only_is_blank() {
        let fixed = normalize(&Yaml::String("\n\n".to_string())).unwrap();
        assert_eq!(fixed, Some(json!("\n\n")));
    }

    #[test]
    fn test_normalize_json_prunes() {
        let value = json!({"a": "", "b": {"c": []}, "d": [null, "x"], "e": 1});

        assert_eq!(normalize_json(&value), Some(json!({"d": ["x"], "e": 1})));
        assert_eq!(value.normalize().unwrap(), Some(json!({"d": ["x"], "e": 1})));
    }

    fn arb_yaml() -> impl Strategy<Value = Yaml> {
        let leaf = prop_oneof![
            Just(Yaml::Null),
            any::<bool>().prop_map(Yaml::Bool),
            any::<i64>().prop_map(|n| Yaml::Number(n.into())),
            prop_oneof![Just(String::new()), Just("\n".to_string()), "[a-z ]{0,6}"].prop_map(Yaml::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Yaml::Sequence),
                prop::collection::vec(("[a-z]{1,4}", inner), 0..6).prop_map(|entries| {
                    let mut map = Mapping::new();
                    for (k, v) in entries {
                        map.insert(Yaml::String(k), v);
                    }
                    Yaml::Mapping(map)
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_output_has_no_empty_nodes(doc in arb_yaml()) {
            if let Some(fixed) = normalize(&doc).unwrap() {
                assert_pruned(&fixed);
            }
        }

        #[test]
        fn prop_yaml_and_json_paths_agree(doc in arb_yaml()) {
            let via_yaml = normalize(&doc).unwrap();
            let as_json: Json = serde_json::to_value(&doc).unwrap();
            prop_assert_eq!(via_yaml, normalize_json(&as_json));
        }
    }
}
