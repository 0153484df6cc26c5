// Dweve IFCX - Editor tooling for IFCX documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property-based tests for the scanner, parser and graph extraction.

use ifcx_core::json::parse_spanned;
use ifcx_core::scanner::{count_array_elements, find_matching_close, Delimiter};
use ifcx_core::{parse, IdentifierGraph, Limits};
use proptest::prelude::*;

fn document(data: &str) -> String {
    format!(
        r#"{{"header": {{"version": "1", "author": "a", "timestamp": "t"}}, "schemas": {{}}, "data": {}}}"#,
        data
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: balanced nesting resolves to the last closer.
    #[test]
    fn prop_balanced_nesting_matches(depth in 1usize..=40, filler in "[a-z ,:0-9]{0,10}") {
        let text = format!("{}{}{}", "[".repeat(depth), filler, "]".repeat(depth));
        prop_assert_eq!(
            find_matching_close(&text, 1, Delimiter::Bracket),
            Some(text.len() - 1)
        );
    }

    /// Property: an extra unmatched opener is never resolved.
    #[test]
    fn prop_unmatched_opener_not_found(depth in 1usize..=40) {
        let text = format!("{{{}{}", "{".repeat(depth), "}".repeat(depth));
        prop_assert_eq!(find_matching_close(&text, 1, Delimiter::Brace), None);
    }

    /// Property: delimiters inside string literals are ignored.
    #[test]
    fn prop_strings_do_not_affect_matching(noise in "[\\[\\]{}a-z]{0,20}") {
        let text = format!(r#"{{"k": "{}"}}"#, noise);
        prop_assert_eq!(find_matching_close(&text, 1, Delimiter::Brace), Some(text.len() - 1));
    }

    /// Property: element count equals the number of generated elements.
    #[test]
    fn prop_count_array_elements(items in prop::collection::vec("[a-z,\\]\\[]{0,6}", 1..30)) {
        let body = items
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect::<Vec<_>>()
            .join(", ");
        prop_assert_eq!(count_array_elements(&body), items.len());
    }

    /// Property: the spanned parser never panics on arbitrary input.
    #[test]
    fn prop_parser_never_panics(text in "\\PC{0,64}") {
        let _ = parse_spanned(&text, &Limits::default());
        let _ = parse(&text);
    }

    /// Property: the spanned projection agrees with serde_json.
    #[test]
    fn prop_projection_matches_serde_json(
        keys in prop::collection::vec("[a-z\"\\\\]{1,6}", 0..8),
        n in any::<i64>(),
        f in -1.0e6f64..1.0e6,
    ) {
        let mut map = serde_json::Map::new();
        for (i, key) in keys.iter().enumerate() {
            let value = match i % 4 {
                0 => serde_json::json!(n),
                1 => serde_json::json!(f),
                2 => serde_json::json!([key, null, true]),
                _ => serde_json::json!({ "nested": key }),
            };
            map.insert(key.clone(), value);
        }
        let expected = serde_json::Value::Object(map);
        let text = serde_json::to_string_pretty(&expected).unwrap();
        let tree = parse_spanned(&text, &Limits::default()).unwrap();
        prop_assert_eq!(tree.to_json(), expected);
    }

    /// Property: graph extraction is idempotent.
    #[test]
    fn prop_graph_idempotent(ids in prop::collection::vec("[a-f0-9]{1,4}", 1..12)) {
        let nodes: Vec<String> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| match ids.get(i + 1) {
                Some(next) => format!(r#"{{"identifier": "{}", "children": {{"c{}": "{}"}}}}"#, id, i, next),
                None => format!(r#"{{"identifier": "{}"}}"#, id),
            })
            .collect();
        let text = document(&format!("[{}]", nodes.join(", ")));
        let first = IdentifierGraph::extract(&text).unwrap();
        let second = IdentifierGraph::extract(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: mapping and list forms of inherits yield the same targets.
    #[test]
    fn prop_inherits_forms_equivalent(targets in prop::collection::vec("[A-Z0-9]{1,8}", 1..6)) {
        let map = targets
            .iter()
            .enumerate()
            .map(|(i, t)| format!(r#""k{}": "{}""#, i, t))
            .collect::<Vec<_>>()
            .join(", ");
        let list = targets
            .iter()
            .map(|t| format!(r#""{}""#, t))
            .collect::<Vec<_>>()
            .join(", ");
        let from_map = IdentifierGraph::extract(&document(&format!(
            r#"[{{"identifier": "n", "inherits": {{{}}}}}]"#,
            map
        )))
        .unwrap();
        let from_list = IdentifierGraph::extract(&document(&format!(
            r#"[{{"identifier": "n", "inherits": [{}]}}]"#,
            list
        )))
        .unwrap();
        prop_assert_eq!(&from_map.get("n").unwrap().inherits, &targets);
        prop_assert_eq!(&from_map.get("n").unwrap().inherits, &from_list.get("n").unwrap().inherits);
    }

    /// Property: a referenced child is named by its key and parented by the referrer.
    #[test]
    fn prop_child_naming(parent in "[a-z]{1,8}", child in "[0-9]{1,8}", name in "[A-Za-z_]{1,12}") {
        let text = document(&format!(
            r#"[{{"identifier": "{}", "children": {{"{}": "{}"}}}}, {{"identifier": "{}"}}]"#,
            parent, name, child, child
        ));
        let graph = IdentifierGraph::extract(&text).unwrap();
        let node = graph.get(&child).unwrap();
        prop_assert_eq!(node.name.as_deref(), Some(name.as_str()));
        prop_assert_eq!(node.parent.as_deref(), Some(parent.as_str()));
        prop_assert!(graph.get(&parent).unwrap().name.is_none());
    }
}
