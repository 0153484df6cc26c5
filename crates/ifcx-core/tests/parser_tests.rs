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

//! Parser, validation and schema tooltip tests against a sample document.

use ifcx_core::folding::{large_array_regions, schemas_region, FoldingKind};
use ifcx_core::{
    parse, parse_with_spans, DataType, IfcxErrorKind, Limits, SchemaTooltipProvider, TooltipStyle,
    Validator,
};
use serde_json::json;

const HELLO_WALL: &str = include_str!("fixtures/hello-wall.ifcx");

const WALL: &str = "0d7e3b9a-6c2f-4a8e-b1d5-7e9c3a5f1b2d";
const WINDOW_TYPE: &str = "f40ec978-42e6-414a-a044-b6df23dfafef";

#[test]
fn test_parse_sample() {
    let doc = parse(HELLO_WALL).unwrap();
    assert_eq!(doc.header.version, "ifcx_alpha");
    assert_eq!(doc.header.author, "authorname");
    assert_eq!(doc.schemas.len(), 7);
    assert_eq!(doc.data.len(), 10);
    assert!(matches!(
        doc.schema("usd::usdgeom::mesh").unwrap().data_type,
        DataType::Object(Some(_))
    ));
}

#[test]
fn test_every_sample_node_validates() {
    let doc = parse(HELLO_WALL).unwrap();
    for node in &doc.data {
        assert!(doc.validate_node(node), "node {} failed validation", node.identifier);
    }
}

#[test]
fn test_invalid_attribute_values() {
    let doc = parse(HELLO_WALL).unwrap();
    let validator = Validator::new(&doc.schemas);

    assert_eq!(
        validator.validate_attribute("bsi::ifc::v5a::schema::IsExternal", &json!("true")),
        Some(false)
    );
    assert_eq!(
        validator.validate_attribute("bsi::ifc::v5a::schema::PredefinedType", &json!("DOOR")),
        Some(false)
    );
    assert_eq!(
        validator.validate_attribute(
            "usd::usdgeom::mesh",
            &json!({"points": [[0, 0]], "faceVertexIndices": []})
        ),
        Some(false)
    );
    assert_eq!(
        validator.validate_attribute(
            "usd::xformop",
            &json!({"transform": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0]]})
        ),
        Some(false)
    );
    assert_eq!(
        validator.validate_attribute("bsi::ifc::v5a::schema::class", &json!({"code": "IfcWall"})),
        Some(false)
    );
}

#[test]
fn test_lookups_on_sample() {
    let doc = parse(HELLO_WALL).unwrap();
    let storey_children: Vec<&str> = doc
        .child_nodes("9c2e4a6b-8d0f-4b1a-8c3e-5f7a9b1d3e5f")
        .iter()
        .map(|n| n.identifier.as_str())
        .collect();
    assert_eq!(storey_children.len(), 3);
    assert_eq!(storey_children[0], WALL);

    assert_eq!(doc.inheriting_nodes(WINDOW_TYPE).len(), 2);
    assert!(doc.inheriting_nodes(WALL).is_empty());
}

#[test]
fn test_round_trip_sample() {
    let doc = parse(HELLO_WALL).unwrap();
    let serialized = serde_json::to_string(&doc).unwrap();
    assert_eq!(parse(&serialized).unwrap(), doc);
}

#[test]
fn test_structural_errors_name_the_field() {
    let mut value: serde_json::Value = serde_json::from_str(HELLO_WALL).unwrap();
    value.as_object_mut().unwrap().remove("schemas");
    let err = parse(&value.to_string()).unwrap_err();
    assert_eq!(err.kind, IfcxErrorKind::Structure);
    assert!(err.message.contains("schemas"));
    assert!(err.to_string().starts_with("StructuralError at line"));

    let mut value: serde_json::Value = serde_json::from_str(HELLO_WALL).unwrap();
    value["header"].as_object_mut().unwrap().remove("timestamp");
    let err = parse(&value.to_string()).unwrap_err();
    assert!(err.message.contains("timestamp"));
}

#[test]
fn test_truncated_sample_is_syntax_error() {
    let truncated = &HELLO_WALL[..HELLO_WALL.len() / 2];
    let err = parse(truncated).unwrap_err();
    assert_eq!(err.kind, IfcxErrorKind::Syntax);
    assert!(err.line > 1);
}

#[test]
fn test_nesting_limit_applies() {
    let limits = Limits {
        max_nesting_depth: 4,
        ..Limits::default()
    };
    let err = parse_with_spans(HELLO_WALL, &limits).unwrap_err();
    assert_eq!(err.kind, IfcxErrorKind::Security);
}

#[test]
fn test_schema_tooltips_from_sample() {
    let mut provider = SchemaTooltipProvider::new();
    provider.load(HELLO_WALL).unwrap();

    let mesh = provider.tooltip("usd::usdgeom::mesh").unwrap();
    assert!(mesh.contains("**Namespace:** `usd` → `usdgeom` → `mesh`"));
    assert!(mesh.contains("- `points`: Array of Array[3..3] of Real"));
    assert!(mesh.contains("- `faceVertexIndices`: Array of Integer"));

    let xform = provider.tooltip("usd::xformop").unwrap();
    assert!(xform.contains("- `transform`: Array[4..4] of Array[4..4] of Real"));

    let volume = provider.tooltip("bsi::ifc::v5a::schema::Volume").unwrap();
    assert!(volume.contains("**Quantity:** Volume"));

    let nlsfb = provider.tooltip("nlsfb::class").unwrap();
    assert!(nlsfb.contains("**Inherits:** `bsi::ifc::v5a::schema::class`"));

    assert_eq!(provider.resolve("IsExternal"), Some("bsi::ifc::v5a::schema::IsExternal"));

    provider.set_style(TooltipStyle::Summary);
    let summary = provider.tooltip("bsi::ifc::v5a::schema::class").unwrap();
    assert!(summary.contains("object with:\n  code: string\n  uri: string"));
}

#[test]
fn test_folding_regions_on_sample() {
    let schemas = schemas_region(HELLO_WALL).unwrap();
    assert!(HELLO_WALL[schemas.span.start..].starts_with("{\n    \"bsi::ifc::v5a::schema::class\""));
    assert!(HELLO_WALL[..schemas.span.end].ends_with("}\n  }"));

    let arrays = large_array_regions(HELLO_WALL, 10);
    let counts: Vec<FoldingKind> = arrays.iter().map(|r| r.kind).collect();
    assert_eq!(
        counts,
        vec![
            FoldingKind::Array { elements: 10 },
            FoldingKind::Array { elements: 12 },
            FoldingKind::Array { elements: 12 },
        ]
    );
}
