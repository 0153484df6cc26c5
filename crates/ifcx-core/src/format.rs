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

//! Markdown rendering of schema type descriptions.
//!
//! Two styles are supported. [`TooltipStyle::Detailed`] lists every piece
//! of type information, one line each:
//!
//! ```text
//! **Schema:** `bsi::ifc::v5a::class`
//! **Namespace:** `bsi` → `ifc` → `v5a` → `class`
//! **Type:** Object
//! - `code`: String
//! - `uri`: String
//! ```
//!
//! [`TooltipStyle::Summary`] renders a plain-language type definition in a
//! code block instead.

use crate::schema::{DataType, TypeDescription};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Separator between namespace segments in schema names.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// How schema tooltips are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipStyle {
    #[default]
    Detailed,
    Summary,
}

/// Render a schema tooltip in the given style.
pub fn format_tooltip(name: &str, desc: &TypeDescription, style: TooltipStyle) -> String {
    match style {
        TooltipStyle::Detailed => format_schema_tooltip(name, desc),
        TooltipStyle::Summary => format_schema_summary(name, desc),
    }
}

/// Render the detailed markdown tooltip for schema `name`.
pub fn format_schema_tooltip(name: &str, desc: &TypeDescription) -> String {
    let mut lines = vec![format!("**Schema:** `{}`", name)];

    if let Some(breadcrumb) = namespace_breadcrumb(name) {
        lines.push(format!("**Namespace:** {}", breadcrumb));
    }

    lines.push(format!("**Type:** {}", desc.data_type.name()));

    if let Some(quantity) = desc.quantity_kind.as_deref().filter(|q| !q.is_empty()) {
        lines.push(format!("**Quantity:** {}", quantity));
    }
    if !desc.inherits.is_empty() {
        lines.push(format!("**Inherits:** `{}`", desc.inherits.join(", ")));
    }

    match &desc.data_type {
        DataType::Relation(Some(r)) if !r.relation_type.is_empty() => {
            lines.push(format!("**Relation:** `{}`", r.relation_type));
        }
        DataType::Enum(Some(r)) => {
            lines.push(format!("**Options:** [{}]", r.options.join(", ")));
        }
        DataType::Object(Some(r)) => push_properties(&mut lines, r.values.iter(), ""),
        DataType::Array(Some(_)) => lines.push(format!("- {}", type_label(desc))),
        _ => {}
    }

    lines.join("\n")
}

fn push_properties<'a, I>(lines: &mut Vec<String>, values: I, indent: &str)
where
    I: Iterator<Item = (&'a String, &'a TypeDescription)>,
{
    for (key, member) in values {
        match &member.data_type {
            DataType::Object(Some(r)) => {
                lines.push(format!("{}- `{}`: Object", indent, key));
                push_properties(lines, r.values.iter(), &format!("{}  ", indent));
            }
            _ => lines.push(format!("{}- `{}`: {}", indent, key, type_label(member))),
        }
    }
}

/// Short inline label for a type: the tag, or the full array shape.
///
/// ```
/// use ifcx_core::schema::{DataType, TypeDescription};
/// use ifcx_core::format::type_label;
///
/// let real = TypeDescription::new(DataType::Real);
/// let matrix = TypeDescription::array(TypeDescription::array(real, None, None), Some(4), None);
/// assert_eq!(type_label(&matrix), "Array[4..*] of Array of Real");
/// ```
pub fn type_label(desc: &TypeDescription) -> String {
    match &desc.data_type {
        DataType::Array(Some(r)) => {
            let element = type_label(&r.value);
            if r.min.is_none() && r.max.is_none() {
                format!("Array of {}", element)
            } else {
                format!(
                    "Array[{}..{}] of {}",
                    bound_label(r.min),
                    bound_label(r.max),
                    element
                )
            }
        }
        other => other.name().to_string(),
    }
}

fn bound_label(bound: Option<u64>) -> String {
    bound.map_or_else(|| "*".to_string(), |b| b.to_string())
}

/// `` `a` → `b` → `c` `` for namespaced names, `None` for plain ones.
pub fn namespace_breadcrumb(name: &str) -> Option<String> {
    if !name.contains(NAMESPACE_SEPARATOR) {
        return None;
    }
    let segments: Vec<String> = name
        .split(NAMESPACE_SEPARATOR)
        .map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                "`-`".to_string()
            } else {
                format!("`{}`", segment)
            }
        })
        .collect();
    Some(segments.join(" → "))
}

/// Render the summary tooltip: namespace and a plain-language definition.
pub fn format_schema_summary(name: &str, desc: &TypeDescription) -> String {
    let mut out = format!("**Schema:** `{}`\n\n", name);
    if let Some(breadcrumb) = namespace_breadcrumb(name) {
        let _ = write!(out, "**Namespace:** {}\n\n", breadcrumb);
    }
    let _ = write!(out, "**Type Definition:**\n```\n{}\n```", plain_text(desc, ""));
    out
}

/// Plain-language description of a type, objects expanded one member per line.
pub fn plain_text(desc: &TypeDescription, indent: &str) -> String {
    match &desc.data_type {
        DataType::String => "string".to_string(),
        DataType::Boolean => "boolean".to_string(),
        DataType::Integer => "integer number".to_string(),
        DataType::Real => "real number".to_string(),
        DataType::DateTime => "date and time".to_string(),
        DataType::Enum(Some(r)) => format!("one of: {}", r.options.join(", ")),
        DataType::Enum(None) => "enumeration".to_string(),
        DataType::Array(Some(r)) => {
            format!("array of {}", plain_text(&r.value, &format!("{}  ", indent)))
        }
        DataType::Array(None) => "array".to_string(),
        DataType::Object(Some(r)) if r.values.is_empty() => "empty object".to_string(),
        DataType::Object(Some(r)) => {
            let nested = format!("{}  ", indent);
            let members: Vec<String> = r
                .values
                .iter()
                .map(|(key, member)| format!("{}{}: {}", nested, key, plain_text(member, &nested)))
                .collect();
            format!("object with:\n{}", members.join("\n"))
        }
        DataType::Object(None) => "object".to_string(),
        DataType::Relation(Some(r)) if !r.relation_type.is_empty() => {
            format!("relation to {}", r.relation_type)
        }
        DataType::Relation(_) => "relation".to_string(),
        DataType::Unrecognized(_) => "unknown".to_string(),
    }
}
