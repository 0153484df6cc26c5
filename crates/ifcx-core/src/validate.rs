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

//! Attribute value validation.
//!
//! Validation is a recursive descent over [`DataType`]. It never errors:
//! a value either conforms (`true`) or it does not (`false`).

use crate::document::SchemaTable;
use crate::schema::{DataType, TypeDescription};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

/// Validates raw attribute values against a schema table.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schemas: &'a SchemaTable,
}

impl<'a> Validator<'a> {
    pub fn new(schemas: &'a SchemaTable) -> Self {
        Self { schemas }
    }

    /// Validate the value of attribute `name`.
    ///
    /// Returns `None` when no schema of that name exists.
    pub fn validate_attribute(&self, name: &str, value: &JsonValue) -> Option<bool> {
        let schema = self.schemas.get(name)?;
        Some(self.validate(value, &schema.value))
    }

    /// Check `value` against `desc`.
    pub fn validate(&self, value: &JsonValue, desc: &TypeDescription) -> bool {
        match &desc.data_type {
            DataType::Real => value.is_number(),
            DataType::Integer => is_integral(value),
            DataType::Boolean => value.is_boolean(),
            DataType::String => value.is_string(),
            DataType::DateTime => value.as_str().is_some_and(is_date_time),
            DataType::Enum(restrictions) => match (value.as_str(), restrictions) {
                (Some(s), Some(r)) => r.options.iter().any(|option| option == s),
                _ => false,
            },
            DataType::Array(restrictions) => {
                let (Some(items), Some(r)) = (value.as_array(), restrictions) else {
                    return false;
                };
                let len = items.len() as u64;
                if r.min.is_some_and(|min| len < min) || r.max.is_some_and(|max| len > max) {
                    return false;
                }
                items.iter().all(|item| self.validate(item, &r.value))
            }
            DataType::Object(restrictions) => {
                let (Some(object), Some(r)) = (value.as_object(), restrictions) else {
                    return false;
                };
                r.values.iter().all(|(key, member)| {
                    object
                        .get(key)
                        .is_some_and(|v| self.validate(v, member))
                })
            }
            // Target existence is not checked.
            DataType::Relation(_) => value.is_string(),
            DataType::Unrecognized(_) => false,
        }
    }
}

/// Validate a single value without a schema table.
pub fn validate_value(value: &JsonValue, desc: &TypeDescription, schemas: &SchemaTable) -> bool {
    Validator::new(schemas).validate(value, desc)
}

fn is_integral(value: &JsonValue) -> bool {
    match value {
        JsonValue::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepts RFC 3339, RFC 2822, ISO 8601 local date-times and plain dates.
fn is_date_time(s: &str) -> bool {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || NAIVE_DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
