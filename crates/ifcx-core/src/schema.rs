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

//! Schema type descriptions.
//!
//! A schema describes the shape of one attribute value. On the wire it is a
//! flat JSON object with a `dataType` tag and optional restriction blocks:
//!
//! ```json
//! {
//!   "dataType": "Array",
//!   "arrayRestrictions": { "min": 3, "max": 3, "value": { "dataType": "Real" } }
//! }
//! ```
//!
//! In memory the tag and its restrictions are folded into one [`DataType`]
//! enum, so a restriction block only exists on the variant it belongs to.
//! Unknown tags are kept as [`DataType::Unrecognized`] and never validate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Type information for a schema value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTypeDescription", into = "RawTypeDescription")]
pub struct TypeDescription {
    pub data_type: DataType,
    /// Physical quantity such as `Length`, informational only.
    pub quantity_kind: Option<String>,
    /// Names of schemas this description extends, informational only.
    pub inherits: Vec<String>,
}

/// The value kind of a [`TypeDescription`] together with its restrictions.
///
/// Restrictions are `None` when the document omits them; validators reject
/// values against such types and formatters render the bare type name.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String,
    Boolean,
    Integer,
    Real,
    DateTime,
    Enum(Option<EnumRestrictions>),
    Array(Option<Box<ArrayRestrictions>>),
    Object(Option<ObjectRestrictions>),
    Relation(Option<RelationRestrictions>),
    /// A `dataType` tag this crate does not know.
    Unrecognized(String),
}

impl DataType {
    /// The `dataType` tag as written in documents.
    pub fn name(&self) -> &str {
        match self {
            DataType::String => "String",
            DataType::Boolean => "Boolean",
            DataType::Integer => "Integer",
            DataType::Real => "Real",
            DataType::DateTime => "DateTime",
            DataType::Enum(_) => "Enum",
            DataType::Array(_) => "Array",
            DataType::Object(_) => "Object",
            DataType::Relation(_) => "Relation",
            DataType::Unrecognized(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumRestrictions {
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRestrictions {
    /// Minimum element count.
    pub min: Option<u64>,
    /// Maximum element count.
    pub max: Option<u64>,
    /// Element type.
    pub value: TypeDescription,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectRestrictions {
    /// Required member types, in declaration order.
    #[serde(default)]
    pub values: IndexMap<String, TypeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationRestrictions {
    /// Target kind of the relation; may be empty.
    #[serde(rename = "type", default)]
    pub relation_type: String,
}

impl TypeDescription {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            quantity_kind: None,
            inherits: Vec::new(),
        }
    }

    /// An `Enum` over the given options.
    pub fn enumeration<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(DataType::Enum(Some(EnumRestrictions {
            options: options.into_iter().map(Into::into).collect(),
        })))
    }

    /// An `Array` of `element` with optional length bounds.
    pub fn array(element: TypeDescription, min: Option<u64>, max: Option<u64>) -> Self {
        Self::new(DataType::Array(Some(Box::new(ArrayRestrictions {
            min,
            max,
            value: element,
        }))))
    }

    /// An `Object` with the given member types.
    pub fn object<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDescription)>,
        S: Into<String>,
    {
        Self::new(DataType::Object(Some(ObjectRestrictions {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })))
    }

    /// A `Relation` to the given target kind.
    pub fn relation(relation_type: impl Into<String>) -> Self {
        Self::new(DataType::Relation(Some(RelationRestrictions {
            relation_type: relation_type.into(),
        })))
    }

    pub fn with_quantity_kind(mut self, quantity_kind: impl Into<String>) -> Self {
        self.quantity_kind = Some(quantity_kind.into());
        self
    }

    pub fn with_inherits<I, S>(mut self, inherits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherits = inherits.into_iter().map(Into::into).collect();
        self
    }
}

// Wire representation.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeDescription {
    #[serde(default)]
    data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inherits: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enum_restrictions: Option<EnumRestrictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    array_restrictions: Option<RawArrayRestrictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_restrictions: Option<ObjectRestrictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relation_restrictions: Option<RelationRestrictions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawArrayRestrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Box<TypeDescription>>,
}

/// Accept non-negative integral numbers, including `3.0`.
fn bound(n: Option<Number>) -> Option<u64> {
    let n = n?;
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

impl From<RawTypeDescription> for TypeDescription {
    fn from(raw: RawTypeDescription) -> Self {
        let data_type = match raw.data_type.as_str() {
            "String" => DataType::String,
            "Boolean" => DataType::Boolean,
            "Integer" => DataType::Integer,
            "Real" => DataType::Real,
            "DateTime" => DataType::DateTime,
            "Enum" => DataType::Enum(raw.enum_restrictions),
            "Array" => DataType::Array(raw.array_restrictions.and_then(|r| {
                let value = *r.value?;
                Some(Box::new(ArrayRestrictions {
                    min: bound(r.min),
                    max: bound(r.max),
                    value,
                }))
            })),
            "Object" => DataType::Object(raw.object_restrictions),
            "Relation" => DataType::Relation(raw.relation_restrictions),
            _ => DataType::Unrecognized(raw.data_type),
        };
        TypeDescription {
            data_type,
            quantity_kind: raw.quantity_kind,
            inherits: raw.inherits.unwrap_or_default(),
        }
    }
}

impl From<TypeDescription> for RawTypeDescription {
    fn from(desc: TypeDescription) -> Self {
        let mut raw = RawTypeDescription {
            data_type: desc.data_type.name().to_string(),
            quantity_kind: desc.quantity_kind,
            inherits: (!desc.inherits.is_empty()).then_some(desc.inherits),
            ..Default::default()
        };
        match desc.data_type {
            DataType::Enum(r) => raw.enum_restrictions = r,
            DataType::Array(r) => {
                raw.array_restrictions = r.map(|r| {
                    let ArrayRestrictions { min, max, value } = *r;
                    RawArrayRestrictions {
                        min: min.map(Number::from),
                        max: max.map(Number::from),
                        value: Some(Box::new(value)),
                    }
                })
            }
            DataType::Object(r) => raw.object_restrictions = r,
            DataType::Relation(r) => raw.relation_restrictions = r,
            _ => {}
        }
        raw
    }
}
