// In: src/config.rs

//! The configuration of the tensor adapter.
//!
//! A `TensorAdapterConfig` pairs the Arrow schema of the record batches that
//! will be converted with one `TensorRepresentation` per output tensor. It is
//! created once at the application boundary (typically parsed from JSON) and
//! handed to `TensorAdapter::new`, which validates it against the schema.

use std::collections::BTreeMap;

use arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

//==================================================================================
// I. Tensor Representations
//==================================================================================

/// How a single list column is turned into a tensor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TensorRepresentation {
    /// A fixed-shape dense tensor. Every row must hold exactly `prod(shape)`
    /// values unless a `default_value` is provided for null rows.
    DenseTensor(DenseTensorRepresentation),

    /// A 2-D sparse tensor of shape `[batch_size, max_row_length]`.
    VarlenSparseTensor(VarLenSparseTensorRepresentation),
}

impl TensorRepresentation {
    /// The name of the column this representation reads from.
    pub fn column_name(&self) -> &str {
        match self {
            Self::DenseTensor(rep) => &rep.column_name,
            Self::VarlenSparseTensor(rep) => &rep.column_name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DenseTensorRepresentation {
    pub column_name: String,

    /// The unbatched shape. An empty shape describes a scalar per row.
    #[serde(default)]
    pub shape: Vec<usize>,

    /// If set, null rows are filled with `prod(shape)` copies of this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct VarLenSparseTensorRepresentation {
    pub column_name: String,
}

/// The value used to fill null rows of a dense tensor.
///
/// The variant must be compatible with the column's leaf type: integer values
/// need an integer leaf (and must fit it), floats a floating leaf, bytes a
/// binary leaf.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    IntValue(i64),
    UintValue(u64),
    FloatValue(f64),
    BytesValue(Vec<u8>),
}

//==================================================================================
// II. The Unified TensorAdapterConfig
//==================================================================================

/// The full configuration of a `TensorAdapter`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TensorAdapterConfig {
    /// The schema of the record batches to convert.
    pub arrow_schema: Schema,

    /// Output tensor name -> representation. Ordered so handlers are built
    /// deterministically.
    #[serde(default)]
    pub tensor_representations: BTreeMap<String, TensorRepresentation>,
}

impl TensorAdapterConfig {
    pub fn new(
        arrow_schema: Schema,
        tensor_representations: BTreeMap<String, TensorRepresentation>,
    ) -> Self {
        Self {
            arrow_schema,
            tensor_representations,
        }
    }

    /// Parses a configuration from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
