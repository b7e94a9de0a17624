// In: src/tensor/mod.rs

//! The tensor adapter: converts the list columns of a `RecordBatch` into
//! dense or sparse tensors, as described by a `TensorAdapterConfig`.
//!
//! ## Architecture
//!
//! `TensorAdapter::new` validates every representation of the config against
//! the Arrow schema once and builds one `TypeHandler` per output tensor. After
//! that, `to_batch_tensors` is a pure per-batch transformation built on the
//! stateless bridge operations (`fill_null_lists`, `coo_from_list_array`).

pub mod handlers;


use std::collections::BTreeMap;

use arrow::array::{Array, ArrayRef, ArrowPrimitiveType, AsArray, UInt64Array};
use arrow::compute::take;
use arrow::record_batch::RecordBatch;
use ndarray::{Array2, ArrayD, IxDyn};

use crate::config::{TensorAdapterConfig, TensorRepresentation};
use crate::error::{ArrowListError, Result};
use crate::kernels::ListLike;
use crate::types::TensorDataType;

pub use handlers::{
    DefaultFillingDenseTensorHandler, DenseTensorHandler, TypeHandler, VarLenSparseTensorHandler,
};

//==================================================================================
// 1. Tensor Types
//==================================================================================

/// The type of a produced tensor. The batch dimension is always unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// `shape[0]` is the batch dimension (`None`), followed by the unbatched shape.
    Dense {
        shape: Vec<Option<usize>>,
        dtype: TensorDataType,
    },
    /// Always 2-D: `[batch_size, max_row_length]`, both unknown ahead of time.
    Sparse { dtype: TensorDataType },
}

impl TypeSpec {
    pub fn dense(unbatched_shape: &[usize], dtype: TensorDataType) -> Self {
        let shape = std::iter::once(None)
            .chain(unbatched_shape.iter().copied().map(Some))
            .collect();
        Self::Dense { shape, dtype }
    }
}

/// A sparse tensor in COO form.
#[derive(Debug, Clone)]
pub struct SparseTensor {
    /// `(num_values, 2)` coordinates, one row per value.
    pub indices: Array2<i64>,
    pub values: ArrayRef,
    pub dense_shape: Vec<i64>,
}

/// A tensor produced from one list column of a record batch.
#[derive(Debug, Clone)]
pub enum Tensor {
    /// Row-major values of a `shape`-shaped tensor, batch dimension first.
    Dense { values: ArrayRef, shape: Vec<usize> },
    Sparse(SparseTensor),
}

impl Tensor {
    /// Copies a dense primitive tensor into an `ndarray` array.
    ///
    /// Fails with `TypeError` for sparse tensors or if `T` is not the value type,
    /// and with `InvalidArgument` if the values contain nulls.
    pub fn to_ndarray<T: ArrowPrimitiveType>(&self) -> Result<ArrayD<T::Native>> {
        let (values, shape) = match self {
            Self::Dense { values, shape } => (values, shape),
            Self::Sparse(_) => {
                return Err(ArrowListError::TypeError(
                    "a sparse tensor cannot be viewed as a dense ndarray".to_string(),
                ))
            }
        };
        let primitive = values.as_primitive_opt::<T>().ok_or_else(|| {
            ArrowListError::TypeError(format!(
                "tensor values are {}, not {}",
                values.data_type(),
                T::DATA_TYPE
            ))
        })?;
        if primitive.null_count() > 0 {
            return Err(ArrowListError::InvalidArgument(format!(
                "dense tensor values contain {} nulls",
                primitive.null_count()
            )));
        }
        ArrayD::from_shape_vec(IxDyn(shape.as_slice()), primitive.values().to_vec()).map_err(|e| {
            ArrowListError::InvalidArgument(format!("tensor shape {:?} is invalid: {}", shape, e))
        })
    }
}

//==================================================================================
// 2. The Adapter
//==================================================================================

/// Converts record batches into tensors according to a `TensorAdapterConfig`.
#[derive(Debug)]
pub struct TensorAdapter {
    type_handlers: BTreeMap<String, Box<dyn TypeHandler>>,
    type_specs: BTreeMap<String, TypeSpec>,
}

impl TensorAdapter {
    /// Validates `config` against its schema and builds one handler per tensor.
    pub fn new(config: TensorAdapterConfig) -> Result<Self> {
        let schema = &config.arrow_schema;
        let mut type_handlers: BTreeMap<String, Box<dyn TypeHandler>> = BTreeMap::new();
        for (tensor_name, rep) in &config.tensor_representations {
            let handler: Box<dyn TypeHandler> = match rep {
                TensorRepresentation::DenseTensor(dense) => match &dense.default_value {
                    Some(default_value) => Box::new(DefaultFillingDenseTensorHandler::new(
                        schema,
                        dense,
                        default_value,
                    )?),
                    None => Box::new(DenseTensorHandler::new(schema, dense)?),
                },
                TensorRepresentation::VarlenSparseTensor(sparse) => {
                    Box::new(VarLenSparseTensorHandler::new(schema, sparse)?)
                }
            };
            log::debug!(
                "tensor adapter: {} <- column {} as {:?}",
                tensor_name,
                rep.column_name(),
                handler.type_spec()
            );
            type_handlers.insert(tensor_name.clone(), handler);
        }

        let type_specs = type_handlers
            .iter()
            .map(|(name, handler)| (name.clone(), handler.type_spec()))
            .collect();
        Ok(Self {
            type_handlers,
            type_specs,
        })
    }

    /// The type spec of every tensor `to_batch_tensors` produces, by name.
    pub fn type_specs(&self) -> &BTreeMap<String, TypeSpec> {
        &self.type_specs
    }

    /// Converts `record_batch` into one tensor per configured representation.
    pub fn to_batch_tensors(&self, record_batch: &RecordBatch) -> Result<BTreeMap<String, Tensor>> {
        self.type_handlers
            .iter()
            .map(|(name, handler)| Ok((name.clone(), handler.get_tensor(record_batch)?)))
            .collect()
    }
}

//==================================================================================
// 3. Helpers
//==================================================================================

/// Returns the values owned by the valid elements of a `List`/`LargeList`.
///
/// This is a zero-copy slice unless some null element owns a non-empty range.
pub(crate) fn flatten_values(array: &dyn Array) -> Result<ArrayRef> {
    let not_a_list = || {
        ArrowListError::TypeError(format!("expected a list array, got {}", array.data_type()))
    };
    let list = ListLike::try_new_list(array).ok_or_else(not_a_list)?;
    let child = list.child().ok_or_else(not_a_list)?;
    let offsets = list.offsets();
    if list.is_empty() {
        return Ok(child.slice(0, 0));
    }

    let null_owns_values =
        (0..list.len()).any(|i| !list.is_valid(i) && !offsets.range(i).is_empty());
    if !null_owns_values {
        return Ok(child.slice(offsets.range(0).start, offsets.span()));
    }

    let indices: Vec<u64> = (0..list.len())
        .filter(|&i| list.is_valid(i))
        .flat_map(|i| offsets.range(i))
        .map(|position| position as u64)
        .collect();
    Ok(take(child.as_ref(), &UInt64Array::from(indices), None)?)
}
