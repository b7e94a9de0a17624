//! Type handlers: one per output tensor, each converting a single list column
//! of a `RecordBatch` into a `Tensor`.
//!
//! Handlers are chosen per representation kind. A dense representation uses
//! the default-filling handler when it carries a default value and the plain
//! dense handler otherwise. All handlers only accept 1-nested list columns of a
//! tensor-compatible leaf type.

use std::fmt;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, ArrowPrimitiveType, AsArray, BinaryArray, LargeBinaryArray, PrimitiveArray,
};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    Schema, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use ndarray::Array2;
use num_traits::{NumCast, ToPrimitive};

use crate::bridge;
use crate::config::{DefaultValue, DenseTensorRepresentation, VarLenSparseTensorRepresentation};
use crate::error::{ArrowListError, Result};
use crate::kernels::get_nest_depth_and_value_type;
use crate::types::TensorDataType;

use super::{flatten_values, SparseTensor, Tensor, TypeSpec};

//==================================================================================
// 1. The Handler Contract
//==================================================================================

/// Converts one column of a record batch into a tensor.
pub trait TypeHandler: fmt::Debug + Send + Sync {
    /// The type of every tensor this handler produces.
    fn type_spec(&self) -> TypeSpec;

    /// Produces the tensor for `record_batch`.
    fn get_tensor(&self, record_batch: &RecordBatch) -> Result<Tensor>;
}

/// Resolves `column_name` in `schema`, returning its index and leaf tensor type
/// if it is a 1-nested list of a supported type.
fn resolve_column(schema: &Schema, column_name: &str) -> Result<(usize, DataType)> {
    let column_index = schema.index_of(column_name).map_err(|_| {
        ArrowListError::InvalidArgument(format!(
            "column {} is not present in the schema",
            column_name
        ))
    })?;
    let (depth, value_type) = get_nest_depth_and_value_type(schema.field(column_index).data_type());
    if depth != 1 || !TensorDataType::is_supported(&value_type) {
        return Err(ArrowListError::TypeError(format!(
            "column {} of type {} must be a list of an integer, floating point or binary type",
            column_name,
            schema.field(column_index).data_type()
        )));
    }
    Ok((column_index, value_type))
}

fn column<'a>(record_batch: &'a RecordBatch, column_index: usize) -> Result<&'a ArrayRef> {
    if column_index >= record_batch.num_columns() {
        return Err(ArrowListError::InvalidArgument(format!(
            "record batch has {} columns, expected column index {}",
            record_batch.num_columns(),
            column_index
        )));
    }
    Ok(record_batch.column(column_index))
}

//==================================================================================
// 2. Dense Handlers
//==================================================================================

/// Handles conversion to a dense tensor of a fixed unbatched shape.
#[derive(Debug)]
pub struct DenseTensorHandler {
    column_index: usize,
    dtype: TensorDataType,
    unbatched_shape: Vec<usize>,
    unbatched_flat_len: usize,
}

impl DenseTensorHandler {
    pub fn new(schema: &Schema, rep: &DenseTensorRepresentation) -> Result<Self> {
        let (column_index, value_type) = resolve_column(schema, &rep.column_name)?;
        let unbatched_flat_len = rep
            .shape
            .iter()
            .try_fold(1usize, |len, &dim| len.checked_mul(dim))
            .ok_or_else(|| {
                ArrowListError::Config(format!(
                    "shape {:?} of column {} has more elements than fit in memory",
                    rep.shape, rep.column_name
                ))
            })?;
        Ok(Self {
            column_index,
            dtype: TensorDataType::from_arrow_type(&value_type)?,
            unbatched_shape: rep.shape.clone(),
            unbatched_flat_len,
        })
    }

    fn list_array_to_tensor(&self, list_array: &dyn Array) -> Result<Tensor> {
        let values = flatten_values(list_array)?;
        let batch_size = list_array.len();
        let expected = batch_size
            .checked_mul(self.unbatched_flat_len)
            .ok_or_else(|| {
                ArrowListError::Overflow(format!(
                    "{} rows of {} elements overflow the tensor size",
                    batch_size, self.unbatched_flat_len
                ))
            })?;
        if values.len() != expected {
            return Err(ArrowListError::InvalidArgument(format!(
                "Unable to convert list array to {:?}: size mismatch. expected {} elements but got {}",
                self.type_spec(),
                expected,
                values.len()
            )));
        }
        let mut shape = Vec::with_capacity(self.unbatched_shape.len() + 1);
        shape.push(batch_size);
        shape.extend_from_slice(&self.unbatched_shape);
        Ok(Tensor::Dense { values, shape })
    }
}

impl TypeHandler for DenseTensorHandler {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::dense(&self.unbatched_shape, self.dtype)
    }

    fn get_tensor(&self, record_batch: &RecordBatch) -> Result<Tensor> {
        self.list_array_to_tensor(column(record_batch, self.column_index)?.as_ref())
    }
}

/// Handles conversion to a dense tensor, filling null rows with a default value.
#[derive(Debug)]
pub struct DefaultFillingDenseTensorHandler {
    dense: DenseTensorHandler,
    default_fill: ArrayRef,
}

impl DefaultFillingDenseTensorHandler {
    pub fn new(
        schema: &Schema,
        rep: &DenseTensorRepresentation,
        default_value: &DefaultValue,
    ) -> Result<Self> {
        let dense = DenseTensorHandler::new(schema, rep)?;
        if dense.unbatched_flat_len > i32::MAX as usize {
            return Err(ArrowListError::Config(format!(
                "shape {:?} of column {} is too large to fill with a default value",
                rep.shape, rep.column_name
            )));
        }
        let (_, value_type) = get_nest_depth_and_value_type(
            schema.field(dense.column_index).data_type(),
        );
        let default_fill = default_fill_array(&value_type, default_value, dense.unbatched_flat_len)?;
        Ok(Self {
            dense,
            default_fill,
        })
    }
}

impl TypeHandler for DefaultFillingDenseTensorHandler {
    fn type_spec(&self) -> TypeSpec {
        self.dense.type_spec()
    }

    fn get_tensor(&self, record_batch: &RecordBatch) -> Result<Tensor> {
        let column = column(record_batch, self.dense.column_index)?;
        let filled = bridge::fill_null_lists(column.as_ref(), self.default_fill.as_ref())?;
        self.dense.list_array_to_tensor(filled.as_ref())
    }
}

//==================================================================================
// 3. Sparse Handler
//==================================================================================

/// Handles conversion to a 2-D sparse tensor.
#[derive(Debug)]
pub struct VarLenSparseTensorHandler {
    column_index: usize,
    dtype: TensorDataType,
}

impl VarLenSparseTensorHandler {
    pub fn new(schema: &Schema, rep: &VarLenSparseTensorRepresentation) -> Result<Self> {
        let (column_index, value_type) = resolve_column(schema, &rep.column_name)?;
        Ok(Self {
            column_index,
            dtype: TensorDataType::from_arrow_type(&value_type)?,
        })
    }
}

impl TypeHandler for VarLenSparseTensorHandler {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Sparse { dtype: self.dtype }
    }

    fn get_tensor(&self, record_batch: &RecordBatch) -> Result<Tensor> {
        let array = column(record_batch, self.column_index)?;
        let (coo_array, dense_shape_array) = bridge::coo_from_list_array(array.as_ref())?;
        let values = flatten_values(array.as_ref())?;

        let coo = coo_array.as_primitive::<Int64Type>().values().to_vec();
        let indices = Array2::from_shape_vec((values.len(), 2), coo).map_err(|e| {
            ArrowListError::InvalidArgument(format!("COO indices do not match the values: {}", e))
        })?;
        let dense_shape = dense_shape_array.as_primitive::<Int64Type>().values().to_vec();

        Ok(Tensor::Sparse(SparseTensor {
            indices,
            values,
            dense_shape,
        }))
    }
}

//==================================================================================
// 4. Default Values
//==================================================================================

/// Builds an array holding `size` copies of `default_value`, typed as `value_type`.
///
/// Fails with a configuration error if the value kind does not match the leaf
/// type, or if an integer default does not fit the leaf integer type.
pub fn default_fill_array(
    value_type: &DataType,
    default_value: &DefaultValue,
    size: usize,
) -> Result<ArrayRef> {
    let dtype = TensorDataType::from_arrow_type(value_type)?;
    match (default_value, value_type) {
        (DefaultValue::IntValue(v), dt) if dtype.is_integer() => repeat_integer(dt, *v, size),
        (DefaultValue::UintValue(v), dt) if dtype.is_integer() => repeat_integer(dt, *v, size),
        (DefaultValue::FloatValue(v), dt) if dtype.is_float() => repeat_float(dt, *v, size),
        (DefaultValue::BytesValue(bytes), DataType::Binary) => Ok(Arc::new(
            BinaryArray::from_iter_values(std::iter::repeat(bytes).take(size)),
        )),
        (DefaultValue::BytesValue(bytes), DataType::LargeBinary) => Ok(Arc::new(
            LargeBinaryArray::from_iter_values(std::iter::repeat(bytes).take(size)),
        )),
        (value, dt) => Err(ArrowListError::Config(format!(
            "Incompatible default value: {:?} is set for a {} column",
            value, dt
        ))),
    }
}

fn repeat_integer<V>(value_type: &DataType, value: V, size: usize) -> Result<ArrayRef>
where
    V: ToPrimitive + fmt::Display + Copy,
{
    match value_type {
        DataType::Int8 => repeat::<Int8Type, _>(value, size),
        DataType::Int16 => repeat::<Int16Type, _>(value, size),
        DataType::Int32 => repeat::<Int32Type, _>(value, size),
        DataType::Int64 => repeat::<Int64Type, _>(value, size),
        DataType::UInt8 => repeat::<UInt8Type, _>(value, size),
        DataType::UInt16 => repeat::<UInt16Type, _>(value, size),
        DataType::UInt32 => repeat::<UInt32Type, _>(value, size),
        DataType::UInt64 => repeat::<UInt64Type, _>(value, size),
        dt => Err(ArrowListError::Config(format!(
            "Integer default value {} cannot fill a {} column",
            value, dt
        ))),
    }
}

fn repeat_float(value_type: &DataType, value: f64, size: usize) -> Result<ArrayRef> {
    match value_type {
        DataType::Float16 => repeat::<Float16Type, _>(value, size),
        DataType::Float32 => repeat::<Float32Type, _>(value, size),
        DataType::Float64 => repeat::<Float64Type, _>(value, size),
        dt => Err(ArrowListError::Config(format!(
            "Float default value {} cannot fill a {} column",
            value, dt
        ))),
    }
}

fn repeat<T, V>(value: V, size: usize) -> Result<ArrayRef>
where
    T: ArrowPrimitiveType,
    T::Native: NumCast,
    V: ToPrimitive + fmt::Display + Copy,
{
    let native = <T::Native as NumCast>::from(value).ok_or_else(|| {
        ArrowListError::Config(format!(
            "Default value out of range: {} is set for a {} column",
            value,
            T::DATA_TYPE
        ))
    })?;
    Ok(Arc::new(PrimitiveArray::<T>::from_value(native, size)))
}
