use super::*;
use crate::error::ArrowListError;
use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, Int32Array, Int64Array, LargeBinaryArray,
    LargeListArray, LargeStringArray, ListArray, ListBuilder, StringArray, StructBuilder,
    UInt8Array,
};
use arrow::datatypes::{DataType, Field, Int32Type, Int64Type};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

type Rows = Vec<Option<Vec<Option<i64>>>>;

/// The list used throughout the examples: [[1,2,3], [], None, [4,5]].
fn create_example_list() -> ListArray {
    crate::observability::init_test_logging();
    ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
        Some(vec![Some(1), Some(2), Some(3)]),
        Some(vec![]),
        None,
        Some(vec![Some(4), Some(5)]),
    ])
}

/// Helper to create random 1-nested rows with nulls at both levels.
fn create_random_rows(rng: &mut StdRng, num_rows: usize) -> Rows {
    (0..num_rows)
        .map(|_| {
            if rng.random_bool(0.2) {
                return None;
            }
            let len = rng.random_range(0..5);
            Some(
                (0..len)
                    .map(|_| rng.random_bool(0.9).then(|| rng.random_range(-3..4)))
                    .collect(),
            )
        })
        .collect()
}

fn as_i64_vec(array: &ArrayRef) -> Vec<i64> {
    match array.data_type() {
        DataType::Int32 => array
            .as_primitive::<Int32Type>()
            .values()
            .iter()
            .map(|&v| v as i64)
            .collect(),
        DataType::Int64 => array.as_primitive::<Int64Type>().values().to_vec(),
        other => panic!("unexpected index type {}", other),
    }
}

//==================================================================================
// 1. get_element_lengths / get_flattened_array_parent_indices
//==================================================================================

#[test]
fn test_element_lengths_example() {
    let lengths = get_element_lengths(&create_example_list()).unwrap();
    assert_eq!(lengths.data_type(), &DataType::Int32);
    assert_eq!(as_i64_vec(&lengths), vec![3, 0, 0, 2]);
    assert_eq!(lengths.null_count(), 0);
}

#[test]
fn test_parent_indices_example() {
    let indices = get_flattened_array_parent_indices(&create_example_list()).unwrap();
    assert_eq!(indices.data_type(), &DataType::Int32);
    assert_eq!(as_i64_vec(&indices), vec![0, 0, 0, 3, 3]);
}

#[test]
fn test_binary_and_string_are_lists_of_bytes() {
    let strings = StringArray::from(vec![Some("abc"), None, Some(""), Some("de")]);
    assert_eq!(as_i64_vec(&get_element_lengths(&strings).unwrap()), vec![3, 0, 0, 2]);
    assert_eq!(
        as_i64_vec(&get_flattened_array_parent_indices(&strings).unwrap()),
        vec![0, 0, 0, 3, 3]
    );

    let binary = BinaryArray::from(vec![b"xy".as_ref(), b"z".as_ref()]);
    assert_eq!(as_i64_vec(&get_element_lengths(&binary).unwrap()), vec![2, 1]);
}

#[test]
fn test_large_offsets_produce_int64() {
    let large_strings = LargeStringArray::from(vec!["a", "bcd"]);
    let lengths = get_element_lengths(&large_strings).unwrap();
    assert_eq!(lengths.data_type(), &DataType::Int64);
    assert_eq!(as_i64_vec(&lengths), vec![1, 3]);

    let large_list = LargeListArray::from_iter_primitive::<Int32Type, _, _>(vec![
        Some(vec![Some(1)]),
        Some(vec![Some(2), Some(3)]),
    ]);
    let indices = get_flattened_array_parent_indices(&large_list).unwrap();
    assert_eq!(indices.data_type(), &DataType::Int64);
    assert_eq!(as_i64_vec(&indices), vec![0, 1, 1]);
}

#[test]
fn test_non_list_alike_is_a_type_error() {
    let ints = Int32Array::from(vec![1, 2, 3]);
    assert!(matches!(
        get_element_lengths(&ints),
        Err(ArrowListError::TypeError(_))
    ));
    assert!(matches!(
        get_flattened_array_parent_indices(&ints),
        Err(ArrowListError::TypeError(_))
    ));
}

#[test]
fn test_lengths_and_parent_indices_properties_on_random_lists() {
    let mut rng = StdRng::seed_from_u64(7);
    for num_rows in [0, 1, 17, 200] {
        let list = ListArray::from_iter_primitive::<Int64Type, _, _>(create_random_rows(
            &mut rng, num_rows,
        ));
        let lengths = as_i64_vec(&get_element_lengths(&list).unwrap());
        assert_eq!(lengths.iter().sum::<i64>() as usize, list.values().len());

        let indices = as_i64_vec(&get_flattened_array_parent_indices(&list).unwrap());
        assert_eq!(indices.len(), list.values().len());
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert!(indices.iter().all(|&i| i >= 0 && (i as usize) < list.len()));
    }
}

//==================================================================================
// 2. get_array_null_bitmap_as_byte_array / get_binary_array_total_byte_size
//==================================================================================

#[test]
fn test_null_bitmap_at_zero_half_and_full_null_density() {
    for (values, expected) in [
        (vec![Some(1), Some(2)], vec![0u8, 0]),
        (vec![Some(1), None], vec![0, 1]),
        (vec![None, None], vec![1, 1]),
    ] {
        let array = Int32Array::from(values);
        let mask = get_array_null_bitmap_as_byte_array(&array).unwrap();
        assert_eq!(mask.len(), array.len());
        assert_eq!(mask.as_primitive::<arrow::datatypes::UInt8Type>(), &UInt8Array::from(expected));
    }
}

#[test]
fn test_binary_total_byte_size() {
    let strings = StringArray::from(vec![Some("hello"), None, Some(""), Some("rust")]);
    assert_eq!(get_binary_array_total_byte_size(&strings).unwrap(), 9);

    let large = LargeBinaryArray::from(vec![b"ab".as_ref(), b"cde".as_ref()]);
    assert_eq!(get_binary_array_total_byte_size(&large).unwrap(), 5);

    let sliced = strings.slice(3, 1);
    assert_eq!(get_binary_array_total_byte_size(&sliced).unwrap(), 4);
}

#[test]
fn test_binary_total_byte_size_rejects_lists() {
    let err = get_binary_array_total_byte_size(&create_example_list()).unwrap_err();
    assert!(matches!(err, ArrowListError::TypeError(_)));
}

//==================================================================================
// 3. value_counts
//==================================================================================

fn counts_as_map(result: &ArrayRef) -> BTreeMap<Option<i64>, i64> {
    let result = result.as_struct();
    let values = result.column(0).as_primitive::<Int64Type>();
    let counts = result.column(1).as_primitive::<Int64Type>();
    values.iter().zip(counts.values().iter().copied()).collect()
}

#[test]
fn test_value_counts_grouping_properties() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut values: Vec<Option<i64>> = (0..300)
        .map(|_| rng.random_bool(0.9).then(|| rng.random_range(0..12)))
        .collect();
    let array: ArrayRef = Arc::new(Int64Array::from(values.clone()));
    let result = value_counts(&array).unwrap();

    let counts = counts_as_map(&result);
    assert_eq!(counts.len(), result.len(), "every value appears exactly once");
    assert_eq!(counts.values().sum::<i64>(), 300);

    let mut expected: BTreeMap<Option<i64>, i64> = BTreeMap::new();
    for value in &values {
        *expected.entry(*value).or_default() += 1;
    }
    assert_eq!(counts, expected);

    // A permutation of the same multiset produces the same pairs.
    values.reverse();
    let permuted: ArrayRef = Arc::new(Int64Array::from(values));
    assert_eq!(counts_as_map(&value_counts(&permuted).unwrap()), expected);
}

#[test]
fn test_value_counts_rejects_nested_and_struct_types() {
    let list: ArrayRef = Arc::new(create_example_list());
    assert!(matches!(value_counts(&list), Err(ArrowListError::TypeError(_))));

    let mut builder = StructBuilder::from_fields(
        vec![Field::new("a", DataType::Int32, true)],
        1,
    );
    builder
        .field_builder::<arrow::array::Int32Builder>(0)
        .unwrap()
        .append_value(1);
    builder.append(true);
    let structs: ArrayRef = Arc::new(builder.finish());
    assert!(matches!(value_counts(&structs), Err(ArrowListError::TypeError(_))));
}

//==================================================================================
// 4. make_list_array_from_parent_indices_and_values
//==================================================================================

#[test]
fn test_make_list_example() {
    let parent_indices = Int64Array::from(vec![0, 1, 1, 3, 3]);
    let values: ArrayRef = Arc::new(Int64Array::from(vec![0, 1, 2, 3, 4]));
    let list = make_list_array_from_parent_indices_and_values(6, &parent_indices, values).unwrap();

    let expected = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
        Some(vec![Some(0)]),
        Some(vec![Some(1), Some(2)]),
        None,
        Some(vec![Some(3), Some(4)]),
        None,
        None,
    ]);
    assert_eq!(list.as_list::<i32>(), &expected);
}

#[test]
fn test_make_list_round_trips_through_flattening() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let num_parents = rng.random_range(1..30usize);
        let num_values = rng.random_range(0..60usize);
        let mut parent_indices: Vec<i64> = (0..num_values)
            .map(|_| rng.random_range(0..num_parents as i64))
            .collect();
        parent_indices.sort_unstable();
        let values: ArrayRef = Arc::new(Int64Array::from_iter_values(0..num_values as i64));

        let list = make_list_array_from_parent_indices_and_values(
            num_parents,
            &Int64Array::from(parent_indices.clone()),
            Arc::clone(&values),
        )
        .unwrap();
        assert_eq!(list.len(), num_parents);

        let flattened = get_flattened_array_parent_indices(&list).unwrap();
        assert_eq!(as_i64_vec(&flattened), parent_indices);
        assert_eq!(list.as_list::<i32>().values(), &values);

        for parent in 0..num_parents {
            let referenced = parent_indices.contains(&(parent as i64));
            assert_eq!(list.is_valid(parent), referenced, "parent {}", parent);
        }
    }
}

#[test]
fn test_make_list_rejects_bad_parent_indices() {
    let values: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));

    let int32_indices = Int32Array::from(vec![0, 1]);
    let err = make_list_array_from_parent_indices_and_values(2, &int32_indices, Arc::clone(&values))
        .unwrap_err();
    assert!(matches!(err, ArrowListError::TypeError(_)));

    let null_indices = Int64Array::from(vec![Some(0), None]);
    let err = make_list_array_from_parent_indices_and_values(2, &null_indices, Arc::clone(&values))
        .unwrap_err();
    assert!(matches!(err, ArrowListError::InvalidArgument(_)));

    let unsorted = Int64Array::from(vec![1, 0]);
    let err =
        make_list_array_from_parent_indices_and_values(2, &unsorted, values).unwrap_err();
    assert!(matches!(err, ArrowListError::InvalidArgument(_)));
}

//==================================================================================
// 5. coo_from_list_array
//==================================================================================

#[test]
fn test_coo_example() {
    let list = ListArray::from_iter_primitive::<Int64Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        Some(vec![]),
        Some(vec![Some(3)]),
        None,
    ]);
    let (coo, dense_shape) = coo_from_list_array(&list).unwrap();
    assert_eq!(as_i64_vec(&coo), vec![0, 0, 0, 1, 2, 0]);
    assert_eq!(as_i64_vec(&dense_shape), vec![4, 2]);
}

#[test]
fn test_coo_of_nested_string_lists() {
    // [[["a"], ["b", "c"]], [["d"]]]
    let mut builder = ListBuilder::new(ListBuilder::new(arrow::array::StringBuilder::new()));
    builder.values().values().append_value("a");
    builder.values().append(true);
    builder.values().values().append_value("b");
    builder.values().values().append_value("c");
    builder.values().append(true);
    builder.append(true);
    builder.values().values().append_value("d");
    builder.values().append(true);
    builder.append(true);
    let list = builder.finish();

    let (coo, dense_shape) = coo_from_list_array(&list).unwrap();
    assert_eq!(
        as_i64_vec(&coo),
        vec![0, 0, 0, 0, 1, 0, 0, 1, 1, 1, 0, 0]
    );
    assert_eq!(as_i64_vec(&dense_shape), vec![2, 2, 2]);
}

#[test]
fn test_coo_coordinates_lie_inside_dense_shape() {
    let mut rng = StdRng::seed_from_u64(5);
    let rows = create_random_rows(&mut rng, 64);
    let list = ListArray::from_iter_primitive::<Int64Type, _, _>(rows.clone());
    let (coo, dense_shape) = coo_from_list_array(&list).unwrap();
    let coo = as_i64_vec(&coo);
    let dense_shape = as_i64_vec(&dense_shape);

    let expected_values: usize = rows.iter().flatten().map(Vec::len).sum();
    assert_eq!(coo.len(), expected_values * 2);
    for coordinate in coo.chunks_exact(2) {
        assert!(coordinate[0] < dense_shape[0]);
        assert!(coordinate[1] < dense_shape[1]);
    }
    let longest = rows.iter().flatten().map(Vec::len).max().unwrap_or(0);
    assert_eq!(dense_shape, vec![64, longest as i64]);
}

#[test]
fn test_coo_rejects_flat_and_struct_leaves() {
    let flat = Int64Array::from(vec![1]);
    assert!(matches!(
        coo_from_list_array(&flat),
        Err(ArrowListError::TypeError(_))
    ));

    let strings = StringArray::from(vec!["not", "a", "list"]);
    assert!(matches!(
        coo_from_list_array(&strings),
        Err(ArrowListError::TypeError(_))
    ));

    let struct_field = Field::new(
        "item",
        DataType::Struct(vec![Field::new("a", DataType::Int32, true)].into()),
        true,
    );
    let list_of_struct = arrow::array::new_empty_array(&DataType::List(Arc::new(struct_field)));
    assert!(matches!(
        coo_from_list_array(list_of_struct.as_ref()),
        Err(ArrowListError::TypeError(_))
    ));
}

//==================================================================================
// 6. fill_null_lists
//==================================================================================

#[test]
fn test_fill_null_lists_leaves_no_nulls() {
    let fill = Int64Array::from(vec![0, 0]);
    let filled = fill_null_lists(&create_example_list(), &fill).unwrap();
    assert_eq!(filled.null_count(), 0);
    assert_eq!(as_i64_vec(&get_element_lengths(&filled).unwrap()), vec![3, 0, 2, 2]);
}

#[test]
fn test_fill_null_lists_is_idempotent() {
    let fill = Int64Array::from(vec![9]);
    let once = fill_null_lists(&create_example_list(), &fill).unwrap();
    let twice = fill_null_lists(once.as_ref(), &fill).unwrap();
    assert_eq!(once.to_data(), twice.to_data());
}

#[test]
fn test_fill_null_lists_type_errors() {
    let wrong_fill = StringArray::from(vec!["x"]);
    assert!(matches!(
        fill_null_lists(&create_example_list(), &wrong_fill),
        Err(ArrowListError::TypeError(_))
    ));

    let not_a_list = Int64Array::from(vec![1]);
    assert!(matches!(
        fill_null_lists(&not_a_list, &Int64Array::from(vec![1])),
        Err(ArrowListError::TypeError(_))
    ));
}
