use std::any::Any;

use arrow::array::{Array, AsArray};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Int16Type, Int32Type, Int64Type};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::backend::EncodedColumn;
use crate::hook::{AggregateHook, HookKind, MaxHook, MinHook, SumHook};
use crate::kernels::{dictionary, rle, ColumnEncoding};
use crate::predicate::{
    create_bigint_values, create_negated_bigint_values, BigintMultiRange, BigintRange, IsNotNull,
    IsNull, Predicate, PredicateKind,
};
use crate::traits::DecodedInt;
use crate::utils::typed_slice_to_bytes;

//==================================================================================
// Test Helpers
//==================================================================================

/// Builds a reader over `data`, storing only the non-null values in the value
/// stream the way a column writer would.
fn reader_from_options<T: DecodedInt>(
    data: &[Option<T>],
    encoding: ColumnEncoding,
) -> SelectiveIntegerColumnReader<EncodedColumn> {
    let non_null: Vec<T> = data.iter().flatten().copied().collect();
    let bytes = match encoding {
        ColumnEncoding::Direct => typed_slice_to_bytes(&non_null),
        ColumnEncoding::Rle => rle::encode(&non_null),
        ColumnEncoding::Dictionary => dictionary::encode(&non_null),
    };
    let nulls = if data.iter().any(Option::is_none) {
        Some(NullBuffer::from(
            data.iter().map(Option::is_some).collect::<Vec<bool>>(),
        ))
    } else {
        None
    };
    SelectiveIntegerColumnReader::new(
        EncodedColumn::new(encoding, bytes),
        T::PHYSICAL_TYPE,
        data.len(),
        nulls,
    )
    .unwrap()
}

/// What a row-at-a-time scan would produce for `rows` under `predicate`.
fn expected_survivors<T: DecodedInt>(
    data: &[Option<T>],
    rows: &[usize],
    predicate: &dyn Predicate,
) -> (Vec<usize>, Vec<Option<i64>>) {
    rows.iter()
        .filter_map(|&row| match data[row] {
            Some(v) => {
                let v: i64 = v.into();
                predicate.test_int64(v).then_some((row, Some(v)))
            }
            None => predicate.test_null().then_some((row, None)),
        })
        .unzip()
}

fn sample_column() -> Vec<Option<i32>> {
    vec![
        Some(10),
        None,
        Some(-2),
        Some(5),
        None,
        Some(40),
        Some(5),
        Some(7),
        None,
        Some(-100),
        Some(0),
        Some(12),
    ]
}

/// A backend that must never be asked for values.
struct UntouchableBackend;

impl DecodingBackend for UntouchableBackend {
    fn read_with_visitor<T, P, E, const DENSE: bool>(
        &self,
        _visitor: ColumnVisitor<'_, T, P, E, DENSE>,
    ) -> Result<(), TambakError>
    where
        T: crate::traits::DecodedInt,
        P: Predicate + ?Sized,
        E: ExtractValues,
    {
        Err(TambakError::InternalError(
            "value stream was touched".to_string(),
        ))
    }
}

/// A hook this crate knows nothing about.
#[derive(Debug, Default)]
struct RecordingHook {
    values: Vec<(usize, i64)>,
    nulls: Vec<usize>,
}

impl AggregateHook for RecordingHook {
    fn kind(&self) -> HookKind {
        HookKind::Custom(7)
    }

    fn add_value(&mut self, row: usize, value: i64) {
        self.values.push((row, value));
    }

    fn add_null(&mut self, row: usize) {
        self.nulls.push(row);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Reports the sum kind but is not a `SumHook`; keeps the calls it receives.
#[derive(Debug, Default)]
struct RecordingSumHook {
    sum: SumHook,
    calls: Vec<(usize, i64)>,
}

impl AggregateHook for RecordingSumHook {
    fn kind(&self) -> HookKind {
        HookKind::SumBigintToBigint
    }

    fn add_value(&mut self, row: usize, value: i64) {
        self.sum.add_value(row, value);
        self.calls.push((row, value));
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A predicate defined outside the built-in set.
#[derive(Debug)]
struct ConstantPredicate(bool);

impl Predicate for ConstantPredicate {
    fn kind(&self) -> PredicateKind {
        PredicateKind::Custom(99)
    }

    fn test_int64(&self, _value: i64) -> bool {
        self.0
    }

    fn test_null(&self) -> bool {
        self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Claims to be a `BigintRange` but is not one; keeps even values.
#[derive(Debug)]
struct MislabeledPredicate;

impl Predicate for MislabeledPredicate {
    fn kind(&self) -> PredicateKind {
        PredicateKind::BigintRange
    }

    fn test_int64(&self, value: i64) -> bool {
        value % 2 == 0
    }

    fn test_null(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//==================================================================================
// Row coverage and predicate correctness
//==================================================================================

#[test]
fn test_no_filter_returns_every_requested_row() {
    let data = sample_column();
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [1, 2, 5, 8, 11];
    let mut spec = ScanSpec::new();

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(reader.output_rows(), &rows);
    assert_eq!(
        reader.output().to_options(),
        vec![None, Some(-2), Some(40), None, Some(12)]
    );
    assert_eq!(reader.output().null_count(), 2);
}

#[test]
fn test_range_filter_keeps_exactly_matching_rows() {
    let data = sample_column();
    let range = BigintRange::new(0, 10, false);
    let all: Vec<usize> = (0..data.len()).collect();

    for rows in [all.clone(), vec![0, 3, 4, 6, 9, 10]] {
        let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
        let mut spec = ScanSpec::new().with_filter(&range);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

        let (expected_rows, expected_values) = expected_survivors(&data, &rows, &range);
        assert_eq!(reader.output_rows(), expected_rows.as_slice());
        assert_eq!(reader.output().to_options(), expected_values);
    }
}

#[test]
fn test_range_allowing_nulls_keeps_null_rows() {
    let data = sample_column();
    let range = BigintRange::new(5, 5, true);
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows: Vec<usize> = (0..data.len()).collect();
    let mut spec = ScanSpec::new().with_filter(&range);

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(reader.output_rows(), &[1, 3, 4, 6, 8]);
    assert_eq!(
        reader.output().to_options(),
        vec![None, Some(5), None, Some(5), None]
    );
}

#[test]
fn test_every_builtin_predicate_matches_row_at_a_time_scan() {
    let data = sample_column();
    let rows = [0, 2, 3, 5, 6, 7, 9, 10, 11];
    let predicates: Vec<Box<dyn Predicate>> = vec![
        Box::new(BigintRange::new(-5, 10, false)),
        Box::new(BigintMultiRange::new(
            vec![BigintRange::new(30, 50, false), BigintRange::new(-200, -50, false)],
            false,
        )),
        create_bigint_values(&[5, 7, 12], false).unwrap(),
        create_bigint_values(&[-100, 40, 1 << 40], false).unwrap(),
        create_negated_bigint_values(&[5, 0], false).unwrap(),
        create_negated_bigint_values(&[-100, 1 << 40], true).unwrap(),
        Box::new(IsNotNull),
    ];

    for predicate in &predicates {
        for encoding in [ColumnEncoding::Direct, ColumnEncoding::Rle, ColumnEncoding::Dictionary] {
            let mut reader = reader_from_options(&data, encoding);
            let mut spec = ScanSpec::new().with_filter(predicate.as_ref());
            reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

            let (expected_rows, expected_values) =
                expected_survivors(&data, &rows, predicate.as_ref());
            assert_eq!(
                reader.output_rows(),
                expected_rows.as_slice(),
                "{:?} over {:?}",
                predicate,
                encoding
            );
            assert_eq!(reader.output().to_options(), expected_values);
        }
    }
}

#[test]
fn test_custom_predicate_uses_generic_path() {
    let data = sample_column();
    let rows = [0, 1, 4, 7];

    let keep = ConstantPredicate(true);
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let mut spec = ScanSpec::new().with_filter(&keep);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    assert_eq!(reader.output_rows(), &rows);

    let reject = ConstantPredicate(false);
    let mut spec = ScanSpec::new().with_filter(&reject);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    assert!(reader.output_rows().is_empty());
    assert_eq!(reader.num_values(), 0);
}

#[test]
fn test_mislabeled_predicate_falls_back_to_its_own_test() {
    let data: Vec<Option<i64>> = (0..10).map(Some).collect();
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows: Vec<usize> = (0..10).collect();
    let mut spec = ScanSpec::new().with_filter(&MislabeledPredicate);

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(reader.output_rows(), &[0, 2, 4, 6, 8]);
}

//==================================================================================
// Null-only predicates
//==================================================================================

#[test]
fn test_is_null_drop_never_touches_value_stream() {
    let nulls = NullBuffer::from(vec![true, false, true, false, false, true]);
    let mut reader =
        SelectiveIntegerColumnReader::new(UntouchableBackend, PhysicalType::Int64, 6, Some(nulls))
            .unwrap();
    let rows = [0, 1, 3, 4, 5];
    let mut spec = ScanSpec::new().with_filter(&IsNull).with_keep_values(false);

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(reader.output_rows(), &[1, 3, 4]);
    assert_eq!(reader.num_values(), 0);
}

#[test]
fn test_is_null_to_output_stores_nulls_without_decoding() {
    let nulls = NullBuffer::from(vec![false, true, false, true]);
    let mut reader =
        SelectiveIntegerColumnReader::new(UntouchableBackend, PhysicalType::Int32, 4, Some(nulls))
            .unwrap();
    let rows = [0, 1, 2, 3];
    let mut spec = ScanSpec::new().with_filter(&IsNull);

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(reader.output_rows(), &[0, 2]);
    assert_eq!(reader.output().to_options(), vec![None, None]);
}

#[test]
fn test_is_null_without_bitmap_selects_nothing() {
    let mut reader =
        SelectiveIntegerColumnReader::new(UntouchableBackend, PhysicalType::Int16, 3, None)
            .unwrap();
    let rows = [0, 2];
    let mut spec = ScanSpec::new().with_filter(&IsNull).with_keep_values(false);

    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    assert!(reader.output_rows().is_empty());

    let mut spec = ScanSpec::new().with_filter(&IsNotNull).with_keep_values(false);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    assert_eq!(reader.output_rows(), &rows);
}

#[test]
fn test_is_not_null_drop_and_output_agree_on_rows() {
    let data = sample_column();
    let rows = [0, 1, 3, 4, 8, 9];

    let mut reader = reader_from_options(&data, ColumnEncoding::Rle);
    let mut spec = ScanSpec::new().with_filter(&IsNotNull).with_keep_values(false);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    let dropped = reader.output_rows().to_vec();

    let mut spec = ScanSpec::new().with_filter(&IsNotNull);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(dropped, vec![0, 3, 9]);
    assert_eq!(reader.output_rows(), dropped.as_slice());
    assert_eq!(
        reader.output().to_options(),
        vec![Some(10), Some(5), Some(-100)]
    );
}

//==================================================================================
// Extraction modes
//==================================================================================

#[test]
fn test_drop_and_to_output_select_the_same_rows() {
    let data = sample_column();
    let range = BigintRange::new(-10, 10, true);
    let rows = [1, 2, 3, 6, 7, 9, 11];

    let mut reader = reader_from_options(&data, ColumnEncoding::Dictionary);
    let mut spec = ScanSpec::new().with_filter(&range).with_keep_values(false);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    let dropped = reader.output_rows().to_vec();
    assert_eq!(reader.num_values(), 0);

    let mut spec = ScanSpec::new().with_filter(&range);
    reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    assert_eq!(reader.output_rows(), dropped.as_slice());
    assert_eq!(reader.num_values(), dropped.len());
}

#[test]
fn test_sum_hook_over_sparse_rows() {
    let data: Vec<Option<i32>> = vec![
        Some(1),
        Some(1),
        Some(1),
        Some(10),
        Some(1),
        Some(1),
        Some(1),
        Some(-2),
        Some(1),
        Some(5),
    ];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [3, 7, 9];
    let mut sum = SumHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut sum);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }

    assert_eq!(sum.sum(), 13);
    assert_eq!(sum.count(), 3);
    assert!(reader.output_rows().is_empty());
    assert_eq!(reader.num_values(), 0);

    let mut recorded = RecordingSumHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut recorded);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }
    assert_eq!(recorded.calls, vec![(3, 10), (7, -2), (9, 5)]);
    assert_eq!(recorded.sum.sum(), 13);
}

#[test]
fn test_custom_hook_sees_each_row_once_in_order() {
    let data = sample_column();
    let mut reader = reader_from_options(&data, ColumnEncoding::Rle);
    let rows = [2, 4, 5, 9];
    let mut hook = RecordingHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut hook);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }

    assert_eq!(hook.values, vec![(2, -2), (5, 40), (9, -100)]);
    assert_eq!(hook.nulls, vec![4]);
}

#[test]
fn test_min_max_hooks_skip_nulls() {
    let data = sample_column();
    let rows: Vec<usize> = (0..data.len()).collect();
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);

    let mut min = MinHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut min);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }
    let mut max = MaxHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut max);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }

    assert_eq!(min.value(), Some(-100));
    assert_eq!(max.value(), Some(40));
}

#[test]
fn test_hook_read_does_not_apply_the_filter() {
    let data: Vec<Option<i64>> = vec![Some(1), Some(2), Some(3), Some(4)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0, 1, 2, 3];
    let range = BigintRange::new(3, 4, false);
    let mut sum = SumHook::default();
    {
        let mut spec = ScanSpec::new().with_filter(&range).with_value_hook(&mut sum);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }
    assert_eq!(sum.sum(), 10);
}

#[test]
fn test_hook_is_ignored_when_values_are_not_kept() {
    let data: Vec<Option<i64>> = vec![Some(1), Some(2), Some(3)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0, 2];
    let mut sum = SumHook::default();
    {
        let mut spec = ScanSpec::new()
            .with_value_hook(&mut sum)
            .with_keep_values(false);
        reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
    }
    assert_eq!(sum.count(), 0);
    assert_eq!(reader.output_rows(), &[0, 2]);
}

//==================================================================================
// Density
//==================================================================================

#[test]
fn test_dense_and_sparse_reads_agree() {
    let mut rng = StdRng::seed_from_u64(0x7a6b);
    for encoding in [ColumnEncoding::Direct, ColumnEncoding::Rle, ColumnEncoding::Dictionary] {
        for _ in 0..20 {
            let len = rng.random_range(1..200);
            let data: Vec<Option<i64>> = (0..len)
                .map(|_| {
                    rng.random_bool(0.8)
                        .then(|| rng.random_range(-50..50))
                })
                .collect();
            let predicate = BigintRange::new(-20, 20, rng.random_bool(0.5));
            let subset: Vec<usize> = (0..len).filter(|_| rng.random_bool(0.3)).collect();

            let mut reader = reader_from_options(&data, encoding);
            let all: Vec<usize> = (0..len).collect();
            let mut spec = ScanSpec::new().with_filter(&predicate);
            reader.read_common(RowSet::new(&all).unwrap(), &mut spec).unwrap();
            let dense: Vec<(usize, Option<i64>)> = reader
                .output_rows()
                .iter()
                .copied()
                .zip(reader.output().to_options())
                .filter(|(row, _)| subset.binary_search(row).is_ok())
                .collect();

            reader.read_common(RowSet::new(&subset).unwrap(), &mut spec).unwrap();
            let sparse: Vec<(usize, Option<i64>)> = reader
                .output_rows()
                .iter()
                .copied()
                .zip(reader.output().to_options())
                .collect();

            assert_eq!(dense, sparse, "{:?}", encoding);
        }
    }
}

#[test]
fn test_dense_batch_matches_same_rows_embedded_sparsely() {
    let compact: Vec<Option<i64>> = vec![Some(4), None, Some(-9), Some(16)];
    let embedded: Vec<Option<i64>> = vec![
        Some(99),
        Some(4),
        None,
        None,
        Some(-9),
        Some(77),
        Some(16),
        Some(0),
    ];
    let range = BigintRange::new(-10, 10, true);

    for encoding in [ColumnEncoding::Direct, ColumnEncoding::Rle, ColumnEncoding::Dictionary] {
        let mut dense_reader = reader_from_options(&compact, encoding);
        let mut spec = ScanSpec::new().with_filter(&range);
        let dense_rows = [0, 1, 2, 3];
        dense_reader
            .read_common(RowSet::new(&dense_rows).unwrap(), &mut spec)
            .unwrap();

        let mut sparse_reader = reader_from_options(&embedded, encoding);
        let sparse_rows = [1, 3, 4, 6];
        sparse_reader
            .read_common(RowSet::new(&sparse_rows).unwrap(), &mut spec)
            .unwrap();

        assert_eq!(dense_reader.output().to_options(), vec![Some(4), None, Some(-9)]);
        assert_eq!(
            dense_reader.output().to_options(),
            sparse_reader.output().to_options()
        );
        assert_eq!(sparse_reader.output_rows(), &[1, 3, 4]);
    }
}

/// Every requested row reaches the hook exactly once, in order, for every
/// width and density.
fn assert_hook_visits_rows<T: DecodedInt>(data: &[Option<T>]) {
    let all: Vec<usize> = (0..data.len()).collect();
    let sparse: Vec<usize> = (0..data.len()).filter(|r| r % 3 != 1).collect();
    for rows in [all, sparse] {
        let mut reader = reader_from_options(data, ColumnEncoding::Direct);
        let mut hook = RecordingHook::default();
        {
            let mut spec = ScanSpec::new().with_value_hook(&mut hook);
            reader.read_common(RowSet::new(&rows).unwrap(), &mut spec).unwrap();
        }
        let mut visited: Vec<usize> = hook
            .values
            .iter()
            .map(|&(row, _)| row)
            .chain(hook.nulls.iter().copied())
            .collect();
        visited.sort_unstable();
        assert_eq!(visited, rows);
        assert!(hook.values.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

#[test]
fn test_row_coverage_for_every_width() {
    assert_hook_visits_rows::<i16>(&[Some(1), None, Some(-3), Some(4), None, Some(6), Some(7)]);
    assert_hook_visits_rows::<i32>(&[None, Some(i32::MAX), Some(0), None, Some(-1)]);
    assert_hook_visits_rows::<i64>(&[Some(i64::MIN), Some(2), None, Some(i64::MAX)]);
}

#[test]
fn test_dense_and_sparse_hook_sums_agree() {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<Option<i16>> = (0..500)
        .map(|_| rng.random_bool(0.9).then(|| rng.random_range(-1000..1000)))
        .collect();
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);

    let all: Vec<usize> = (0..data.len()).collect();
    let subset: Vec<usize> = (0..data.len()).step_by(3).collect();
    let expected: i64 = subset.iter().filter_map(|&r| data[r]).map(i64::from).sum();

    let mut sparse = SumHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut sparse);
        reader.read_common(RowSet::new(&subset).unwrap(), &mut spec).unwrap();
    }
    let mut dense = SumHook::default();
    {
        let mut spec = ScanSpec::new().with_value_hook(&mut dense);
        reader.read_common(RowSet::new(&all).unwrap(), &mut spec).unwrap();
    }

    assert_eq!(sparse.sum(), expected);
    assert_eq!(
        dense.sum(),
        data.iter().flatten().copied().map(i64::from).sum::<i64>()
    );
}

//==================================================================================
// Errors and edge cases
//==================================================================================

#[test]
fn test_unsupported_width_fails_with_empty_output() {
    let mut reader = SelectiveIntegerColumnReader::new(
        EncodedColumn::new(ColumnEncoding::Direct, vec![1, 2, 3]),
        PhysicalType::Int8,
        3,
        None,
    )
    .unwrap();
    let rows = [0, 1, 2];
    let mut spec = ScanSpec::new();

    let result = reader.read_common(RowSet::new(&rows).unwrap(), &mut spec);

    assert!(matches!(result, Err(TambakError::UnsupportedWidth(1))));
    assert!(reader.output_rows().is_empty());
    assert_eq!(reader.num_values(), 0);
}

#[test]
fn test_empty_row_set_is_a_no_op() {
    let mut reader =
        SelectiveIntegerColumnReader::new(UntouchableBackend, PhysicalType::Int64, 10, None)
            .unwrap();
    let mut spec = ScanSpec::new();
    reader.read_common(RowSet::new(&[]).unwrap(), &mut spec).unwrap();
    assert!(reader.output_rows().is_empty());
}

#[test]
fn test_row_past_end_of_batch_is_rejected() {
    let data: Vec<Option<i32>> = vec![Some(1), Some(2)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0, 2];
    let result = reader.read_common(RowSet::new(&rows).unwrap(), &mut ScanSpec::new());
    assert!(matches!(result, Err(TambakError::InvalidRowSet(_))));
}

#[test]
fn test_null_bitmap_length_is_checked() {
    let nulls = NullBuffer::from(vec![true, false]);
    let result =
        SelectiveIntegerColumnReader::new(UntouchableBackend, PhysicalType::Int32, 3, Some(nulls));
    assert!(matches!(
        result,
        Err(TambakError::NullBitmapMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_truncated_stream_clears_output() {
    let bytes = typed_slice_to_bytes(&[1i32, 2]);
    let mut reader = SelectiveIntegerColumnReader::new(
        EncodedColumn::new(ColumnEncoding::Direct, bytes),
        PhysicalType::Int32,
        4,
        None,
    )
    .unwrap();
    let rows = [0, 1, 2, 3];
    let result = reader.read_common(RowSet::new(&rows).unwrap(), &mut ScanSpec::new());
    assert!(matches!(result, Err(TambakError::TruncatedStream(_))));
    assert!(reader.output_rows().is_empty());
}

//==================================================================================
// Materialization
//==================================================================================

#[test]
fn test_get_values_returns_typed_array_with_nulls() {
    let data: Vec<Option<i16>> = vec![Some(3), None, Some(-7), Some(9)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0, 1, 2];

    let array = reader
        .get_values(RowSet::new(&rows).unwrap(), &mut ScanSpec::new())
        .unwrap();

    assert_eq!(array.data_type(), &DataType::Int16);
    let array = array.as_primitive::<Int16Type>();
    assert_eq!(array.len(), 3);
    assert_eq!(array.null_count(), 1);
    assert_eq!(array.value(0), 3);
    assert!(array.is_null(1));
    assert_eq!(array.value(2), -7);
}

#[test]
fn test_get_int_values_widens_to_requested_type() {
    let data: Vec<Option<i32>> = vec![Some(i32::MIN), Some(1), Some(i32::MAX)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Rle);
    let rows = [0, 2];

    let array = reader
        .get_int_values(RowSet::new(&rows).unwrap(), &mut ScanSpec::new(), PhysicalType::Int64)
        .unwrap();

    let array = array.as_primitive::<Int64Type>();
    assert_eq!(array.values().to_vec(), vec![i32::MIN as i64, i32::MAX as i64]);
}

#[test]
fn test_get_int_values_rejects_narrowing() {
    let data: Vec<Option<i64>> = vec![Some(1)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0];
    let result = reader.get_int_values(
        RowSet::new(&rows).unwrap(),
        &mut ScanSpec::new(),
        PhysicalType::Int32,
    );
    assert!(matches!(result, Err(TambakError::UnsupportedType(_))));
}

#[test]
fn test_get_values_after_drop_is_empty() {
    let data: Vec<Option<i32>> = vec![Some(1), Some(2)];
    let mut reader = reader_from_options(&data, ColumnEncoding::Direct);
    let rows = [0, 1];
    let mut spec = ScanSpec::new().with_keep_values(false);

    let array = reader.get_values(RowSet::new(&rows).unwrap(), &mut spec).unwrap();

    assert_eq!(array.as_primitive::<Int32Type>().len(), 0);
    assert_eq!(reader.output_rows(), &[0, 1]);
}
