//! Bucket sort for non-negative integers
//!
//! Values are scattered into `k` buckets by `x * k / (max + 1)`, each bucket
//! is insertion-sorted in place, and the buckets are gathered in order.
//! Highlights refer to bucket ids.

use super::errors::{check_limit, ValidationError};
use super::list;
use crate::constants::MAX_ELEMENTS;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "bucketSort(a, k):",
    "  max = maximum of a",
    "  buckets = k empty lists",
    "  for each x in a:",
    "    b = x * k / (max + 1)",
    "    buckets[b].append(x)",
    "  for each bucket B: insertionSort(B)",
    "  a = buckets[0] + buckets[1] + ... + buckets[k - 1]",
    "",
    "insertionSort(B):",
    "  for i in 1..len(B):",
    "    key = B[i], j = i - 1",
    "    while j >= 0 and B[j] > key:",
    "      B[j + 1] = B[j], j -= 1",
    "    B[j + 1] = key",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const MAX: usize = 1;
    pub const CREATE_BUCKETS: usize = 2;
    pub const BUCKET_INDEX: usize = 4;
    pub const APPEND: usize = 5;
    pub const SORT_BUCKET: usize = 6;
    pub const GATHER: usize = 7;
    pub const PICK_KEY: usize = 11;
    pub const COMPARE: usize = 12;
    pub const SHIFT: usize = 13;
    pub const PLACE_KEY: usize = 14;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInput {
    pub values: Vec<i64>,
    pub bucket_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BucketState {
    pub input: Vec<i64>,
    pub buckets: Vec<Vec<i64>>,
    pub output: Vec<i64>,
}

impl StateView for BucketState {
    fn grid(&self) -> Grid {
        let mut rows = vec![GridRow::new(
            "input",
            self.input.iter().map(|v| GridCell::plain(v.to_string())).collect(),
        )];
        rows.extend(self.buckets.iter().enumerate().map(|(b, bucket)| {
            GridRow::new(
                format!("bucket {}", b),
                bucket.iter().map(|v| GridCell::plain(v.to_string())).collect(),
            )
            .with_id(b)
        }));
        rows.push(GridRow::new(
            "output",
            self.output.iter().map(|v| GridCell::plain(v.to_string())).collect(),
        ));
        Grid::new(rows)
    }
}

fn validate(input: &BucketInput) -> Result<&BucketInput, ValidationError> {
    check_limit("array length", input.values.len(), MAX_ELEMENTS)?;
    check_limit("bucket count", input.bucket_count, MAX_ELEMENTS)?;
    if input.bucket_count == 0 {
        return Err(ValidationError::ZeroBuckets);
    }
    if let Some((index, &value)) = input.values.iter().enumerate().find(|&(_, &v)| v < 0) {
        return Err(ValidationError::NegativeValue { index, value });
    }
    Ok(input)
}

/// Bucket index for `value` given the maximum and bucket count
pub fn bucket_of(value: i64, max: i64, buckets: usize) -> usize {
    let index = i128::from(value) * buckets as i128 / (i128::from(max) + 1);
    index as usize
}

/// Sort the values and record every scatter, comparison, shift and gather
pub fn trace(input: &BucketInput) -> Trace<BucketState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &BucketInput, recorder: Recorder<BucketState>) -> Trace<BucketState> {
    produce_with("bucket-sort", validate(input), recorder, |input, rec| {
        let k = input.bucket_count;
        let mut run = BucketRun {
            state: BucketState {
                input: input.values.clone(),
                buckets: Vec::new(),
                output: Vec::new(),
            },
            rec,
        };
        run.note(
            None,
            format!("bucketSort({}, k = {})", list(&input.values), k),
            [],
        );

        let Some(&max) = input.values.iter().max() else {
            run.note(None, "Nothing to sort: the array is empty".to_string(), []);
            return;
        };
        run.note(Some(lines::MAX), format!("max = {}", max), []);

        run.state.buckets = vec![Vec::new(); k];
        run.note(
            Some(lines::CREATE_BUCKETS),
            format!("Create {} empty buckets", k),
            0..k,
        );

        for &x in &input.values {
            let b = bucket_of(x, max, k);
            run.note(
                Some(lines::BUCKET_INDEX),
                format!("{} * {} / ({} + 1) = {}", x, k, max, b),
                [b],
            );
            run.state.buckets[b].push(x);
            run.note(
                Some(lines::APPEND),
                format!("Append {} to bucket {}", x, b),
                [b],
            );
        }

        for b in 0..k {
            run.insertion_sort(b);
        }

        for b in 0..k {
            let bucket = run.state.buckets[b].clone();
            run.state.output.extend_from_slice(&bucket);
            run.note(
                Some(lines::GATHER),
                format!("Gather bucket {}: {}", b, list(&bucket)),
                [b],
            );
        }

        let sorted = list(&run.state.output);
        run.rec.record_annotated(
            &run.state,
            None,
            format!("Sorted: {}", sorted),
            [],
            &[Annotation::new("sorted", sorted)],
        );
    })
}

struct BucketRun<'r> {
    state: BucketState,
    rec: &'r mut Recorder<BucketState>,
}

impl BucketRun<'_> {
    fn note(
        &mut self,
        line: Option<usize>,
        message: String,
        highlight: impl IntoIterator<Item = usize>,
    ) {
        self.rec.record(&self.state, line, message, highlight);
    }

    fn insertion_sort(&mut self, b: usize) {
        let len = self.state.buckets[b].len();
        if len < 2 {
            self.note(
                Some(lines::SORT_BUCKET),
                format!("Bucket {} has {} item(s): already sorted", b, len),
                [b],
            );
            return;
        }
        self.note(
            Some(lines::SORT_BUCKET),
            format!("Insertion sort bucket {}", b),
            [b],
        );

        for i in 1..len {
            let key = self.state.buckets[b][i];
            self.note(
                Some(lines::PICK_KEY),
                format!("key = B[{}] = {}", i, key),
                [b],
            );

            let mut j = i;
            while j > 0 {
                let left = self.state.buckets[b][j - 1];
                if left <= key {
                    self.note(
                        Some(lines::COMPARE),
                        format!("B[{}] = {} <= {}: stop", j - 1, left, key),
                        [b],
                    );
                    break;
                }
                self.note(
                    Some(lines::COMPARE),
                    format!("B[{}] = {} > {}: shift right", j - 1, left, key),
                    [b],
                );
                self.state.buckets[b][j] = left;
                self.note(
                    Some(lines::SHIFT),
                    format!("B[{}] = {}", j, left),
                    [b],
                );
                j -= 1;
            }

            self.state.buckets[b][j] = key;
            self.note(
                Some(lines::PLACE_KEY),
                format!("B[{}] = {}", j, key),
                [b],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_into_order() {
        let trace = trace(&BucketInput {
            values: vec![29, 3, 11, 42, 7, 3, 38],
            bucket_count: 4,
        });
        assert_eq!(trace.last().state.output, vec![3, 3, 7, 11, 29, 38, 42]);
        assert_eq!(trace.last().annotation("sorted"), Some("[3, 3, 7, 11, 29, 38, 42]"));
    }

    #[test]
    fn max_lands_in_last_bucket() {
        assert_eq!(bucket_of(42, 42, 4), 3);
        assert_eq!(bucket_of(0, 42, 4), 0);
    }

    #[test]
    fn negative_values_are_rejected() {
        let trace = trace(&BucketInput {
            values: vec![1, -2],
            bucket_count: 2,
        });
        assert_eq!(
            trace.rejection(),
            Some(&ValidationError::NegativeValue { index: 1, value: -2 })
        );
    }

    #[test]
    fn empty_input_still_traces() {
        let trace = trace(&BucketInput {
            values: Vec::new(),
            bucket_count: 3,
        });
        assert_eq!(trace.len(), 2);
    }
}
