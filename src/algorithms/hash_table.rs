//! Hash table with separate chaining
//!
//! Keys hash to `k mod capacity` (Euclidean, so negative keys land in range).
//! Every chain comparison is its own step. Highlights refer to bucket ids.

use super::errors::{check_limit, ValidationError};
use crate::constants::MAX_ELEMENTS;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "hash(k): return k mod capacity",
    "insert(k, v):",
    "  b = hash(k)",
    "  for each entry in buckets[b]:",
    "    if entry.key == k: entry.value = v; return",
    "  buckets[b].append((k, v))",
    "search(k):",
    "  b = hash(k)",
    "  for each entry in buckets[b]:",
    "    if entry.key == k: return entry.value",
    "  return not found",
    "delete(k):",
    "  b = hash(k)",
    "  for each entry at i in buckets[b]:",
    "    if entry.key == k: buckets[b].remove(i); return",
    "  return not found",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const INSERT_HASH: usize = 2;
    pub const INSERT_SCAN: usize = 3;
    pub const INSERT_UPDATE: usize = 4;
    pub const INSERT_APPEND: usize = 5;
    pub const SEARCH_HASH: usize = 7;
    pub const SEARCH_SCAN: usize = 8;
    pub const SEARCH_FOUND: usize = 9;
    pub const SEARCH_MISSING: usize = 10;
    pub const DELETE_HASH: usize = 12;
    pub const DELETE_SCAN: usize = 13;
    pub const DELETE_REMOVE: usize = 14;
    pub const DELETE_MISSING: usize = 15;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashOp {
    Insert(i64, i64),
    Search(i64),
    Delete(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashInput {
    pub capacity: usize,
    pub ops: Vec<HashOp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashState {
    pub buckets: Vec<Vec<(i64, i64)>>,
}

impl HashState {
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn get(&self, key: i64) -> Option<i64> {
        let b = hash(key, self.buckets.len());
        self.buckets
            .get(b)?
            .iter()
            .find(|&&(k, _)| k == key)
            .map(|&(_, v)| v)
    }
}

impl StateView for HashState {
    fn grid(&self) -> Grid {
        let rows = self
            .buckets
            .iter()
            .enumerate()
            .map(|(b, chain)| {
                let cells = chain
                    .iter()
                    .map(|(k, v)| GridCell::plain(format!("{}={}", k, v)))
                    .collect();
                GridRow::new(format!("bucket {}", b), cells).with_id(b)
            })
            .collect();
        Grid::new(rows)
    }
}

/// Bucket index for `key` in a table of `capacity` slots
pub fn hash(key: i64, capacity: usize) -> usize {
    i128::from(key).rem_euclid(capacity.max(1) as i128) as usize
}

fn validate(input: &HashInput) -> Result<&HashInput, ValidationError> {
    if input.capacity == 0 {
        return Err(ValidationError::ZeroCapacity);
    }
    check_limit("capacity", input.capacity, MAX_ELEMENTS)?;
    check_limit("operation count", input.ops.len(), MAX_ELEMENTS)?;
    Ok(input)
}

/// Apply each operation in order, recording hashing and chain walks
pub fn trace(input: &HashInput) -> Trace<HashState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &HashInput, recorder: Recorder<HashState>) -> Trace<HashState> {
    produce_with("hash-table", validate(input), recorder, |input, rec| {
        let mut run = HashRun {
            state: HashState {
                buckets: vec![Vec::new(); input.capacity],
            },
            rec,
        };
        run.note(
            None,
            format!("Empty table with {} buckets", input.capacity),
            [],
        );

        let mut last = String::from("none");
        for &op in &input.ops {
            last = match op {
                HashOp::Insert(k, v) => run.insert(k, v),
                HashOp::Search(k) => run.search(k),
                HashOp::Delete(k) => run.delete(k),
            };
        }

        let size = run.state.len();
        run.rec.record_annotated(
            &run.state,
            None,
            format!("Done: {} entries stored", size),
            [],
            &[
                Annotation::new("last result", last),
                Annotation::new("size", size.to_string()),
            ],
        );
    })
}

struct HashRun<'r> {
    state: HashState,
    rec: &'r mut Recorder<HashState>,
}

impl HashRun<'_> {
    fn note(
        &mut self,
        line: Option<usize>,
        message: String,
        highlight: impl IntoIterator<Item = usize>,
    ) {
        self.rec.record(&self.state, line, message, highlight);
    }

    fn hash_step(&mut self, line: usize, key: i64) -> usize {
        let capacity = self.state.buckets.len();
        let b = hash(key, capacity);
        self.note(
            Some(line),
            format!("hash({}) = {} mod {} = {}", key, key, capacity, b),
            [b],
        );
        b
    }

    /// Walk the chain of bucket `b`, recording each comparison, and return the
    /// position of `key` if present
    fn scan(&mut self, line: usize, b: usize, key: i64) -> Option<usize> {
        for i in 0..self.state.buckets[b].len() {
            let (k, _) = self.state.buckets[b][i];
            if k == key {
                self.note(
                    Some(line),
                    format!("Entry {} in bucket {}: key {} == {}", i, b, k, key),
                    [b],
                );
                return Some(i);
            }
            self.note(
                Some(line),
                format!("Entry {} in bucket {}: key {} != {}", i, b, k, key),
                [b],
            );
        }
        None
    }

    fn insert(&mut self, key: i64, value: i64) -> String {
        let b = self.hash_step(lines::INSERT_HASH, key);
        match self.scan(lines::INSERT_SCAN, b, key) {
            Some(i) => {
                let old = self.state.buckets[b][i].1;
                self.state.buckets[b][i].1 = value;
                self.note(
                    Some(lines::INSERT_UPDATE),
                    format!("Update key {}: {} -> {}", key, old, value),
                    [b],
                );
                format!("insert({}) updated {} -> {}", key, old, value)
            }
            None => {
                self.state.buckets[b].push((key, value));
                self.note(
                    Some(lines::INSERT_APPEND),
                    format!("Append {}={} to bucket {}", key, value, b),
                    [b],
                );
                format!("insert({}) added", key)
            }
        }
    }

    fn search(&mut self, key: i64) -> String {
        let b = self.hash_step(lines::SEARCH_HASH, key);
        match self.scan(lines::SEARCH_SCAN, b, key) {
            Some(i) => {
                let value = self.state.buckets[b][i].1;
                self.note(
                    Some(lines::SEARCH_FOUND),
                    format!("Found key {} with value {}", key, value),
                    [b],
                );
                format!("search({}) = {}", key, value)
            }
            None => {
                self.note(
                    Some(lines::SEARCH_MISSING),
                    format!("Key {} is not in bucket {}", key, b),
                    [b],
                );
                format!("search({}) not found", key)
            }
        }
    }

    fn delete(&mut self, key: i64) -> String {
        let b = self.hash_step(lines::DELETE_HASH, key);
        match self.scan(lines::DELETE_SCAN, b, key) {
            Some(i) => {
                self.state.buckets[b].remove(i);
                self.note(
                    Some(lines::DELETE_REMOVE),
                    format!("Remove key {} from bucket {}", key, b),
                    [b],
                );
                format!("delete({}) removed", key)
            }
            None => {
                self.note(
                    Some(lines::DELETE_MISSING),
                    format!("Key {} is not in bucket {}: nothing to delete", key, b),
                    [b],
                );
                format!("delete({}) not found", key)
            }
        }
    }
}
