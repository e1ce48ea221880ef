//! Subset and permutation generation by backtracking
//!
//! Both searches record the choice, the recursive call, the undo on the way
//! back, and a distinct step for every complete result. Item ids are their
//! positions in the input list.

use super::errors::{check_limit, ValidationError};
use super::list;
use crate::constants::MAX_CHOICE_ITEMS;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "subsets(i):",
    "  if i == n: output current; return",
    "  current.push(items[i])",
    "  subsets(i + 1)",
    "  current.pop()",
    "  subsets(i + 1)",
    "",
    "permute():",
    "  if len(current) == n: output current; return",
    "  for i in 0..n:",
    "    if used[i]: continue",
    "    used[i] = true; current.push(items[i])",
    "    permute()",
    "    current.pop(); used[i] = false",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const SUBSET_RESULT: usize = 1;
    pub const INCLUDE: usize = 2;
    pub const INCLUDE_RECURSE: usize = 3;
    pub const EXCLUDE: usize = 4;
    pub const EXCLUDE_RECURSE: usize = 5;
    pub const PERMUTATION_RESULT: usize = 8;
    pub const TRY_ITEM: usize = 9;
    pub const SKIP_USED: usize = 10;
    pub const CHOOSE: usize = 11;
    pub const PERMUTE_RECURSE: usize = 12;
    pub const UNCHOOSE: usize = 13;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMode {
    Subsets,
    Permutations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceInput {
    pub items: Vec<i64>,
    pub mode: ChoiceMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChoiceState {
    pub items: Vec<i64>,
    pub chosen: Vec<usize>, // Item ids in the current partial result
    pub used: Vec<bool>,
    pub results_found: usize,
}

impl ChoiceState {
    /// Values of the current partial result
    pub fn current(&self) -> Vec<i64> {
        self.chosen.iter().map(|&i| self.items[i]).collect()
    }
}

impl StateView for ChoiceState {
    fn grid(&self) -> Grid {
        let used: Vec<&str> = self
            .used
            .iter()
            .map(|&u| if u { "✓" } else { "·" })
            .collect();
        Grid::new(vec![
            GridRow::indexed("items", &self.items),
            GridRow::indexed("used", &used),
            GridRow::new(
                "current",
                self.chosen
                    .iter()
                    .map(|&i| GridCell::entity(self.items[i].to_string(), i))
                    .collect(),
            ),
            GridRow::new(
                "results",
                vec![GridCell::plain(self.results_found.to_string())],
            ),
        ])
    }
}

fn validate(input: &ChoiceInput) -> Result<&ChoiceInput, ValidationError> {
    check_limit("item count", input.items.len(), MAX_CHOICE_ITEMS)?;
    Ok(input)
}

/// Enumerate every subset or permutation of the items
pub fn trace(input: &ChoiceInput) -> Trace<ChoiceState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &ChoiceInput, recorder: Recorder<ChoiceState>) -> Trace<ChoiceState> {
    let algorithm = match input.mode {
        ChoiceMode::Subsets => "subsets",
        ChoiceMode::Permutations => "permutations",
    };
    produce_with(algorithm, validate(input), recorder, |input, rec| {
        let n = input.items.len();
        let mut run = ChoiceRun {
            state: ChoiceState {
                items: input.items.clone(),
                chosen: Vec::new(),
                used: vec![false; n],
                results_found: 0,
            },
            rec,
            results: Vec::new(),
        };
        run.rec.record(
            &run.state,
            None,
            format!("Generate all {} of {}", algorithm, list(&input.items)),
            [],
        );

        match input.mode {
            ChoiceMode::Subsets => run.subsets(0),
            ChoiceMode::Permutations => run.permute(),
        }

        let results: Vec<String> = run.results.iter().map(|r| list(r)).collect();
        run.rec.record_annotated(
            &run.state,
            None,
            format!("Done: {} {}", run.results.len(), algorithm),
            [],
            &[
                Annotation::new("count", run.results.len().to_string()),
                Annotation::new("results", results.join(" ")),
            ],
        );
    })
}

struct ChoiceRun<'r> {
    state: ChoiceState,
    rec: &'r mut Recorder<ChoiceState>,
    results: Vec<Vec<i64>>,
}

impl ChoiceRun<'_> {
    fn note(&mut self, line: usize, message: String, highlight: impl IntoIterator<Item = usize>) {
        self.rec.record(&self.state, Some(line), message, highlight);
    }

    fn output(&mut self, line: usize) {
        let current = self.state.current();
        self.state.results_found += 1;
        self.rec.record_annotated(
            &self.state,
            Some(line),
            format!("Result #{}: {}", self.state.results_found, list(&current)),
            self.state.chosen.clone(),
            &[Annotation::new("result", list(&current))],
        );
        self.results.push(current);
    }

    fn subsets(&mut self, i: usize) {
        if i == self.state.items.len() {
            self.output(lines::SUBSET_RESULT);
            return;
        }

        let item = self.state.items[i];
        self.state.chosen.push(i);
        self.state.used[i] = true;
        self.note(lines::INCLUDE, format!("Include {}", item), [i]);
        self.note(
            lines::INCLUDE_RECURSE,
            format!("Recurse with {} included", item),
            [i],
        );
        self.subsets(i + 1);

        self.state.chosen.pop();
        self.state.used[i] = false;
        self.note(lines::EXCLUDE, format!("Exclude {}", item), [i]);
        self.note(
            lines::EXCLUDE_RECURSE,
            format!("Recurse with {} excluded", item),
            [i],
        );
        self.subsets(i + 1);
    }

    fn permute(&mut self) {
        let n = self.state.items.len();
        if self.state.chosen.len() == n {
            self.output(lines::PERMUTATION_RESULT);
            return;
        }

        for i in 0..n {
            let item = self.state.items[i];
            self.note(lines::TRY_ITEM, format!("Try {} next", item), [i]);
            if self.state.used[i] {
                self.note(
                    lines::SKIP_USED,
                    format!("{} is already used: skip", item),
                    [i],
                );
                continue;
            }

            self.state.used[i] = true;
            self.state.chosen.push(i);
            self.note(
                lines::CHOOSE,
                format!("Choose {}: current = {}", item, list(&self.state.current())),
                [i],
            );
            self.note(
                lines::PERMUTE_RECURSE,
                format!("Recurse at depth {}", self.state.chosen.len()),
                [i],
            );
            self.permute();

            self.state.chosen.pop();
            self.state.used[i] = false;
            self.note(
                lines::UNCHOOSE,
                format!("Undo {}: current = {}", item, list(&self.state.current())),
                [i],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_of_three() {
        let trace = trace(&ChoiceInput {
            items: vec![1, 2, 3],
            mode: ChoiceMode::Subsets,
        });
        assert_eq!(trace.steps_at_line(lines::SUBSET_RESULT).count(), 8);
        let first = trace.steps_at_line(lines::SUBSET_RESULT).next();
        assert_eq!(first.and_then(|s| s.annotation("result")), Some("[1, 2, 3]"));
        assert_eq!(trace.last().annotation("count"), Some("8"));
    }

    #[test]
    fn permutations_of_three() {
        let trace = trace(&ChoiceInput {
            items: vec![1, 2, 3],
            mode: ChoiceMode::Permutations,
        });
        let results: Vec<&str> = trace
            .steps_at_line(lines::PERMUTATION_RESULT)
            .filter_map(|s| s.annotation("result"))
            .collect();
        assert_eq!(
            results,
            vec!["[1, 2, 3]", "[1, 3, 2]", "[2, 1, 3]", "[2, 3, 1]", "[3, 1, 2]", "[3, 2, 1]"]
        );
        assert!(trace.last().state.chosen.is_empty());
    }

    #[test]
    fn empty_list_has_one_empty_result() {
        let trace = trace(&ChoiceInput {
            items: Vec::new(),
            mode: ChoiceMode::Subsets,
        });
        assert_eq!(trace.last().annotation("count"), Some("1"));
    }
}
