// Step recording and trace assembly for algorithm playback

pub mod view;

use crate::algorithms::errors::ValidationError;
use std::collections::BTreeSet;
use std::fmt;

pub use view::{Grid, GridCell, GridRow, StateView};

/// Opaque reference to something a renderer can highlight: an array index,
/// a vertex id, a bucket id, or `row * n + col` for square boards.
pub type EntityId = usize;

/// Entities to emphasise for one step, kept ordered so traces compare equal
/// across runs.
pub type Highlight = BTreeSet<EntityId>;

/// Display-only side data attached to a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub label: &'static str,
    pub value: String,
}

impl Annotation {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Annotation {
            label,
            value: value.into(),
        }
    }
}

/// One frozen instant of an algorithm run
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    pub state: S,
    pub cursor_line: Option<usize>, // Index into the producer's PSEUDOCODE listing
    pub message: String,
    pub highlight: Highlight,
    pub annotations: Vec<Annotation>,
}

impl<S> Step<S> {
    /// Look up an annotation value by label
    pub fn annotation(&self, label: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.value.as_str())
    }

    /// Whether the given entity is highlighted in this step
    pub fn is_highlighted(&self, id: EntityId) -> bool {
        self.highlight.contains(&id)
    }
}

/// Capture a step from the algorithm's working state.
///
/// The state is cloned into the step. Producer states hold only owned
/// containers (`Vec`, `Option`, plain integers), so the clone shares nothing
/// with the value the algorithm keeps mutating afterwards.
pub fn record<S: Clone>(
    state: &S,
    cursor_line: Option<usize>,
    message: impl Into<String>,
    highlight: impl IntoIterator<Item = EntityId>,
    annotations: &[Annotation],
) -> Step<S> {
    Step {
        state: state.clone(),
        cursor_line,
        message: message.into(),
        highlight: highlight.into_iter().collect(),
        annotations: annotations.to_vec(),
    }
}

/// Called with each step right after it is recorded
pub type Observer<S> = Box<dyn FnMut(&Step<S>)>;

/// Append buffer a producer writes its steps into during a single run
pub struct Recorder<S> {
    steps: Vec<Step<S>>,
    observer: Option<Observer<S>>,
}

impl<S: Clone> Recorder<S> {
    pub fn new() -> Self {
        Recorder {
            steps: Vec::new(),
            observer: None,
        }
    }

    /// Hand every step to `observer` as soon as it is appended
    pub fn observed(mut self, observer: impl FnMut(&Step<S>) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Record a step with no annotations
    pub fn record(
        &mut self,
        state: &S,
        cursor_line: Option<usize>,
        message: impl Into<String>,
        highlight: impl IntoIterator<Item = EntityId>,
    ) {
        self.push(record(state, cursor_line, message, highlight, &[]));
    }

    /// Record a step carrying display annotations
    pub fn record_annotated(
        &mut self,
        state: &S,
        cursor_line: Option<usize>,
        message: impl Into<String>,
        highlight: impl IntoIterator<Item = EntityId>,
        annotations: &[Annotation],
    ) {
        self.push(record(state, cursor_line, message, highlight, annotations));
    }

    fn push(&mut self, step: Step<S>) {
        self.steps.push(step);
        if let (Some(observer), Some(step)) = (self.observer.as_mut(), self.steps.last()) {
            observer(step);
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The most recently recorded step
    pub fn last(&self) -> Option<&Step<S>> {
        self.steps.last()
    }

    /// Read a recorded step back
    pub fn get(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }
}

impl<S: Clone> Default for Recorder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug> fmt::Debug for Recorder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("steps", &self.steps)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

/// The complete, ordered, read-only result of one producer run
#[derive(Debug, Clone, PartialEq)]
pub struct Trace<S> {
    algorithm: &'static str,
    steps: Vec<Step<S>>,
    rejection: Option<ValidationError>,
}

impl<S> Trace<S> {
    /// Build a one-step trace describing why the input was refused
    pub fn rejected(algorithm: &'static str, error: ValidationError) -> Self
    where
        S: Default,
    {
        let step = Step {
            state: S::default(),
            cursor_line: None,
            message: format!("Invalid input: {}", error),
            highlight: Highlight::new(),
            annotations: Vec::new(),
        };
        Trace {
            algorithm,
            steps: vec![step],
            rejection: Some(error),
        }
    }

    fn from_recorder(algorithm: &'static str, recorder: Recorder<S>) -> Self {
        Trace {
            algorithm,
            steps: recorder.steps,
            rejection: None,
        }
    }

    /// Name of the producer that built this trace
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> &Step<S> {
        &self.steps[0]
    }

    pub fn last(&self) -> &Step<S> {
        &self.steps[self.steps.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<S>> {
        self.steps.iter()
    }

    /// The validation failure, if this trace only reports rejected input
    pub fn rejection(&self) -> Option<&ValidationError> {
        self.rejection.as_ref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Steps whose cursor sits on the given pseudocode line
    pub fn steps_at_line(&self, line: usize) -> impl Iterator<Item = &Step<S>> {
        self.steps
            .iter()
            .filter(move |step| step.cursor_line == Some(line))
    }

    /// Project every state into another representation, leaving this trace untouched
    pub fn map_states<T>(&self, mut f: impl FnMut(&S) -> T) -> Trace<T> {
        Trace {
            algorithm: self.algorithm,
            steps: self
                .steps
                .iter()
                .map(|step| Step {
                    state: f(&step.state),
                    cursor_line: step.cursor_line,
                    message: step.message.clone(),
                    highlight: step.highlight.clone(),
                    annotations: step.annotations.clone(),
                })
                .collect(),
            rejection: self.rejection.clone(),
        }
    }
}

impl<'a, S> IntoIterator for &'a Trace<S> {
    type Item = &'a Step<S>;
    type IntoIter = std::slice::Iter<'a, Step<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Run one producer: check the validated input, then hand a fresh recorder to
/// the algorithm body and seal whatever it recorded into a trace.
///
/// Rejected input never reaches `run`; the result is a one-step trace whose
/// message carries the validation error.
pub fn produce<S, I, F>(
    algorithm: &'static str,
    input: Result<I, ValidationError>,
    run: F,
) -> Trace<S>
where
    S: Clone + Default,
    F: FnOnce(I, &mut Recorder<S>),
{
    produce_with(algorithm, input, Recorder::new(), run)
}

/// [`produce`] into a caller-supplied recorder, e.g. one carrying an observer
pub fn produce_with<S, I, F>(
    algorithm: &'static str,
    input: Result<I, ValidationError>,
    mut recorder: Recorder<S>,
    run: F,
) -> Trace<S>
where
    S: Clone + Default,
    F: FnOnce(I, &mut Recorder<S>),
{
    let input = match input {
        Ok(input) => input,
        Err(error) => {
            tracing::warn!(algorithm, %error, "input rejected");
            return Trace::rejected(algorithm, error);
        }
    };

    run(input, &mut recorder);

    // Every producer records at least its start and end steps
    debug_assert!(!recorder.is_empty(), "{} recorded no steps", algorithm);
    if recorder.is_empty() {
        recorder.record(&S::default(), None, "Nothing to do", []);
    }

    tracing::debug!(algorithm, steps = recorder.len(), "trace produced");
    Trace::from_recorder(algorithm, recorder)
}
