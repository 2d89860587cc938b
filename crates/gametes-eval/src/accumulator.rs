//! Per-group result sequences and their list-literal text form.
use std::fmt;

use crate::evaluators::{Evaluation, EvaluatorKind};

/// Values that render the way a list literal prints them.
pub trait ListValue {
    fn write_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl ListValue for u8 {
    fn write_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ListValue for f64 {
    // Debug keeps a fractional part on whole numbers: 1.0 rather than 1.
    fn write_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An ordered sequence with one entry per processed dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator<T> {
    values: Vec<T>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Accumulator { values: Vec::new() }
    }
}

impl<T> Accumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T> From<Vec<T>> for Accumulator<T> {
    fn from(values: Vec<T>) -> Self {
        Accumulator { values }
    }
}

impl<T: ListValue> fmt::Display for Accumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.values.iter().enumerate() {
            value.write_literal(f)?;
            if idx + 1 != self.values.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}

impl Accumulator<u8> {
    /// Fraction of recovered datasets, `None` when nothing was processed.
    pub fn rate(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let hits = self.values.iter().filter(|&&v| v == 1).count();
        Some(hits as f64 / self.values.len() as f64)
    }
}

impl Accumulator<f64> {
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }
}

/// Recovery indicators and (for classifiers) accuracies of one evaluator.
#[derive(Debug, Clone)]
pub struct EvaluatorResults {
    pub kind: EvaluatorKind,
    pub recovery: Accumulator<u8>,
    pub accuracy: Option<Accumulator<f64>>,
}

impl EvaluatorResults {
    pub fn new(kind: EvaluatorKind) -> Self {
        EvaluatorResults {
            kind,
            recovery: Accumulator::new(),
            accuracy: kind.accuracy_output().map(|_| Accumulator::new()),
        }
    }

    pub fn record(&mut self, evaluation: &Evaluation) {
        self.recovery.push(evaluation.recovered);
        if let (Some(acc), Some(value)) = (self.accuracy.as_mut(), evaluation.accuracy) {
            acc.push(value);
        }
    }
}

/// Accumulators for one (heritability, dataset type) group.
#[derive(Debug, Clone)]
pub struct GroupResults {
    pub evaluators: Vec<EvaluatorResults>,
}

impl GroupResults {
    pub fn new(kinds: &[EvaluatorKind]) -> Self {
        GroupResults {
            evaluators: kinds.iter().copied().map(EvaluatorResults::new).collect(),
        }
    }

    pub fn get(&self, kind: EvaluatorKind) -> Option<&EvaluatorResults> {
        self.evaluators.iter().find(|r| r.kind == kind)
    }

    pub fn get_mut(&mut self, kind: EvaluatorKind) -> Option<&mut EvaluatorResults> {
        self.evaluators.iter_mut().find(|r| r.kind == kind)
    }
}
