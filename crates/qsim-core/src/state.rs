//! The state description: one quantity and one derivative per variable.
//!
//! A `StateDescription` is a plain value. Equality and hashing are structural
//! over its ten coordinates, which makes it usable directly as a graph key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Aspect, QualValue, Variable};

/// Number of coordinates in a state description.
pub const COORDINATES: usize = 10;

/// Errors raised when constructing or parsing a state description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid arity: expected {expected} coordinates, found {found}")]
    InvalidArity { expected: usize, found: usize },

    #[error("unknown qualitative symbol '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error("malformed state label '{label}': {reason}")]
    MalformedLabel { label: String, reason: String },

    #[error("{variable} {aspect} cannot take value {value}")]
    OutOfDomain {
        variable: Variable,
        aspect: Aspect,
        value: QualValue,
    },
}

/// One qualitative state of the system.
///
/// Coordinates are stored in the fixed order
/// `inflow_q, inflow_d, volume_q, volume_d, outflow_q, outflow_d,
/// height_q, height_d, pressure_q, pressure_d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateDescription {
    values: [QualValue; COORDINATES],
}

fn coordinate(variable: Variable, aspect: Aspect) -> usize {
    variable.index() * 2
        + match aspect {
            Aspect::Quantity => 0,
            Aspect::Derivative => 1,
        }
}

impl StateDescription {
    pub fn new(values: [QualValue; COORDINATES]) -> Self {
        Self { values }
    }

    /// Build from a coordinate vector, failing unless it has exactly ten
    /// entries.
    pub fn from_slice(values: &[QualValue]) -> Result<Self, StateError> {
        let values: [QualValue; COORDINATES] =
            values.try_into().map_err(|_| StateError::InvalidArity {
                expected: COORDINATES,
                found: values.len(),
            })?;
        Ok(Self { values })
    }

    /// Every coordinate at `0`: the empty tub with the tap closed.
    pub fn zero() -> Self {
        Self {
            values: [QualValue::Zero; COORDINATES],
        }
    }

    /// Assemble a state in which volume, outflow, height and pressure share
    /// one quantity/derivative pair.
    pub fn chained(
        inflow_q: QualValue,
        inflow_d: QualValue,
        level_q: QualValue,
        level_d: QualValue,
    ) -> Self {
        let mut state = Self::zero();
        state.set_quantity(Variable::Inflow, inflow_q);
        state.set_derivative(Variable::Inflow, inflow_d);
        for variable in &Variable::ALL[1..] {
            state.set_quantity(*variable, level_q);
            state.set_derivative(*variable, level_d);
        }
        state
    }

    pub fn get(&self, variable: Variable, aspect: Aspect) -> QualValue {
        self.values[coordinate(variable, aspect)]
    }

    pub fn set(&mut self, variable: Variable, aspect: Aspect, value: QualValue) {
        self.values[coordinate(variable, aspect)] = value;
    }

    /// Copy of this state with one coordinate replaced.
    pub fn with(mut self, variable: Variable, aspect: Aspect, value: QualValue) -> Self {
        self.set(variable, aspect, value);
        self
    }

    pub fn quantity(&self, variable: Variable) -> QualValue {
        self.get(variable, Aspect::Quantity)
    }

    pub fn derivative(&self, variable: Variable) -> QualValue {
        self.get(variable, Aspect::Derivative)
    }

    pub fn set_quantity(&mut self, variable: Variable, value: QualValue) {
        self.set(variable, Aspect::Quantity, value);
    }

    pub fn set_derivative(&mut self, variable: Variable, value: QualValue) {
        self.set(variable, Aspect::Derivative, value);
    }

    /// The full coordinate vector.
    pub fn values(&self) -> &[QualValue; COORDINATES] {
        &self.values
    }

    /// Canonical short label, e.g. `0/+ 0/0 0/0 0/0 0/0`.
    pub fn label(&self) -> String {
        Variable::ALL
            .iter()
            .map(|v| format!("{}/{}", self.quantity(*v), self.derivative(*v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Detailed rendering: a `Q` row and a `d` row with one column per
    /// variable.
    pub fn table(&self) -> String {
        const WIDTH: usize = 10;
        let mut out = format!("{:<4}", "");
        for variable in Variable::ALL {
            out.push_str(&format!("{:<WIDTH$}", variable.name().to_uppercase()));
        }
        for (row, aspect) in [("Q", Aspect::Quantity), ("d", Aspect::Derivative)] {
            out.push('\n');
            out.push_str(&format!("{row:<4}"));
            for variable in Variable::ALL {
                out.push_str(&format!("{:<WIDTH$}", self.get(variable, aspect).symbol()));
            }
        }
        // Strip column padding at line ends.
        out.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for StateDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label())
    }
}

impl FromStr for StateDescription {
    type Err = StateError;

    /// Parse the canonical short label. Pairs may be separated by whitespace
    /// or commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| StateError::MalformedLabel {
            label: s.to_string(),
            reason,
        };

        let pairs: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        if pairs.len() != Variable::ALL.len() {
            return Err(malformed(format!(
                "expected {} quantity/derivative pairs, found {}",
                Variable::ALL.len(),
                pairs.len()
            )));
        }

        let mut values = Vec::with_capacity(COORDINATES);
        for pair in pairs {
            let (q, d) = pair
                .split_once('/')
                .ok_or_else(|| malformed(format!("pair '{pair}' is not of the form q/d")))?;
            values.push(q.parse::<QualValue>()?);
            values.push(d.parse::<QualValue>()?);
        }
        StateDescription::from_slice(&values)
    }
}
