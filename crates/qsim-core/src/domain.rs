//! Qualitative domain model: symbolic values, quantity spaces, and the
//! variables of the modelled system.
//!
//! Every coordinate of a state takes its value from a small, totally ordered
//! quantity space. Some values of a space are *points* (a boundary that cannot
//! be held while the derivative is pushing away from it) and the rest are
//! *intervals*. One-step reasoning ("move up", "move down") is done through
//! the order index of the space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::{StateDescription, StateError};

/// A symbolic qualitative value.
///
/// The same four symbols are shared by quantity spaces (`Zero`, `Pos`, `Max`)
/// and the derivative space (`Neg`, `Zero`, `Pos`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualValue {
    Neg,
    Zero,
    Pos,
    Max,
}

impl QualValue {
    /// Canonical display symbol: `-`, `0`, `+`, `MAX`.
    pub fn symbol(self) -> &'static str {
        match self {
            QualValue::Neg => "-",
            QualValue::Zero => "0",
            QualValue::Pos => "+",
            QualValue::Max => "MAX",
        }
    }

    /// Parse a canonical symbol. Accepts `max` in any case.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "-" => Some(QualValue::Neg),
            "0" => Some(QualValue::Zero),
            "+" => Some(QualValue::Pos),
            _ if s.eq_ignore_ascii_case("max") => Some(QualValue::Max),
            _ => None,
        }
    }
}

impl fmt::Display for QualValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl FromStr for QualValue {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualValue::from_symbol(s).ok_or_else(|| StateError::UnknownSymbol {
            symbol: s.to_string(),
        })
    }
}

/// Direction of change implied by a derivative sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The direction a derivative drives its quantity, or `None` for a
    /// steady (`Zero`) derivative.
    pub fn of(derivative: QualValue) -> Option<Self> {
        match derivative {
            QualValue::Pos => Some(Direction::Up),
            QualValue::Neg => Some(Direction::Down),
            QualValue::Zero | QualValue::Max => None,
        }
    }
}

/// The variables of the modelled system, in coordinate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    Inflow,
    Volume,
    Outflow,
    Height,
    Pressure,
}

impl Variable {
    /// All variables in coordinate order.
    pub const ALL: [Variable; 5] = [
        Variable::Inflow,
        Variable::Volume,
        Variable::Outflow,
        Variable::Height,
        Variable::Pressure,
    ];

    /// Variables whose quantity and derivative follow volume through the
    /// proportionality chain.
    pub const CHAINED: [Variable; 3] = [Variable::Outflow, Variable::Height, Variable::Pressure];

    /// Position of this variable in coordinate order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Variable::Inflow => "inflow",
            Variable::Volume => "volume",
            Variable::Outflow => "outflow",
            Variable::Height => "height",
            Variable::Pressure => "pressure",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which half of a variable's (quantity, derivative) pair a coordinate holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    Quantity,
    Derivative,
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Quantity => write!(f, "quantity"),
            Aspect::Derivative => write!(f, "derivative"),
        }
    }
}

/// An ordered, finite quantity space with its point values marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantitySpace {
    values: &'static [QualValue],
    points: &'static [QualValue],
}

impl QuantitySpace {
    /// `{0, +}`: a magnitude with no upper landmark.
    pub const fn unbounded() -> Self {
        Self {
            values: &[QualValue::Zero, QualValue::Pos],
            points: &[QualValue::Zero],
        }
    }

    /// `{0, +, MAX}`: a magnitude between two landmark points.
    pub const fn bounded() -> Self {
        Self {
            values: &[QualValue::Zero, QualValue::Pos, QualValue::Max],
            points: &[QualValue::Zero, QualValue::Max],
        }
    }

    /// `{-, 0, +}`: the derivative sign space.
    pub const fn sign() -> Self {
        Self {
            values: &[QualValue::Neg, QualValue::Zero, QualValue::Pos],
            points: &[QualValue::Zero],
        }
    }

    /// Values in ascending order.
    pub fn values(&self) -> &'static [QualValue] {
        self.values
    }

    pub fn contains(&self, value: QualValue) -> bool {
        self.values.contains(&value)
    }

    /// Order index of `value`, if it belongs to this space.
    pub fn index_of(&self, value: QualValue) -> Option<usize> {
        self.values.iter().position(|v| *v == value)
    }

    pub fn is_point(&self, value: QualValue) -> bool {
        self.points.contains(&value)
    }

    /// The adjacent value in `direction`, or `None` at the end of the space.
    pub fn step(&self, value: QualValue, direction: Direction) -> Option<QualValue> {
        let idx = self.index_of(value)?;
        match direction {
            Direction::Up => self.values.get(idx + 1).copied(),
            Direction::Down => idx.checked_sub(1).map(|i| self.values[i]),
        }
    }

    /// Number of order steps between two members, or `None` if either is
    /// outside the space.
    pub fn distance(&self, a: QualValue, b: QualValue) -> Option<usize> {
        Some(self.index_of(a)?.abs_diff(self.index_of(b)?))
    }

    /// Sort and deduplicate `values` by this space's order, dropping
    /// non-members.
    pub fn ordered(&self, values: impl IntoIterator<Item = QualValue>) -> Vec<QualValue> {
        let mut out: Vec<QualValue> = values.into_iter().filter(|v| self.contains(*v)).collect();
        out.sort_by_key(|v| self.index_of(*v));
        out.dedup();
        out
    }

    /// True when `quantity` is a point and `derivative` drives it into the
    /// rest of the space, so the point must be left in the next state.
    pub fn leaves_point(&self, quantity: QualValue, derivative: QualValue) -> bool {
        self.is_point(quantity)
            && Direction::of(derivative)
                .and_then(|d| self.step(quantity, d))
                .is_some()
    }
}

/// The immutable configuration of quantity spaces threaded through the rule
/// engine and the graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainModel {
    inflow: QuantitySpace,
    chained: QuantitySpace,
    derivative: QuantitySpace,
}

impl DomainModel {
    /// The bathtub: inflow over `{0, +}`, volume, outflow, height and
    /// pressure over `{0, +, MAX}`, every derivative over `{-, 0, +}`.
    pub fn bathtub() -> Self {
        Self {
            inflow: QuantitySpace::unbounded(),
            chained: QuantitySpace::bounded(),
            derivative: QuantitySpace::sign(),
        }
    }

    /// Quantity space of `variable`.
    pub fn quantity_space(&self, variable: Variable) -> &QuantitySpace {
        match variable {
            Variable::Inflow => &self.inflow,
            _ => &self.chained,
        }
    }

    pub fn derivative_space(&self) -> &QuantitySpace {
        &self.derivative
    }

    /// Space for one coordinate.
    pub fn space(&self, variable: Variable, aspect: Aspect) -> &QuantitySpace {
        match aspect {
            Aspect::Quantity => self.quantity_space(variable),
            Aspect::Derivative => &self.derivative,
        }
    }

    /// True when `variable` sits on a point of its quantity space with a
    /// derivative driving it off that point.
    pub fn at_point(&self, state: &StateDescription, variable: Variable) -> bool {
        self.quantity_space(variable)
            .leaves_point(state.quantity(variable), state.derivative(variable))
    }

    /// Check every coordinate of `state` against its space.
    pub fn validate(&self, state: &StateDescription) -> Result<(), StateError> {
        for variable in Variable::ALL {
            for aspect in [Aspect::Quantity, Aspect::Derivative] {
                let value = state.get(variable, aspect);
                if !self.space(variable, aspect).contains(value) {
                    return Err(StateError::OutOfDomain {
                        variable,
                        aspect,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for DomainModel {
    fn default() -> Self {
        Self::bathtub()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QualValue::*;

    #[test]
    fn symbols_round_trip() {
        for v in [Neg, Zero, Pos, Max] {
            assert_eq!(v.symbol().parse::<QualValue>().unwrap(), v);
        }
        assert_eq!(QualValue::from_symbol("max"), Some(Max));
        assert!("x".parse::<QualValue>().is_err());
    }

    #[test]
    fn bounded_space_steps() {
        let space = QuantitySpace::bounded();
        assert_eq!(space.step(Zero, Direction::Up), Some(Pos));
        assert_eq!(space.step(Pos, Direction::Up), Some(Max));
        assert_eq!(space.step(Max, Direction::Up), None);
        assert_eq!(space.step(Zero, Direction::Down), None);
        assert_eq!(space.step(Neg, Direction::Up), None);
    }

    #[test]
    fn points_and_intervals() {
        let space = QuantitySpace::bounded();
        assert!(space.is_point(Zero));
        assert!(space.is_point(Max));
        assert!(!space.is_point(Pos));

        let inflow = QuantitySpace::unbounded();
        assert!(inflow.is_point(Zero));
        assert!(!inflow.is_point(Pos));
    }

    #[test]
    fn leaving_a_point_requires_room() {
        let space = QuantitySpace::bounded();
        assert!(space.leaves_point(Zero, Pos));
        assert!(space.leaves_point(Max, Neg));
        assert!(!space.leaves_point(Zero, Neg));
        assert!(!space.leaves_point(Max, Pos));
        assert!(!space.leaves_point(Pos, Pos));
        assert!(!space.leaves_point(Zero, Zero));
    }

    #[test]
    fn ordered_dedups_and_filters() {
        let space = QuantitySpace::sign();
        assert_eq!(space.ordered([Pos, Neg, Pos, Max, Zero]), vec![Neg, Zero, Pos]);
    }

    #[test]
    fn derivative_distance() {
        let space = QuantitySpace::sign();
        assert_eq!(space.distance(Neg, Pos), Some(2));
        assert_eq!(space.distance(Zero, Pos), Some(1));
        assert_eq!(space.distance(Max, Pos), None);
    }

    #[test]
    fn bathtub_validation_rejects_out_of_domain() {
        let domain = DomainModel::bathtub();
        let ok = StateDescription::zero();
        assert!(domain.validate(&ok).is_ok());

        let bad = ok.with(Variable::Inflow, Aspect::Quantity, Max);
        assert!(matches!(
            domain.validate(&bad),
            Err(StateError::OutOfDomain {
                variable: Variable::Inflow,
                ..
            })
        ));

        let bad = ok.with(Variable::Volume, Aspect::Derivative, Max);
        assert!(domain.validate(&bad).is_err());
    }
}
