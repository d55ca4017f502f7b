//! Resolution of the net influence on volume.
//!
//! Inflow pushes volume up (I+), outflow pushes it down (I-). When exactly one
//! of them is active the sign of the volume derivative follows directly. When
//! both are active the first-order picture is ambiguous and the previous
//! inflow and outflow derivatives decide how the volume derivative may move.

use crate::domain::QualValue;

/// Outcome of comparing the two opposing influences on volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetInfluence {
    /// Exactly one influence is active (or neither); the sign is forced.
    Determined(QualValue),
    /// Both influences are active; the sign depends on their rates.
    Ambiguous,
}

/// Compare a positive influence of magnitude `inflow` against a negative
/// influence of magnitude `outflow`.
pub fn net_influence(inflow: QualValue, outflow: QualValue) -> NetInfluence {
    let inflow_active = inflow != QualValue::Zero;
    let outflow_active = outflow != QualValue::Zero;
    match (inflow_active, outflow_active) {
        (false, true) => NetInfluence::Determined(QualValue::Neg),
        (false, false) => NetInfluence::Determined(QualValue::Zero),
        (true, false) => NetInfluence::Determined(QualValue::Pos),
        (true, true) => NetInfluence::Ambiguous,
    }
}

/// How the volume derivative may move when the net influence is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Inflow steady, outflow rising: the derivative is falling.
    Decreasing,
    /// Inflow steady, outflow falling: the derivative is rising.
    Increasing,
    /// Inflow and outflow both steady.
    Unchanged,
    /// Inflow rising against a steady or falling outflow.
    NoDecrease,
    /// Inflow falling against a steady or rising outflow.
    NoIncrease,
    /// Rates pull in the same direction; only continuity applies.
    Continuous,
}

/// Second-order trend of the volume derivative from the previous inflow and
/// outflow derivatives.
pub fn trend(prev_inflow_d: QualValue, prev_outflow_d: QualValue) -> Trend {
    use QualValue::*;
    match (prev_inflow_d, prev_outflow_d) {
        (Zero, Pos) => Trend::Decreasing,
        (Zero, Neg) => Trend::Increasing,
        (Zero, Zero) => Trend::Unchanged,
        (Pos, Zero | Neg) => Trend::NoDecrease,
        (Neg, Zero | Pos) => Trend::NoIncrease,
        _ => Trend::Continuous,
    }
}
