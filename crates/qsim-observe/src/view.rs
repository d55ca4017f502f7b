//! View trait and core abstractions for the observability layer.

use serde_json::Value;

use qsim_core::builder::PhaseStats;
use qsim_core::graph::StateGraph;
use qsim_core::state::StateDescription;

use crate::adjacency::AdjacencyView;
use crate::dot::DotView;
use crate::error::ObserveError;
use crate::states::StatesView;
use crate::summary::SummaryView;
use crate::transitions::TransitionsView;

/// The kind of view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Adjacency,
    States,
    Transitions,
    Summary,
    Dot,
}

impl ViewKind {
    /// Parse a view kind from a string.
    pub fn parse(s: &str) -> Result<Self, ObserveError> {
        match s {
            "adjacency" | "graph" => Ok(ViewKind::Adjacency),
            "states" | "state" => Ok(ViewKind::States),
            "transitions" | "transition" => Ok(ViewKind::Transitions),
            "summary" => Ok(ViewKind::Summary),
            "dot" | "graphviz" => Ok(ViewKind::Dot),
            _ => Err(ObserveError::UnknownView {
                name: s.to_string(),
            }),
        }
    }

    /// Display name for this view kind.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Adjacency => "adjacency",
            ViewKind::States => "states",
            ViewKind::Transitions => "transitions",
            ViewKind::Summary => "summary",
            ViewKind::Dot => "dot",
        }
    }
}

/// The output format for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFormat {
    Text,
    Json,
}

impl ViewFormat {
    /// Parse a view format from a string.
    pub fn parse(s: &str) -> Result<Self, ObserveError> {
        match s {
            "text" => Ok(ViewFormat::Text),
            "json" => Ok(ViewFormat::Json),
            _ => Err(ObserveError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// The output of a view render.
#[derive(Debug)]
pub struct ViewOutput {
    /// Terminal-friendly text rendering.
    pub text: String,
    /// Machine-readable JSON (always populated).
    pub data: Value,
}

impl ViewOutput {
    /// Render in the requested format.
    pub fn render(&self, format: ViewFormat) -> Result<String, ObserveError> {
        match format {
            ViewFormat::Text => Ok(self.text.clone()),
            ViewFormat::Json => Ok(serde_json::to_string_pretty(&self.data)?),
        }
    }
}

/// Context passed to views for rendering.
#[derive(Default)]
pub struct RenderContext<'a> {
    /// Per-phase statistics of the build (needed for the summary).
    pub phases: Option<&'a [PhaseStats]>,
    /// Restrict state-oriented views to one node.
    pub focus: Option<StateDescription>,
}

impl<'a> RenderContext<'a> {
    /// Create an empty render context.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_phases(mut self, phases: &'a [PhaseStats]) -> Self {
        self.phases = Some(phases);
        self
    }

    pub fn with_focus(mut self, state: StateDescription) -> Self {
        self.focus = Some(state);
        self
    }
}

/// Trait for all observability views.
pub trait View {
    /// Render this view for the given graph and context.
    fn render(&self, graph: &StateGraph, ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError>;

    /// The kind of view this is.
    fn kind(&self) -> ViewKind;
}

/// List all available view kinds.
pub fn available_views() -> &'static [ViewKind] {
    &[
        ViewKind::Adjacency,
        ViewKind::States,
        ViewKind::Transitions,
        ViewKind::Summary,
        ViewKind::Dot,
    ]
}

/// Render the view of the given kind.
pub fn render_view(
    kind: ViewKind,
    graph: &StateGraph,
    ctx: &RenderContext<'_>,
) -> Result<ViewOutput, ObserveError> {
    match kind {
        ViewKind::Adjacency => AdjacencyView.render(graph, ctx),
        ViewKind::States => StatesView.render(graph, ctx),
        ViewKind::Transitions => TransitionsView.render(graph, ctx),
        ViewKind::Summary => SummaryView.render(graph, ctx),
        ViewKind::Dot => DotView.render(graph, ctx),
    }
}
