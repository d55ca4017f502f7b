//! Human observability layer for simulated state graphs.
//!
//! Provides views (adjacency, state tables, transition narratives, build
//! summary, Graphviz) over a finished graph, each rendered as text or JSON.

pub mod adjacency;
pub mod dot;
pub mod error;
pub mod format;
pub mod states;
pub mod summary;
pub mod transitions;
pub mod view;

pub use adjacency::AdjacencyView;
pub use dot::DotView;
pub use error::ObserveError;
pub use format::{describe_change, narrative, resolve_state, state_name};
pub use states::StatesView;
pub use summary::SummaryView;
pub use transitions::TransitionsView;
pub use view::{available_views, render_view, RenderContext, View, ViewFormat, ViewKind, ViewOutput};
