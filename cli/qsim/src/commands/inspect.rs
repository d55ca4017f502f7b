//! `qsim inspect`: render one view of the built graph.

use anyhow::Result;

use qsim_core::builder::Simulation;
use qsim_observe::{render_view, resolve_state, RenderContext, ViewFormat, ViewKind};

use crate::commands::{build_simulation, emit};
use crate::manifest::QsimManifest;

pub fn run(
    manifest: &QsimManifest,
    view: Option<&str>,
    state: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    let kind = ViewKind::parse(view.unwrap_or("adjacency"))?;
    let sim = build_simulation(manifest, None)?;
    let text = render(&sim, kind, state, manifest.output_format(format)?)?;
    emit(&text, None)
}

pub fn render(
    sim: &Simulation,
    kind: ViewKind,
    state: Option<&str>,
    format: ViewFormat,
) -> Result<String> {
    let mut ctx = RenderContext::empty().with_phases(&sim.phases);
    if let Some(query) = state {
        ctx = ctx.with_focus(resolve_state(&sim.graph, query)?);
    }
    let output = render_view(kind, &sim.graph, &ctx)?;
    let mut text = output.render(format)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
