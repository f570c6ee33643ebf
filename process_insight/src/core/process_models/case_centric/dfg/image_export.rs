use graphviz_rust::{
    dot_generator::{attr, edge, graph, id, node, node_id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};
#[cfg(feature = "graphviz-export")]
use graphviz_rust::cmd::Format;

use crate::analysis::case_centric::bottleneck::BottleneckAnalysis;
use crate::core::process_models::case_centric::dfg::dfg_struct::DirectlyFollowsGraph;
use crate::utils::duration_stats::DurationUnit;

const START_COLOR: &str = "#4B9969";
const END_COLOR: &str = "#D4001F";

/// Fill color for a node whose mean duration is `ratio` (`0.0..=1.0`) of the largest mean
///
/// Interpolates from white to orange.
fn heat_color(ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let channel = |to: f64| (255.0 - (255.0 - to) * ratio).round() as u8;
    format!(
        "\"#{:02X}{:02X}{:02X}\"",
        channel(246.0),
        channel(140.0),
        channel(30.0)
    )
}

#[cfg(feature = "graphviz-export")]
///
/// Export the image of a [`DirectlyFollowsGraph`]
///
/// Also see [`export_dfg_image_svg`] and [`export_dfg_image_png`]
///
pub fn export_dfg_image<P: AsRef<std::path::Path>>(
    dfg: &DirectlyFollowsGraph,
    bottlenecks: Option<&BottleneckAnalysis>,
    path: P,
    format: Format,
    dpi_factor: Option<f32>,
) -> Result<(), std::io::Error> {
    let g = export_dfg_to_dot_graph(dfg, bottlenecks, dpi_factor);
    let out = graphviz_rust::exec(g, &mut PrinterContext::default(), vec![format.into()])?;
    std::fs::write(path, out)
}

///
/// Export a [`DirectlyFollowsGraph`] to a DOT graph (used in Graphviz)
///
/// Start activities are filled green, end activities red. If `bottlenecks` is given, every
/// other activity with a mean duration is shaded by its mean relative to the slowest activity
/// and the mean is added to its label. Edges are labelled with their frequency.
///
pub fn export_dfg_to_dot_graph(
    dfg: &DirectlyFollowsGraph,
    bottlenecks: Option<&BottleneckAnalysis>,
    dpi_factor: Option<f32>,
) -> Graph {
    // Start activities first, end activities last
    let mut sorted_acts: Vec<_> = dfg.activities.iter().collect();
    sorted_acts.sort_by_key(|(act, _)| {
        let rank = match (dfg.is_start_activity(act), dfg.is_end_activity(act)) {
            (true, _) => 0,
            (false, false) => 1,
            (false, true) => 2,
        };
        (rank, *act)
    });
    let max_mean = bottlenecks
        .and_then(|b| b.ranking.first())
        .map(|s| s.stats.mean_in(DurationUnit::Seconds))
        .unwrap_or_default();

    let activity_nodes: Vec<Stmt> = sorted_acts
        .into_iter()
        .map(|(x, &y)| {
            let stats = bottlenecks.and_then(|b| b.get(x).map(|s| (s, b.unit)));
            let mut counted_label = format!("{x}: {y}");
            if let Some((s, unit)) = stats {
                counted_label.push_str(&format!(
                    "\\n\u{2300} {:.2} {}",
                    s.stats.mean_in(unit),
                    unit.suffix()
                ));
            }
            let fill_color: String = if dfg.is_start_activity(x) && dfg.is_end_activity(x) {
                format!("\"{START_COLOR}:{END_COLOR}\"")
            } else if dfg.is_start_activity(x) {
                format!("\"{START_COLOR}\"")
            } else if dfg.is_end_activity(x) {
                format!("\"{END_COLOR}\"")
            } else if let Some((s, _)) = stats.filter(|_| max_mean > 0.0) {
                heat_color(s.stats.mean_in(DurationUnit::Seconds) / max_mean)
            } else {
                "\"white\"".into()
            };

            let (font_size, width) = (12, 1);
            stmt!(node!(esc x; attr!("label", esc counted_label), attr!("gradientangle", "45"), attr!("shape","box"), attr!("fontsize",font_size),attr!("style","filled"), attr!("fillcolor",fill_color), attr!("width",width), attr!("height",0.5)))
        })
        .collect();

    let arcs: Vec<Stmt> = dfg
        .directly_follows_relations
        .iter()
        .map(|(dfr, &frequency)| {
            let attrs = vec![attr!("label", (format!("{}", frequency)))];
            stmt!(edge!(node_id!(esc dfr.0) => node_id!(esc dfr.1), attrs))
        })
        .collect();

    let mut global_graph_options = vec![stmt!(attr!("rankdir", "LR"))];
    if let Some(dpi_fac) = dpi_factor {
        global_graph_options.push(stmt!(attr!("dpi", (dpi_fac * 96.0))))
    }

    graph!(strict di id!("dfg"), vec![global_graph_options, activity_nodes, arcs].into_iter().flatten().collect())
}

///
/// Convert a DOT graph to a String containing the DOT source
///
pub fn graph_to_dot(g: &Graph) -> String {
    g.print(&mut PrinterContext::default())
}

///
/// DOT source of a [`DirectlyFollowsGraph`], optionally shaded by bottleneck analysis
///
pub fn export_dfg_to_dot(
    dfg: &DirectlyFollowsGraph,
    bottlenecks: Option<&BottleneckAnalysis>,
) -> String {
    graph_to_dot(&export_dfg_to_dot_graph(dfg, bottlenecks, None))
}

#[cfg(feature = "graphviz-export")]
///
/// Export the image of a [`DirectlyFollowsGraph`] as a SVG file
///
/// Also consider using [`DirectlyFollowsGraph::export_svg`] for convenience.
pub fn export_dfg_image_svg<P: AsRef<std::path::Path>>(
    dfg: &DirectlyFollowsGraph,
    bottlenecks: Option<&BottleneckAnalysis>,
    path: P,
) -> Result<(), std::io::Error> {
    export_dfg_image(dfg, bottlenecks, path, Format::Svg, None)
}

#[cfg(feature = "graphviz-export")]
///
/// Export the image of a [`DirectlyFollowsGraph`] as a PNG file
///
/// Also consider using [`DirectlyFollowsGraph::export_png`] for convenience.
pub fn export_dfg_image_png<P: AsRef<std::path::Path>>(
    dfg: &DirectlyFollowsGraph,
    bottlenecks: Option<&BottleneckAnalysis>,
    path: P,
) -> Result<(), std::io::Error> {
    export_dfg_image(dfg, bottlenecks, path, Format::Png, Some(2.0))
}
