//! Similarity heatmap with a dendrogram overlay.
//!
//! The dendrogram is laid on its side: tree breadth runs down the rows and
//! tree depth runs across the heatmap from the left margin, so each leaf
//! ends next to its heatmap row.

use super::data::{DataSet, HeatmapCell, DATA_ERROR_MESSAGE};
use super::hierarchy::Tree;
use super::scale::{BandScale, LinearScale, Ramp, SequentialScale};
use super::scene::{Color, Def, Element, Fill, Paint, Scene, Stop};
use super::shape::{Anchor, Circle, Path, Point, Rect, Segment, Shape, Text};
use super::Renderer;
use crate::constants::diagram::{CELL_SIZE, DENDRO_WIDTH, LEGEND_STOPS};
use crate::error::{Error, Result};
use crate::types::{DiagramId, ElementId};

/// Plot margins shared by the dendrogram diagrams.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub(crate) const MARGIN: Margin = Margin { top: 50.0, right: 250.0, bottom: 50.0, left: 100.0 };

const LEGEND_X: f64 = 18.0;
const LEGEND_WIDTH: f64 = 20.0;
const LEGEND_HEIGHT: f64 = 250.0;
pub(crate) const LEGEND_GRADIENT: &str = "legend-gradient";

/// Row and column bands for a heatmap.
pub(crate) fn bands(cells: &[HeatmapCell], cell: f64) -> (BandScale, BandScale) {
    let rows = BandScale::new(cells.iter().map(|c| c.row.to_string()), 0.0, cell);
    let cols = BandScale::new(cells.iter().map(|c| c.col.to_string()), 0.0, cell);
    (rows, cols)
}

/// Heatmap colour: dark for the lowest score, light for the highest.
pub(crate) fn heat_scale(data: &DataSet) -> SequentialScale {
    let (min, max) = data.score_extent();
    SequentialScale::new((max, min), Ramp::Blues)
}

/// One rect per cell at the top-left margin.
pub(crate) fn push_cells(scene: &mut Scene, data: &DataSet, rows: &BandScale, cols: &BandScale) {
    let color = heat_scale(data);
    let cell = rows.bandwidth();
    for c in &data.heatmap {
        let (Some(y), Some(x)) = (rows.position(&c.row.to_string()), cols.position(&c.col.to_string())) else {
            continue;
        };
        scene.push(
            Element::new(Shape::Rect(Rect::new(x, y, cell, cell)))
                .with_class("cell")
                .with_class(super::scene::PASSIVE_CLASS)
                .with_paint(Paint::filled(color.apply(c.score)).with_stroke(Color::WHITE.with_alpha(0.2), 0.5))
                .at(Point::new(MARGIN.left, MARGIN.top)),
        );
    }
}

/// Elbow link: vertical along the parent's depth, then across to the child.
pub(crate) fn elbow(x: &LinearScale, y: &LinearScale, parent: (f64, f64), child: (f64, f64)) -> Path {
    Path::start(Point::new(x.apply(parent.1), y.apply(parent.0)))
        .then(Segment::Vertical(y.apply(child.0)))
        .then(Segment::Horizontal(x.apply(child.1)))
}

/// Vertical gradient legend with `0` above and `1` below.
pub(crate) fn push_legend(scene: &mut Scene, color: &SequentialScale) {
    let stops = (0..LEGEND_STOPS)
        .map(|i| {
            let offset = i as f64 / (LEGEND_STOPS - 1) as f64;
            Stop { offset, color: color.apply(offset) }
        })
        .collect();
    scene.defs.push(Def::LinearGradient {
        id: LEGEND_GRADIENT.to_string(),
        from: Point::new(0.0, 0.0),
        to: Point::new(0.0, 1.0),
        stops,
    });
    scene.push(
        Element::new(Shape::Rect(Rect::new(LEGEND_X, MARGIN.top, LEGEND_WIDTH, LEGEND_HEIGHT)))
            .with_class("legend")
            .with_paint(Paint { fill: Fill::Url(LEGEND_GRADIENT.to_string()), ..Paint::default() }),
    );
    let cx = LEGEND_X + LEGEND_WIDTH / 2.0;
    scene.push(Element::new(Shape::Text(Text::new(cx, MARGIN.top - 5.0, "0", 9.0).anchored(Anchor::Middle))));
    scene.push(Element::new(Shape::Text(
        Text::new(cx, MARGIN.top + LEGEND_HEIGHT + 12.0, "1", 9.0).anchored(Anchor::Middle),
    )));
}

/// Extent of a value over the tree's nodes.
pub(crate) fn extent(tree: &Tree, f: impl Fn(&super::hierarchy::TreeNode) -> f64) -> (f64, f64) {
    tree.descendants()
        .iter()
        .map(f)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// The `similarity-heatmap` diagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityHeatmap;

impl Renderer for SimilarityHeatmap {
    fn id(&self) -> DiagramId {
        DiagramId::new("similarity-heatmap")
    }

    fn needs_data(&self) -> bool {
        true
    }

    fn render(&self, data: Option<&DataSet>) -> Result<Scene> {
        let data = data.ok_or_else(|| Error::data(DATA_ERROR_MESSAGE))?;
        let leaves = leaf_count(&data.dendrogram);
        let tree = Tree::cluster(&data.dendrogram, CELL_SIZE * leaves as f64, DENDRO_WIDTH);

        // the cell size follows the breadth of the laid-out tree
        let widest = tree.links().map(|(_, t)| t.x).fold(0.0, f64::max);
        let cell = (widest + 3.0) / 20.0;
        let (rows, cols) = bands(&data.heatmap, cell);

        let width = cols.labels().len() as f64 * cell + MARGIN.left + MARGIN.right;
        let height = rows.labels().len() as f64 * cell + MARGIN.top + MARGIN.bottom;
        let mut scene = Scene::new(width, height);

        let (_, max_x) = extent(&tree, |n| n.x);
        let (_, max_y) = extent(&tree, |n| n.y);
        let y = LinearScale::new((0.0, max_x), (MARGIN.top, height - MARGIN.bottom));
        let x = LinearScale::new((0.0, max_y), (MARGIN.left, width - MARGIN.right));

        push_cells(&mut scene, data, &rows, &cols);

        for (parent, child) in tree.links() {
            scene.push(
                Element::new(Shape::Path(elbow(&x, &y, (parent.x, parent.y), (child.x, child.y))))
                    .with_id(ElementId::dendrogram_link(parent.id, child.id))
                    .with_class("dendrogram-link")
                    .with_paint(Paint::stroked(Color::BLACK, 1.5)),
            );
        }
        for node in tree.descendants() {
            scene.push(
                Element::new(Shape::Circle(Circle { cx: x.apply(node.y), cy: y.apply(node.x), r: 3.0 }))
                    .with_id(ElementId::dendrogram_node(node.id))
                    .with_class("dendrogram-node"),
            );
        }

        push_legend(&mut scene, &heat_scale(data));
        tracing::debug!("Rendered similarity heatmap: {} cells, cell size {cell:.2}", data.heatmap.len());
        Ok(scene)
    }
}

pub(crate) fn leaf_count(node: &super::hierarchy::DendroNode) -> usize {
    if node.children.is_empty() {
        1
    } else {
        node.children.iter().map(leaf_count).sum()
    }
}
