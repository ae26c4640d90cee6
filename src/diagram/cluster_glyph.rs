//! Cluster glyph diagram.
//!
//! Same heatmap as the similarity diagram, but the dendrogram depth is
//! proportional to merge distance and a glyph panel summarizes the two top
//! level clusters. Triangles encode cluster size and point at their heatmap
//! block; squares encode intra-cluster distance and light up their member
//! leaves. The second triangle opens a hidden panel that splits the larger
//! cluster one level further.

use super::data::{DataSet, DATA_ERROR_MESSAGE};
use super::hierarchy::{Tree, TreeNode};
use super::interaction::{Action, Interaction};
use super::scale::{LinearScale, Ramp, SequentialScale};
use super::scene::{Color, Def, Element, Fill, Paint, Scene, PASSIVE_CLASS};
use super::shape::{Anchor, Circle, Path, Point, Polygon, Rect, Segment, Shape, Text};
use super::similarity::{bands, elbow, extent, heat_scale, leaf_count, push_cells, push_legend, MARGIN};
use super::Renderer;
use crate::constants::diagram::{CELL_SIZE, CLUSTER_WIDTH, DENDRO_WIDTH, GLYPH_WIDTH};
use crate::error::{Error, Result};
use crate::types::{DiagramId, ElementId};

/// Leaves of the small top-level cluster.
pub const CLUSTER_1: [u32; 2] = [17, 19];
/// Leaves of the first subcluster of the large cluster.
pub const CLUSTER_2A: [u32; 10] = [13, 18, 0, 9, 11, 3, 15, 10, 14, 12];
/// Leaves of the second subcluster of the large cluster.
pub const CLUSTER_2B: [u32; 8] = [1, 5, 2, 8, 6, 16, 4, 7];

/// Group revealed by clicking the second triangle.
pub const SUBCLUSTER_GROUP: &str = "subcluster-parent-group";

const SHAPE: f64 = 100.0;
const TRIANGLE_WIDTH: f64 = 300.0;
const TRIANGLE_HEIGHT: f64 = 100.0;
const INTRA_DOMAIN: (f64, f64) = (0.38, 7.66);

const ARROW_GRADIENT: &str = "gradient-gray-black";
const ARROWHEAD: &str = "arrowhead";
const STRIPES: &str = "diagonal-stripe-3";

const INK: Color = Color::rgb(0x2b, 0x2b, 0x2b);
const GLYPH: Color = Color::rgb(0x6b, 0x6b, 0x6b);
const ACCENT: Color = Color::rgb(0xd9, 0x48, 0x01);

/// The `cluster-glyphs` diagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterGlyphs;

impl Renderer for ClusterGlyphs {
    fn id(&self) -> DiagramId {
        DiagramId::new("cluster-glyphs")
    }

    fn needs_data(&self) -> bool {
        true
    }

    fn render(&self, data: Option<&DataSet>) -> Result<Scene> {
        let data = data.ok_or_else(|| Error::data(DATA_ERROR_MESSAGE))?;
        let leaves = leaf_count(&data.dendrogram);
        let mut tree = Tree::cluster(&data.dendrogram, CELL_SIZE * leaves as f64, DENDRO_WIDTH);
        tree.scale_depth_by_distance(DENDRO_WIDTH);

        let (rows, cols) = bands(&data.heatmap, CELL_SIZE);
        let layout_width = cols.labels().len() as f64 * CELL_SIZE + MARGIN.left + MARGIN.right + CLUSTER_WIDTH;
        let height = rows.labels().len() as f64 * CELL_SIZE + MARGIN.top + MARGIN.bottom;
        let sub_origin = Point::new(MARGIN.left + GLYPH_WIDTH * 2.22, MARGIN.top * 2.5);
        let width = layout_width.max(sub_origin.x + TRIANGLE_WIDTH + 2.0 * SHAPE + 20.0);
        let mut scene = Scene::new(width, height);

        let (min_x, max_x) = extent(&tree, |n| n.x);
        let (_, max_y) = extent(&tree, |n| n.y);
        let y = LinearScale::new(
            (min_x, max_x),
            (MARGIN.top + CELL_SIZE / 2.0, height - MARGIN.bottom - CELL_SIZE / 2.0),
        );
        let x = LinearScale::new((0.0, max_y), (MARGIN.left, layout_width - MARGIN.right - CLUSTER_WIDTH));

        push_defs(&mut scene);
        push_cells(&mut scene, data, &rows, &cols);
        push_dendrogram(&mut scene, &tree, &x, &y);
        push_legend(&mut scene, &heat_scale(data));
        scene.push(Element::new(Shape::Text(Text {
            rotate: Some(-90.0),
            ..Text::new(63.0, MARGIN.top + 125.0, "DTW Score", 12.0).anchored(Anchor::Middle)
        })));

        let subcluster = ElementId::new(SUBCLUSTER_GROUP);
        scene.add_group(subcluster.clone(), true);
        push_highlight_rects(&mut scene);

        let leaf_ids: Vec<u32> = tree.leaves().map(|l| l.id).collect();
        let members = |keep: &dyn Fn(u32) -> bool| -> Vec<ElementId> {
            leaf_ids.iter().copied().filter(|&id| keep(id)).map(ElementId::dendrogram_node).collect()
        };
        let intra = SequentialScale::new(INTRA_DOMAIN, Ramp::Oranges);

        // main panel: the two top-level clusters
        let root = tree.root();
        let top = child_links(&tree, root);
        let main = Point::new(MARGIN.left + GLYPH_WIDTH, MARGIN.top);
        let panel = Panel { name: "main", origin: main, group: None };
        panel.connectors(&mut scene, [98.0, 100.0], &top);
        panel.triangle(&mut scene, 1, (98.0, 7.0), 0.0, None);
        panel.triangle(&mut scene, 2, (100.0, 48.0), TRIANGLE_HEIGHT, Some(&subcluster));
        panel.square(&mut scene, "intra-1", (TRIANGLE_WIDTH, 0.0), intra.apply(0.38), members(&|id| CLUSTER_1.contains(&id)), false);
        panel.square(
            &mut scene,
            "intra-2",
            (TRIANGLE_WIDTH + SHAPE, SHAPE),
            intra.apply(7.66),
            members(&|id| !CLUSTER_1.contains(&id)),
            true,
        );
        panel.striped(&mut scene, (TRIANGLE_WIDTH, SHAPE));

        // hidden panel: the large cluster split one level further
        scene.push(
            Element::new(Shape::Path(
                Path::start(Point::new(TRIANGLE_WIDTH + 2.05 * SHAPE, 1.5 * SHAPE)).then(Segment::Cubic {
                    c1: Point::new(GLYPH_WIDTH, 1.5 * SHAPE),
                    c2: Point::new(GLYPH_WIDTH * 1.05, 1.7 * SHAPE),
                    to: Point::new(GLYPH_WIDTH * 1.22, SHAPE.mul_add(2.5, -SHAPE / 1.33)),
                }),
            ))
            .with_class("dashed-arrow")
            .with_paint(Paint {
                fill: Fill::None,
                stroke: Fill::Url(ARROW_GRADIENT.to_string()),
                stroke_width: 4.0,
                dash: Some(vec![12.0, 6.0]),
                marker_end: Some(ARROWHEAD.to_string()),
                ..Paint::default()
            })
            .at(main)
            .in_group(&subcluster),
        );
        let second = root.and_then(|r| r.children.get(1)).and_then(|&i| tree.descendants().get(i));
        let sub = child_links(&tree, second);
        let panel = Panel { name: "sub", origin: sub_origin, group: Some(&subcluster) };
        panel.connectors(&mut scene, [105.0, 190.0], &sub);
        panel.triangle(&mut scene, 3, (105.0, 48.0), 0.0, None);
        panel.triangle(&mut scene, 4, (190.0, 38.0), TRIANGLE_HEIGHT, None);
        panel.square(&mut scene, "intra-3", (TRIANGLE_WIDTH, 0.0), intra.apply(5.0), members(&|id| CLUSTER_2A.contains(&id)), false);
        panel.square(
            &mut scene,
            "intra-4",
            (TRIANGLE_WIDTH + SHAPE, SHAPE),
            intra.apply(4.2),
            members(&|id| CLUSTER_2B.contains(&id)),
            false,
        );
        panel.striped(&mut scene, (TRIANGLE_WIDTH, SHAPE));

        tracing::debug!("Rendered cluster glyphs over {} leaves", leaf_ids.len());
        Ok(scene)
    }
}

/// Link ids from a node to each of its first two children.
fn child_links(tree: &Tree, node: Option<&TreeNode>) -> [Option<ElementId>; 2] {
    let link = |k: usize| {
        let parent = node?;
        let child = tree.descendants().get(*parent.children.get(k)?)?;
        Some(ElementId::dendrogram_link(parent.id, child.id))
    };
    [link(0), link(1)]
}

fn push_defs(scene: &mut Scene) {
    scene.defs.push(Def::LinearGradient {
        id: ARROW_GRADIENT.to_string(),
        from: Point::new(0.0, 0.0),
        to: Point::new(1.0, 0.0),
        stops: vec![
            super::scene::Stop { offset: 0.0, color: Color::rgb(0xd3, 0xd3, 0xd3) },
            super::scene::Stop { offset: 1.0, color: Color::BLACK },
        ],
    });
    scene.defs.push(Def::Marker {
        id: ARROWHEAD.to_string(),
        size: 5.0,
        reference: Point::new(5.0, 2.5),
        path: Path::start(Point::new(0.0, 0.0))
            .then(Segment::LineTo(Point::new(5.0, 2.5)))
            .then(Segment::LineTo(Point::new(0.0, 5.0)))
            .then(Segment::Close),
        fill: Color::BLACK,
    });
    scene.defs.push(Def::Pattern {
        id: STRIPES.to_string(),
        width: 6.0,
        height: 12.0,
        rotate: 45.0,
        content: vec![
            Element::new(Shape::Rect(Rect::new(0.0, 0.0, 6.0, 12.0))).with_paint(Paint::filled(Color::WHITE)),
            Element::new(Shape::Rect(Rect::new(0.0, 0.0, 2.0, 12.0))).with_paint(Paint::filled(Color::BLACK)),
        ],
    });
}

fn push_dendrogram(scene: &mut Scene, tree: &Tree, x: &LinearScale, y: &LinearScale) {
    for (parent, child) in tree.links() {
        scene.push(
            Element::new(Shape::Path(elbow(x, y, (parent.x, parent.y), (child.x, child.y))))
                .with_id(ElementId::dendrogram_link(parent.id, child.id))
                .with_class("dendrogram-link")
                .with_paint(Paint::stroked(INK, 1.5))
                .on_hover(Paint::stroked(ACCENT, 3.0)),
        );
    }
    for node in tree.descendants() {
        scene.push(
            Element::new(Shape::Circle(Circle { cx: x.apply(node.y), cy: y.apply(node.x), r: 3.0 }))
                .with_id(ElementId::dendrogram_node(node.id))
                .with_class("dendrogram-node")
                .with_paint(Paint::filled(INK))
                .on_hover(Paint::filled(ACCENT).with_stroke(ACCENT, 2.0)),
        );
    }
}

fn push_highlight_rects(scene: &mut Scene) {
    let c = CELL_SIZE;
    let rects = [
        Rect::new(6.0 * c - c / 2.0, -c / 2.0, 15.0 * c, 3.0 * c - c / 2.0),
        Rect::new(6.0 * c - c / 2.0, 2.0 * c, 15.0 * c, 18.0 * c + c / 2.0),
        Rect::new(10.0 * c - c / 2.0, 2.0 * c, 11.0 * c, 10.0 * c),
        Rect::new(14.0 * c, 12.0 * c, 6.0 * c + c / 2.0, 8.0 * c + c / 2.0),
    ];
    for (i, rect) in rects.into_iter().enumerate() {
        scene.push(
            Element::new(Shape::Rect(rect))
                .with_id(ElementId::highlight_rect(i + 1))
                .with_class("highlight-rect")
                .with_class(PASSIVE_CLASS)
                .with_paint(Paint { fill: Fill::None, ..Paint::default() })
                .on_hover(Paint::filled(ACCENT.with_alpha(0.15)).with_stroke(ACCENT, 2.0))
                .at(Point::new(MARGIN.left, MARGIN.top)),
        );
    }
}

/// One glyph panel placed at `origin`.
struct Panel<'a> {
    name: &'static str,
    origin: Point,
    group: Option<&'a ElementId>,
}

impl Panel<'_> {
    fn place(&self, element: Element) -> Element {
        let element = element.at(self.origin);
        match self.group {
            Some(g) => element.in_group(g),
            None => element,
        }
    }

    /// Elbow lines from the panel's root point to the two triangle tips.
    fn connectors(&self, scene: &mut Scene, tips: [f64; 2], links: &[Option<ElementId>; 2]) {
        let tip_y = [TRIANGLE_HEIGHT / 2.0, TRIANGLE_HEIGHT * 1.5];
        for (k, link) in links.iter().enumerate() {
            let path = Path::start(Point::new(0.0, TRIANGLE_HEIGHT))
                .then(Segment::Vertical(tip_y[k]))
                .then(Segment::Horizontal(tips[k]));
            let id = ElementId::new(format!("connecting-line-{}-{}", self.name, k + 1));
            scene.push(self.place(
                Element::new(Shape::Path(path))
                    .with_id(id.clone())
                    .with_class("connecting-line")
                    .with_paint(Paint::stroked(INK, 2.0))
                    .on_hover(Paint::stroked(ACCENT, 3.0)),
            ));
            if let Some(link) = link {
                scene.interactions.push(Interaction::hover(id, Action::Highlight(vec![link.clone()])));
            }
        }
        for (cx, cy) in [(tips[0], tip_y[0]), (tips[1], tip_y[1]), (0.0, TRIANGLE_HEIGHT)] {
            scene.push(self.place(
                Element::new(Shape::Circle(Circle { cx, cy, r: 3.0 }))
                    .with_class("dendrogram-node")
                    .with_class(PASSIVE_CLASS)
                    .with_paint(Paint::filled(INK)),
            ));
        }
    }

    /// Triangle from `tip.0` to the panel's right edge, `tip.1` tall on each side.
    fn triangle(&self, scene: &mut Scene, n: usize, tip: (f64, f64), dy: f64, toggles: Option<&ElementId>) {
        let mid = TRIANGLE_HEIGHT / 2.0 + dy;
        let id = ElementId::new(format!("glyph-triangle-{n}"));
        let mut element = Element::new(Shape::Polygon(Polygon {
            points: vec![
                Point::new(tip.0, mid),
                Point::new(TRIANGLE_WIDTH, mid - tip.1),
                Point::new(TRIANGLE_WIDTH, mid + tip.1),
            ],
        }))
        .with_id(id.clone())
        .with_class("glyph")
        .with_class("glyph-triangle")
        .with_paint(Paint::filled(GLYPH))
        .on_hover(Paint::filled(INK).with_stroke(ACCENT, 2.0));
        if let Some(group) = toggles {
            element = element.with_class("glyph-clickable");
            scene.interactions.push(Interaction::click(id.clone(), Action::ToggleGroup(group.clone())));
        }
        scene.push(self.place(element));
        scene.interactions.push(Interaction::hover(id, Action::Highlight(vec![ElementId::highlight_rect(n)])));
    }

    fn square(
        &self,
        scene: &mut Scene,
        name: &str,
        at: (f64, f64),
        fill: Color,
        members: Vec<ElementId>,
        outlined: bool,
    ) {
        let id = ElementId::new(format!("glyph-square-{name}"));
        let paint = if outlined { Paint::filled(fill).with_stroke(Color::BLACK, 2.0) } else { Paint::filled(fill) };
        scene.push(self.place(
            Element::new(Shape::Rect(Rect::new(at.0, at.1, SHAPE, SHAPE)))
                .with_id(id.clone())
                .with_class("glyph")
                .with_class("glyph-square")
                .with_paint(paint)
                .on_hover(Paint::filled(fill).with_stroke(ACCENT, 3.0)),
        ));
        scene.interactions.push(Interaction::hover(id, Action::Highlight(members)));
    }

    fn striped(&self, scene: &mut Scene, at: (f64, f64)) {
        scene.push(self.place(
            Element::new(Shape::Rect(Rect::new(at.0, at.1, SHAPE, SHAPE)))
                .with_class("glyph")
                .with_class("glyph-square")
                .with_paint(Paint { fill: Fill::Url(STRIPES.to_string()), ..Paint::default() }),
        ));
    }
}
