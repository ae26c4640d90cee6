//! The bundled demo deck and data files load and every diagram renders.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vizdeck::deck::Deck;
use vizdeck::diagram::cluster_glyph::{CLUSTER_1, CLUSTER_2A, CLUSTER_2B};
use vizdeck::diagram::data::load_dataset;
use vizdeck::diagram::hierarchy::DendroNode;
use vizdeck::diagram::{DiagramBoard, SlotContent, BUILTIN_DIAGRAMS};
use vizdeck::types::{DiagramId, ElementId};

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn leaves(node: &DendroNode, out: &mut Vec<u32>) {
    if node.children.is_empty() {
        out.push(node.id);
    }
    for child in &node.children {
        leaves(child, out);
    }
}

#[test]
fn demo_deck_is_valid() {
    let deck = Deck::load(&demos().join("deck.json")).unwrap();
    assert_eq!(deck.len(), 9);
    assert_eq!(deck.timed_index(), Some(1));
    for slide in &deck.slides {
        assert!(slide.unreachable_items().is_empty(), "slide '{}' hides an item", slide.title);
    }
}

#[tokio::test]
async fn dendrogram_matches_the_cluster_glyph_groups() {
    let data = load_dataset(&demos().join("data")).await.unwrap();
    let mut ids = Vec::new();
    leaves(&data.dendrogram, &mut ids);
    assert_eq!(ids.len(), 20);

    let mut expected: Vec<u32> = CLUSTER_1.iter().chain(&CLUSTER_2A).chain(&CLUSTER_2B).copied().collect();
    assert_eq!(ids, expected, "leaf order follows the glyph clusters");
    expected.sort_unstable();
    assert_eq!(expected, (0..20).collect::<Vec<_>>());

    assert_eq!(data.heatmap.len(), 400);
    let (min, max) = data.score_extent();
    assert!(min >= 0.0 && max <= 1.0);
}

#[tokio::test]
async fn every_demo_diagram_renders_and_exports() {
    let deck = Deck::load(&demos().join("deck.json")).unwrap();
    let mut board = DiagramBoard::new(&deck, StdRng::seed_from_u64(1));
    board.on_data(load_dataset(&demos().join("data")).await);

    for id in BUILTIN_DIAGRAMS.iter().copied().chain(["pipeline", "analyst-workflow"]) {
        let id = DiagramId::new(id);
        let slot = board.slot(&id).unwrap();
        assert!(matches!(slot.content, SlotContent::Ready(_)), "{id} did not render: {:?}", slot.content);
        let svg = board.export_svg(&id).unwrap().unwrap();
        assert!(svg.contains("<svg"), "{id} export is not an SVG document");
    }

    let glyphs = board.slot(&DiagramId::new("cluster-glyphs")).unwrap().scene().unwrap();
    for (parent, child) in [(38, 36), (38, 37), (37, 35), (37, 32)] {
        assert!(glyphs.find(&ElementId::dendrogram_link(parent, child)).is_some());
    }
}
