//! Deck file model and loading.
//!
//! A deck is a JSON document listing slides in presentation order. Slide
//! numbers written in the file (`start_slide`, `timed_slide`) are 1-indexed,
//! the same way the presenter types them into the jump field.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::diagram::flow::FlowSpec;
use crate::diagram::BUILTIN_DIAGRAMS;
use crate::error::{Error, Result};
use crate::types::DiagramId;

/// Whether a list item is a revealable bullet or an explanation attached to
/// the bullet that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Counts as one reveal step.
    #[default]
    Regular,
    /// Revealed together with the regular item right after it.
    Explanation,
}

/// A bullet on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Display text.
    pub text: String,
    /// Regular or explanation.
    #[serde(default)]
    pub kind: ItemKind,
}

/// A person card shown on slides that animate profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Role or affiliation line.
    #[serde(default)]
    pub role: String,
}

/// A diagram placed on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRef {
    /// Board id of the diagram.
    pub id: DiagramId,
    /// Container starts hidden; something on the slide toggles it.
    #[serde(default)]
    pub hidden: bool,
}

/// One slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Heading.
    pub title: String,
    /// Optional second heading line.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Revealable list items in source order.
    #[serde(default)]
    pub items: Vec<ListItem>,
    /// Paragraph containers revealed with a stagger on entry.
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Animate the profile cards when the slide is entered.
    #[serde(default)]
    pub animate_profiles: bool,
    /// Profile cards.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Diagrams shown on this slide.
    #[serde(default)]
    pub diagrams: Vec<DiagramRef>,
}

impl Slide {
    /// Item kinds in source order, as the navigator needs them.
    pub fn item_kinds(&self) -> Vec<ItemKind> {
        self.items.iter().map(|item| item.kind).collect()
    }

    /// Indices of explanation items that no reveal step can reach.
    pub fn unreachable_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, item)| {
                item.kind == ItemKind::Explanation
                    && self.items.get(i + 1).map_or(true, |next| next.kind != ItemKind::Regular)
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// A complete presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Presentation title.
    pub title: String,
    /// Slide number (1-indexed) shown first.
    #[serde(default = "default_start_slide")]
    pub start_slide: usize,
    /// Slide number (1-indexed) that runs the presenter timer.
    #[serde(default)]
    pub timed_slide: Option<usize>,
    /// Slides in order.
    pub slides: Vec<Slide>,
    /// Workflow and pipeline diagrams defined by this deck.
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

const fn default_start_slide() -> usize {
    1
}

impl Deck {
    /// Read and validate a deck file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let deck: Self = serde_json::from_str(&text)
            .map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))?;
        deck.validate()?;
        tracing::info!("Loaded deck '{}' with {} slides from {}", deck.title, deck.slides.len(), path.display());
        Ok(deck)
    }

    /// Parse a deck from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let deck: Self = serde_json::from_str(text).map_err(|e| Error::parse(e.to_string(), None))?;
        deck.validate()?;
        Ok(deck)
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide at a 0-based index.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// 0-based start index.
    pub const fn start_index(&self) -> usize {
        self.start_slide.saturating_sub(1)
    }

    /// 0-based timed slide index, if any.
    pub fn timed_index(&self) -> Option<usize> {
        self.timed_slide.map(|n| n.saturating_sub(1))
    }

    /// Apply 1-indexed overrides from configuration and re-validate.
    pub fn with_overrides(mut self, start_slide: Option<usize>, timed_slide: Option<usize>) -> Result<Self> {
        if let Some(start) = start_slide {
            self.start_slide = start;
        }
        if timed_slide.is_some() {
            self.timed_slide = timed_slide;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check slide numbers and diagram references.
    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(Error::deck("deck has no slides", "Add at least one entry to \"slides\""));
        }
        let total = self.slides.len();
        if self.start_slide == 0 || self.start_slide > total {
            return Err(Error::deck(
                format!("start_slide {} is outside 1..={total}", self.start_slide),
                "Slide numbers in the deck file are 1-indexed",
            ));
        }
        if let Some(timed) = self.timed_slide {
            if timed == 0 || timed > total {
                return Err(Error::deck(
                    format!("timed_slide {timed} is outside 1..={total}"),
                    "Slide numbers in the deck file are 1-indexed",
                ));
            }
        }

        let mut known: HashSet<&str> = BUILTIN_DIAGRAMS.iter().copied().collect();
        for flow in &self.flows {
            flow.validate()?;
            if !known.insert(flow.id.as_str()) {
                return Err(Error::deck(
                    format!("diagram id '{}' is defined twice", flow.id),
                    "Give every flow a unique id",
                ));
            }
        }

        for flow in &self.flows {
            if let Some(target) = flow.toggle_targets().find(|t| !known.contains(t.as_str())) {
                return Err(Error::deck(
                    format!("flow '{}' toggles unknown diagram '{target}'", flow.id),
                    "A box's \"toggles\" must name a built-in diagram or another flow",
                ));
            }
        }

        for (i, slide) in self.slides.iter().enumerate() {
            for diagram in &slide.diagrams {
                if !known.contains(diagram.id.as_str()) {
                    return Err(Error::deck(
                        format!("slide {} references unknown diagram '{}'", i + 1, diagram.id),
                        "Use a built-in diagram id or define the flow under \"flows\"",
                    ));
                }
            }
            for item in slide.unreachable_items() {
                tracing::warn!(
                    "Slide {} item {} is an explanation with no following bullet; it will never be revealed",
                    i + 1,
                    item + 1
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::io::Write;

    const SMALL_DECK: &str = r#"{
        "title": "Small",
        "start_slide": 2,
        "timed_slide": 3,
        "slides": [
            { "title": "One" },
            { "title": "Two", "items": [
                { "text": "why", "kind": "explanation" },
                { "text": "first" },
                { "text": "second" }
            ] },
            { "title": "Three", "diagrams": [ { "id": "process-model" } ] }
        ]
    }"#;

    #[test]
    fn parses_defaults_and_kinds() {
        let deck = Deck::from_json(SMALL_DECK).unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.start_index(), 1);
        assert_eq!(deck.timed_index(), Some(2));
        assert_eq!(
            deck.slides[1].item_kinds(),
            vec![ItemKind::Explanation, ItemKind::Regular, ItemKind::Regular]
        );
        assert!(!deck.slides[0].animate_profiles);
    }

    #[test]
    fn start_slide_defaults_to_first() {
        let deck = Deck::from_json(r#"{ "title": "t", "slides": [ { "title": "a" } ] }"#).unwrap();
        assert_eq!(deck.start_index(), 0);
        assert_eq!(deck.timed_index(), None);
    }

    #[test]
    fn rejects_empty_and_out_of_range() {
        assert!(matches!(
            Deck::from_json(r#"{ "title": "t", "slides": [] }"#),
            Err(Error::Deck { .. })
        ));
        assert!(matches!(
            Deck::from_json(r#"{ "title": "t", "start_slide": 4, "slides": [ { "title": "a" } ] }"#),
            Err(Error::Deck { .. })
        ));
        assert!(matches!(
            Deck::from_json(r#"{ "title": "t", "timed_slide": 0, "slides": [ { "title": "a" } ] }"#),
            Err(Error::Deck { .. })
        ));
    }

    #[test]
    fn rejects_unknown_diagram() {
        let text = r#"{ "title": "t", "slides": [ { "title": "a", "diagrams": [ { "id": "nope" } ] } ] }"#;
        assert!(matches!(Deck::from_json(text), Err(Error::Deck { .. })));
    }

    #[test]
    fn finds_unreachable_explanations() {
        let slide = Slide {
            title: "x".into(),
            items: vec![
                ListItem { text: "a".into(), kind: ItemKind::Regular },
                ListItem { text: "dangling".into(), kind: ItemKind::Explanation },
                ListItem { text: "also".into(), kind: ItemKind::Explanation },
                ListItem { text: "b".into(), kind: ItemKind::Regular },
                ListItem { text: "tail".into(), kind: ItemKind::Explanation },
            ],
            ..Slide::default()
        };
        assert_eq!(slide.unreachable_items(), vec![1, 4]);
    }

    #[test]
    fn overrides_are_validated() {
        let deck = Deck::from_json(SMALL_DECK).unwrap();
        let deck = deck.with_overrides(Some(1), None).unwrap();
        assert_eq!(deck.start_index(), 0);
        assert_eq!(deck.timed_index(), Some(2));
        assert!(deck.with_overrides(Some(10), None).is_err());
    }

    #[test]
    fn load_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        match Deck::load(file.path()) {
            Err(Error::Parse { file: Some(p), .. }) => assert_eq!(p, file.path()),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("deck.json");
        assert!(matches!(Deck::load(&missing), Err(Error::Io { .. })));
    }
}
