//! `VizDeck` - terminal slide presenter with interactive data-visualization diagrams.
//!
//! A deck file describes the slides; the presenter walks through them with
//! progressive reveals, a jump-to-slide field and a countdown timer, and
//! draws diagrams that respond to hover, click, drag and keyboard focus.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod config;
pub mod constants;
pub mod deck;
pub mod diagram;
pub mod error;
pub mod input;
pub mod navigator;
pub mod presenter;
pub mod types;
pub mod ui;
