//! Write every diagram in a deck to an SVG file.
//!
//! Usage: cargo run --bin render_svg [-- <deck.json> [<data dir>] [<out dir>]]

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vizdeck::config::Config;
use vizdeck::deck::Deck;
use vizdeck::diagram::data::load_dataset;
use vizdeck::diagram::DiagramBoard;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let mut args = std::env::args().skip(1);
    let deck_path = args.next().map_or(config.deck_path, PathBuf::from);
    let data_dir = args.next().map_or(config.data_dir, PathBuf::from);
    let out_dir = args.next().map_or_else(|| PathBuf::from("svg"), PathBuf::from);

    let deck = Deck::load(&deck_path).with_context(|| format!("Could not open deck {}", deck_path.display()))?;
    let mut board = DiagramBoard::new(&deck, StdRng::seed_from_u64(0));
    board.on_data(load_dataset(&data_dir).await);

    fs_err::create_dir_all(&out_dir)?;
    let ids: Vec<_> = board.slots().iter().map(|slot| slot.id.clone()).collect();
    for id in ids {
        match board.export_svg(&id) {
            Some(Ok(svg)) => {
                let path = out_dir.join(format!("{id}.svg"));
                fs_err::write(&path, svg)?;
                println!("  {id:<24} -> {}", path.display());
            }
            Some(Err(e)) => eprintln!("  {id:<24} failed: {e}"),
            None => eprintln!("  {id:<24} has nothing to render"),
        }
    }

    Ok(())
}
