use anyhow::Context;
use bloom::node::{GIVE_ICON, NEGATIVE_NODE_ICON, NODE_ICON, TAKE_ICON};
use bloomboard::board::Board;
use bloomboard::cli::Args;
use bloomboard::config;
use bloomboard::gui::app::{AppInit, AppModel};
use bloomboard::gui::canvas::IconCache;
use bloomboard::sys::runtime;
use clap::Parser;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.write_default_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default(args.config.as_deref());
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    let board = Board::new(&config);

    let (blur_tx, blur_rx) = async_channel::bounded(4);
    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(blur_rx, tx);

    // GTK would otherwise try to parse our flags
    let app = RelmApp::new("org.bloom.board").with_args(Vec::new());

    let icons = IconCache::load(
        &config.icon_dir(),
        [NODE_ICON, NEGATIVE_NODE_ICON, TAKE_ICON, GIVE_ICON],
    );

    app.run::<AppModel>(AppInit {
        board,
        icons,
        blur_tx,
        events: rx,
    });
    Ok(())
}
