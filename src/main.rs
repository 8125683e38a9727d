use std::process::ExitCode;

use clap::Parser;
use evelayout::{
    cli::{Args, Command},
    config::{self, Config},
    error::Result,
    geometry::{Dimensionable, Layout, Positionable},
    layout_store::LayoutStore,
    manager::LayoutManager,
    notify::DesktopNotifier,
    platform::X11Windows,
    scheduler::IntervalTicker,
    signals,
};
use log::{error, LevelFilter};

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = systemd_journal_logger::init() {
        eprintln!("journal logging unavailable: {e}");
    }
    log::set_max_level(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("evelayout: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config: Config = config::load_config(args.config.as_deref())?;
    if let Some(layouts) = args.layouts {
        config.layout_file = Some(layouts);
    }

    let store = LayoutStore::load(config.layout_path(), config.on_malformed_layouts)?;
    let windows = X11Windows::connect()?;
    let mut manager = LayoutManager::new(
        windows,
        store,
        config.title_prefix.clone(),
        config.on_malformed_layouts,
    );

    match args.command.unwrap_or_default() {
        Command::Run => {
            signals::install()?;
            let mut manager = manager.with_notifier(DesktopNotifier);
            let mut ticker = IntervalTicker::new(config.restore_interval(), &signals::FLAGS);
            manager.run(&mut ticker);
        }
        Command::Save => {
            let count = manager.save()?;
            println!(
                "Layouts saved ({count} windows) to {}",
                manager.store().path().display()
            );
        }
        Command::Restore => {
            let count = manager.restore();
            println!("Restored {count} windows");
        }
        Command::List => {
            for m in manager.matched_windows() {
                let stored = match m.stored {
                    Some(l) => format!("stored {}", describe(&l)),
                    None => "no stored layout".to_string(),
                };
                println!(
                    "{:#010x}  {:<24} {}  ({stored})",
                    m.window.id,
                    m.name,
                    describe(&Layout::from(m.window.rect)),
                );
            }
        }
    }
    Ok(())
}

/// `WIDTHxHEIGHT+X+Y`, as X11 geometry strings are written.
fn describe(layout: &Layout) -> String {
    let (x, y) = layout.get_position();
    let (width, height) = layout.get_dimensions();
    format!("{width}x{height}+{x}+{y}")
}
