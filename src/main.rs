use std::path::Path;

use clap::Parser;
use navtree::cli::commands::Cli;
use navtree::cli::handlers;
use navtree::io::config_io;
use navtree::tui::RunOptions;

/// The TUI owns the terminal, so its log goes to a file in the config dir.
fn init_tui_logging(config_dir: &Path) {
    let opened = std::fs::create_dir_all(config_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(config_dir.join("navtree.log"))
    });
    match opened {
        Ok(log_file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(log_file)))
                .init();
        }
        Err(e) => eprintln!("warning: logging disabled: {}", e),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.command.is_none() {
        let config_dir = cli
            .config_dir
            .clone()
            .unwrap_or_else(config_io::config_dir);
        init_tui_logging(&config_dir);
        log::info!("starting navtree TUI");

        let opts = RunOptions {
            config_dir: Some(config_dir),
            menu: cli.menu,
            path: cli.path,
            ephemeral: cli.ephemeral,
        };
        if let Err(e) = navtree::tui::run(opts) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
