use clap::{Parser, Subcommand};
use foldergal::imaging::RustBackend;
use foldergal::{album, clean, config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foldergal")]
#[command(about = "Static photo albums from a directory tree of images")]
#[command(long_about = "\
Static photo albums from a directory tree of images

Every directory becomes an album page listing its sub-albums and images.
Generated files are written next to the images they describe.

Content structure:

  photos/
  ├── config.toml                  # Album config (optional, cascades to children)
  ├── description.txt              # Captions: `name: caption` per line
  ├── beach.jpg                    # Image
  ├── beach.jpg.txt                # Sidecar caption (wins over description.txt)
  ├── cover.jpg                    # Preferred source for the album image
  └── Holidays/                    # Sub-album
      └── crete.jpg

Generated files:

  index.html, index_0001.html      # Album pages
  highlight.jpg                    # Album image shown in the parent
  thumbnails/th_beach.jpg          # Thumbnails
  photos.rss                       # Media RSS feed

Run 'foldergal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Generate pages, thumbnails, album images and feeds (default)
    Generate,
    /// Create or extend description.txt in every album
    Text,
    /// Remove thumbnails, album images and pages
    Clean,
    /// Remove generated pages
    Cleanindex,
    /// Remove album images
    Cleanhighlight,
    /// Remove pages, extend captions, then generate
    Rebuild,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command. `Ok(false)` means some albums failed.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let root = &cli.source;
    match cli.command.unwrap_or(Command::Generate) {
        Command::Generate => {
            let report = album::generate(root, &RustBackend::new());
            output::print_build_output(&report, root);
            Ok(report.is_success())
        }
        Command::Text => {
            let report = album::generate_texts(root);
            output::print_text_output(&report, root);
            Ok(report.is_success())
        }
        Command::Clean => {
            output::print_clean_output(&clean::clean(root)?);
            Ok(true)
        }
        Command::Cleanindex => {
            output::print_clean_output(&clean::clean_index(root)?);
            Ok(true)
        }
        Command::Cleanhighlight => {
            output::print_clean_output(&clean::clean_highlight(root)?);
            Ok(true)
        }
        Command::Rebuild => {
            let report = album::rebuild(root, &RustBackend::new())?;
            output::print_rebuild_output(&report, root);
            Ok(report.is_success())
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(true)
        }
    }
}
