use clap::{Parser, Subcommand};
use portfolio_manifest::{config, logging, manifest, optimize, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio-manifest")]
#[command(about = "Builds the data.json manifest for a portfolio gallery")]
#[command(long_about = "\
Builds the data.json manifest for a portfolio gallery

Your filesystem is the data source. Every folder with a metadata.json two
levels below the portfolio root is a project; its parent folder is the
category.

Content structure:

  portfolio/
  ├── config.toml                  # Optional settings (see gen-config)
  ├── 3D/                          # Category (shown as \"3D\")
  │   └── robot/                   # Project (id = \"robot\")
  │       ├── metadata.json        # Required: title, description, images...
  │       ├── thumbnail.webp       # Optional local thumbnail
  │       └── images/
  │           ├── front.png
  │           └── front.webp       # Preferred over front.png
  └── web-design/                  # Category (shown as \"Web Design\")
      └── shop/
          └── metadata.json        # releaseVersion → images from a release

Image hosting (per project):
  Repo:     {base_path}{content_dir}/{category}/{project}/images/{file}
  Release:  {repository}/releases/download/{version}/{category}_{project}_{file}

Run 'portfolio-manifest optimize' to create WebP copies and thumbnails.
Run 'portfolio-manifest gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Portfolio root directory
    #[arg(long, default_value = "portfolio", global = true)]
    source: PathBuf,

    /// Manifest output file
    #[arg(long, default_value = manifest::OUTPUT_FILENAME, global = true)]
    output: PathBuf,

    /// More diagnostics on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the portfolio and write the manifest
    Generate,
    /// Scan the portfolio and report, without writing anything
    Check,
    /// Convert images to WebP and create project thumbnails
    Optimize {
        /// Rebuild outputs even when they are newer than their source
        #[arg(long)]
        force: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Generate => {
            println!("==> Scanning {}", cli.source.display());
            let result = manifest::build(&cli.source)?;
            output::print_build_output(&result, &cli.source);
            manifest::write_manifest(&cli.output, &result.manifest)?;
            println!("==> Wrote {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let result = manifest::build(&cli.source)?;
            output::print_build_output(&result, &cli.source);
            if !result.skipped.is_empty() {
                return Err(format!("{} project(s) could not be read", result.skipped.len()).into());
            }
            println!("==> Portfolio is valid");
        }
        Command::Optimize { force } => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Optimizing {}", cli.source.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_optimize_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = optimize::optimize(&cli.source, force, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = report?;
            println!();
            output::print_optimize_summary(&report);
            if report.has_failures() {
                return Err("some images could not be optimized".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
