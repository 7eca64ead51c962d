use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use notemark::{ConvertContext, LinkStyle, ObsidianLinkGenerator};

mod bundle;
mod config;

use bundle::Bundle;
use config::Overrides;

#[derive(Parser)]
#[command(version, about = "Convert exported notes to Markdown", long_about = None)]
struct Cli {
    /// Note bundle (JSON) to convert
    bundle: PathBuf,

    /// Write the Markdown here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop the first line of the note (it repeats the title)
    #[arg(long)]
    omit_first_line: bool,

    /// Include handwriting transcripts of drawings
    #[arg(long)]
    include_handwriting: bool,

    /// Folder links to other notes are relative to
    #[arg(long)]
    root_folder: Option<String>,

    /// wiki or markdown
    #[arg(long)]
    link_style: Option<LinkStyle>,

    /// Log conversion details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::load_default()?,
    };
    let (options, link_style) = file_config.merge(Overrides {
        omit_first_line: cli.omit_first_line,
        include_handwriting: cli.include_handwriting,
        root_folder: cli.root_folder,
        link_style: cli.link_style,
    });

    let bundle = Bundle::load(&cli.bundle).await?;
    let links = ObsidianLinkGenerator::new(link_style);
    let ctx = ConvertContext::new(&bundle, &bundle, &bundle, &links, options);

    let markdown = notemark::convert_note(&ctx, &bundle.note).await?;

    match cli.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    tokio::fs::create_dir_all(parent).await.into_diagnostic()?;
                }
            }
            tokio::fs::write(&path, format!("{markdown}\n"))
                .await
                .into_diagnostic()?;
            tracing::debug!("wrote {}", path.display());
        }
        None => println!("{markdown}"),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
