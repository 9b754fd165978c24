use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, info};
use miette::{IntoDiagnostic, Result};
use portfolio::{
    config::{DEFAULT_CONFIG_FILE, THEME_ENV_VAR},
    content::build_content,
    diagrams::{CommandRenderer, DiagramRun},
    Config,
};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

#[derive(Debug, Parser)]
#[command(name = "portfolio", version, about = "Build-time tooling for the portfolio site")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert case-study records into render-ready JSON
    Content {
        /// Directory holding the case-study YAML records
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory to write the JSON into
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render .mmd diagrams to SVG, skipping ones that already exist
    Diagrams {
        /// Regenerate and replace existing SVG files
        #[arg(short = 'f', long)]
        overwrite: bool,
        /// Mermaid theme, overrides MERMAID_THEME and the config file
        #[arg(long)]
        theme: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let level = if cli.verbose || config.site.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    debug!("Using config {:?}", config);

    match cli.command {
        Command::Content { input, output } => {
            let input = input.unwrap_or_else(|| config.content.input_dir.clone());
            let output = output.unwrap_or_else(|| config.content.output_dir.clone());

            let summary = build_content(&input, &output)?;
            println!("Done. wrote={} output={}", summary.written.len(), output.display());
        }
        Command::Diagrams { overwrite, theme } => {
            let env_theme = std::env::var(THEME_ENV_VAR).ok();
            let theme = config
                .diagrams
                .resolve_theme(theme.as_deref(), env_theme.as_deref())?;
            info!("Rendering diagrams with theme {}", theme);

            let run = DiagramRun {
                source_root: config.diagrams.source_root.clone(),
                output_root: config.diagrams.output_root.clone(),
                theme,
                overwrite,
                display_base: std::env::current_dir().into_diagnostic()?,
            };
            let renderer = CommandRenderer::from_config(&config.diagrams.renderer);

            let stdout = io::stdout();
            run.run(&renderer, &mut stdout.lock())?;
        }
    }

    Ok(())
}
