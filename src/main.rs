// ABOUTME: Main entry point for the deckdown program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown into an HTML slide deck
    Convert(ConvertArgs),

    /// Watch a markdown file and regenerate the deck on changes
    Watch(WatchArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Path to the markdown file
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// URL to fetch the markdown from
    #[arg(short, long)]
    url: Option<String>,

    /// Path to the output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Apply the default theme to the deck
    #[arg(long)]
    theme: bool,

    /// Keep slides already present on the target instead of clearing
    #[arg(long)]
    keep_existing: bool,

    /// Restrict parsing to headings, bullets and plain text
    #[arg(long)]
    minimal: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// Path to the markdown file to watch
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Apply the default theme to the deck
    #[arg(long)]
    theme: bool,

    /// Restrict parsing to headings, bullets and plain text
    #[arg(long)]
    minimal: bool,

    /// Serve the generated deck over HTTP
    #[arg(long)]
    serve: bool,

    /// Port for the preview server
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Debounce time in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Watch(args)) => run_watch(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_convert(args: &ConvertArgs) -> deckdown::Result<()> {
    let config = deckdown::Config::from_env()?;

    let source = match (&args.input, &args.url) {
        (Some(path), None) => deckdown::MarkdownSource::new(&path.to_string_lossy()),
        (None, Some(url)) => deckdown::MarkdownSource::new(url),
        _ => {
            return Err(deckdown::DeckError::ValidationError(
                "Provide exactly one of --input or --url".to_string(),
            ));
        }
    };

    // A fetch failure is reported here; the conversion core never runs.
    let markdown = source.content(config.fetch_timeout())?;

    let options = config.get_convert_options(!args.keep_existing, args.theme, args.minimal);
    let mut deck = deckdown::HtmlDeck::with_theme_css(config.theme_css.clone());
    let summary = deckdown::convert_markdown(&markdown, &mut deck, &options)?;

    deckdown::utils::ensure_parent_directory_exists(&args.output)?;
    deckdown::write_html_to_file(&deck.to_html(), &args.output)?;

    println!("{}: {:?}", summary, args.output);
    Ok(())
}

fn run_watch(args: &WatchArgs) -> deckdown::Result<()> {
    let config = deckdown::Config::from_env()?;
    let watch_config = deckdown::WatchConfig {
        markdown_path: args.input.clone(),
        html_output: args.output.clone(),
        apply_theme: args.theme,
        minimal_grammar: args.minimal,
        debounce_ms: args.debounce,
        serve: args.serve,
        port: args.port,
    };
    deckdown::watch_markdown(watch_config, &config)
}
