use clap::Parser;
use ormgraph::{GraphOptions, MetadataDocument, MetadataGrapher};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Render ORM entity metadata as yUML class diagram notation
#[derive(Parser, Debug)]
#[command(name = "ormgraph")]
#[command(version)]
#[command(about = "Turn ORM entity metadata (JSON, YAML or TOML) into yUML notation", long_about = None)]
struct Args {
    /// Metadata document (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Grapher options file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Token separator, overrides the options file
    #[arg(long)]
    separator: Option<String>,

    /// Do not emit `[Parent]^[Child]` edges
    #[arg(long)]
    no_inheritance: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut options = if let Some(ref config_path) = args.config {
        if config_path.exists() && config_path.is_file() {
            GraphOptions::from_path(config_path)
                .map_err(|e| format!("Failed to load options: {}", e))?
        } else {
            return Err(format!("Options file not found: {}", config_path.display()));
        }
    } else {
        GraphOptions::default()
    };
    if let Some(separator) = args.separator {
        options.separator = separator;
    }
    if args.no_inheritance {
        options.inheritance = false;
    }

    let document = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        MetadataDocument::from_str_any(&buffer)
    } else {
        MetadataDocument::from_path(&args.input)
    }
    .map_err(|e| format!("Failed to read metadata: {}", e))?;

    tracing::info!(entities = document.entities.len(), "loaded metadata");

    let mut grapher = MetadataGrapher::from_document(document, options)
        .map_err(|e| format!("Invalid metadata: {}", e))?;
    let diagram = grapher
        .render()
        .map_err(|e| format!("Failed to generate diagram: {}", e))?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &diagram)
                .map_err(|e| format!("Failed to write diagram: {}", e))?;
            eprintln!("Diagram saved to: {}", path.display());
        }
        None => println!("{}", diagram),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
