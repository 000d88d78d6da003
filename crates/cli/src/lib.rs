use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;

mod command;

pub(crate) fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "confgraph")]
#[command(about = "Resolve configuration class import graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every root in a manifest and validate the resulting classes
    Resolve(ResolveArgs),

    /// Print the import graph of a manifest
    Graph(GraphArgs),

    /// Print the JSON schema of the manifest format
    Schema,
}

#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Manifest file (JSON or TOML)
    pub manifest: PathBuf,

    /// Emit the report as JSON (stdout is reserved for JSON)
    #[arg(long)]
    pub json: bool,

    /// Exit with an error when any error-level problem was reported
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub(crate) struct GraphArgs {
    /// Manifest file (JSON or TOML)
    pub manifest: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: GraphFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum GraphFormat {
    Text,
    Dot,
    Json,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Resolve(args) => args.json,
        Commands::Graph(args) => args.format == GraphFormat::Json,
        Commands::Schema => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Resolve(args) => command::run_resolve(&args)?,
        Commands::Graph(args) => command::run_graph(&args)?,
        Commands::Schema => print_stdout(&config_protocol::manifest_schema()?)?,
    }

    Ok(())
}
