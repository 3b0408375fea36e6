use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use folder_metadata::app::{self, AppState, UserEvent};
use folder_metadata::config::{settings, AppConfig};
use folder_metadata::core::{DirectoryScanner, ExportFormat, HttpMetadataClient, TreeBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folder-metadata", version, about)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the folder tree that would be sent for analysis
    Tree(TreeArgs),
    /// Scan a folder, request metadata for it and export the result
    Analyze(AnalyzeArgs),
    /// Re-export a previously saved metadata JSON file
    Export(ExportArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// Folder to scan
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Print the tree as JSON instead of ASCII art
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Export formats (repeatable or comma-separated): json, pdf, xlsx
    #[arg(short, long = "format", value_name = "FORMAT", value_delimiter = ',')]
    formats: Vec<ExportFormat>,

    /// Directory to write exports into
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Open each export with the system default application
    #[arg(long)]
    open: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Folder to analyze
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Base URL of the metadata service
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Free-text hint passed to the metadata service
    #[arg(long, value_name = "TEXT")]
    hint: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ExportArgs {
    /// Metadata JSON file written by an earlier export
    #[arg(value_name = "METADATA")]
    metadata: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ConfigArgs {
    /// Print only the location of the config file
    #[arg(long)]
    path: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Usage errors exit with status 2 inside `parse`.
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Tree(args) => print_tree(&args, load_config(config_path.as_deref())?),
        Command::Analyze(args) => analyze(args, config_path).await,
        Command::Export(args) => reexport(args, config_path).await,
        Command::Config(args) => show_config(&args, config_path.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = settings::load_config(path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn print_tree(args: &TreeArgs, config: AppConfig) -> Result<()> {
    let scan = DirectoryScanner::new(config.ignore_patterns).scan(&args.dir)?;
    let tree = TreeBuilder::build_tree(&scan.files);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", TreeBuilder::render_ascii(&tree));
        eprintln!(
            "{} files, {} bytes ({} ignored)",
            tree.file_count(),
            tree.total_size(),
            scan.ignored
        );
    }
    Ok(())
}

fn show_config(args: &ConfigArgs, path: Option<&Path>) -> Result<()> {
    if args.path {
        let path = settings::get_config_file_path(path)
            .context("Could not determine config directory")?;
        println!("{}", path.display());
    } else {
        let config = load_config(path)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    Ok(())
}

async fn analyze(args: AnalyzeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }

    let api = HttpMetadataClient::new(&config.api_base_url, config.request_timeout())?
        .with_hint(args.hint);
    tracing::info!("Using metadata service at {}", api.endpoint());

    let plan = ExportPlan::new(args.output, &config);
    let mut session = Session::new(config, config_path);

    app::select_folder(args.dir, session.proxy.clone(), session.state.clone()).await;
    if let UserEvent::FolderSelected {
        folder_name,
        file_count,
    } = session.next_outcome().await?
    {
        eprintln!("Selected: {folder_name} ({file_count} files)");
    }

    app::start_analysis(Arc::new(api), session.proxy.clone(), session.state.clone());
    loop {
        match session.next_outcome().await? {
            UserEvent::AnalysisStarted => eprintln!("Analyzing folder structure... Please wait."),
            UserEvent::AnalysisCompleted(view) => {
                print!("{view}");
                break;
            }
            other => tracing::debug!("Ignoring event {:?}", other),
        }
    }

    session.export_all(&plan).await
}

async fn reexport(args: ExportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let plan = ExportPlan::new(args.output, &config);
    let mut session = Session::new(config, config_path);

    app::load_metadata(&args.metadata, session.proxy.clone(), session.state.clone());
    session.next_outcome().await?;

    session.export_all(&plan).await
}

/// Which formats to write, where, and whether to open them afterwards.
struct ExportPlan {
    formats: Vec<ExportFormat>,
    output_dir: PathBuf,
    open: bool,
}

impl ExportPlan {
    fn new(args: OutputArgs, config: &AppConfig) -> Self {
        let mut formats = if args.formats.is_empty() {
            config.default_formats.clone()
        } else {
            args.formats
        };
        let mut seen = HashSet::new();
        formats.retain(|format| seen.insert(*format));
        Self {
            formats,
            output_dir: args
                .out
                .unwrap_or_else(|| config.resolved_output_directory()),
            open: args.open || config.open_after_export,
        }
    }
}

/// The controller state plus the receiving end of its event channel.
struct Session {
    state: Arc<Mutex<AppState>>,
    proxy: UnboundedSender<UserEvent>,
    events: UnboundedReceiver<UserEvent>,
}

impl Session {
    fn new(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let (proxy, events) = mpsc::unbounded_channel();
        let mut state = AppState::new(config);
        state.config_path = config_path;
        Self {
            state: Arc::new(Mutex::new(state)),
            proxy,
            events,
        }
    }

    /// Waits for the next event that is not a plain state update.
    /// `ShowError` is turned into an error.
    async fn next_outcome(&mut self) -> Result<UserEvent> {
        loop {
            match self.events.recv().await {
                Some(UserEvent::StateUpdate(ui)) => {
                    tracing::debug!("Status: {}", ui.status_message);
                }
                Some(UserEvent::ShowError(message)) => bail!(message),
                Some(event) => return Ok(event),
                None => bail!("Event channel closed unexpectedly"),
            }
        }
    }

    async fn export_all(&mut self, plan: &ExportPlan) -> Result<()> {
        for &format in &plan.formats {
            app::export_metadata(
                format,
                &plan.output_dir,
                self.proxy.clone(),
                self.state.clone(),
            );
            if let UserEvent::ExportCompleted { format, path } = self.next_outcome().await? {
                println!("Exported {format}: {}", path.display());
                if plan.open {
                    if let Err(e) = open::that(&path) {
                        tracing::warn!("Could not open {}: {}", path.display(), e);
                    }
                }
            }
        }
        Ok(())
    }
}
