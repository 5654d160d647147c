mod generate;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use secviz_core::Config;

#[derive(Parser)]
#[command(name = "secviz")]
#[command(about = "Build and browse CWE/CAPEC relationship graphs", long_about = None)]
struct Cli {
    /// Config file (defaults to ./secviz.toml, then ~/.config/secviz/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive graph documents from taxonomy collections
    Graph {
        /// CAPEC collection JSON
        #[arg(long)]
        capec_json: Option<PathBuf>,
        /// CWE collection JSON
        #[arg(long)]
        cwe_json: Option<PathBuf>,
        /// Output directory for graph documents
        #[arg(long)]
        graph_dir: Option<PathBuf>,
        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Serve the graph viewer
    Serve {
        /// Directory holding graph documents
        #[arg(long)]
        graph_dir: Option<PathBuf>,
        /// Port to listen on
        #[arg(long, short)]
        port: Option<u16>,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Graph {
            capec_json,
            cwe_json,
            graph_dir,
            compact,
        } => {
            let mut config = load_config(cli.config)?;
            if capec_json.is_some() {
                config.input.capec_json = capec_json;
            }
            if cwe_json.is_some() {
                config.input.cwe_json = cwe_json;
            }
            if let Some(dir) = graph_dir {
                config.output.graph_dir = dir;
            }
            if compact {
                config.output.pretty = false;
            }

            let reports = generate::run(&config)?;
            generate::print_summary(&reports, &config.output.graph_dir);
        }
        Commands::Serve {
            graph_dir,
            port,
            no_open,
        } => {
            let config = load_config(cli.config)?;
            let mut serve_config = serve::ServeConfig::from(&config);
            if let Some(dir) = graph_dir {
                serve_config.graph_dir = dir;
            }
            if let Some(port) = port {
                serve_config.port = port;
            }
            if no_open {
                serve_config.open_browser = false;
            }

            serve::start_server(serve_config)
                .await
                .map_err(|e| color_eyre::eyre::eyre!("Server error: {}", e))?;
        }
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> color_eyre::Result<Config> {
    match path {
        Some(path) => Config::from_file(&path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().wrap_err("Failed to load config"),
    }
}
