//! Denodo AI SDK query tools over MCP (stdio).

mod server;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use denodo_query_tools::{AdapterConfig, QueryTools};
use rmcp::ServiceExt as _;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "denodo-query-mcp")]
#[command(about = "Natural-language queries against the Denodo AI SDK, exposed as MCP tools")]
#[command(version)]
struct Cli {
    /// JSON config file (baseUrl, timeoutSecs, username, password)
    #[arg(long, env = "DENODO_QUERY_CONFIG")]
    config: Option<PathBuf>,

    /// AI SDK base URL (overrides the config file)
    #[arg(long, env = "DENODO_AI_SDK_URL")]
    base_url: Option<String>,

    /// Default username when a tool call omits one
    #[arg(long, env = "DENODO_USERNAME")]
    username: Option<String>,

    /// Default password when a tool call omits one
    #[arg(long, env = "DENODO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "DENODO_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the tools over MCP stdio (default)
    Serve,
    /// Print the tool descriptors as JSON
    Tools,
    /// Run a single tool and print its text result
    Call {
        /// Tool name, e.g. `answer_question`
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

impl Cli {
    fn adapter_config(&self) -> anyhow::Result<AdapterConfig> {
        let mut cfg = match &self.config {
            Some(path) => AdapterConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => AdapterConfig::default(),
        };
        if let Some(v) = &self.base_url {
            cfg.base_url.clone_from(v);
        }
        if let Some(v) = &self.username {
            cfg.username.clone_from(v);
        }
        if let Some(v) = &self.password {
            cfg.password.clone_from(v);
        }
        if let Some(v) = self.timeout_secs {
            cfg.timeout_secs = v;
        }
        Ok(cfg)
    }
}

fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;

    // stdout carries the MCP protocol; logs always go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    let cfg = cli.adapter_config()?;
    let tools = QueryTools::new(&cfg).context("build query tools")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(base_url = %cfg.base_url, timeout_secs = cfg.timeout_secs, "serving MCP over stdio");
            let service = server::QueryServer::new(tools)
                .serve(rmcp::transport::stdio())
                .await
                .context("start MCP stdio server")?;
            service.waiting().await.context("MCP stdio server")?;
        }
        Command::Tools => {
            let listed = serde_json::to_string_pretty(&tools.list_tools())?;
            println!("{listed}");
        }
        Command::Call { tool, args } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let text = tools.call_tool_text(&tool, arguments).await?;
            println!("{text}");
        }
    }

    Ok(())
}
