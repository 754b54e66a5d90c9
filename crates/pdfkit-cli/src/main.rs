//! PdfKit CLI - Command-line interface and MCP server for PDF conversion tools

mod mcp;

use clap::{Parser, Subcommand};
use pdfkit::{OperationArgs, Tool, TOOL_LLMTXT};
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// PdfKit - AI-friendly PDF conversion tools
#[derive(Parser, Debug)]
#[command(name = "pdfkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    /// Settings file to use instead of ~/.api/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-call deadline in seconds (no deadline by default)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Call one operation and print its result
    Call {
        /// Operation name, e.g. post_merge
        operation: String,

        /// Argument as key=value (repeatable)
        #[arg(long = "arg", short, value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },
    /// List available operations
    List,
    /// Show the active configuration (token masked)
    Config,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    let tool = build_tool(cli.config, cli.timeout);

    match cli.command {
        Some(Commands::Mcp) => {
            mcp::run_server(tool).await;
        }
        Some(Commands::Call { operation, args }) => {
            run_call(&tool, &operation, args).await;
        }
        Some(Commands::List) => {
            writeln_safe(&format_operation_list(&tool));
        }
        Some(Commands::Config) => {
            writeln_safe(&tool.config_resource());
        }
        None => {
            eprintln!("Usage: pdfkit call <OPERATION> --arg key=value");
            eprintln!("   or: pdfkit mcp");
            eprintln!("   or: pdfkit --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr so stdout stays reserved for results and JSON-RPC
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_tool(config: Option<PathBuf>, timeout: Option<u64>) -> Tool {
    let mut builder = Tool::builder();

    if let Some(path) = config {
        builder = builder.config_path(path);
    }
    if let Some(secs) = timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

async fn run_call(tool: &Tool, operation: &str, pairs: Vec<(String, String)>) {
    if tool.operation(operation).is_none() {
        eprintln!("Error: Unknown operation: {}", operation);
        eprintln!("Run `pdfkit list` to see available operations");
        std::process::exit(1);
    }

    let text = tool.invoke(operation, &to_operation_args(pairs)).await;
    writeln_safe(&text);
}

/// Parse a `key=value` argument
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid argument `{}`: expected key=value", s)),
    }
}

fn to_operation_args(pairs: Vec<(String, String)>) -> OperationArgs {
    pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

fn format_operation_list(tool: &Tool) -> String {
    let width = tool.operations().map(|op| op.name.len()).max().unwrap_or(0);
    tool.operations()
        .map(|op| {
            format!(
                "{:width$}  {} {} - {}",
                op.name,
                op.method,
                op.path,
                op.description,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
