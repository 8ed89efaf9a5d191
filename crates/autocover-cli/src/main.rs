use clap::Parser;
use std::path::PathBuf;

use autocover_core::config::ExecutorFileConfig;
use autocover_core::executor::{ExecutorConfig, TestExecutor};
use autocover_core::request::ExecutionRequest;

#[derive(Parser)]
#[command(name = "autocover", about = "AutoCover — sandboxed test execution")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show version information
    Version,
    /// Execute a request file (JSON ExecutionRequest) in a fresh sandbox
    Run {
        /// Path to the request file
        request: PathBuf,
        /// Executor configuration file (JSON, TOML, or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// List supported languages and whether their toolchain is installed
    Languages {
        /// Executor configuration file (JSON, TOML, or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn build_executor(config: Option<&PathBuf>) -> Result<TestExecutor, String> {
    let config = match config {
        Some(path) => ExecutorFileConfig::from_file(&path.to_string_lossy())
            .map_err(|e| e.to_string())?
            .resolve(),
        None => ExecutorConfig::default(),
    };
    Ok(TestExecutor::new(config))
}

fn print_summary(report: &autocover_core::report::ExecutionReport) {
    let status = if report.success { "PASSED" } else { "FAILED" };
    println!("{} [{}]", status, report.language);
    println!(
        "  tests: {} run, {} passed, {} failed",
        report.tests_run, report.tests_passed, report.tests_failed
    );
    if !report.dependencies_installed {
        println!("  dependencies: installation failed (tests ran anyway)");
    }
    if let Some(ref error) = report.error {
        println!("  error: {error}");
    }
    for failure in &report.failures {
        println!(
            "  ✗ {}: {}",
            failure.test_name,
            failure.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("autocover {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Languages { config } => {
            let executor = match build_executor(config.as_ref()) {
                Ok(executor) => executor,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };
            let available = executor.available_languages().await;
            println!("Supported languages:");
            for language in executor.supported_languages() {
                let status = if available.iter().any(|a| a == language) {
                    "available"
                } else {
                    "toolchain missing"
                };
                println!("  {language:<12} {status}");
            }
        }
        Commands::Run {
            request,
            config,
            json,
        } => {
            let executor = match build_executor(config.as_ref()) {
                Ok(executor) => executor,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };

            let body = match std::fs::read_to_string(&request) {
                Ok(body) => body,
                Err(e) => {
                    eprintln!("Error: failed to read {}: {e}", request.display());
                    std::process::exit(1);
                }
            };
            let request: ExecutionRequest = match serde_json::from_str(&body) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("Error: invalid request file: {e}");
                    std::process::exit(1);
                }
            };

            let report = executor.execute(&request).await;

            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("Error: failed to serialize report: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print_summary(&report);
            }

            std::process::exit(if report.success { 0 } else { 1 });
        }
    }
}
