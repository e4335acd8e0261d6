use anyhow::anyhow;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use nlcheck_rs::host::console::Terminal;
use nlcheck_rs::nlcheck::check::{CheckEngine, CheckKind};
use nlcheck_rs::nlcheck::config::{CheckConfig, ConfigLoader};
use nlcheck_rs::nlcheck::operators::catalogue;
use nlcheck_rs::nlcheck::runtime::Runtime;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Variables file (YAML mapping)
    #[arg(long, global = true)]
    variables: Option<PathBuf>,

    /// Set a variable, e.g. --var floor=3
    #[arg(long = "var", value_name = "NAME=VALUE", global = true)]
    vars: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single check, one argument per token
    Check {
        /// Kind of check
        #[arg(short, long, value_enum, default_value_t = KindArg::That)]
        kind: KindArg,

        /// Check tokens, e.g. '${floor}' equals 3 within '5 seconds'
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Ask a question to be answered by hand
    Manual {
        /// The question; without one, execution just pauses
        question: Option<String>,
    },
    /// Type keywords and see their results
    Interactive,
    /// List the available operators
    Operators,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    That,
    Precondition,
    Postcondition,
}

impl From<KindArg> for CheckKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::That => CheckKind::Requirement,
            KindArg::Precondition => CheckKind::Precondition,
            KindArg::Postcondition => CheckKind::Postcondition,
        }
    }
}

/// `--var` values are JSON when they parse as JSON, text otherwise
fn parse_var_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = ConfigLoader::new();

    let mut config = match &args.config {
        Some(path) => loader
            .load_config(path)
            .map_err(|e| anyhow!("Failed to load config {}: {}", path.display(), e))?,
        None => CheckConfig::default(),
    };
    config.apply_env_overrides();

    let runtime = Runtime::with_standard_library(&config, Arc::new(Terminal::new())).await;

    if let Some(path) = &args.variables {
        let variables = loader
            .load_variables(path)
            .map_err(|e| anyhow!("Failed to load variables {}: {}", path.display(), e))?;
        log::info!("Loaded {} variables from {}", variables.len(), path.display());
        for (name, value) in variables {
            runtime.set_variable(&name, value);
        }
    }
    for assignment in &args.vars {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --var '{}', expected NAME=VALUE", assignment))?;
        runtime.set_variable(name.trim(), parse_var_value(value));
    }

    let engine = CheckEngine::new(config);

    match args.command {
        Commands::Check { kind, tokens } => {
            let tokens = tokens.into_iter().map(Value::String).collect();
            match engine.check(&runtime, kind.into(), tokens).await {
                Ok(report) => println!("PASS  {}", report),
                Err(e) => {
                    println!("FAIL  {}", e);
                    // 1: the test may continue, 2: the test must stop
                    std::process::exit(if e.continue_on_failure() { 1 } else { 2 });
                }
            }
        }
        Commands::Manual { question } => {
            match engine
                .check_manual(&runtime, question.as_deref().unwrap_or_default())
                .await
            {
                Ok(report) => println!("PASS  {}", report),
                Err(e) => {
                    println!("FAIL  {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Interactive => {
            let calls = engine.check_interactive(&runtime).await;
            log::info!("Interactive session ran {} keyword(s)", calls);
        }
        Commands::Operators => {
            for (name, description) in catalogue(runtime.registry()).await {
                println!("{:<34} {}", name, description);
            }
        }
    }

    Ok(())
}
