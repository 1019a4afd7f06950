//! A terminal front end for `cogni`: an interactive chat, and a runner for
//! scenario files.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use cogni::SessionBuilder;
use cogni::simulation::{SimulationResult, load_scenarios};
use cogni_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};

const BAR_CHAR: &str = "▎";

#[derive(Debug, Parser)]
#[command(version, about = "A tool-using conversational agent")]
struct Cli {
    /// API key of the OpenAI-compatible endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Model identifier.
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Maximum time spent retrying rate-limited requests, in seconds.
    #[arg(long, env = "COGNI_RETRY_TIMEOUT", default_value_t = 30)]
    retry_timeout: u64,

    /// Replaces the built-in system prompt.
    #[arg(long)]
    system_prompt: Option<String>,

    /// Runs the tool calls of one decision concurrently.
    #[arg(long)]
    parallel_tools: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chats with the agent in the terminal (default).
    Chat,
    /// Runs the scenarios in a JSON file and reports the results.
    Simulate {
        /// Path of the scenario file.
        file: PathBuf,
        /// Prints the results as JSON instead of a report.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = OpenAIConfigBuilder::with_api_key(&cli.api_key)
        .with_retry_timeout(Duration::from_secs(cli.retry_timeout));
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    let config = config.build();
    debug!("using config: {config:?}");

    let system_prompt = cli
        .system_prompt
        .unwrap_or_else(|| include_str!("./system_prompt.md").to_owned());
    let provider = OpenAIProvider::new(config);
    let session = SessionBuilder::with_model_provider(provider)
        .with_system_prompt(system_prompt)
        .with_parallel_tool_calls(cli.parallel_tools)
        .build();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(session).await,
        Command::Simulate { file, json } => simulate(session, file, json).await,
    }
}

async fn chat(mut session: cogni::Session) -> anyhow::Result<()> {
    println!("This agent is equipped with a calculator tool.");
    println!("Type 'exit' to end the session, or '/reset' to start over.\n");

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")?
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            println!("{}🤖 Goodbye!", BAR_CHAR.bright_cyan());
            break;
        }
        if line == "/reset" {
            session.reset();
            println!("{}", "History cleared.".dimmed());
            continue;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let reply = session.send_message(line).await;
        progress_bar.finish_and_clear();

        let bar = BAR_CHAR.bright_cyan();
        match reply {
            Ok(Some(reply)) => println!("{bar}🤖 {}", reply.bright_white()),
            Ok(None) => println!("{bar}🤖 {}", "(no reply)".dimmed()),
            Err(err) => {
                let bar = BAR_CHAR.bright_red();
                println!("{bar}⚠️  {}", err.bright_red());
            }
        }
        println!();
    }

    Ok(())
}

async fn simulate(
    mut session: cogni::Session,
    file: PathBuf,
    json: bool,
) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let scenarios = load_scenarios(&contents)
        .with_context(|| format!("invalid scenario file {}", file.display()))?;
    info!("loaded {} scenario(s)", scenarios.len());

    let results = session.simulate(&scenarios).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_report(&results);
    }

    let failed = results.iter().filter(|result| !result.passed()).count();
    if failed > 0 {
        bail!("{failed} of {} scenario(s) failed", results.len());
    }
    Ok(())
}

fn print_report(results: &[SimulationResult]) {
    for result in results {
        let name = result.scenario_name();
        if result.passed() {
            println!("{} {name}", "PASS".bright_green().bold());
        } else {
            println!("{} {name}", "FAIL".bright_red().bold());
        }
        for outcome in result.assertion_results() {
            let bar = if outcome.passed {
                BAR_CHAR.bright_green().to_string()
            } else {
                BAR_CHAR.bright_red().to_string()
            };
            println!("{bar} {}", outcome.assertion);
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
