mod views;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tax_flow::{
    ClientConfig, FileKeyValueStorage, SendOutcome, SessionStore, SubmitOutcome, TaxAssistant,
    TaxInputs, ValidationPolicy, chat::SUGGESTED_PROMPTS, config::DEFAULT_SESSION_FILE,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "tax-flow",
    version,
    about = "Calculate your 2026 tax and ask the tax assistant about it"
)]
struct Cli {
    /// Base URL of the tax service
    #[arg(long, env = "TAX_API_URL", global = true)]
    api_url: Option<String>,

    /// File holding the persisted session id
    #[arg(long, env = "TAX_FLOW_SESSION_FILE", default_value = DEFAULT_SESSION_FILE, global = true)]
    session_file: PathBuf,

    /// Input validation: `strict` requires every field, `lenient` only gross income
    #[arg(long, env = "TAX_FLOW_VALIDATION", default_value = "strict", global = true)]
    validation: ValidationPolicy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit income figures and show the tax breakdown
    Calculate(CalculateArgs),
    /// Ask the tax assistant; starts an interactive session without MESSAGE
    Chat { message: Option<String> },
    /// Print the current session id
    Session,
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[arg(long, default_value_t = 0.0)]
    monthly_gross_income: f64,
    #[arg(long, default_value_t = 0.0)]
    additional_monthly_income: f64,
    #[arg(long, default_value_t = 0.0)]
    annual_pension_contribution: f64,
    #[arg(long = "annual-nhf-contributions", default_value_t = 0.0)]
    annual_nhf_contributions: f64,
    #[arg(long, default_value_t = 0.0)]
    annual_rent_paid: f64,
    #[arg(long, default_value_t = 0.0)]
    life_insurance_premiums: f64,
}

impl From<&CalculateArgs> for TaxInputs {
    fn from(args: &CalculateArgs) -> Self {
        TaxInputs {
            monthly_gross_income: args.monthly_gross_income,
            additional_monthly_income: args.additional_monthly_income,
            annual_pension_contribution: args.annual_pension_contribution,
            annual_nhf_contributions: args.annual_nhf_contributions,
            annual_rent_paid: args.annual_rent_paid,
            life_insurance_premiums: args.life_insurance_premiums,
        }
    }
}

/// Initialize tracing on stderr; `LOG_FORMAT=pretty` for humans, JSON otherwise.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tax_flow=info,tax_flow_cli=info".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

impl Cli {
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let api_url = self
            .api_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .context("TAX_API_URL is not set (use --api-url)")?;
        Ok(ClientConfig::new(api_url)
            .with_session_file(self.session_file.clone())
            .with_validation(self.validation))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Session => show_session(&cli.session_file).await,
        Command::Calculate(args) => calculate(&cli.client_config()?, args.into()).await,
        Command::Chat { message } => chat(&cli.client_config()?, message.as_deref()).await,
    }
}

async fn show_session(session_file: &Path) -> anyhow::Result<()> {
    let storage = Arc::new(FileKeyValueStorage::new(session_file));
    let session = SessionStore::load(storage).await;
    if session.is_active() {
        println!("{}", session.get());
    } else {
        println!("(none)");
    }
    Ok(())
}

async fn calculate(config: &ClientConfig, inputs: TaxInputs) -> anyhow::Result<()> {
    let assistant = TaxAssistant::connect(config).await?;

    match assistant.calculation().submit(inputs).await {
        SubmitOutcome::Calculated(result) => {
            info!("Rendering result view");
            print!("{}", views::render_result(&result));
            Ok(())
        }
        SubmitOutcome::Invalid(e) => {
            if let tax_flow::ValidationError::MissingRequiredFields { fields } = &e {
                eprintln!("Missing: {}", fields.join(", "));
            }
            bail!(
                assistant
                    .calculation()
                    .error()
                    .unwrap_or_else(|| e.to_string())
            )
        }
        SubmitOutcome::Failed => bail!(
            assistant
                .calculation()
                .error()
                .unwrap_or_else(|| "Calculation failed".to_string())
        ),
        SubmitOutcome::Ignored => bail!("A calculation is already in progress"),
    }
}

/// Exit status of a single `chat MESSAGE` invocation.
fn one_shot_status(outcome: &SendOutcome, placeholder: &str) -> anyhow::Result<()> {
    match outcome {
        SendOutcome::Replied(_) => Ok(()),
        SendOutcome::FellBack => bail!("The assistant could not be reached"),
        SendOutcome::Ignored => bail!("message is empty"),
        SendOutcome::Locked => bail!(placeholder.to_string()),
    }
}

async fn chat(config: &ClientConfig, message: Option<&str>) -> anyhow::Result<()> {
    let assistant = TaxAssistant::connect(config).await?;
    let chat = assistant.chat();

    if !chat.is_unlocked() {
        bail!(chat.placeholder());
    }

    if let Some(message) = message {
        let outcome = chat.send(message).await;
        if matches!(outcome, SendOutcome::Replied(_) | SendOutcome::FellBack) {
            print!("{}", views::render_messages(&chat.last_messages(1)));
        }
        return one_shot_status(&outcome, chat.placeholder());
    }

    print!("{}", views::render_messages(&chat.transcript()));
    print!("{}", views::render_suggestions(&SUGGESTED_PROMPTS));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("{}> ", chat.placeholder());
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim_end();

        let outcome = match line {
            "/quit" | "/exit" => break,
            command if command.starts_with('/') => {
                match command[1..].parse::<usize>() {
                    Ok(n) if n >= 1 => chat.send_suggested(n - 1).await,
                    _ => {
                        eprintln!("Unknown command: {}", command);
                        continue;
                    }
                }
            }
            text => chat.send(text).await,
        };

        match outcome {
            SendOutcome::Replied(_) | SendOutcome::FellBack => {
                print!("{}", views::render_messages(&chat.last_messages(1)));
            }
            SendOutcome::Ignored => {}
            SendOutcome::Locked => {
                error!("Chat locked mid-session");
                bail!(chat.placeholder());
            }
        }
    }

    Ok(())
}
