use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use atmos_core::{
    Config, DatePickerConfig, ErrorBanner, ErrorReporter, ForecastClient, ForecastRequest,
    ForecastSession, ForecastStyle, FormState, HttpForecastClient, RenderStyle, Variant,
    page::render_page,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use inquire::{Confirm, DateSelect, InquireError, Select, Text};
use tracing::info;

use crate::terminal::{TerminalReporter, format_card, format_message};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmos", version, about = "Atmos - AI powered weather forecaster")]
pub struct Cli {
    /// Forecast server origin, e.g. "https://atmos.example.com". Overrides the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with the forecaster interactively.
    Chat {
        /// Layout preset: "classic" or "chat".
        #[arg(long)]
        variant: Option<String>,

        /// Write the transcript as an HTML page on exit.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Request a single forecast and print it.
    Forecast {
        /// Date as YYYY-MM-DD; sent as-is.
        #[arg(long)]
        date: String,

        /// Report length in words.
        #[arg(long, default_value = "200")]
        length: String,

        /// Narrative style: balanced, detailed, casual or broadcast.
        #[arg(long, default_value = "balanced")]
        style: String,

        /// Layout preset: "classic" or "chat".
        #[arg(long)]
        variant: Option<String>,

        /// Show the detailed narrative right away.
        #[arg(long)]
        expand: bool,

        /// Write the transcript as an HTML page.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Check whether the forecast server is up.
    Status,

    /// Set the server address and layout preset.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(url) = &self.base_url {
            config.set_base_url(url);
        }

        match self.command {
            Command::Chat { variant, html } => {
                let style = style_for(&config, variant.as_deref())?;
                chat(&config, style, html).await
            }
            Command::Forecast { date, length, style, variant, expand, html } => {
                let render = style_for(&config, variant.as_deref())?;
                let narrative = ForecastStyle::try_from(style.as_str())?;
                forecast(&config, render, ForecastOptions { date, length, narrative, expand, html })
                    .await
            }
            Command::Status => status(&config).await,
            Command::Configure => configure(config),
        }
    }
}

fn style_for(config: &Config, variant: Option<&str>) -> anyhow::Result<RenderStyle> {
    let variant = match variant {
        Some(v) => Variant::try_from(v)?,
        None => config.variant,
    };
    Ok(config.render_style_for(variant))
}

/// `None` when the user backs out of a prompt.
fn answered<T>(result: Result<Option<T>, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn print_new(session: &ForecastSession, printed: &mut usize) {
    for message in &session.transcript().messages()[*printed..] {
        println!("{}\n", format_message(message));
    }
    *printed = session.transcript().len();
}

fn write_page(
    path: &Path,
    session: &ForecastSession,
    banner: &ErrorBanner,
    config: &Config,
) -> anyhow::Result<()> {
    let html = render_page(
        session.transcript(),
        &banner.snapshot(),
        &session.form,
        &DatePickerConfig::default(),
        &config.report_lengths,
    );
    fs::write(path, html)
        .with_context(|| format!("Failed to write transcript page: {}", path.display()))?;
    info!(path = %path.display(), "transcript page written");
    Ok(())
}

enum Step {
    Continue,
    Quit,
}

async fn chat(config: &Config, style: RenderStyle, html: Option<PathBuf>) -> anyhow::Result<()> {
    let reporter = TerminalReporter::default();
    let client = HttpForecastClient::new(config.endpoint());
    info!(endpoint = %client.endpoint().base_url(), variant = %style.variant, "starting chat");

    let mut session = ForecastSession::new(Box::new(client), Box::new(reporter.clone()), style);
    let mut printed = 0;

    if let Some(welcome) = session.transcript().placeholder() {
        println!("{welcome}\n");
    }
    print_new(&session, &mut printed);

    loop {
        match chat_step(&mut session, config, &mut printed).await {
            Ok(Step::Continue) => {}
            Ok(Step::Quit) => break,
            Err(err) => {
                let source: &(dyn std::error::Error + 'static) = err.as_ref();
                session.reporter().report_unhandled(source);
                break;
            }
        }
    }

    if let Some(path) = html {
        write_page(&path, &session, reporter.banner(), config)?;
        println!("Transcript written to {}", path.display());
    }

    Ok(())
}

async fn chat_step(
    session: &mut ForecastSession,
    config: &Config,
    printed: &mut usize,
) -> anyhow::Result<Step> {
    let picker = DatePickerConfig::default();
    let display = |d: NaiveDate| picker.display_value(d);

    let date = DateSelect::new("Forecast date:")
        .with_min_date(picker.min_date)
        .with_max_date(picker.max_date)
        .with_starting_date(picker.starting_date(Local::now().date_naive()))
        .with_formatter(&display)
        .prompt_skippable();
    let Some(date) = answered(date)? else {
        return Ok(Step::Quit);
    };

    let length = Select::new("Report length (words):", config.report_lengths.clone())
        .with_starting_cursor(config.default_report_length_index())
        .prompt_skippable();
    let Some(length) = answered(length)? else {
        return Ok(Step::Quit);
    };

    session.form =
        FormState { date: picker.storage_value(date), report_length: length.to_string() };

    let submitted = session.submit().await;
    print_new(session, printed);

    if let Ok(index) = submitted {
        loop {
            let Some(card) = session.card(index) else { break };
            let prompt = card.toggle_text().unwrap_or("Hide detailed analysis");
            let flip = answered(Confirm::new(prompt).with_default(false).prompt_skippable())?;
            if flip != Some(true) {
                break;
            }
            session.toggle_card(index);
            if let Some(card) = session.card(index) {
                println!("{}\n", format_card(card));
            }
        }
    }

    let again = answered(Confirm::new("Another forecast?").with_default(true).prompt_skippable())?;
    Ok(if again == Some(true) { Step::Continue } else { Step::Quit })
}

struct ForecastOptions {
    date: String,
    length: String,
    narrative: ForecastStyle,
    expand: bool,
    html: Option<PathBuf>,
}

async fn forecast(
    config: &Config,
    style: RenderStyle,
    opts: ForecastOptions,
) -> anyhow::Result<()> {
    let banner = ErrorBanner::default();
    let client = NarrativeStyleClient {
        inner: HttpForecastClient::new(config.endpoint()),
        style: opts.narrative,
    };

    let mut session = ForecastSession::new(Box::new(client), Box::new(banner.clone()), style);
    session.form = FormState { date: opts.date, report_length: opts.length };

    let result = session.submit().await;

    if let Ok(index) = &result {
        if opts.expand {
            session.toggle_card(*index);
        }
        let mut printed = 0;
        print_new(&session, &mut printed);
    }

    if let Some(path) = &opts.html {
        write_page(path, &session, &banner, config)?;
    }

    result.map(|_| ()).map_err(Into::into)
}

/// Sends a narrative style other than the form's fixed one.
#[derive(Debug)]
struct NarrativeStyleClient {
    inner: HttpForecastClient,
    style: ForecastStyle,
}

#[async_trait::async_trait]
impl ForecastClient for NarrativeStyleClient {
    async fn submit_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<atmos_core::ForecastResponse, atmos_core::ForecastError> {
        let request = request.clone().with_style(self.style);
        self.inner.submit_forecast(&request).await
    }

    async fn health(&self) -> Result<atmos_core::HealthStatus, atmos_core::ForecastError> {
        self.inner.health().await
    }
}

async fn status(config: &Config) -> anyhow::Result<()> {
    let client = HttpForecastClient::new(config.endpoint());
    let health = client.health().await?;

    println!("Server:   {}", client.endpoint().base_url());
    println!("Status:   {}", health.status);
    if let Some(db) = &health.database {
        println!("Database: {db}");
    }
    if let Some(ts) = &health.timestamp {
        println!("Checked:  {ts}");
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config.base_url.clone().unwrap_or_default();
    let url = Text::new("Forecast server URL (empty for http://localhost:8000):")
        .with_initial_value(&current)
        .prompt()?;
    config.set_base_url(&url);

    let start = Variant::all().iter().position(|v| *v == config.variant).unwrap_or(0);
    let variant = Select::new("Layout:", Variant::all().to_vec())
        .with_starting_cursor(start)
        .prompt()?;
    config.variant = variant;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
