use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::sync::watch;

use salesbot::{
    Config, Error, MessageSink, MixtapeInsight, RawRow, ReportPeriod, Result, RowSource, SalesBot,
    Scheduler,
};

#[derive(Parser)]
#[command(name = "salesbot", about = "Sales analytics and report delivery CLI")]
struct Cli {
    /// Path to a JSON file of order rows (array of objects, column → cell)
    #[arg(long, default_value = "orders.json")]
    orders: PathBuf,

    /// Request an AI insight section (needs ANTHROPIC_API_KEY)
    #[arg(long)]
    insights: bool,

    /// Insight model override (e.g. haiku)
    #[arg(long)]
    model: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a report to stdout
    Report {
        /// Period: today, week, YYYY-MM-DD, or YYYY-MM-DD..YYYY-MM-DD
        #[arg(default_value = "today")]
        period: String,
    },
    /// Generate a report and deliver it once
    Send {
        #[arg(default_value = "today")]
        period: String,
        /// Destination chat (default: REPORT_CHAT_ID)
        #[arg(long)]
        chat: Option<String>,
    },
    /// Run the daily report schedule until Ctrl-C
    Serve,
}

/// Row-source backed by a local JSON file. The production deployment wires
/// a spreadsheet adapter here instead; this one makes the CLI usable
/// offline and in tests.
struct JsonFileSource {
    path: PathBuf,
}

#[async_trait]
impl RowSource for JsonFileSource {
    async fn fetch_rows(&self, _sheet: &str) -> Result<Vec<RawRow>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::DataFetch(format!("{}: {e}", self.path.display())))?;
        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_slice(&bytes)
                .map_err(|e| Error::DataFetch(format!("{}: {e}", self.path.display())))?;

        Ok(rows
            .into_iter()
            .map(|obj| {
                obj.into_iter()
                    .map(|(k, v)| {
                        let cell = match v {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, cell)
                    })
                    .collect()
            })
            .collect())
    }
}

/// Message-sink that prints to stdout, labeled with the chat id.
struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        println!("── message to {chat_id} ──");
        println!("{text}");
        Ok(())
    }
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::from_env()?;
    let timezone = config.timezone;
    let fallback_chat = config.report_chat_id.clone();

    let mut bot = SalesBot::new(
        config,
        Arc::new(JsonFileSource { path: cli.orders }),
        Arc::new(ConsoleSink),
    );
    if cli.insights {
        bot = bot.with_insight(Arc::new(MixtapeInsight::from_env(cli.model.as_deref()).await?));
    }
    let bot = Arc::new(bot);

    match cli.command {
        Commands::Report { period } => {
            let period = ReportPeriod::parse(&period, timezone)?;
            println!("{}", bot.generate_report(&period).await?);
        }
        Commands::Send { period, chat } => {
            let period = ReportPeriod::parse(&period, timezone)?;
            let chat = chat.or(fallback_chat).ok_or_else(|| {
                anyhow::anyhow!("no destination: pass --chat or set REPORT_CHAT_ID")
            })?;
            bot.deliver_report(&chat, &period).await?;
        }
        Commands::Serve => {
            let scheduler = Scheduler::with_daily_reports(bot.config())?;
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let run = tokio::spawn(scheduler.run(Arc::clone(&bot), shutdown_rx));

            tokio::signal::ctrl_c().await?;
            log::info!("Ctrl-C received, stopping scheduler");
            let _ = shutdown_tx.send(true);
            run.await?;
        }
    }

    Ok(())
}
