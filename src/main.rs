// src/main.rs
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use xhs_harvest::analytics::measure_comments;
use xhs_harvest::output::{deliver, Delivery, Destination, Export};
use xhs_harvest::{
    AppError, CommandLineInput, HarvestConfig, HarvestTask, Spider, XhsFetcher, XhsHttpClient,
    XhsRepository,
};

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("xhs_harvest.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Logs go to stderr so that stdout stays clean for --pipe
    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// What a task produced, ready for export.
struct TaskOutcome {
    ok: bool,
    message: String,
    document: Value,
    summary: String,
}

/// Orchestrates one harvest task: fetch → export → report.
struct XhsHarvest<'a> {
    config: &'a HarvestConfig,
    spider: Spider,
}

impl<'a> XhsHarvest<'a> {
    fn new(config: &'a HarvestConfig) -> Result<Self, AppError> {
        let client = XhsHttpClient::new(config.credentials.clone(), &config.client)?;
        let repository: Arc<dyn XhsRepository> = Arc::new(client);
        let fetcher = XhsFetcher::new(repository).with_cursorless_policy(config.cursorless);
        Ok(Self {
            config,
            spider: Spider::new(fetcher),
        })
    }

    async fn run(&self) -> Result<TaskOutcome, AppError> {
        let fetcher = self.spider.fetcher();
        let outcome = match &self.config.task {
            HarvestTask::UserNotes { user, limit } => {
                let harvest = self.spider.user_notes(user, *limit).await;
                TaskOutcome {
                    ok: harvest.ok,
                    message: harvest.message.clone(),
                    summary: format!(
                        "📄 Fetched {} of {} selected note(s) from user {} ({} failed).",
                        harvest.notes.len(),
                        harvest.note_urls.len(),
                        user.id,
                        harvest.failed.len()
                    ),
                    document: serde_json::to_value(&harvest)?,
                }
            }
            HarvestTask::Notes(notes) => {
                let batch = self.spider.notes(notes).await;
                TaskOutcome {
                    ok: batch.failed.is_empty(),
                    message: batch
                        .failed
                        .iter()
                        .map(|f| format!("{}: {}", f.url, f.reason))
                        .collect::<Vec<_>>()
                        .join("; "),
                    summary: format!(
                        "📄 Fetched {} of {} note(s).",
                        batch.notes.len(),
                        notes.len()
                    ),
                    document: serde_json::json!({
                        "notes": batch.notes,
                        "failed": batch.failed,
                    }),
                }
            }
            HarvestTask::Search { query, count } => {
                let harvest = self.spider.search_notes(query, *count).await;
                TaskOutcome {
                    ok: harvest.ok,
                    message: harvest.message.clone(),
                    summary: format!(
                        "📄 Fetched {} note(s) for '{}' ({} failed).",
                        harvest.notes.len(),
                        query.keyword,
                        harvest.failed.len()
                    ),
                    document: serde_json::to_value(&harvest)?,
                }
            }
            HarvestTask::Comments(note) => {
                let comments = self.spider.comments(note).await;
                let stats = measure_comments(comments.items());
                TaskOutcome {
                    ok: comments.is_ok(),
                    message: comments.message().to_string(),
                    summary: format!(
                        "💬 Fetched {} comment(s): {} top-level, {} repl(ies) across {} thread(s).",
                        stats.total(),
                        stats.top_level,
                        stats.replies,
                        stats.threads_with_replies
                    ),
                    document: serde_json::to_value(&comments)?,
                }
            }
            HarvestTask::Profile(user) => {
                let result = fetcher.fetch_user_info(user).await;
                TaskOutcome {
                    ok: result.is_ok(),
                    message: result.message().to_string(),
                    summary: format!("👤 Fetched profile of user {}.", user),
                    document: serde_json::to_value(&result)?,
                }
            }
            HarvestTask::Suggest(word) => {
                let result = fetcher.fetch_search_suggestions(word).await;
                TaskOutcome {
                    ok: result.is_ok(),
                    message: result.message().to_string(),
                    summary: format!("🔎 Fetched suggestions for '{}'.", word),
                    document: serde_json::to_value(&result)?,
                }
            }
        };
        Ok(outcome)
    }

    /// Writes the exported JSON to the output file, or to stdout.
    fn deliver_export(&self, document: &Value) -> Result<Delivery, AppError> {
        let destination =
            Destination::choose(self.config.output_file.as_deref(), self.config.pipe);
        deliver(Export::json(document, destination)?)
    }

    /// Reports completion to the user with stats and the export destination.
    fn report_completion(&self, outcome: &TaskOutcome, delivery: &Delivery) {
        if self.config.pipe {
            return;
        }

        if outcome.ok {
            eprintln!("{}", outcome.summary);
        } else {
            eprintln!("⚠️  {} Stopped early: {}", outcome.summary, outcome.message);
        }

        if let Destination::File(path) = &delivery.destination {
            eprintln!("✓ Result saved to {} ({} bytes)", path.display(), delivery.bytes_written);
        }
    }
}

/// Executes the configured harvest task end to end.
async fn execute_harvest(config: &HarvestConfig) -> Result<(), AppError> {
    let harvest = XhsHarvest::new(config)?;

    let outcome = harvest.run().await?;
    let delivery = harvest.deliver_export(&outcome.document)?;
    harvest.report_completion(&outcome, &delivery);

    if !outcome.ok {
        return Err(AppError::Incomplete(outcome.message));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = HarvestConfig::resolve(cli)?;
    log::debug!("Using {}", config.credentials);

    execute_harvest(&config).await?;

    Ok(())
}
