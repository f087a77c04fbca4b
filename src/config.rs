// src/config.rs
use crate::api::pacing::DelayRange;
use crate::api::{ClientSettings, CursorlessPage};
use crate::constants::{API_BASE_URL, DETAIL_DELAY_MAX_SECS, DETAIL_DELAY_MIN_SECS};
use crate::error::AppError;
use crate::types::{Credentials, NoteRef, SearchQuery, UserId, UserRef};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the browser cookie string.
pub const COOKIES_ENV: &str = "XHS_COOKIES";

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: HarvestCommand,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Proxy URL for every request (e.g., "http://127.0.0.1:7890")
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Shortest pause before a note-detail request, in seconds
    #[arg(long, global = true, default_value_t = DETAIL_DELAY_MIN_SECS as f64)]
    pub min_delay: f64,

    /// Longest pause before a note-detail request, in seconds
    #[arg(long, global = true, default_value_t = DETAIL_DELAY_MAX_SECS as f64)]
    pub max_delay: f64,

    /// Output file for the JSON result (optional)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Pipe mode - write the JSON result to stdout only
    #[arg(short = 'p', long, global = true, default_value_t = false)]
    pub pipe: bool,

    /// Drop the items of a page that arrives without a continuation cursor
    #[arg(long, global = true, default_value_t = false)]
    pub discard_cursorless_pages: bool,

    /// API host to send requests to
    #[arg(long, global = true, default_value = API_BASE_URL)]
    pub base_url: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum HarvestCommand {
    /// List every note of a user and fetch the details of the first ones
    User {
        /// Profile URL or bare user id
        user_url: String,
        /// Number of notes to fetch details for
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch the details of the given notes
    Notes {
        /// Note URLs carrying an xsec_token
        #[arg(required = true)]
        note_urls: Vec<String>,
    },
    /// Search notes and fetch the details of the hits
    Search {
        query: String,
        /// Number of search hits to collect
        #[arg(long, default_value_t = 20)]
        count: usize,
        /// general, time_descending or popularity_descending
        #[arg(long, default_value = "general")]
        sort: String,
        /// all, video or image
        #[arg(long, default_value = "all")]
        note_type: String,
    },
    /// Fetch the full comment tree of a note
    Comments { note_url: String },
    /// Fetch a user's profile
    Profile { user: String },
    /// Fetch keyword suggestions for a search word
    Suggest { word: String },
}

/// A validated unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum HarvestTask {
    UserNotes { user: UserRef, limit: usize },
    Notes(Vec<NoteRef>),
    Search { query: SearchQuery, count: usize },
    Comments(NoteRef),
    Profile(UserId),
    Suggest(String),
}

/// Resolved configuration, validated and ready to drive a harvest.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub task: HarvestTask,
    pub credentials: Credentials,
    pub client: ClientSettings,
    pub cursorless: CursorlessPage,
    pub output_file: Option<PathBuf>,
    pub pipe: bool,
    pub verbose: bool,
}

impl HarvestConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let cookies = std::env::var(COOKIES_ENV).map_err(|_| {
            AppError::MissingConfiguration(format!("{} environment variable not set", COOKIES_ENV))
        })?;
        Self::from_parts(cli, &cookies)
    }

    /// Resolves a configuration from CLI input and an explicit cookie string.
    pub fn from_parts(cli: CommandLineInput, cookies: &str) -> Result<Self, AppError> {
        let credentials = Credentials::parse(cookies)?;
        let task = resolve_task(cli.command)?;
        let detail_delay = DelayRange::from_secs_f64(cli.min_delay, cli.max_delay)?;

        let base_url = cli.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::MissingConfiguration("base URL is empty".to_string()));
        }

        let proxy = cli
            .proxy
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let cursorless = if cli.discard_cursorless_pages {
            CursorlessPage::Discard
        } else {
            CursorlessPage::Merge
        };

        Ok(HarvestConfig {
            task,
            credentials,
            client: ClientSettings {
                base_url,
                proxy,
                detail_delay,
                ..ClientSettings::default()
            },
            cursorless,
            output_file: cli.output.map(PathBuf::from),
            pipe: cli.pipe,
            verbose: cli.verbose,
        })
    }
}

fn resolve_task(command: HarvestCommand) -> Result<HarvestTask, AppError> {
    let task = match command {
        HarvestCommand::User { user_url, limit } => HarvestTask::UserNotes {
            user: UserRef::parse(&user_url)?,
            limit,
        },
        HarvestCommand::Notes { note_urls } => HarvestTask::Notes(
            note_urls
                .iter()
                .map(|url| NoteRef::parse(url))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        HarvestCommand::Search {
            query,
            count,
            sort,
            note_type,
        } => HarvestTask::Search {
            query: SearchQuery::new(query)?
                .with_sort(sort.parse()?)
                .with_note_type(note_type.parse()?),
            count,
        },
        HarvestCommand::Comments { note_url } => HarvestTask::Comments(NoteRef::parse(&note_url)?),
        HarvestCommand::Profile { user } => HarvestTask::Profile(UserRef::parse(&user)?.id),
        HarvestCommand::Suggest { word } => {
            let word = word.trim();
            if word.is_empty() {
                return Err(crate::types::ValidationError::EmptyField("word").into());
            }
            HarvestTask::Suggest(word.to_string())
        }
    };
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NoteType, SearchSort};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const COOKIES: &str = "a1=abc; web_session=xyz";

    fn resolve(args: &[&str]) -> Result<HarvestConfig, AppError> {
        let cli = CommandLineInput::try_parse_from(args).unwrap();
        HarvestConfig::from_parts(cli, COOKIES)
    }

    #[test]
    fn test_user_command_defaults() {
        let config = resolve(&["xhs-harvest", "user", "https://www.xiaohongshu.com/user/profile/5f00ab"])
            .unwrap();

        match config.task {
            HarvestTask::UserNotes { user, limit } => {
                assert_eq!(user.id.as_str(), "5f00ab");
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected task: {:?}", other),
        }
        assert_eq!(config.cursorless, CursorlessPage::Merge);
        assert_eq!(config.client.base_url, API_BASE_URL);
        assert_eq!(config.client.detail_delay.min(), Duration::from_secs(5));
        assert_eq!(config.client.detail_delay.max(), Duration::from_secs(10));
        assert!(config.output_file.is_none());
        assert!(!config.pipe);
    }

    #[test]
    fn test_search_command_options() {
        let config = resolve(&[
            "xhs-harvest",
            "search",
            "coffee",
            "--count",
            "45",
            "--sort",
            "popularity_descending",
            "--note-type",
            "video",
            "--discard-cursorless-pages",
        ])
        .unwrap();

        let HarvestTask::Search { query, count } = config.task else {
            panic!("expected search task");
        };
        assert_eq!(query.keyword, "coffee");
        assert_eq!(query.sort, SearchSort::PopularityDescending);
        assert_eq!(query.note_type, NoteType::Video);
        assert_eq!(count, 45);
        assert_eq!(config.cursorless, CursorlessPage::Discard);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = resolve(&[
            "xhs-harvest",
            "profile",
            "5f00ab",
            "--proxy",
            "http://127.0.0.1:7890",
            "--min-delay",
            "0",
            "--max-delay",
            "0.5",
            "-o",
            "out/profile.json",
            "--base-url",
            "http://localhost:8080/",
        ])
        .unwrap();

        assert_eq!(config.task, HarvestTask::Profile(UserId::parse("5f00ab").unwrap()));
        assert_eq!(config.client.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(config.client.detail_delay.max(), Duration::from_millis(500));
        assert_eq!(config.client.base_url, "http://localhost:8080");
        assert_eq!(config.output_file, Some(PathBuf::from("out/profile.json")));
    }

    #[test]
    fn test_note_url_without_token_is_rejected() {
        let result = resolve(&[
            "xhs-harvest",
            "notes",
            "https://www.xiaohongshu.com/explore/64a1b2c3",
        ]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_inverted_delay_range_is_rejected() {
        let result = resolve(&[
            "xhs-harvest",
            "suggest",
            "tea",
            "--min-delay",
            "3",
            "--max-delay",
            "1",
        ]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        let result = resolve(&["xhs-harvest", "search", "tea", "--sort", "newest"]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_notes_requires_at_least_one_url() {
        assert!(CommandLineInput::try_parse_from(["xhs-harvest", "notes"]).is_err());
    }

    #[test]
    fn test_empty_cookies_are_rejected() {
        let cli = CommandLineInput::try_parse_from(["xhs-harvest", "suggest", "tea"]).unwrap();
        assert!(HarvestConfig::from_parts(cli, "  ").is_err());
    }
}
