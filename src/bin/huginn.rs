//! huginn: comment sentiment for YouTube videos
//!
//! Analyzes the videos given on the command line, or prompts for links
//! interactively when none are given.

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use dialoguer::{Confirm, Input};
use huginn::analysis::{AnalysisOptions, analyze};
use huginn::config::{Config, Secrets, Strategy};
use huginn::render::{render_report, save_csv};
use huginn::{AnalysisReport, CommentSource, HuginnError, SentimentClassifier};

/// Comment sentiment analysis for YouTube videos
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Classify the sentiment of a video's comments")]
struct Args {
    /// Video URLs or ids (prompted for when omitted)
    urls: Vec<String>,

    /// Config file (default: ~/.huginn/config.toml, then /etc/huginn/config.toml)
    #[arg(short, long, env = "HUGINN_CONFIG")]
    config: Option<PathBuf>,

    /// Classification strategy: lexicon, huggingface or local
    #[arg(short, long, env = "HUGINN_STRATEGY")]
    strategy: Option<String>,

    /// Maximum comments to analyze per video (at most 200)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Comments per classifier call
    #[arg(long)]
    batch_size: Option<usize>,

    /// Rows shown in the preview table
    #[arg(long)]
    rows: Option<usize>,

    /// Write all classifications to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Read comments from a JSON Lines dump instead of fetching them
    #[arg(long)]
    comments_file: Option<PathBuf>,
}

/// Exit codes, one per way a run can end.
mod exit {
    pub const FAILED: u8 = 1;
    pub const CONFIG: u8 = 2;
    pub const FETCH_FAILED: u8 = 3;
    pub const NO_COMMENTS: u8 = 4;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let (config, classifier) = match setup(&args) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(exit::CONFIG);
        }
    };
    let source = config.build_source(args.comments_file.as_deref());
    let session = Session {
        options: config.analysis.clone(),
        source: source.as_ref(),
        classifier: classifier.as_ref(),
        csv: args.csv.clone(),
    };

    if !args.urls.is_empty() {
        let multiple = args.urls.len() > 1;
        let mut code = 0;
        for url in &args.urls {
            code = code.max(session.run(url, multiple).await);
        }
        return ExitCode::from(code);
    }

    if io::stdin().is_terminal() {
        interactive(&session).await
    } else {
        // Piped input: one link per line.
        let inputs: Vec<String> = io::stdin()
            .lock()
            .lines()
            .map_while(|line| line.ok())
            .filter(|line| !line.trim().is_empty())
            .collect();
        if inputs.is_empty() {
            return ExitCode::from(session.run("", false).await);
        }
        let multiple = inputs.len() > 1;
        let mut code = 0;
        for input in &inputs {
            code = code.max(session.run(input, multiple).await);
        }
        ExitCode::from(code)
    }
}

/// Load configuration, apply CLI overrides and build the classifier once.
fn setup(args: &Args) -> huginn::Result<(Config, std::sync::Arc<dyn SentimentClassifier>)> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(strategy) = &args.strategy {
        config.classifier.strategy = strategy.parse::<Strategy>()?;
    }
    if let Some(limit) = args.limit {
        config.analysis.max_comments = limit;
    }
    if let Some(batch_size) = args.batch_size {
        config.analysis.batch_size = batch_size;
    }
    if let Some(rows) = args.rows {
        config.analysis.preview_rows = rows;
    }

    let secrets = Secrets::load()?;
    let classifier = config.build_classifier(&secrets)?;
    Ok((config, classifier))
}

/// Prompt for links until the user is done.
async fn interactive(session: &Session<'_>) -> ExitCode {
    println!("huginn {} ({} classifier)", huginn::version_string(), session.classifier.name());

    loop {
        let input = match Input::<String>::new()
            .with_prompt("YouTube link")
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(exit::FAILED);
            }
        };

        session.run(&input, true).await;

        let again = Confirm::new()
            .with_prompt("Analyze another video?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if !again {
            return ExitCode::SUCCESS;
        }
    }
}

/// Everything one analysis needs; shared by every run in the process.
struct Session<'a> {
    options: AnalysisOptions,
    source: &'a dyn CommentSource,
    classifier: &'a dyn SentimentClassifier,
    csv: Option<PathBuf>,
}

impl Session<'_> {
    /// Analyze one video, print the outcome and return its exit code.
    async fn run(&self, input: &str, multiple: bool) -> u8 {
        match analyze(input, self.source, self.classifier, &self.options).await {
            Ok(report) => {
                println!("{}", render_report(&report, self.options.preview_rows));
                match self.export(&report, multiple) {
                    Ok(()) => 0,
                    Err(e) => {
                        eprintln!("error: failed to write CSV: {e}");
                        exit::FAILED
                    }
                }
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                exit_code(&e)
            }
        }
    }

    fn export(&self, report: &AnalysisReport, multiple: bool) -> huginn::Result<()> {
        let Some(path) = &self.csv else {
            return Ok(());
        };
        let path = csv_path_for(path, report, multiple);
        save_csv(report, &path)?;
        println!("Saved {} rows to {}", report.results.len(), path.display());
        Ok(())
    }
}

/// With several videos per invocation, each gets its own file: `out-<id>.csv`.
fn csv_path_for(path: &Path, report: &AnalysisReport, multiple: bool) -> PathBuf {
    if !multiple {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("comments");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");
    path.with_file_name(format!("{stem}-{}.{extension}", report.video.id()))
}

fn exit_code(error: &HuginnError) -> u8 {
    match error {
        HuginnError::MissingInput => exit::CONFIG,
        HuginnError::FetchFailed(_) => exit::FETCH_FAILED,
        HuginnError::NoComments => exit::NO_COMMENTS,
        _ => exit::FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huginn::VideoRef;

    fn report() -> AnalysisReport {
        AnalysisReport::new(VideoRef::parse("dQw4w9WgXcQ").unwrap(), "lexicon", Vec::new())
    }

    #[test]
    fn single_video_writes_the_given_path() {
        let path = csv_path_for(Path::new("out/sentiment.csv"), &report(), false);
        assert_eq!(path, PathBuf::from("out/sentiment.csv"));
    }

    #[test]
    fn several_videos_get_one_file_each() {
        let path = csv_path_for(Path::new("out/sentiment.csv"), &report(), true);
        assert_eq!(path, PathBuf::from("out/sentiment-dQw4w9WgXcQ.csv"));

        let path = csv_path_for(Path::new("results"), &report(), true);
        assert_eq!(path, PathBuf::from("results-dQw4w9WgXcQ.csv"));
    }

    #[test]
    fn exit_codes_follow_terminal_state() {
        assert_eq!(exit_code(&HuginnError::MissingInput), exit::CONFIG);
        assert_eq!(exit_code(&HuginnError::FetchFailed("timeout".into())), exit::FETCH_FAILED);
        assert_eq!(exit_code(&HuginnError::NoComments), exit::NO_COMMENTS);
        assert_eq!(exit_code(&HuginnError::AuthenticationFailed), exit::FAILED);
        assert_eq!(exit_code(&HuginnError::DataError("mismatch".into())), exit::FAILED);
    }
}
