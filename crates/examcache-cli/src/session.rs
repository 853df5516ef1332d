//! Line-based test taking with a running countdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use examcache_core::flow::TickOutcome;
use examcache_core::models::{ScoredResult, SubmittedResult, TestDefinition};
use examcache_core::{
    Attempt, Config, ExamFlow, LoadOutcome, Navigation, Notice, Notifier, OfflineStore, RemoteStore,
    RestClient, SubmitOutcome, SubmitTrigger,
};

/// Seconds left at which the countdown is announced.
const ANNOUNCE_AT_SECS: [u32; 3] = [60, 30, 10];

/// Prints notices to stderr.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_warning() {
            eprintln!("Warning: {}", notice);
        } else {
            eprintln!("{}", notice);
        }
    }
}

/// Stand-in when no API URL is configured: cached tests still load and
/// results go straight to the pending queue.
struct NoRemote;

#[async_trait]
impl RemoteStore for NoRemote {
    async fn fetch_test(&self, _test_id: &str) -> Result<TestDefinition> {
        Err(anyhow!("No remote API configured"))
    }

    async fn insert_result(&self, _result: &ScoredResult) -> Result<SubmittedResult> {
        Err(anyhow!("No remote API configured"))
    }
}

fn remote_from_config(config: &Config) -> Result<Arc<dyn RemoteStore>> {
    match config.api_url {
        Some(ref url) => Ok(Arc::new(RestClient::new(url.as_str(), config.api_key.clone())?)),
        None => {
            info!("No API URL configured, running offline only");
            Ok(Arc::new(NoRemote))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Choice(u32),
    Skip,
    Back,
    Submit,
    Invalid,
}

/// Options are shown numbered from 1.
fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Skip,
        "b" | "back" => Input::Back,
        "submit" => Input::Submit,
        other => match other.parse::<u32>() {
            Ok(n) if n >= 1 => Input::Choice(n - 1),
            _ => Input::Invalid,
        },
    }
}

fn show_question(attempt: &Attempt, index: usize) {
    let questions = attempt.questions();
    let Some(question) = questions.get(index) else {
        println!(
            "\nAll questions visited ({}/{} answered). Type 'submit' to finish or 'b' to review.",
            attempt.answered_count(),
            questions.len()
        );
        return;
    };

    println!(
        "\nQ {} / {}  [{}]\n{}",
        index + 1,
        questions.len(),
        attempt.countdown().display(),
        question.text
    );
    let selected = attempt.answer_for(index);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i as u32) { '*' } else { ' ' };
        println!(" {}{}. {}", marker, i + 1, option);
    }
}

fn report(outcome: &SubmitOutcome) {
    let result = &outcome.result;
    println!("\nScore: {}/{}", result.score, result.total_questions);
    match &outcome.navigate {
        Navigation::ResultView { result_id, test_id } => {
            println!("Result {} recorded for test {}.", result_id, test_id);
        }
        Navigation::Dashboard => println!("Returning to dashboard."),
    }
}

pub async fn take(config: &Config, store: OfflineStore, test_id: &str) -> Result<()> {
    let student_id = config
        .student_id
        .clone()
        .context("No student id configured (set EXAMCACHE_STUDENT_ID)")?;

    let flow = ExamFlow::new(store, remote_from_config(config)?, Arc::new(TerminalNotifier), student_id);

    let mut attempt = match flow.load(test_id).await {
        LoadOutcome::Ready(attempt) => attempt,
        LoadOutcome::Aborted { .. } => {
            println!("Returning to dashboard.");
            return Ok(());
        }
    };

    let test = attempt.test();
    if attempt.is_offline_mode() {
        println!("Loaded \"{}\" from local cache (cached {}).", test.title, test.age_display());
    }
    println!(
        "{}: {} questions, {} minutes. Enter an option number, blank to skip, 'b' to go back, 'submit' to finish.",
        test.title,
        test.questions.len(),
        test.duration
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately
    ticker.tick().await;

    let mut index = 0;
    show_question(&attempt, index);

    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match flow.tick(&mut attempt).await {
                    TickOutcome::Submitted(outcome) => {
                        println!("\nTime is up!");
                        break outcome;
                    }
                    TickOutcome::Running(secs) if ANNOUNCE_AT_SECS.contains(&secs) => {
                        println!("[{} remaining]", attempt.countdown().display());
                    }
                    _ => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // Input closed: hand in what we have
                    break flow.submit(&mut attempt, SubmitTrigger::Manual).await?;
                };

                let last = attempt.questions().len();
                match parse_input(&line) {
                    Input::Submit => break flow.submit(&mut attempt, SubmitTrigger::Manual).await?,
                    Input::Skip => index = (index + 1).min(last),
                    Input::Back => index = index.saturating_sub(1),
                    Input::Choice(option) => match flow.answer(&mut attempt, index, option) {
                        Ok(()) => index = (index + 1).min(last),
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    },
                    Input::Invalid => {
                        eprintln!("Enter an option number, blank to skip, 'b' to go back, or 'submit'.");
                        continue;
                    }
                }
                show_question(&attempt, index);
            }
        }
    };

    report(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("1"), Input::Choice(0));
        assert_eq!(parse_input(" 3 \n"), Input::Choice(2));
        assert_eq!(parse_input(""), Input::Skip);
        assert_eq!(parse_input("b"), Input::Back);
        assert_eq!(parse_input("submit"), Input::Submit);
        assert_eq!(parse_input("0"), Input::Invalid);
        assert_eq!(parse_input("-2"), Input::Invalid);
        assert_eq!(parse_input("maybe"), Input::Invalid);
    }

    #[tokio::test]
    async fn test_no_remote_aborts_uncached_load() {
        let flow = ExamFlow::new(
            OfflineStore::unavailable(),
            Arc::new(NoRemote) as Arc<dyn RemoteStore>,
            Arc::new(TerminalNotifier),
            "s1",
        );
        assert!(matches!(flow.load("t1").await, LoadOutcome::Aborted { .. }));
    }
}
