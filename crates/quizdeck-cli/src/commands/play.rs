//! The `quizdeck play` command.
//!
//! A line-oriented terminal front end over the session runtime. Input is read
//! only while the session waits for the player; an expired clock ends the quiz
//! even mid-prompt.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quizdeck_core::model::FlattenedQuestion;
use quizdeck_core::{flatten, spawn_session, ContentLoader, Phase, SessionHandle, SessionState};
use quizdeck_sources::create_fetcher;

type Input = Lines<BufReader<Stdin>>;

pub async fn execute(
    config_path: Option<PathBuf>,
    data_root: Option<String>,
    time_limit: Option<u32>,
) -> Result<()> {
    let mut config = super::resolve_config(config_path, data_root)?;
    if let Some(secs) = time_limit {
        config.time_limit_secs = secs;
    }
    let session_config = config.session_config()?;

    println!("Loading...");
    let fetcher = create_fetcher(&config)?;
    let fetcher_name = fetcher.name().to_string();
    let docs = ContentLoader::new(fetcher).load().await?;
    let questions = flatten(&docs);
    if questions.is_empty() {
        println!("No questions available.");
        return Ok(());
    }
    tracing::info!(
        questions = questions.len(),
        source = %fetcher_name,
        "starting quiz"
    );

    let mut handle = spawn_session(questions.into(), session_config);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let outcome = play(&mut handle, &mut input).await;
    handle.shutdown().await;
    outcome
}

async fn play(handle: &mut SessionHandle, input: &mut Input) -> Result<()> {
    let total = handle.questions().len();

    loop {
        let state = handle.snapshot();
        match state.phase() {
            Phase::NotStarted => {
                println!();
                println!("Welcome to the Quiz!");
                println!("{total} questions, {}s on the clock.", state.time_left_secs);
                prompt("Press Enter to start (q to quit): ");
                match input.next_line().await? {
                    Some(line) if line.trim() != "q" => {
                        handle.start();
                        if wait_until(handle, |s| s.has_started).await.is_none() {
                            return Ok(());
                        }
                    }
                    _ => return Ok(()),
                }
            }
            Phase::Active if state.selected_option.is_some() => {
                // Answered; the next question arrives after the advance delay.
                let Some(next) = handle.changed().await else {
                    return Ok(());
                };
                if next.is_finished && next.time_left_secs == 0 {
                    times_up();
                }
            }
            Phase::Active => {
                let Some(question) = handle.current_question().cloned() else {
                    return Ok(());
                };
                show_question(&question, state.current_index, total, state.time_left_secs);

                tokio::select! {
                    line = input.next_line() => {
                        let Some(line) = line? else {
                            return Ok(());
                        };
                        match parse_choice(&line, &question.options) {
                            Some(option) => {
                                handle.select_option(option.as_str());
                                let answered = wait_until(handle, |s| {
                                    s.selected_option.is_some() || s.is_finished
                                })
                                .await;
                                let committed = answered.is_some_and(|s| {
                                    s.selected_option.as_deref() == Some(option.as_str())
                                });
                                if committed && question.is_correct(&option) {
                                    println!("Correct!");
                                } else if committed {
                                    println!("Incorrect.");
                                }
                            }
                            None => println!(
                                "Please enter a number between 1 and {}.",
                                question.options.len()
                            ),
                        }
                    }
                    _ = wait_until(handle, |s| s.is_finished) => times_up(),
                }
            }
            Phase::Finished => {
                println!();
                println!("Quiz Finished!");
                println!("Your score: {} / {total}", state.score);
                prompt("Restart? [y/N]: ");
                match input.next_line().await? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => {
                        handle.restart();
                        if wait_until(handle, |s| !s.is_finished).await.is_none() {
                            return Ok(());
                        }
                    }
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn show_question(question: &FlattenedQuestion, index: usize, total: usize, time_left: u32) {
    println!();
    println!(
        "Question {}/{}  (by {}, {})  Time left: {time_left}s",
        index + 1,
        total,
        question.username,
        question.social_link
    );
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
    prompt("> ");
}

/// Accept either an option number (1-based) or the exact option text.
fn parse_choice(line: &str, options: &[String]) -> Option<String> {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).cloned();
    }
    options.iter().find(|o| o.as_str() == line).cloned()
}

/// Wait until the session state satisfies `done`.
///
/// Returns `None` if the session is torn down first.
async fn wait_until(
    handle: &mut SessionHandle,
    done: impl Fn(&SessionState) -> bool,
) -> Option<SessionState> {
    let state = handle.snapshot();
    if done(&state) {
        return Some(state);
    }
    loop {
        let state = handle.changed().await?;
        if done(&state) {
            return Some(state);
        }
    }
}

fn times_up() {
    println!();
    println!("Time's up!");
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
