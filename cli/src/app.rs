use anyhow::{Context, Result};
use colored::*;
use cura_companion::responses::QUICK_PROMPTS;
use cura_companion::{ConversationSession, TurnOutcome};
use cura_memory::{KeyValueStore, Mood};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::output::{
    print_chat_help, print_crisis_resources, print_message, print_mood_logged, print_moods,
    print_quick_prompts,
};

/// A line typed in interactive mode
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Exit,
    Help,
    Moods,
    Mood(Mood, Option<String>),
    History,
    Clear,
    Crisis,
    QuickList,
    Quick(usize),
    Send(String),
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            return Some(ChatCommand::Exit);
        }

        let Some(command) = input.strip_prefix('/') else {
            return Some(ChatCommand::Send(input.to_string()));
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let rest = parts.next().map(str::trim).filter(|r| !r.is_empty());

        let parsed = match name.as_str() {
            "help" => ChatCommand::Help,
            "moods" => ChatCommand::Moods,
            "history" => ChatCommand::History,
            "clear" => ChatCommand::Clear,
            "crisis" => ChatCommand::Crisis,
            "exit" | "quit" => ChatCommand::Exit,
            "mood" => match rest {
                None => ChatCommand::Moods,
                Some(rest) => {
                    let mut words = rest.splitn(2, char::is_whitespace);
                    let mood = words.next().unwrap_or_default();
                    let note = words.next().map(|n| n.trim().to_string());
                    match mood.parse::<Mood>() {
                        Ok(mood) => ChatCommand::Mood(mood, note),
                        Err(e) => ChatCommand::Invalid(e),
                    }
                }
            },
            "quick" => match rest {
                None => ChatCommand::QuickList,
                Some(n) => match n.parse::<usize>() {
                    Ok(n) if (1..=QUICK_PROMPTS.len()).contains(&n) => ChatCommand::Quick(n),
                    _ => ChatCommand::Invalid(format!(
                        "Pick a quick prompt between 1 and {}",
                        QUICK_PROMPTS.len()
                    )),
                },
            },
            other => ChatCommand::Invalid(format!("Unknown command: /{}", other)),
        };
        Some(parsed)
    }
}

fn typing_indicator() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("CURA is typing...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Send one message, showing the typing indicator until the reply settles
async fn send<S: KeyValueStore>(
    session: &mut ConversationSession<S>,
    text: &str,
) -> Result<TurnOutcome> {
    let user_message = session
        .begin_turn(text)
        .context("Failed to send message")?;
    debug!(message_id = user_message.id, "Awaiting reply");

    let spinner = typing_indicator();
    let outcome = session.finish_turn().await;
    spinner.finish_and_clear();

    let outcome = outcome.context("Failed to resolve reply")?;
    print_message(&outcome.reply);
    if outcome.crisis {
        print_crisis_resources();
    }
    Ok(outcome)
}

/// Runs a single query mode, sending one message and displaying the reply
pub async fn run_single_query<S: KeyValueStore>(
    session: &mut ConversationSession<S>,
    prompt: &str,
) -> Result<()> {
    info!(prompt_len = prompt.len(), "Running single query");
    send(session, prompt).await?;
    session.dismiss_crisis_alert();
    Ok(())
}

/// Runs an interactive chat session
pub async fn run_interactive_chat<S: KeyValueStore>(
    session: &mut ConversationSession<S>,
) -> Result<()> {
    println!("{}", "CURA - your safe space to express, explore, and find support".bold());
    println!("Type '/help' for commands, 'exit' or 'quit' to end the session.");
    println!();

    // Pick up where the last conversation left off
    let shown = session.messages().len().saturating_sub(6);
    for message in &session.messages()[shown..] {
        print_message(message);
    }
    if let Some(mood) = session.current_mood() {
        println!(
            "{} {} {}",
            "Current mood:".cyan(),
            mood.emoji(),
            mood.label()
        );
    }
    println!();

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            break;
        }

        let Some(command) = ChatCommand::parse(&input) else {
            continue;
        };

        match command {
            ChatCommand::Exit => {
                println!("Take care. Exiting chat session.");
                break;
            }
            ChatCommand::Help => print_chat_help(),
            ChatCommand::Moods => print_moods(session.current_mood()),
            ChatCommand::Mood(mood, note) => {
                let entry = session
                    .select_mood(mood, note)
                    .context("Failed to log mood")?
                    .clone();
                print_mood_logged(&entry);
            }
            ChatCommand::History => {
                for message in session.messages() {
                    print_message(message);
                }
            }
            ChatCommand::Clear => {
                session
                    .clear_history()
                    .context("Failed to clear history")?;
                println!("{}", "Started a new conversation.".yellow());
                for message in session.messages() {
                    print_message(message);
                }
            }
            ChatCommand::Crisis => print_crisis_resources(),
            ChatCommand::QuickList => print_quick_prompts(),
            ChatCommand::Quick(n) => {
                let prompt = QUICK_PROMPTS[n - 1];
                println!("{}: {}", "You".green().bold(), prompt);
                send(session, prompt).await?;
            }
            ChatCommand::Send(text) => {
                send(session, &text).await?;
            }
            ChatCommand::Invalid(reason) => {
                println!("{}", reason.yellow());
            }
        }

        if session.crisis_alert() {
            session.dismiss_crisis_alert();
        }
        println!(); // Add spacing between interactions
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cura_companion::ResponseResolver;
    use cura_memory::{InMemoryStore, SessionStore, CHAT_HISTORY_KEY};

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            ChatCommand::parse("  I feel lonely \n"),
            Some(ChatCommand::Send("I feel lonely".to_string()))
        );
        assert_eq!(ChatCommand::parse("   "), None);
        assert_eq!(ChatCommand::parse("QUIT"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_mood() {
        assert_eq!(
            ChatCommand::parse("/mood Anxious before my viva"),
            Some(ChatCommand::Mood(
                Mood::Anxious,
                Some("before my viva".to_string())
            ))
        );
        assert_eq!(
            ChatCommand::parse("/mood calm"),
            Some(ChatCommand::Mood(Mood::Calm, None))
        );
        assert_eq!(ChatCommand::parse("/mood"), Some(ChatCommand::Moods));
        assert!(matches!(
            ChatCommand::parse("/mood elated"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_quick() {
        assert_eq!(ChatCommand::parse("/quick"), Some(ChatCommand::QuickList));
        assert_eq!(ChatCommand::parse("/quick 2"), Some(ChatCommand::Quick(2)));
        assert!(matches!(
            ChatCommand::parse("/quick 0"),
            Some(ChatCommand::Invalid(_))
        ));
        assert!(matches!(
            ChatCommand::parse("/quick 99"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            ChatCommand::parse("/dance"),
            Some(ChatCommand::Invalid("Unknown command: /dance".to_string()))
        );
        assert_eq!(ChatCommand::parse("/CLEAR"), Some(ChatCommand::Clear));
    }

    #[tokio::test]
    async fn test_single_query_offline() {
        let mut session = ConversationSession::open(
            SessionStore::new(InMemoryStore::new()),
            ResponseResolver::offline(),
        );

        run_single_query(&mut session, "I'm stressed about exams")
            .await
            .unwrap();

        assert_eq!(session.messages().len(), 3);
        let stored: Vec<cura_memory::Message> = session.store().load(CHAT_HISTORY_KEY);
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_single_query_rejects_blank() {
        let mut session = ConversationSession::open(
            SessionStore::new(InMemoryStore::new()),
            ResponseResolver::offline(),
        );
        assert!(run_single_query(&mut session, " ").await.is_err());
        assert!(!session.pending_reply());
    }
}
