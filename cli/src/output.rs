use colored::*;
use cura_companion::responses::QUICK_PROMPTS;
use cura_companion::HELPLINES;
use cura_memory::{Message, Mood, MoodEntry, Sender};
use pulldown_cmark::{Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};

/// Print a transcript message with a colored speaker prefix
pub fn print_message(message: &Message) {
    let time = message.timestamp.format("%H:%M");
    match message.sender {
        Sender::User => {
            println!("{} {}: {}", time.to_string().dimmed(), "You".green().bold(), message.text);
        }
        Sender::Assistant if message.is_crisis() => {
            println!(
                "{} {}: {}",
                time.to_string().dimmed(),
                "CURA".red().bold(),
                render_markdown(&message.text).red()
            );
        }
        Sender::Assistant => {
            println!(
                "{} {}: {}",
                time.to_string().dimmed(),
                "CURA".blue().bold(),
                render_markdown(&message.text)
            );
        }
    }
}

/// The crisis resources panel
pub fn print_crisis_resources() {
    println!();
    println!("{}", "⚠ Crisis Resources".red().bold());
    println!(
        "{}",
        "If you're having thoughts of self-harm, please reach out for immediate help:".red()
    );
    for helpline in HELPLINES.iter() {
        println!(
            "  {} {}  {}",
            helpline.name.bold(),
            helpline.number.yellow().bold(),
            helpline.description.dimmed()
        );
    }
    println!();
}

pub fn print_moods(current: Option<Mood>) {
    println!("{}", "How are you feeling today?".cyan().bold());
    for mood in Mood::ALL {
        let marker = if current == Some(mood) { "›" } else { " " };
        println!("  {} {} {}", marker, mood.emoji(), mood.label());
    }
    println!("Use {} to log one.", "/mood <name> [note]".green());
}

pub fn print_mood_logged(entry: &MoodEntry) {
    println!(
        "{} {} {}",
        "Logged mood:".cyan(),
        entry.mood.emoji(),
        entry.mood.label().bold()
    );
    println!("{} {}", "Suggestion:".cyan(), entry.mood.recommendation());
}

pub fn print_quick_prompts() {
    println!("{}", "Quick prompts:".cyan().bold());
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        println!("  {}. {}", i + 1, prompt);
    }
    println!("Use {} to send one.", "/quick <number>".green());
}

pub fn print_chat_help() {
    println!("{}", "Commands:".cyan().bold());
    println!("  {}   show the mood options", "/moods".green());
    println!("  {}  log how you feel", "/mood <name> [note]".green());
    println!("  {}   show the whole conversation", "/history".green());
    println!("  {}   start a fresh conversation (moods are kept)", "/clear".green());
    println!("  {}   show crisis helplines", "/crisis".green());
    println!("  {}   list or send a quick prompt", "/quick [n]".green());
    println!("  {}   leave the chat", "exit".green());
}

/// Show usage instructions when no prompt or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "cura \"your message\"".green().bold());
    println!("    Send a single message to CURA");
    println!();
    println!("  {}", "cura -i".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --offline        Use the built-in replies only");
    println!("  --new-session    Clear the chat history first");
    println!("  --help           Show this help message");
    println!();
}

/// Render markdown for the terminal: emphasis, headings, lists and code spans
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut output = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut list_depth = 0usize;

    for event in MdParser::new_ext(markdown, options) {
        match event {
            MdEvent::Start(Tag::Strong) => bold = true,
            MdEvent::End(Tag::Strong) => bold = false,
            MdEvent::Start(Tag::Emphasis) => italic = true,
            MdEvent::End(Tag::Emphasis) => italic = false,
            MdEvent::Start(Tag::Heading(level, ..)) => {
                bold = true;
                if level == HeadingLevel::H1 {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Heading(..)) => {
                bold = false;
                output.push_str("\n\n");
            }
            MdEvent::Start(Tag::List(_)) => list_depth += 1,
            MdEvent::End(Tag::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Item) => {
                output.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                output.push_str("• ");
            }
            MdEvent::End(Tag::Item) => output.push('\n'),
            MdEvent::End(Tag::Paragraph) => {
                if list_depth == 0 {
                    output.push_str("\n\n");
                }
            }
            MdEvent::Text(text) => {
                let styled = match (bold, italic) {
                    (true, true) => text.bold().italic().to_string(),
                    (true, false) => text.bold().to_string(),
                    (false, true) => text.italic().to_string(),
                    (false, false) => text.to_string(),
                };
                output.push_str(&styled);
            }
            MdEvent::Code(code) => output.push_str(&code.yellow().to_string()),
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            _ => {}
        }
    }

    output.trim_end().to_string()
}
