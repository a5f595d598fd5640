use std::env;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use storyforge::client::{Clipboard, HttpStoryApi, Notice, Notifier, PromptClient};

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::EmptyPrompt => {
                eprintln!("⚠️  Please enter a description of the feature you want a story for.");
            }
            Notice::StoryReady => eprintln!("✨ Story generated!"),
            Notice::GenerationFailed(message) => eprintln!("❌ {message}"),
            Notice::Copied => eprintln!("📋 Copied to clipboard."),
            Notice::CopyFailed(message) => eprintln!("❌ Copy failed: {message}"),
        }
    }
}

/// Copies via the OSC 52 escape sequence, which most modern terminal
/// emulators forward to the system clipboard.
struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let payload = STANDARD.encode(text);
        print!("\x1b]52;c;{payload}\x07");
        io::stdout().flush()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let base_url =
        env::var("STORYFORGE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    let api = HttpStoryApi::new(base_url)?;
    let mut client = PromptClient::new(api, Osc52Clipboard, TerminalNotifier);

    // One-shot mode: the prompt given as arguments.
    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !prompt.trim().is_empty() {
        client.set_prompt(prompt);
        client.submit().await;
        if !client.result_text().is_empty() {
            println!("{}", client.result_text());
            client.copy();
        }
        return Ok(());
    }

    println!("📝 Describe a feature and press Enter (Ctrl-D to quit).");

    let stdin = io::stdin();
    loop {
        print!("feature> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        client.set_prompt(line.trim_end().to_string());
        client.submit().await;

        if !client.result_text().is_empty() {
            println!("\n{}\n", client.result_text());
            client.copy();
        }
    }

    Ok(())
}
