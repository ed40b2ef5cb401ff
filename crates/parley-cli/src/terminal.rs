//! Line-oriented terminal over stdin/stdout.
//!
//! Input prompts and diagnostics go to stderr, program output (replies,
//! listings, tables) to stdout, so piping `parley chat` keeps only the
//! conversation.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use comfy_table::{Table, presets::UTF8_FULL};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use parley_core::capability::{ArgumentRequest, LineRequest, SelectionRequest};
use parley_core::display::StatusRenderer;
use parley_core::{ProgressDisplay, Terminal, Tone};
use parley_types::PromptDescriptor;

/// [`Terminal`] reading lines from stdin.
pub struct StdinTerminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    hinted: AtomicBool,
}

impl Default for StdinTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinTerminal {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            hinted: AtomicBool::new(false),
        }
    }

    async fn next_line(&self) -> io::Result<Option<String>> {
        let line = self.lines.lock().await.next_line().await?;
        Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
    }
}

fn prompt(text: &str) {
    eprint!("{text}");
    io::stderr().flush().ok();
}

#[async_trait]
impl Terminal for StdinTerminal {
    async fn read_line(&self, request: &LineRequest<'_>) -> io::Result<Option<String>> {
        if request.show_stop_hint && !self.hinted.swap(true, Ordering::Relaxed) {
            eprintln!("Type /help for commands, @agent to switch agent, STOP to finish.");
        }

        let mut text = format!("{} > ", request.agent);
        if request.show_default {
            text = format!("{} [{}] > ", request.agent, request.default);
        }
        prompt(&text);

        if request.multiline {
            // Multiline input ends with an empty line.
            let mut lines = Vec::new();
            while let Some(line) = self.next_line().await? {
                if line.is_empty() {
                    break;
                }
                lines.push(line);
            }
            if lines.is_empty() {
                return Ok(Some(request.default.to_string()));
            }
            return Ok(Some(lines.join("\n")));
        }

        Ok(self.next_line().await?.map(|line| {
            if line.trim().is_empty() && !request.default.is_empty() {
                request.default.to_string()
            } else {
                line
            }
        }))
    }

    async fn read_selection(&self, request: &SelectionRequest<'_>) -> io::Result<Option<String>> {
        match request.default {
            Some(default) => prompt(&format!("{}[{default}] ", request.prompt)),
            None => prompt(request.prompt),
        }
        let Some(line) = self.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim().to_string();
        if !line.is_empty() {
            return Ok(Some(line));
        }
        if let Some(default) = request.default {
            return Ok(Some(default.to_string()));
        }
        Ok((!request.allow_cancel).then_some(line))
    }

    async fn read_argument(&self, request: &ArgumentRequest<'_>) -> io::Result<Option<String>> {
        let kind = if request.required { "required" } else { "optional" };
        match request.description {
            Some(description) => eprintln!("  {} ({kind}): {description}", request.name),
            None => eprintln!("  {} ({kind})", request.name),
        }
        prompt(&format!("  {}: ", request.name));
        self.next_line().await
    }

    fn emit(&self, tone: Tone, text: &str) {
        match tone {
            Tone::Normal | Tone::Heading => println!("{text}"),
            Tone::Warning => eprintln!("{text}"),
            Tone::Error => eprintln!("error: {text}"),
            Tone::Detail => eprintln!("  {text}"),
        }
    }

    fn render_catalog(&self, title: &str, catalog: &[PromptDescriptor]) {
        println!("{title}");
        println!("{}", catalog_table(catalog));
    }

    fn clear(&self) {
        print!("\x1b[2J\x1b[H");
        io::stdout().flush().ok();
    }
}

/// Build the numbered catalog table.
pub fn catalog_table(catalog: &[PromptDescriptor]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Server", "Prompt Name", "Description", "Args"]);
    for (i, p) in catalog.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            p.server.clone(),
            p.name.clone(),
            p.description.clone(),
            p.args_summary(),
        ]);
    }
    table
}

/// Draws the status line on stderr.
struct StderrStatus;

impl StatusRenderer for StderrStatus {
    fn show(&self, status: &str) {
        eprint!("\r\x1b[2K{status}");
        io::stderr().flush().ok();
    }

    fn hide(&self) {
        eprint!("\r\x1b[2K");
        io::stderr().flush().ok();
    }
}

/// Progress display for the session: drawn on an interactive stderr,
/// tracked but invisible otherwise.
pub fn progress_display() -> ProgressDisplay {
    if io::stderr().is_terminal() {
        ProgressDisplay::new(Box::new(StderrStatus))
    } else {
        ProgressDisplay::hidden()
    }
}
