// SPDX-License-Identifier: MIT

//! Console interaction for manual and interactive checks

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

/// Line-based user interaction
#[async_trait]
pub trait Console: Send + Sync {
    /// Show a line to the user
    fn write_line(&self, text: &str);

    /// Read one line of input. `None` when input is closed.
    async fn read_line(&self) -> Option<String>;

    /// Ask a question; `y` or `yes` answers it positively
    async fn ask_yes_no(&self, message: &str) -> bool {
        self.write_line(message);
        match self.read_line().await {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    /// Ask for free text; blank input counts as cancel
    async fn ask_string(&self, message: &str) -> Option<String> {
        self.write_line(message);
        self.read_line()
            .await
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
            .filter(|line| !line.trim().is_empty())
    }

    /// Wait until the user presses enter
    async fn acknowledge(&self, message: &str) {
        self.write_line(message);
        let _ = self.read_line().await;
    }
}

/// Console on the process' stdin and stdout
pub struct Terminal {
    stdin: tokio::sync::Mutex<BufReader<Stdin>>,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            stdin: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for Terminal {
    fn write_line(&self, text: &str) {
        println!("{}", text);
    }

    async fn read_line(&self) -> Option<String> {
        let mut stdin = self.stdin.lock().await;
        let mut line = String::new();
        match stdin.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Failed to read from stdin: {}", e);
                None
            }
        }
    }
}

/// Console fed from a fixed list of input lines, recording its output
pub struct ScriptedConsole {
    inputs: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Mutex::new(inputs.into_iter().map(Into::into).collect()),
            output: Mutex::new(Vec::new()),
        }
    }

    /// Lines written so far
    pub fn output(&self) -> Vec<String> {
        self.output
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn write_line(&self, text: &str) {
        if let Ok(mut lines) = self.output.lock() {
            lines.push(text.to_string());
        }
    }

    async fn read_line(&self) -> Option<String> {
        self.inputs.lock().ok()?.pop_front()
    }
}
