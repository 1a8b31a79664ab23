//! Markdown audit log of tool requests and results.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Characters of a result kept in the log unless the level is DEBUG.
const RESULT_PREVIEW_CHARS: usize = 500;

/// Audit log for tool calls made by a model.
///
/// Writes a markdown file with one timestamped section per event. Every
/// write opens the file in append mode, so one log can be shared by
/// several dispatchers.
#[derive(Debug, Clone)]
pub struct AuditLog {
    log_file: PathBuf,
    log_level: String,
}

impl AuditLog {
    /// Open or create an audit log.
    ///
    /// # Arguments
    /// * `log_file` - Path to log file. If None, creates a timestamped file in temp directory.
    /// * `log_level` - Logging level (defaults to "INFO"). At DEBUG, results are logged in full.
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => {
                let dir = std::env::temp_dir().join("schemachat-logs");
                let filename = format!(
                    "audit_{}_{}.md",
                    Utc::now().timestamp_millis(),
                    std::process::id()
                );
                dir.join(filename)
            }
        };

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let log = Self {
            log_file,
            log_level: log_level.unwrap_or("INFO").to_uppercase(),
        };
        if !log.log_file.exists() {
            log.initialize_log_file()?;
        }
        Ok(log)
    }

    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;

        writeln!(file, "# Tool Call Audit Log\n")?;
        writeln!(file, "Log started: {}\n", Utc::now().to_rfc3339())?;
        writeln!(file, "---\n")?;
        Ok(())
    }

    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;

        write!(file, "{}", content).with_context(|| "Failed to write to log file")?;
        Ok(())
    }

    /// Log a tool call as requested by the model.
    pub fn log_tool_request(&self, name: &str, arguments: &str) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
        let content = format!(
            "### Tool Request - {}\n\n**Function:** {}\n**Arguments:** `{}`\n\n",
            now.to_rfc3339(),
            name,
            arguments
        );
        self.append_to_log(&content)
    }

    /// Log the text returned for a tool call.
    pub fn log_tool_result(&self, name: &str, arguments: &str, text: &str, success: bool) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let status = if success { "Result" } else { "Error" };
        let text = if self.is_debug() {
            text.to_string()
        } else {
            preview(text)
        };

        let content = format!(
            "### Tool Result - {}\n\n**Function:** {}\n**Arguments:** `{}`\n**{}:**\n```\n{}\n```\n\n",
            now.to_rfc3339(),
            name,
            arguments,
            status,
            text
        );
        self.append_to_log(&content)
    }

    /// Log the functions a registry was built with.
    pub fn log_registry(&self, names: &[&str]) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "## Function Registry - {}\n\n**Functions ({}):**\n",
            now.to_rfc3339(),
            names.len()
        );
        for name in names {
            content.push_str(&format!("- {}\n", name));
        }
        content.push('\n');
        self.append_to_log(&content)
    }

    /// Get the log file path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Get the log level.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn is_debug(&self) -> bool {
        self.log_level == "DEBUG"
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(RESULT_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}\n[... {} more bytes]", &text[..end], text.len() - end),
        None => text.to_string(),
    }
}
