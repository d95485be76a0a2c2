use std::fs::File;
use std::io::{stderr, stdout, Stderr, Stdout, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{bail, Context};
use colored::Colorize;
use strum_macros::{Display, EnumIter};

use crate::general::common::Res;

#[derive(Debug, Display, Eq, PartialEq, Copy, Clone, EnumIter)]
pub enum Message {
    Debug,
    Info,
    Warning,
    Error,
}

impl Message {
    pub fn message_prefix(self) -> &'static str {
        match self {
            Message::Debug => "Debug:",
            Message::Info => "Info:",
            Message::Warning => "Warning:",
            Message::Error => "Error:",
        }
    }

    fn colored_prefix(self) -> String {
        let prefix = self.message_prefix();
        match self {
            Message::Debug => prefix.dimmed().to_string(),
            Message::Info => prefix.green().to_string(),
            Message::Warning => prefix.yellow().to_string(),
            Message::Error => prefix.red().bold().to_string(),
        }
    }
}

#[derive(Debug)]
pub enum TextStream {
    File(File, String), // Don't use a BufWriter to ensure the log is always up-to-date.
    Stdout(Stdout),
    Stderr(Stderr),
}

impl TextStream {
    pub fn write(&mut self, typ: Message, msg: &str) {
        let prefix = match self {
            TextStream::File(..) => typ.message_prefix().to_string(),
            _ => typ.colored_prefix(),
        };
        _ = writeln!(self.stream(), "{prefix} {msg}");
    }

    pub fn stream(&mut self) -> &mut dyn Write {
        match self {
            TextStream::File(f, _) => f,
            TextStream::Stdout(out) => out,
            TextStream::Stderr(err) => err,
        }
    }

    pub fn from_name(name: &str) -> Res<Self> {
        Ok(match name.trim() {
            "" | "stderr" => TextStream::Stderr(stderr()),
            "stdout" => TextStream::Stdout(stdout()),
            s => TextStream::from_filename(s)?,
        })
    }

    pub fn from_filename(name: &str) -> Res<Self> {
        if !name.contains('.') {
            // Requiring a '.' catches typos where the user didn't mean to specify a file name.
            bail!(
                "'{name}' does not appear to be a valid log filename (it does not contain a '.'). \
                Expected either a filename, 'stdout' or 'stderr'."
            );
        }
        let path = Path::new(name);
        let file = File::create(path).with_context(|| format!("Couldn't create log file '{name}'"))?;
        Ok(TextStream::File(
            file,
            path.canonicalize()
                .ok()
                .as_ref()
                .and_then(|p| p.to_str())
                .unwrap_or(name)
                .to_string(),
        ))
    }

    pub fn name(&self) -> String {
        match self {
            TextStream::File(_, name) => name.clone(),
            TextStream::Stdout(_) => "stdout".to_string(),
            TextStream::Stderr(_) => "stderr".to_string(),
        }
    }
}

#[derive(Debug)]
#[must_use]
pub struct TextWriter {
    pub stream: TextStream,
    pub accepted: Vec<Message>,
}

impl TextWriter {
    pub fn new_for(stream: TextStream, accepted: Vec<Message>) -> Self {
        Self { stream, accepted }
    }

    pub fn display_message(&mut self, typ: Message, message: &str) {
        if self.accepted.contains(&typ) {
            self.stream.write(typ, message);
        }
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new_for(TextStream::Stderr(stderr()), accepted_messages(false))
    }
}

pub fn accepted_messages(verbose: bool) -> Vec<Message> {
    let mut res = vec![Message::Info, Message::Warning, Message::Error];
    if verbose {
        res.push(Message::Debug);
    }
    res
}

/// The single diagnostics sink of the process. `None` until something is logged or
/// `set_log_stream` is called, at which point it falls back to stderr.
static LOG: Mutex<Option<TextWriter>> = Mutex::new(None);

pub fn set_log_stream(stream: TextStream, verbose: bool) {
    let mut writer = TextWriter::new_for(stream, accepted_messages(verbose));
    writer.display_message(
        Message::Debug,
        &format!(
            "[Starting logging to {0} at {1}]",
            writer.stream.name(),
            chrono::offset::Utc::now().to_rfc2822()
        ),
    );
    *LOG.lock().unwrap_or_else(PoisonError::into_inner) = Some(writer);
}

pub fn display_message(typ: Message, message: &str) {
    let mut log = LOG.lock().unwrap_or_else(PoisonError::into_inner);
    log.get_or_insert_with(TextWriter::default)
        .display_message(typ, message);
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use crate::output::*;

    #[test]
    fn filename_needs_a_dot_test() {
        assert!(TextStream::from_filename("logfile").is_err());
        assert_eq!(TextStream::from_name("stdout").unwrap().name(), "stdout");
        assert_eq!(TextStream::from_name("").unwrap().name(), "stderr");
    }

    #[test]
    fn writer_filters_messages_test() {
        let path = std::env::temp_dir().join(format!("chess_duel_log_{}.log", std::process::id()));
        let name = path.to_str().unwrap();
        let stream = TextStream::from_name(name).unwrap();
        let mut writer = TextWriter::new_for(stream, accepted_messages(false));
        writer.display_message(Message::Debug, "hidden");
        writer.display_message(Message::Warning, "shown");
        drop(writer);
        let content = read_to_string(&path).unwrap();
        assert_eq!(content, "Warning: shown\n");
        _ = std::fs::remove_file(path);
    }
}
