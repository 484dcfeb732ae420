use anyhow::{Context, Result};

/// green narrative output on stdout
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use std::io::Write;
        let _ = writeln!(std::io::stdout(), "{}", format!($($arg)*).green());
    }};
}

/// plain output on stdout; no arguments prints a blank line
#[macro_export]
macro_rules! info {
    () => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout());
    }};
    ($($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout(), $($arg)*);
    }};
}

/// yellow warnings on stderr
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "{}", format!($($arg)*).yellow());
    }};
}

/// red errors on stderr
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "{}", format!($($arg)*).red());
    }};
}

/// single-key prompt like `[Y]ES/[n]o/[e]dit ?`
///
/// returns the lowercased first character of the chosen option; enter
/// picks the first option. esc and ctrl-c abort the run with the
/// cancellation exit status.
pub fn prompt(options: &[&str]) -> Result<char> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode},
    };
    use std::io::{self, Write};

    debug_assert!(!options.is_empty(), "prompt requires at least one option");

    let keys: Vec<char> = options
        .iter()
        .map(|opt| {
            opt.chars()
                .next()
                .expect("prompt options cannot be empty")
                .to_ascii_lowercase()
        })
        .collect();

    let rendered: Vec<String> = options
        .iter()
        .map(|opt| {
            let first = opt.chars().next().expect("prompt options cannot be empty");
            format!("[{first}]{}", &opt[first.len_utf8()..])
        })
        .collect();
    print!("{} ? ", rendered.join("/"));
    let _ = io::stdout().flush();

    enable_raw_mode().context("this command requires an interactive terminal")?;

    let choice = loop {
        let Ok(Event::Key(KeyEvent {
            code, modifiers, ..
        })) = event::read()
        else {
            continue;
        };

        match code {
            KeyCode::Esc => break None,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
            KeyCode::Enter => break Some(0),
            KeyCode::Char(c) => {
                if let Some(idx) = keys.iter().position(|&k| k == c.to_ascii_lowercase()) {
                    break Some(idx);
                }
            }
            _ => {}
        }
    };

    disable_raw_mode().ok();
    match choice {
        Some(idx) => {
            info!("{}", options[idx]);
            Ok(keys[idx])
        }
        None => {
            info!("^C");
            std::process::exit(2);
        }
    }
}

/// edit a single line in place with readline
pub fn edit_one_line(line: &str) -> Result<String> {
    use rustyline::DefaultEditor;

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;
    match editor.readline_with_initial("? ", (line, "")) {
        Ok(edited) => Ok(edited.trim().to_string()),
        Err(_) => {
            info!("^C");
            std::process::exit(2);
        }
    }
}

/// edit multi-line text through $EDITOR and a temporary file
pub fn edit_multi_line(text: &str) -> Result<String> {
    use std::io::Write;
    use std::process::Command;
    use tempfile::Builder;

    let editor = std::env::var("EDITOR").context("EDITOR not set")?;

    let mut temp_file = Builder::new()
        .suffix(".commitmsg")
        .tempfile()
        .context("failed to create temporary file")?;
    temp_file
        .write_all(text.as_bytes())
        .context("failed to write to temporary file")?;
    temp_file.flush().context("failed to flush temporary file")?;

    let temp_path = temp_file.path().to_owned();

    // run through the shell so EDITOR values with arguments work
    let quoted =
        shlex::try_quote(&temp_path.to_string_lossy().into_owned()).map(|q| q.into_owned());
    let command = format!(
        "{editor} {}",
        quoted.context("editor path cannot be quoted")?
    );

    let exit = Command::new("sh")
        .arg("-c")
        .arg(&command)
        .status()
        .with_context(|| format!("failed to run editor: {editor}"))?;
    if !exit.success() {
        anyhow::bail!("editor exited with {exit}");
    }

    let edited = std::fs::read_to_string(&temp_path)
        .context("failed to read edited message")?
        .trim()
        .to_string();
    Ok(edited)
}
