use std::io::{BufRead, Write};

use anyhow::Context;

/// Prints `message` without a newline and reads one answer. `None` at end of input.
pub fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
) -> anyhow::Result<Option<String>> {
    write!(output, "{}", message).context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    let bytes_read = input
        .read_line(&mut line)
        .context("Failed to read from standard input")?;

    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(clean_answer(&line).to_string()))
}

/// Strips whitespace and stray control characters, e.g. an Escape echoed by the terminal.
fn clean_answer(line: &str) -> &str {
    line.trim_matches(|character: char| character.is_whitespace() || character.is_control())
}
