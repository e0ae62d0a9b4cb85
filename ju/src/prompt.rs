//! Interactive yes/no prompt

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::Result;

/// Ask `message` on stdout and read the answer from stdin
pub fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_yes_no_with(stdin.lock(), stdout.lock(), message, default_yes)
}

/// Ask `message` on `writer` and read one line from `reader`
///
/// An empty line or end of input picks the default. Anything starting with
/// `y` (any case) is yes, everything else is no.
pub fn prompt_yes_no_with<R, W>(mut reader: R, mut writer: W, message: &str, default_yes: bool) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
    write!(writer, "{} {}: ", message, suffix)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim_end_matches(['\n', '\r']).to_lowercase();
    debug!(%answer, default_yes, "prompt_yes_no_with: read answer");

    if answer.is_empty() {
        return Ok(default_yes);
    }
    Ok(answer.starts_with('y'))
}
