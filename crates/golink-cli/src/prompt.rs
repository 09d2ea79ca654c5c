//! Interactive prompts

use std::io::{self, IsTerminal, Write};

use anyhow::Result;

/// Ask a yes/no question. Anything but "y"/"yes" (or a non-interactive
/// stdin) means no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
