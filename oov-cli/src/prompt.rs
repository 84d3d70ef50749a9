use eyre::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Asks on stderr whether `path` may be overwritten.
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr();
    ask(&mut stdin.lock(), &mut stderr, path)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, path: &Path) -> Result<bool> {
    writeln!(output, "Overwrite {}? [y/n]", path.display())?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .wrap_err("failed to read answer")?;
    Ok(matches!(answer.trim(), "y" | "yes" | "Y"))
}
