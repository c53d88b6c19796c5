use std::env;

use anyhow::bail;

fn main() -> anyhow::Result<()> {
    reptrack::init_logger!();

    let Some(path) = env::args_os().nth(1) else {
        bail!("usage: reptrack <session-log.csv>");
    };

    let summary = reptrack::analysis::summarize_file(path)?;
    println!("{summary}");

    Ok(())
}
