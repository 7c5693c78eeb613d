//! rillc - the Rill compiler command line.
//!
//! Usage: `rillc <input.rill> [-o <output.ll>]`. The IR goes to stdout
//! unless `-o` names an output file; errors print to stderr and exit
//! nonzero.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = parse_args(&args)?;

    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let ir = rillc_drv::compile(&source)?;

    match output {
        Some(path) => std::fs::write(&path, ir)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", ir),
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(PathBuf, Option<PathBuf>)> {
    let mut input = None;
    let mut output = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-o" {
            let path = iter.next().context("-o requires an output path")?;
            output = Some(PathBuf::from(path));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument: {}", arg);
        }
    }

    let input = input.context("usage: rillc <input.rill> [-o <output.ll>]")?;
    Ok((input, output))
}
