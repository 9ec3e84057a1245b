mod convert;
mod featurize;

use anyhow::{Context as _, Result, bail};

use pcloud_graph::Sample;
use pcloud_graph::io::{read_sample, write_sample};

use crate::cli::{Command, IoOptions};
use crate::display::Context;
use crate::io::{Stream, create_output, open_input};

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Convert(args) => convert::run_convert(args, ctx),
        Command::Featurize(args) => featurize::run_featurize(args, ctx),
    }
}

fn check_terminals(io: &IoOptions, usage: &str) -> Result<()> {
    if io.input.is_none() && Stream::Stdin.is_tty() {
        bail!("No input file specified and stdin is a terminal.\n\nUsage: {usage}");
    }
    if io.output.is_none() && Stream::Stdout.is_tty() {
        bail!("No output file specified and stdout is a terminal.\n\nUsage: {usage}");
    }
    Ok(())
}

fn read_input(io: &IoOptions) -> Result<Sample> {
    let input = open_input(io.input.as_deref())?;
    read_sample(input).context("Failed to read input sample")
}

fn write_output(io: &IoOptions, sample: &Sample) -> Result<()> {
    let mut output = create_output(io.output.as_deref())?;
    write_sample(&mut output, sample).context("Failed to write output sample")?;
    std::io::Write::flush(&mut output).context("Failed to flush output")?;
    Ok(())
}
