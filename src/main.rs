extern crate env_logger;
#[macro_use]
extern crate log;
use std::io::{prelude::*, stdout, BufWriter, ErrorKind};

use anyhow::Result;
use clap::Parser;

mod cli;
mod filter;
mod pipeline;
mod reader;
mod record;

use cli::Cli;
use filter::FilterSpec;
use reader::ReadErr;
use record::WriteErr;

/// Returns true if any error in the chain is a broken pipe, i.e. the consumer of our output
/// (such as `head`) has exited.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        let io_err = if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            Some(e)
        } else if let Some(WriteErr::Io(e)) = cause.downcast_ref::<WriteErr>() {
            Some(e)
        } else if let Some(ReadErr::Io(e)) = cause.downcast_ref::<ReadErr>() {
            Some(e)
        } else {
            None
        };
        io_err.is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
    })
}

fn try_main(cli: &Cli) -> Result<()> {
    debug!("fastfilter v{}", cli::VERSION);

    // the filter is built before the input is touched, so configuration errors are
    // reported without any output
    let spec = FilterSpec::new(&cli.filter_opts())?;
    debug!("Active filters: {:?}", spec.predicates());

    let mut writer = BufWriter::new(stdout().lock());
    let summary = pipeline::run(&cli.file, &spec, cli.fasta, &mut writer)?;
    writer.flush()?;

    info!(
        "Kept {} of {} records from {}",
        summary.kept, summary.read, cli.file
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();

    if let Err(err) = try_main(&cli) {
        if is_broken_pipe(&err) {
            return;
        }

        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
