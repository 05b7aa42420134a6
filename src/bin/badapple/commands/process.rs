use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use badapple::db::DbCon;
use badapple::io::{MolReader, MolWriter};
use badapple::process_mols;

use crate::config::{InputPath, RunConfig};
use crate::display::{Context as DisplayContext, Progress, print_banner};

pub fn run_process<R: BufRead, W: Write>(
    db: &mut DbCon,
    config: &RunConfig,
    reader: MolReader<R>,
    writer: &mut MolWriter<W>,
    ctx: DisplayContext,
) -> Result<()> {
    if ctx.interactive {
        print_banner();
    }
    if let Some(input) = &config.input {
        let source = match &input.path {
            InputPath::File(path) => path.display().to_string(),
            InputPath::Stdin => "stdin".to_string(),
        };
        info!(format = %input.format, "reading molecules from {source}");
    }

    let mut progress = Progress::new(ctx.interactive);
    let result = process_mols(db, &config.process, reader, writer, |stats| {
        progress.update(stats)
    });

    match result {
        Ok(stats) => {
            progress.finish(&stats);
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e).context("Processing failed")
        }
    }
}
