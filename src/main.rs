use std::{
    fs::File,
    io::{self, BufReader},
};

use anyhow::Context;
use chunkdump::{config::read_config, dump::dump_chunks, logger};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = read_config();
    logger::init_logger(config.logger.clone())?;

    let input = std::env::args().nth(1);
    let summary = match input.as_deref() {
        None | Some("-") => {
            info!("Reading chunk stream from stdin");
            dump_chunks(io::stdin().lock(), config.chunk_size)
        }
        Some(path) => {
            info!(path, "Reading chunk stream from file");
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            dump_chunks(BufReader::new(file), config.chunk_size)
        }
    }
    .context("Failed to decode chunk stream")?;

    info!(
        chunks = summary.chunks,
        messages = summary.messages,
        header_bytes = summary.header_bytes,
        payload_bytes = summary.payload_bytes,
        "Reached end of stream"
    );
    Ok(())
}
