//! Sieve command-line entrypoint.
//!
//! `sieve <corpus> [question...]` answers one question. Without a question,
//! questions are read from stdin, one per line, and answered as JSON lines.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use sieve::config::Config;
use sieve::pipeline::{Answer, Pipeline};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut config = Config::from_env()?;

    if let Some(corpus) = args.next() {
        config.corpus_path = Some(PathBuf::from(corpus));
    }
    let question = args.collect::<Vec<_>>().join(" ");

    config.validate()?;
    let corpus_path = config
        .corpus_path
        .clone()
        .context("usage: sieve <corpus> [question...] (or set SIEVE_CORPUS_PATH)")?;

    if config.embedder_path.is_none() {
        tracing::warn!("No SIEVE_EMBEDDER_PATH configured, running embedder in stub mode");
    }
    if config.reranker_path.is_none() {
        tracing::warn!("No SIEVE_RERANKER_PATH configured, running reranker in stub mode");
    }

    let pipeline = Arc::new(Pipeline::from_config(&config)?);

    let loader = Arc::clone(&pipeline);
    let stats = tokio::task::spawn_blocking(move || loader.load_path(&corpus_path)).await??;
    tracing::info!(
        chunks = stats.chunks,
        dimension = stats.dimension,
        metric = %stats.metric,
        "Sieve ready"
    );

    if !question.trim().is_empty() {
        let answer = pipeline.answer(question.trim()).await;
        print_answer(&answer)?;
        return Ok(());
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    while let Some(line) = next_line_lossy(&mut stdin, &mut buf).await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let answer = pipeline.answer(question).await;
        if let Err(e) = print_answer(&answer) {
            tracing::error!(error = %e, "Failed to write answer");
        }
    }

    Ok(())
}

fn print_answer(answer: &Answer) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(answer)?);
    Ok(())
}

/// Reads one line, replacing invalid UTF-8 instead of failing. `None` at end of input.
async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(buf);
    if matches!(line, Cow::Owned(_)) {
        tracing::warn!(bytes = buf.len(), "Input line is not valid UTF-8, decoding lossily");
    }

    Ok(Some(line.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_input() {
        let mut input: &[u8] = b"caf\xe9 question\nWhat is the capital?\n";
        let mut buf = Vec::new();

        let first = next_line_lossy(&mut input, &mut buf).await.unwrap();
        let second = next_line_lossy(&mut input, &mut buf).await.unwrap();
        let end = next_line_lossy(&mut input, &mut buf).await.unwrap();

        assert_eq!(first.as_deref(), Some("caf\u{FFFD} question\n"));
        assert_eq!(second.as_deref(), Some("What is the capital?\n"));
        assert_eq!(end, None);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let mut input: &[u8] = b"Riyadh";
        let mut buf = Vec::new();

        let line = next_line_lossy(&mut input, &mut buf).await.unwrap();

        assert_eq!(line.as_deref(), Some("Riyadh"));
    }
}
