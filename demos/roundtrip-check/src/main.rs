use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gvasforge::prelude::*;
use tokio::task::JoinSet;

// ---------------------------------------------------------------------------
// Round-trip check
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// Re-encoding reproduced the input exactly.
    Identical { bytes: usize, nodes: usize },
    /// Re-encoding produced different bytes, first differing at `offset`.
    Mismatch {
        offset: usize,
        original: usize,
        encoded: usize,
    },
}

fn check(bytes: &[u8]) -> Result<Outcome, GvasError> {
    let save = gvasforge::decode(bytes)?;
    let encoded = gvasforge::encode(&save)?;

    let outcome = match first_difference(bytes, &encoded) {
        None => {
            let mut nodes = 0;
            save.game_data.walk(|_, _| nodes += 1);
            Outcome::Identical {
                bytes: bytes.len(),
                nodes,
            }
        }
        Some(offset) => Outcome::Mismatch {
            offset,
            original: bytes.len(),
            encoded: encoded.len(),
        },
    };
    Ok(outcome)
}

fn check_file(path: &Path) -> Result<Outcome, GvasError> {
    let bytes = std::fs::read(path)?;
    check(&bytes)
}

/// Offset of the first byte where `a` and `b` differ, counting a length
/// difference as a difference at the end of the shorter one.
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: roundtrip-check <FILE>...");
        return ExitCode::from(2);
    }

    // Decoding is synchronous and CPU-bound; each file gets its own
    // blocking task and nothing is shared between them.
    let mut tasks = JoinSet::new();
    for path in paths {
        tasks.spawn_blocking(move || {
            let outcome = check_file(&path);
            (path, outcome)
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(Outcome::Identical { bytes, nodes }))) => {
                tracing::info!(path = %path.display(), bytes, nodes, "ok");
            }
            Ok((path, Ok(Outcome::Mismatch { offset, original, encoded }))) => {
                failures += 1;
                tracing::error!(
                    path = %path.display(),
                    original,
                    encoded,
                    "MISMATCH at byte {offset:#x}"
                );
            }
            Ok((path, Err(e))) => {
                failures += 1;
                tracing::error!(path = %path.display(), error = %e, "failed");
            }
            Err(e) => {
                failures += 1;
                tracing::error!(error = %e, "check task panicked");
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        tracing::error!(failures, "round trip failed");
        ExitCode::FAILURE
    }
}
