//! Handler for the `query` command.

use anyhow::{anyhow, bail, Context, Result};
use needletail::parse_fastx_file;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use bisque::{AccessMode, ClassicSearch, SearchOutcome, SearchStatus, Timer};

pub struct QueryArgs {
    pub index: PathBuf,
    pub query: Option<String>,
    pub query_file: Option<PathBuf>,
    pub threshold: f64,
    pub num_results: usize,
    pub extra_index: Vec<PathBuf>,
    pub no_mmap: bool,
    pub output: Option<PathBuf>,
}

pub fn run_query(args: QueryArgs) -> Result<()> {
    let mode = if args.no_mmap {
        AccessMode::Stream
    } else {
        AccessMode::Mmap
    };

    let mut paths = vec![args.index.clone()];
    paths.extend(args.extra_index.iter().cloned());
    let engine = ClassicSearch::open(&paths, mode).context("failed to open index")?;
    log::info!(
        "opened {} index file(s) covering {} samples",
        paths.len(),
        engine.num_samples()
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context(format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut timer = Timer::new();
    match (&args.query, &args.query_file) {
        (Some(query), None) => {
            let outcome = engine.search(query, args.threshold, args.num_results, &mut timer)?;
            report(&mut out, None, &outcome)?;
        }
        (None, Some(path)) => {
            let mut reader = parse_fastx_file(path)
                .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?;
            while let Some(record) = reader.next() {
                let record = record.map_err(|e| anyhow!("bad record in {}: {}", path.display(), e))?;
                let id = String::from_utf8_lossy(record.id()).into_owned();
                let seq = String::from_utf8_lossy(&record.seq()).into_owned();
                let outcome = engine.search(&seq, args.threshold, args.num_results, &mut timer)?;
                report(&mut out, Some(&id), &outcome)?;
            }
        }
        _ => bail!("provide a query string or --query-file"),
    }
    out.flush()?;
    log::info!("query timings:\n{}", timer);
    Ok(())
}

fn report(out: &mut dyn Write, id: Option<&str>, outcome: &SearchOutcome) -> Result<()> {
    if let Some(id) = id {
        writeln!(out, ">{}\t{}", id, outcome.hits.len())?;
    }
    if outcome.status == SearchStatus::NoKmers {
        log::warn!(
            "query{} contains no valid 31-mers",
            id.map(|i| format!(" '{}'", i)).unwrap_or_default()
        );
        return Ok(());
    }
    if outcome.ignored_kmers > 0 {
        log::info!(
            "{} of {} query windows ignored (non-ACGT bases)",
            outcome.ignored_kmers,
            outcome.kmer_count + outcome.ignored_kmers
        );
    }
    for hit in &outcome.hits {
        writeln!(out, "{}\t{}", hit.name, hit.score)?;
    }
    Ok(())
}
