//! Pullstar CLI: build indexes, run query batches, explore interactively.
//!
//! ```bash
//! # Build and persist a suffix-tree index
//! pullstar build --input corpus.txt --index suffix-tree
//!
//! # Run a query file, one expression per line, recording count and timing
//! pullstar query --input corpus.txt --index suffix-array --mode load \
//!     --executor black-box --queries queries.txt --results results.tsv
//!
//! # Interactive shell
//! pullstar shell --input corpus.txt --index suffix-tree
//! ```
//!
//! Each query line in the batch produces one `result_count \t microseconds`
//! record. A failing query logs its line number and reason to stderr, emits
//! a zero record, and the run continues.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use pullstar::cli::display::{dim, format_micros, format_size};
use pullstar::cli::{Cli, Commands, ModeArg};
use pullstar::{Corpus, IndexKind, QueryConfig, RegexQuery, TextIndex};

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Build {
            input,
            index,
            ngram_size,
        } => run_build(&input, index.into(), ngram_size),
        Commands::Query {
            input,
            index,
            mode,
            executor,
            queries,
            results,
            partial_scan,
            gap_bound,
        } => {
            let config = QueryConfig {
                executor: executor.into(),
                partial_scan,
                gap_bound,
            };
            run_query(&input, index.into(), mode, config, &queries, &results)
        }
        Commands::Shell {
            input,
            index,
            mode,
            executor,
            show,
        } => {
            let config = QueryConfig {
                executor: executor.into(),
                ..QueryConfig::default()
            };
            run_shell(&input, index.into(), mode, config, show)
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

/// Construct the requested index over the corpus file and persist it next
/// to the input under the backend's file-suffix convention.
fn build_index(input: &str, kind: IndexKind, ngram_size: u32) -> Result<TextIndex> {
    let data = fs::read(input).with_context(|| format!("reading corpus {}", input))?;
    eprintln!(
        "{}",
        dim(&format!("Read {} of corpus", format_size(data.len())))
    );
    let corpus = Arc::new(Corpus::from_bytes(&data)?);

    eprintln!("{}", dim("Constructing index..."));
    let started = Instant::now();
    let index = match kind {
        IndexKind::NGram => TextIndex::build_ngram(corpus, ngram_size)?,
        other => TextIndex::build(corpus, other)?,
    };
    eprintln!(
        "{}",
        dim(&format!(
            "Construction took {}",
            format_micros(started.elapsed().as_micros())
        ))
    );

    let path = format!("{}{}", input, kind.file_suffix());
    let mut out = BufWriter::new(
        File::create(&path).with_context(|| format!("creating index file {}", path))?,
    );
    let written = index.serialize(&mut out)?;
    out.flush()?;
    eprintln!(
        "{}",
        dim(&format!("Wrote {} to {}", format_size(written), path))
    );
    Ok(index)
}

/// Load the persisted index that sits next to the corpus file.
fn load_index(input: &str, kind: IndexKind) -> Result<TextIndex> {
    let path = format!("{}{}", input, kind.file_suffix());
    let mut reader = BufReader::new(
        File::open(&path).with_context(|| format!("opening index file {}", path))?,
    );
    let index = TextIndex::deserialize(kind, &mut reader)
        .with_context(|| format!("loading index {}", path))?;
    eprintln!("{}", dim(&format!("Loaded index from {}", path)));
    Ok(index)
}

fn obtain_index(input: &str, kind: IndexKind, mode: ModeArg) -> Result<TextIndex> {
    match mode {
        ModeArg::Build => build_index(input, kind, 3),
        ModeArg::Load => load_index(input, kind),
    }
}

fn run_build(input: &str, kind: IndexKind, ngram_size: u32) -> Result<()> {
    build_index(input, kind, ngram_size)?;
    Ok(())
}

fn run_query(
    input: &str,
    kind: IndexKind,
    mode: ModeArg,
    config: QueryConfig,
    queries: &str,
    results: &str,
) -> Result<()> {
    let index = obtain_index(input, kind, mode)?;

    let query_file =
        File::open(queries).with_context(|| format!("opening query file {}", queries))?;
    let mut out = BufWriter::new(
        File::create(results).with_context(|| format!("creating result file {}", results))?,
    );

    for (line_no, line) in BufReader::new(query_file).lines().enumerate() {
        let expression = line?;
        if expression.is_empty() {
            continue;
        }

        let started = Instant::now();
        let outcome = RegexQuery::new(&index, &expression, config).and_then(|q| q.execute());
        let micros = started.elapsed().as_micros();

        match outcome {
            Ok(matches) => {
                writeln!(out, "{}\t{}", matches.len(), micros)?;
            }
            Err(e) => {
                eprintln!("query {} [{}] failed: {}", line_no, expression, e);
                writeln!(out, "0\t{}", micros)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn run_shell(
    input: &str,
    kind: IndexKind,
    mode: ModeArg,
    config: QueryConfig,
    show: usize,
) -> Result<()> {
    let index = obtain_index(input, kind, mode)?;
    let interactive = atty::is(atty::Stream::Stdin);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            eprint!("rxshell> ");
            io::stderr().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let expression = line?;
        if expression.is_empty() {
            continue;
        }

        let started = Instant::now();
        let outcome = RegexQuery::new(&index, &expression, config).and_then(|query| {
            let matches = query.execute()?;
            eprintln!("{}", dim(&query.explain()));
            Ok(matches)
        });
        let micros = started.elapsed().as_micros();

        match outcome {
            Ok(matches) => {
                let limit = if show == 0 { matches.len() } else { show.min(matches.len()) };
                println!("Showing {} of {} results.", limit, matches.len());
                let mut preview = String::from("{");
                for m in matches.iter().take(limit) {
                    preview.push_str(&format!("{} => {}, ", m.offset, m.length));
                }
                preview.push_str("...}");
                println!("{}", preview);
                eprintln!(
                    "{}",
                    dim(&format!(
                        "Query [{}] took {}",
                        expression,
                        format_micros(micros)
                    ))
                );
            }
            Err(e) => eprintln!("query [{}] failed: {}", expression, e),
        }
    }
    Ok(())
}
