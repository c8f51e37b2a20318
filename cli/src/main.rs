#[macro_use]
extern crate log;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use suffix_tree::SuffixTree;

// CLI tools
use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use structopt::StructOpt;

/// Times substring queries on suffix trees over random strings of growing length.
///
/// Every run prints `<length> <seconds>` to stdout, the time taken to look
/// up the generated string without its first byte.
#[derive(StructOpt)]
#[structopt(name = "suffix-tree-bench")]
struct CliInput {
    /// Length of the first generated string, must be positive
    #[structopt(long, default_value = "2")]
    start: f64,

    /// Factor the length is multiplied by between runs
    #[structopt(short, long, default_value = "1.2")]
    growth: f64,

    /// Longest string to generate
    #[structopt(short, long = "max-len", default_value = "1000000")]
    max_len: f64,

    /// Seed for the string generator, a random one is used if not given
    #[structopt(long)]
    seed: Option<u64>,

    /// Terminator appended to every generated string, must be ASCII and neither `a` nor `b`
    #[structopt(short, long, default_value = "$")]
    terminator: char,

    /// Number of random substrings to check against each tree (in parallel) after timing it
    #[structopt(long, default_value = "0")]
    verify: usize,

    /// Also write the log to this file
    #[structopt(long = "log-file", parse(from_os_str))]
    log_file: Option<PathBuf>,

    /// More log output, -v for debug and -vv for trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = CliInput::from_args();
    init_logging(args.verbose, args.log_file.as_ref())?;

    if args.start.is_nan() || args.start <= 0.0 {
        bail!("The start length must be positive, got {}", args.start);
    }
    if args.growth <= 1.0 {
        bail!("The growth factor must be larger than 1, got {}", args.growth);
    }
    if !args.terminator.is_ascii() {
        bail!("The terminator `{}` is not a single byte", args.terminator);
    }
    let terminator = args.terminator as u8;
    if terminator == b'a' || terminator == b'b' {
        bail!("The terminator `{}` occurs in the generated strings", args.terminator);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let lengths = lengths(args.start, args.growth, args.max_len);
    info!(
        "Benchmarking {} string lengths from {} up to {}",
        lengths.len(),
        args.start,
        args.max_len
    );

    let pb = ProgressBar::new(lengths.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {wide_msg}"));

    let stopwatch = Instant::now();
    for &len in &lengths {
        pb.set_message(&format!("length {}", len));

        let s = random_string(&mut rng, len);
        let mut st = SuffixTree::with_terminator(&s, terminator)
            .with_context(|| format!("Could not create a suffix tree over {} bytes", len))?;

        let build_time = {
            let build_start = Instant::now();
            st.build()?;
            build_start.elapsed()
        };
        debug!(
            "Built tree over {} bytes with {} nodes in {:?}",
            len,
            st.node_count(),
            build_time
        );

        let query_time = time_query(&st, s.get(1..).unwrap_or(""))?;
        println!("{} {}", s.len(), query_time.as_secs_f64());

        if args.verify > 0 {
            verify(&st, &s, args.verify)
                .with_context(|| format!("Verification failed for a string of length {}", len))?;
        }

        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "{} Finished {} runs in {}",
        style("Done.").green().bold(),
        lengths.len(),
        HumanDuration(stopwatch.elapsed())
    );

    Ok(())
}

// Lengths from `start` growing geometrically while they do not exceed `max`.
// Empty unless the series actually grows.
fn lengths(start: f64, growth: f64, max: f64) -> Vec<usize> {
    let mut lengths = vec![];
    if !(start > 0.0 && growth > 1.0) {
        return lengths;
    }
    let mut i = start;
    while i <= max {
        lengths.push(i as usize);
        i *= growth;
    }
    lengths
}

// A string of `len` bytes drawn uniformly from {a, b}
fn random_string<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0, 2)))
        .collect()
}

fn time_query(st: &SuffixTree, query: &str) -> Result<Duration> {
    let stopwatch = Instant::now();
    let found = st.contains(query)?;
    let elapsed = stopwatch.elapsed();

    trace!("Query of {} bytes found: {}", query.len(), found);
    Ok(elapsed)
}

// Checks `queries` random substrings of `s` against the tree. Queries only
// read the tree, so they can all run at the same time.
fn verify(st: &SuffixTree, s: &str, queries: usize) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Ok(());
    }

    let failures = (0..queries)
        .into_par_iter()
        .filter(|_| {
            let mut rng = rand::thread_rng();
            let start = rng.gen_range(0, bytes.len());
            let end = rng.gen_range(start, bytes.len()) + 1;
            let query = &bytes[start..end];

            match st.find(query) {
                Ok(Some(offset)) => bytes.get(offset..offset + query.len()) != Some(query),
                _ => true,
            }
        })
        .count();

    if failures > 0 {
        bail!("{} of {} substrings were not located", failures, queries);
    }
    let absent = absent_symbol(st.terminator());
    if st.contains(&[absent][..])? {
        bail!("Found `{}`, which was never generated", char::from(absent));
    }

    debug!("Verified {} substrings", queries);
    Ok(())
}

// A byte that occurs neither in the generated strings nor as the terminator
fn absent_symbol(terminator: u8) -> u8 {
    if terminator == b'c' {
        b'd'
    } else {
        b'c'
    }
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Could not create log file `{}`", path.display()))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    CombinedLogger::init(loggers).context("Could not initialize the loggers")?;

    info!("Loggers initialized.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn lengths_follow_original_series() {
        assert_eq!(vec![2, 2, 2, 3, 4, 4, 5, 7, 8], lengths(2.0, 1.2, 10.0));
        assert!(lengths(11.0, 1.2, 10.0).is_empty());
    }

    #[test]
    fn lengths_without_growth_are_empty() {
        assert!(lengths(0.0, 1.2, 10.0).is_empty());
        assert!(lengths(-3.0, 1.2, 10.0).is_empty());
        assert!(lengths(2.0, 1.0, 10.0).is_empty());
        assert!(lengths(f64::NAN, 1.2, 10.0).is_empty());
    }

    #[test]
    fn verify_with_terminator_c() {
        let s = random_string(&mut StdRng::seed_from_u64(5), 2_000);
        let mut st = SuffixTree::with_terminator(&s, b'c').unwrap();
        st.build().unwrap();
        assert_eq!(b'd', absent_symbol(st.terminator()));
        assert!(verify(&st, &s, 200).is_ok());
    }

    #[test]
    fn seeded_strings_repeat() {
        let a = random_string(&mut StdRng::seed_from_u64(3), 64);
        let b = random_string(&mut StdRng::seed_from_u64(3), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn verify_random_tree() {
        let s = random_string(&mut StdRng::seed_from_u64(11), 5_000);
        let st = SuffixTree::from_text(&s).unwrap();
        assert!(verify(&st, &s, 500).is_ok());
        assert!(time_query(&st, &s[1..]).is_ok());
    }

    #[quickcheck]
    fn qc_random_string_alphabet(seed: u64, len: u16) -> bool {
        let s = random_string(&mut StdRng::seed_from_u64(seed), len as usize);
        s.len() == len as usize && s.bytes().all(|b| b == b'a' || b == b'b')
    }

    #[quickcheck]
    fn qc_lengths_grow(start: u8, max: u16) -> TestResult {
        let ls = lengths(start as f64, 1.5, max as f64);
        let in_range = ls.iter().all(|&l| l >= start as usize && l <= max as usize);
        let increasing = ls.windows(2).all(|w| w[0] <= w[1]);
        TestResult::from_bool(in_range && increasing)
    }
}
