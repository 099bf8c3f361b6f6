use clap::Parser;
use core::num::NonZeroUsize;
use serverless_corpus_stats::analysis::{
    generate_all, AnalysisError, AnalysisSettings, DEFAULT_FILES_WINDOW, DEFAULT_FUNCTION_BINS,
    DEFAULT_LANGUAGE_TOP_N, DEFAULT_LINES_OF_CODE_WINDOW, DEFAULT_TOP_K,
};
use serverless_corpus_stats::common::{OutputFormat, TableWriter};
use serverless_corpus_stats::parsing::parse_corpus;
use serverless_corpus_stats::taxonomy::Taxonomies;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type Result<T> = core::result::Result<T, AnalysisError>;

/// Generate the chart tables of a serverless application corpus
#[derive(Parser, Debug)]
#[command(name = "corpus-stats", version)]
struct Cli {
    /// Corpus export (`.json`, or `.json.zst` for zstd compressed)
    corpus: PathBuf,

    /// Directory the tables are written into
    #[arg(short, long, default_value = "charts")]
    output: PathBuf,

    /// TOML file overriding the built-in taxonomies
    #[arg(long, env = "CORPUS_STATS_TAXONOMIES")]
    taxonomies: Option<PathBuf>,

    /// Labels kept per bar of the cross tabulations, including `Other`
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: NonZeroUsize,

    /// Rolling window over applications ordered by number of files
    #[arg(long, default_value_t = DEFAULT_FILES_WINDOW)]
    window: NonZeroUsize,

    /// Rolling window over applications ordered by lines of code
    #[arg(long, default_value_t = DEFAULT_LINES_OF_CODE_WINDOW)]
    loc_window: NonZeroUsize,

    /// Buckets of the function count histogram, including the overflow bucket
    #[arg(long, default_value_t = DEFAULT_FUNCTION_BINS)]
    function_bins: NonZeroUsize,

    /// Languages kept in the language breakdown
    #[arg(long, default_value_t = DEFAULT_LANGUAGE_TOP_N)]
    language_top_n: usize,

    /// Representations written for every table
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,
}

impl Cli {
    fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            top_k: self.top_k,
            files_window: self.window,
            lines_of_code_window: self.loc_window,
            function_bins: self.function_bins,
            language_top_n: self.language_top_n,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let taxonomies = match &cli.taxonomies {
        Some(path) => {
            info!(path = %path.display(), "loading taxonomies");
            Taxonomies::load_overlay(path)?
        }
        None => Taxonomies::builtin(),
    };

    let repositories = parse_corpus(&cli.corpus)?;
    let writer = TableWriter::new(&cli.output, cli.format)?;
    generate_all(&repositories, &taxonomies, &cli.settings(), &writer)?;

    info!(output = %cli.output.display(), "done");
    Ok(())
}
