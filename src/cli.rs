use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;

use crate::filter::FilterOpts;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
fastfilter version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   filters sequences (inclusive or exclusive) from a fasta or fastq file
   by matching the ID line and/or by sequence length";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// fasta or fastq file to search (may be gzipped if the suffix is .gz)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// search term
    #[arg(short, long, conflicts_with = "filterfile")]
    pub query: Option<String>,

    /// file with list of query terms, one per line. only the first word of each line is used
    #[arg(short, long)]
    pub filterfile: Option<String>,

    /// removes records with the given terms (reverse of default behavior)
    #[arg(short, long, action)]
    pub reverse: bool,

    /// grep matching of query terms (default is exact match)
    #[arg(short, long, action)]
    pub grep: bool,

    /// length range, specified like 100-200 or -200 or 200-.
    /// both bounds are inclusive. a bound which cannot be parsed is ignored.
    #[arg(short, long, value_name = "RANGE", allow_hyphen_values = true, verbatim_doc_comment)]
    pub length: Option<String>,

    /// output sequences as fasta (even if fastq input)
    #[arg(long, action)]
    pub fasta: bool,

    /// increase output verbosity
    #[arg(short, long, action)]
    pub verbose: bool,
}

impl Cli {
    pub fn filter_opts(&self) -> FilterOpts {
        FilterOpts {
            query: self.query.clone(),
            filterfile: self.filterfile.clone(),
            grep: self.grep,
            reverse: self.reverse,
            length: self.length.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "fastfilter", "-q", "A", "-r", "-g", "-l", "10-", "--fasta", "-v", "seqs.fa",
        ])
        .unwrap();

        assert_eq!(cli.file, "seqs.fa");
        let opts = cli.filter_opts();
        assert_eq!(opts.query.as_deref(), Some("A"));
        assert!(opts.reverse && opts.grep);
        assert_eq!(opts.length.as_deref(), Some("10-"));
        assert!(cli.fasta && cli.verbose);
    }

    #[test]
    fn query_and_filterfile_conflict() {
        let err = Cli::try_parse_from(["fastfilter", "-q", "A", "-f", "ids.txt", "seqs.fa"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn range_with_leading_dash_is_a_value() {
        let cli = Cli::try_parse_from(["fastfilter", "-l", "-200", "seqs.fa"]).unwrap();
        assert_eq!(cli.length.as_deref(), Some("-200"));
        assert_eq!(cli.file, "seqs.fa");
    }
}
