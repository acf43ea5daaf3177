use crate::output::Indent;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "license-report",
    version,
    about = "Aggregate per-module license audit outcomes into a sorted JSON report",
    long_about = "license-report replays per-module license audit outcomes from a JSON Lines file \
through a concurrent collector and writes a deterministic report sorted by import path."
)]
pub struct Cli {
    /// JSON Lines file with one audit outcome per module
    #[arg(required = true)]
    pub input: PathBuf,

    /// Report file to overwrite (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: search the input's directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Indentation: width in spaces, or "tab"
    #[arg(long)]
    pub indent: Option<Indent>,

    /// Truncate and rewrite the report instead of replacing it atomically
    #[arg(long)]
    pub no_atomic: bool,

    /// Fail when distinct modules share an import path
    #[arg(long)]
    pub strict_paths: bool,

    /// CI mode: non-interactive output
    #[arg(long)]
    pub ci: bool,

    /// Number of audit worker threads
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_basic_args() {
        let cli = Cli::try_parse_from(["license-report", "outcomes.jsonl"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("outcomes.jsonl"));
        assert!(cli.output.is_none());
        assert!(!cli.strict_paths);
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["license-report"]).is_err());
    }

    #[test]
    fn test_parse_indent() {
        let cli =
            Cli::try_parse_from(["license-report", "--indent", "tab", "in.jsonl"]).unwrap();
        assert_eq!(cli.indent, Some(Indent::Tab));

        let cli = Cli::try_parse_from(["license-report", "--indent", "4", "in.jsonl"]).unwrap();
        assert_eq!(cli.indent, Some(Indent::Spaces(4)));

        assert!(Cli::try_parse_from(["license-report", "--indent", "wide", "in.jsonl"]).is_err());
    }

    #[test]
    fn test_parse_jobs_rejects_zero() {
        assert!(Cli::try_parse_from(["license-report", "-j", "0", "in.jsonl"]).is_err());
        let cli = Cli::try_parse_from(["license-report", "-j", "8", "in.jsonl"]).unwrap();
        assert_eq!(cli.jobs, Some(8));
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "license-report",
            "--output",
            "report.json",
            "--config",
            "cfg.yaml",
            "--no-atomic",
            "--strict-paths",
            "--ci",
            "--verbose",
            "in.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("report.json")));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.yaml")));
        assert!(cli.no_atomic);
        assert!(cli.strict_paths);
        assert!(cli.ci);
        assert!(cli.verbose);
    }
}
