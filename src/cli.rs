use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tocmarks",
    version,
    about = "Turn the table of contents of a DOCX file into PDF bookmarks",
    args_conflicts_with_subcommands = true,
    after_help = "ToC lines look like:\n  1. Section title 5\n  1.1 Subsection 12\n  3.4.2.1 Interface description 69"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub extract: ExtractArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build `<name>_bookmarks.json` from a DOCX and embed it into the matching PDF.
    Extract(ExtractArgs),
    /// Embed an existing bookmarks JSON file into a PDF.
    Embed(EmbedArgs),
}

impl Cli {
    pub fn quiet(&self) -> bool {
        match &self.command {
            Some(Commands::Extract(args)) => args.quiet,
            Some(Commands::Embed(args)) => args.quiet,
            None => self.extract.quiet,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// DOCX file containing the table of contents.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Where to write the bookmark JSON (default: `<FILE stem>_bookmarks.json`).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// PDF to embed into (default: the `.pdf` next to FILE, if any).
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Where to write the bookmarked PDF (default: `<PDF stem>_with_bookmarks.pdf`).
    #[arg(long)]
    pub pdf_output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_embed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EmbedArgs {
    pub pdf: PathBuf,

    pub json: PathBuf,

    /// Where to write the bookmarked PDF (default: `<PDF stem>_with_bookmarks.pdf`).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the flattened `[depth, title, page]` outline instead of writing a PDF.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_argument_runs_extract() {
        let cli = Cli::try_parse_from(["tocmarks", "-q", "report.docx"]).expect("parse cli");

        assert!(cli.command.is_none());
        assert!(cli.quiet());
        assert_eq!(cli.extract.file, Some(PathBuf::from("report.docx")));
    }

    #[test]
    fn embed_subcommand_takes_pdf_and_json() {
        let cli = Cli::try_parse_from([
            "tocmarks",
            "embed",
            "report.pdf",
            "report_bookmarks.json",
            "--dry-run",
        ])
        .expect("parse cli");

        let Some(Commands::Embed(args)) = cli.command else {
            panic!("expected embed subcommand");
        };
        assert_eq!(args.pdf, PathBuf::from("report.pdf"));
        assert_eq!(args.json, PathBuf::from("report_bookmarks.json"));
        assert!(args.dry_run);
        assert!(!args.quiet);
    }

    #[test]
    fn extract_subcommand_accepts_embedding_flags() {
        let cli = Cli::try_parse_from([
            "tocmarks",
            "extract",
            "report.docx",
            "--pdf",
            "print.pdf",
            "--no-embed",
        ])
        .expect("parse cli");

        let Some(Commands::Extract(args)) = cli.command else {
            panic!("expected extract subcommand");
        };
        assert_eq!(args.pdf, Some(PathBuf::from("print.pdf")));
        assert!(args.no_embed);
    }
}
