//! dircrawl - Crawl a directory tree into a relational table.
//!
//! Usage:
//!   dircrawl --dirname DIR --outputtable LIB.NAME [--followsymlinks B]
//!            [--skipqsyslib B] [--printsql B] [--database FILE]
//!   dircrawl size --dirname NAME [--dirtype ifs|library] [--listfiles B]
//!   dircrawl --help
//!
//! Every run prints a start/end banner with `ExitCode:` and `ExitMessage:`
//! lines. Any fatal condition exits with code 99.

mod crawl;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use dircrawl_core::{
    CrawlConfig, CrawlError, CrawlStats, DEFAULT_DATABASE, TableName, library_path,
};
use dircrawl_scan::{SizeReport, directory_size};
use dircrawl_store::open_database;

/// Exit code for any fatal condition.
const FAILURE_EXIT_CODE: u8 = 99;

const SUCCESS_MESSAGE: &str = "Completed successfully";

const RULE: &str =
    "-------------------------------------------------------------------------------";

#[derive(Parser)]
#[command(
    name = "dircrawl",
    version,
    about = "Crawl a directory tree into a database table",
    long_about = "dircrawl records every file and directory under a root into a \
                  table so sizes and ages can be analyzed with SQL.\n\n\
                  The table is dropped and recreated on every run.",
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Top level directory to crawl
    #[arg(long, value_name = "DIR", required = true)]
    dirname: Option<PathBuf>,

    /// Destination table (e.g. TMP.DIRCRAWL)
    #[arg(long, value_name = "LIBRARY.NAME", required = true, value_parser = TableName::parse)]
    outputtable: Option<TableName>,

    /// Follow symbolic links to directories
    #[arg(
        long,
        value_name = "BOOL",
        value_parser = parse_flag,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    followsymlinks: bool,

    /// Skip entries under /QSYS.LIB
    #[arg(
        long,
        value_name = "BOOL",
        value_parser = parse_flag,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    skipqsyslib: bool,

    /// Print each insert statement
    #[arg(
        long,
        value_name = "BOOL",
        value_parser = parse_flag,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    printsql: bool,

    /// SQLite database file holding the table
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DATABASE)]
    database: PathBuf,

    /// Debug-level diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sum the size of every file under a directory
    Size {
        /// Directory path, or a library name with --dirtype library
        #[arg(long, value_name = "NAME")]
        dirname: String,

        /// How to interpret --dirname
        #[arg(long, value_enum, default_value_t = DirType::Ifs)]
        dirtype: DirType,

        /// List each file with its size and the running total
        #[arg(
            long,
            value_name = "BOOL",
            value_parser = parse_flag,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_value = "false",
            default_missing_value = "true"
        )]
        listfiles: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum DirType {
    /// A plain filesystem path
    #[default]
    Ifs,
    /// A library name under /QSYS.LIB
    #[value(alias = "lib")]
    Library,
}

fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("Unable to install error reporter: {err}");
    }

    println!("{RULE}");
    println!("Crawl directory to database table/outfile");
    println!("Start of Main Processing - {}", clock());
    println!("OS:{}", std::env::consts::OS);

    let outcome = match Cli::try_parse() {
        Ok(cli) => {
            setup_logging(cli.verbose);
            execute(cli)
        }
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            Ok(())
        }
        Err(err) => Err(eyre!("Command line argument error: {}", err.render())),
    };

    let (code, message) = match outcome {
        Ok(()) => (0, SUCCESS_MESSAGE.to_string()),
        Err(report) => {
            println!("Traceback Info");
            eprintln!("{report:?}");
            (FAILURE_EXIT_CODE, report.to_string())
        }
    };

    println!("ExitCode:{code}");
    println!("ExitMessage:{message}");
    println!("End of Main Processing - {}", clock());
    println!("{RULE}");

    ExitCode::from(code)
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Size {
            dirname,
            dirtype,
            listfiles,
        }) => run_size(&dirname, dirtype, listfiles),
        None => {
            let dirname = cli
                .dirname
                .ok_or_else(|| CrawlError::invalid_argument("--dirname is required"))?;
            let table = cli
                .outputtable
                .ok_or_else(|| CrawlError::invalid_argument("--outputtable is required"))?;

            println!("Top level dir: {}", dirname.display());
            println!("Output table: {table}");
            println!("Database: {}", cli.database.display());
            println!("Follow symbolic links: {}", cli.followsymlinks);
            println!("Skip /QSYS.LIB path: {}", cli.skipqsyslib);
            println!("Print SQL statements: {}", cli.printsql);

            let config = CrawlConfig::builder()
                .root(dirname)
                .table(table)
                .database(cli.database)
                .follow_symlinks(cli.followsymlinks)
                .skip_library_namespace(cli.skipqsyslib)
                .print_sql(cli.printsql)
                .build()?;

            run_crawl(&config)
        }
    }
}

/// Crawl into the configured table and print the summary.
fn run_crawl(config: &CrawlConfig) -> Result<()> {
    let started = Instant::now();

    let conn = open_database(&config.database)
        .map_err(|e| CrawlError::database(&config.database, e))?;
    let stats = crawl::run(config, &conn)?;

    print_summary(&stats, started);
    Ok(())
}

fn print_summary(stats: &CrawlStats, started: Instant) {
    println!("Directory count: {}", stats.dir_count);
    println!("File count: {}", stats.file_count);
    println!(
        "Total file size: {} ({})",
        stats.total_size,
        format_size(stats.total_size)
    );
    if let Some((path, size)) = &stats.largest_file {
        println!("Largest file: {} ({})", path.display(), format_size(*size));
    }
    println!("Elapsed: {:.2}s", started.elapsed().as_secs_f64());
}

/// Sum a directory and print the total.
fn run_size(dirname: &str, dirtype: DirType, listfiles: bool) -> Result<()> {
    let root = match dirtype {
        DirType::Ifs => PathBuf::from(dirname),
        DirType::Library => library_path(dirname),
    };

    println!("IFS dir path to list: {}", root.display());
    let report = list_directory_size(&root, listfiles, &mut io::stdout().lock())?;
    println!("Total Size: {} bytes", report.total_size);
    Ok(())
}

/// Sum `root`, writing a `filepath|filesize|totalsize` row per file when
/// `listfiles` is set. The header row only appears ahead of the first file.
fn list_directory_size<W: Write>(
    root: &Path,
    listfiles: bool,
    out: &mut W,
) -> Result<SizeReport> {
    let mut written: io::Result<()> = Ok(());
    let mut header_pending = true;

    let report = directory_size(root, |path, size, total| {
        if !listfiles || written.is_err() {
            return;
        }
        if header_pending {
            header_pending = false;
            written = writeln!(out, "filepath|filesize|totalsize");
        }
        if written.is_ok() {
            written = writeln!(out, "{}|{}|{}", path.display(), size, total);
        }
    })?;

    written?;
    Ok(report)
}

/// Parse a yes/no style flag value.
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "f" | "no" | "n" | "0" | "off" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dircrawl=debug,warn")
        } else {
            EnvFilter::new("dircrawl=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Wall-clock time for the banner lines.
fn clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        for value in ["true", "T", "yes", "Y", "1", "on"] {
            assert_eq!(parse_flag(value), Ok(true), "{value}");
        }
        for value in ["false", "F", "no", "N", "0", "OFF"] {
            assert_eq!(parse_flag(value), Ok(false), "{value}");
        }
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_crawl_args() {
        let cli = Cli::try_parse_from([
            "dircrawl",
            "--dirname",
            "/tmp",
            "--outputtable=tmp.dircrawl",
            "--followsymlinks",
            "--skipqsyslib",
            "no",
        ])
        .unwrap();

        assert_eq!(cli.dirname, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.outputtable.unwrap().to_string(), "TMP.DIRCRAWL");
        assert!(cli.followsymlinks);
        assert!(!cli.skipqsyslib);
        assert!(!cli.printsql);
        assert_eq!(cli.database, PathBuf::from(DEFAULT_DATABASE));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_missing_required_args_rejected() {
        assert!(Cli::try_parse_from(["dircrawl", "--dirname", "/tmp"]).is_err());
        assert!(Cli::try_parse_from(["dircrawl", "--outputtable", "A.B"]).is_err());
    }

    #[test]
    fn test_malformed_table_rejected() {
        let result = Cli::try_parse_from([
            "dircrawl",
            "--dirname",
            "/tmp",
            "--outputtable",
            "A.B.C",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_subcommand() {
        let cli = Cli::try_parse_from([
            "dircrawl",
            "size",
            "--dirname",
            "qgpl",
            "--dirtype",
            "lib",
            "--listfiles=yes",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Size {
                dirname,
                dirtype,
                listfiles,
            }) => {
                assert_eq!(dirname, "qgpl");
                assert!(matches!(dirtype, DirType::Library));
                assert!(listfiles);
            }
            None => panic!("expected size subcommand"),
        }
    }

    #[test]
    fn test_size_listing_header_precedes_first_file() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.bin"), vec![0u8; 7]).unwrap();
        std::fs::write(temp.path().join("b.bin"), vec![0u8; 5]).unwrap();

        let mut out = Vec::new();
        let report = list_directory_size(temp.path(), true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(report.total_size, 12);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "filepath|filesize|totalsize");
        assert!(lines[1].ends_with("a.bin|7|7"));
        assert!(lines[2].ends_with("b.bin|5|12"));
    }

    #[test]
    fn test_size_listing_empty_directory_has_no_header() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("empty")).unwrap();

        let mut out = Vec::new();
        let report = list_directory_size(temp.path(), true, &mut out).unwrap();

        assert_eq!(report.file_count, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_size_listing_off_writes_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.bin"), "abc").unwrap();

        let mut out = Vec::new();
        let report = list_directory_size(temp.path(), false, &mut out).unwrap();

        assert_eq!(report.total_size, 3);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_size_missing_directory_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(run_size(&missing.to_string_lossy(), DirType::Ifs, false).is_err());
    }

    #[test]
    fn test_execute_writes_database() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("tree");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "0123456789").unwrap();
        let db = temp.path().join("crawl.db");
        let root_arg = root.to_string_lossy().into_owned();
        let db_arg = db.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from([
            "dircrawl",
            "--dirname",
            root_arg.as_str(),
            "--outputtable",
            "TMP.DIRCRAWL",
            "--database",
            db_arg.as_str(),
        ])
        .unwrap();
        execute(cli).unwrap();

        let conn = rusqlite::Connection::open(&db).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM \"TMP.DIRCRAWL\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }
}
