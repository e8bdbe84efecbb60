//! assfc CLI: scan ASS subtitles and report required fonts.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use assfc_core::discovery::SubtitleDiscovery;
use assfc_core::enumerate::{FcListEnumeration, FontDirEnumeration};
use assfc_core::index::FontIndex;
use assfc_core::output::{report_rows, write_json_pretty, write_ndjson, FontReportRow};
use assfc_core::registry::DependencyRegistry;

/// CLI entrypoint for assfc.
#[derive(Debug, Parser)]
#[command(
    name = "assfc",
    about = "Font dependency checker for ASS subtitles: which fonts do these files need, and are they installed?"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan subtitle files and report required fonts
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Subtitle files or directories to scan for .ass files
    #[arg(value_hint = ValueHint::AnyPath, required_unless_present = "stdin_paths")]
    paths: Vec<PathBuf>,

    /// Read newline-delimited paths from STDIN
    #[arg(long = "stdin-paths", action = ArgAction::SetTrue)]
    stdin_paths: bool,

    /// Follow symlinks while walking directories
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Read installed fonts from these directories instead of asking fc-list
    #[arg(long = "font-dirs", value_delimiter = ',', value_hint = ValueHint::DirPath)]
    font_dirs: Vec<PathBuf>,

    /// Read installed fonts from the platform's system font directories
    #[arg(long = "system-fonts", action = ArgAction::SetTrue, conflicts_with = "font_dirs")]
    system_fonts: bool,

    /// Only report fonts that are not installed
    #[arg(long = "missing-only", action = ArgAction::SetTrue)]
    missing_only: bool,

    /// List the files that use this font family, then exit
    #[arg(long = "font", value_name = "FAMILY", conflicts_with = "file")]
    font: Option<String>,

    /// List the font families this file needs, then exit
    #[arg(long = "file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns with the files using each font
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => run_check(args),
    }
}

fn run_check(args: CheckArgs) -> Result<()> {
    let stdin = io::stdin();
    let files = gather_subtitles(
        &args.paths,
        args.stdin_paths,
        args.follow_symlinks,
        stdin.lock(),
    )?;

    let index = build_index(&args)?;
    let mut registry = DependencyRegistry::new(index);
    registry.add_files(files);
    registry.scan();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };

    let queries = registry.queries();

    if let Some(font) = &args.font {
        for file in queries.files_for(font) {
            writeln!(handle, "{file}")?;
        }
        return Ok(());
    }

    if let Some(file) = &args.file {
        for font in queries.fonts_for(file) {
            writeln!(handle, "{font}")?;
        }
        return Ok(());
    }

    let mut rows = report_rows(&queries);
    if args.missing_only {
        rows.retain(|row| !row.installed);
    }

    if args.ndjson {
        write_ndjson(&rows, &mut handle)?;
    } else if args.json {
        write_json_pretty(&rows, &mut handle)?;
    } else if args.columns {
        write_columns(&rows, &mut handle, use_color)?;
    } else {
        write_plain(&rows, &mut handle, use_color)?;
    }

    Ok(())
}

fn build_index(args: &CheckArgs) -> Result<FontIndex> {
    if !args.font_dirs.is_empty() {
        let source = FontDirEnumeration::new(args.font_dirs.iter().cloned())
            .follow_symlinks(args.follow_symlinks);
        return Ok(FontIndex::build(&source));
    }

    if args.system_fonts {
        return Ok(FontIndex::build(&FontDirEnumeration::system()?));
    }

    Ok(FontIndex::build(&FcListEnumeration))
}

fn gather_subtitles(
    raw_paths: &[PathBuf],
    read_stdin: bool,
    follow_symlinks: bool,
    mut stdin: impl BufRead,
) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();

    if read_stdin {
        roots.extend(read_paths_from(&mut stdin)?);
    }

    for path in raw_paths {
        if path == Path::new("-") {
            roots.extend(read_paths_from(&mut stdin)?);
        } else {
            roots.push(path.clone());
        }
    }

    if roots.is_empty() {
        return Err(anyhow!("no subtitle paths provided"));
    }

    SubtitleDiscovery::new(roots)
        .follow_symlinks(follow_symlinks)
        .discover()
}

fn read_paths_from(reader: &mut impl BufRead) -> Result<Vec<PathBuf>> {
    let mut buf = String::new();
    let mut paths = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }

        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

fn write_plain(rows: &[FontReportRow], mut w: impl Write, color: bool) -> Result<()> {
    for row in rows {
        let (mark, code) = status_mark(row.installed);
        let rendered = apply_color(mark, color, code);
        writeln!(w, "{rendered} {}", row.family)?;
    }
    Ok(())
}

fn write_columns(rows: &[FontReportRow], mut w: impl Write, color: bool) -> Result<()> {
    let family_width = rows
        .iter()
        .map(|r| r.family.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(0, 80);

    for row in rows {
        let (mark, code) = status_mark(row.installed);
        let padded = format!("{:<family_width$}", row.family);
        let rendered_mark = apply_color(mark, color, code);
        let rendered_family = apply_color(&padded, color, AnsiColor::Cyan);
        let files = row.files.join(", ");

        writeln!(w, "{rendered_mark} {rendered_family}  {files}")?;
    }

    Ok(())
}

fn status_mark(installed: bool) -> (&'static str, AnsiColor) {
    if installed {
        ("✔", AnsiColor::Green)
    } else {
        ("✖", AnsiColor::Red)
    }
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Green,
    Red,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Green => "32",
        AnsiColor::Red => "31",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
