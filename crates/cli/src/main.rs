//! CLI for building reveal.js decks from HTML fragments and exporting notebooks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nbkit_core::{
    Destination, Presentation, PresentationConfig, Redirect, SessionLock, SlideContext, Timer,
};
use nbkit_export::{ExportFormat, ExportOptions, ExportRequest, Exporter};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Build slide decks and export notebooks.
#[derive(Parser, Debug)]
#[command(name = "nbkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a reveal.js deck. Files become slides, directories become
    /// vertical stacks of their files.
    Deck(DeckArgs),

    /// Export a notebook through nbconvert.
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
struct DeckArgs {
    /// Slide files (.html fragments or text) and directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file name (default: generated)
    #[arg(short, long)]
    name: Option<String>,

    /// reveal.js CDN base URL
    #[arg(long)]
    cdn: Option<String>,

    /// reveal.js version
    #[arg(long)]
    reveal_version: Option<String>,

    /// JSON presentation config; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ExportArgs {
    /// Notebook to convert (quotes and missing .ipynb are handled)
    #[arg(required = true)]
    notebook: Vec<String>,

    /// Target format: custom, html, latex, markdown, notebook, pdf, python, rst, script, slides
    #[arg(long, default_value = "html")]
    to: ExportFormat,

    /// Template file from the template directory (default: lowest sorting)
    #[arg(short, long)]
    template: Option<String>,

    /// Directory holding .tpl templates
    #[arg(long, default_value = nbkit_export::exporter::DEFAULT_TEMPLATE_DIR)]
    template_dir: PathBuf,

    /// Program providing the nbconvert subcommand
    #[arg(long, default_value = "jupyter")]
    converter: String,

    /// Where converter output goes: console, file, or buffer
    #[arg(long, default_value = "console")]
    output_to: Destination,

    /// Print the command without running it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let (result, timer) = Timer::time(|| match &args.command {
        Command::Deck(deck) => build_deck(deck, SessionLock::global()),
        Command::Export(export) => export_notebook(export),
    });

    if args.verbose {
        eprintln!("Finished in {}", timer.show());
    }

    result
}

/// Build a deck from the input files and print where it was written.
fn build_deck(args: &DeckArgs, lock: SessionLock) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PresentationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PresentationConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(name) = &args.name {
        config.name = Some(name.clone());
    }
    if let Some(cdn) = &args.cdn {
        config.cdn = cdn.clone();
    }
    if let Some(version) = &args.reveal_version {
        config.version = version.clone();
    }

    let mut deck = Presentation::open_on(config, lock).context("Failed to open presentation")?;

    for input in &args.inputs {
        log::debug!("Adding {}", input.display());
        deck.slide(|s| fill_slide(s, input));
    }

    let path = match deck.finish() {
        Ok(path) => path,
        Err(e) => {
            deck.destroy();
            return Err(e).context("Failed to write presentation");
        }
    };
    println!("{}", path.display());
    Ok(())
}

/// Fill a slide from a file, or a stack of slides from a directory.
fn fill_slide(slide: &mut SlideContext<'_>, input: &Path) -> nbkit_core::Result<()> {
    if input.is_dir() {
        write_title(slide, input)?;
        return add_stack(slide, input);
    }

    let content = fs::read_to_string(input)?;
    if is_html(input) {
        slide.set_figure(content);
    } else {
        write!(slide, "{}", content.trim_end())?;
    }
    Ok(())
}

/// Add a directory's entries as sub-slides of `slide`.
///
/// Sub-directories cannot nest any deeper, so each one contributes a title
/// panel followed by its own entries, all in the same stack.
fn add_stack(slide: &mut SlideContext<'_>, dir: &Path) -> nbkit_core::Result<()> {
    for entry in sorted_entries(dir)? {
        if entry.is_dir() {
            slide.slide(|s| write_title(s, &entry));
            add_stack(slide, &entry)?;
        } else {
            slide.slide(|s| fill_slide(s, &entry));
        }
    }
    Ok(())
}

/// A directory's own panel: its name.
fn write_title(slide: &mut SlideContext<'_>, dir: &Path) -> nbkit_core::Result<()> {
    if let Some(title) = dir.file_name().and_then(|n| n.to_str()) {
        write!(slide, "{}", title)?;
    }
    Ok(())
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Run (or print) the nbconvert command for a notebook.
fn export_notebook(args: &ExportArgs) -> Result<()> {
    let exporter = Exporter::new(ExportOptions {
        converter: args.converter.clone(),
        template_dir: args.template_dir.clone(),
        ..ExportOptions::default()
    });

    let request = ExportRequest {
        notebook: args.notebook.clone(),
        to: args.to,
        template: args.template.clone(),
    };

    let plan = exporter.plan(&request)?;
    if args.dry_run {
        println!("{}", plan);
        return Ok(());
    }

    let output = exporter
        .run(&plan)
        .with_context(|| format!("Failed to export {}", plan.notebook.display()))?;

    let mut redirect = Redirect::open(args.output_to.clone())?;
    redirect.out().write_all(output.stdout.as_bytes())?;
    redirect.err().write_all(output.stderr.as_bytes())?;
    let captured = redirect.close()?;
    if !captured.stdout.is_empty() || !captured.stderr.is_empty() {
        log::debug!("Converter stdout:\n{}", captured.stdout);
        log::debug!("Converter stderr:\n{}", captured.stderr);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html(Path::new("fig.html")));
        assert!(is_html(Path::new("fig.HTM")));
        assert!(!is_html(Path::new("notes.txt")));
        assert!(!is_html(Path::new("README")));
    }

    #[test]
    fn test_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();

        let entries = sorted_entries(dir.path()).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_parse_export_args() {
        let args = Args::parse_from([
            "nbkit", "export", "My", "Talk", "--to", "slides", "--output-to", "buffer", "--dry-run",
        ]);
        match args.command {
            Command::Export(export) => {
                assert_eq!(export.notebook, vec!["My", "Talk"]);
                assert_eq!(export.to, ExportFormat::Slides);
                assert_eq!(export.output_to, Destination::Buffer);
                assert!(export.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_build_deck_from_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let intro = dir.path().join("01-intro.txt");
        fs::write(&intro, "Hello deck\n").unwrap();
        let stack = dir.path().join("02-details");
        fs::create_dir(&stack).unwrap();
        fs::write(stack.join("a.html"), "<svg id='a'></svg>").unwrap();
        fs::write(stack.join("b.txt"), "second panel").unwrap();

        let out = dir.path().join("out");
        let args = DeckArgs {
            inputs: vec![intro, stack],
            output: Some(out.clone()),
            name: Some("deck.slides.html".to_string()),
            cdn: None,
            reveal_version: Some("3.0.0".to_string()),
            config: None,
        };

        build_deck(&args, SessionLock::new()).unwrap();

        let html = fs::read_to_string(out.join("deck.slides.html")).unwrap();
        assert!(html.contains("Hello&nbsp;deck"));
        assert!(html.contains("<svg id='a'></svg>"));
        assert!(html.contains("second&nbsp;panel"));
        assert!(html.contains("reveal.js/3.0.0"));
        assert!(html.find("02-details").unwrap() < html.find("<svg id='a'>").unwrap());
        assert!(html.find("<svg id='a'>").unwrap() < html.find("second&nbsp;panel").unwrap());
    }

    #[test]
    fn test_nested_directories_flatten_into_stack() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        let sub = top.join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(top.join("a.txt"), "topcontent").unwrap();
        fs::write(sub.join("deep.txt"), "deepcontent").unwrap();

        let out = dir.path().join("out");
        let args = DeckArgs {
            inputs: vec![top],
            output: Some(out.clone()),
            name: Some("nested.slides.html".to_string()),
            cdn: None,
            reveal_version: None,
            config: None,
        };

        build_deck(&args, SessionLock::new()).unwrap();

        let html = fs::read_to_string(out.join("nested.slides.html")).unwrap();
        let top_content = html.find("topcontent").unwrap();
        let sub_title = html.find(">\n                sub\n").unwrap();
        let deep = html.find("deepcontent").unwrap();
        assert!(top_content < sub_title && sub_title < deep);
    }
}
