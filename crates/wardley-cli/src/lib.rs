//! CLI logic for the Wardley map tool.
//!
//! Every command reads one map file. `check` and `render` are read-only;
//! `move` and `evolve` rewrite coordinates in place (or into `--output`)
//! without touching the rest of the file; `watch` re-renders on change.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, path::Path, sync::mpsc, time::Instant};

use log::{debug, error, info, warn};

use wardley::{
    DiagnosticError, FileWatcher, MapBuilder, MapSession, NotifyWatcher, WardleyError,
    document::Document,
};

/// Run the Wardley CLI application
///
/// # Errors
///
/// Returns `WardleyError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed lines, for `check` only
/// - Edits naming nothing in the map
/// - Rendering and watch errors
pub fn run(args: &Args) -> Result<(), WardleyError> {
    info!(input_path = args.command.input(); "Processing map");

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = MapBuilder::new(app_config);

    match &args.command {
        Command::Check { input } => check(&builder, input),
        Command::Render { input, output } => render(&builder, input, output),
        Command::Move {
            input,
            name,
            visibility,
            maturity,
            output,
        } => {
            let mut session = builder.session(fs::read_to_string(input)?);
            session
                .apply_position_edit(name, *visibility, *maturity, 0.0)
                .ok_or_else(|| WardleyError::UnknownElement(name.clone()))?;
            save_edit(&session, input, output.as_deref())
        }
        Command::Evolve {
            input,
            name,
            maturity,
            output,
        } => {
            let mut session = builder.session(fs::read_to_string(input)?);
            session
                .apply_evolve_edit(name, *maturity, 0.0)
                .ok_or_else(|| WardleyError::UnknownElement(name.clone()))?;
            save_edit(&session, input, output.as_deref())
        }
        Command::Watch { input, output } => {
            let mut watcher = NotifyWatcher::new();
            watch_with(&builder, input, output, &mut watcher)
        }
    }
}

/// One-line description of a parsed map.
pub fn summarize(doc: &Document) -> String {
    format!(
        "{}: {} elements, {} anchors, {} links, {} evolved, {} pipelines, {} errors",
        doc.title(),
        doc.elements().len(),
        doc.anchors().len(),
        doc.links().len(),
        doc.evolved().len(),
        doc.pipelines().len(),
        doc.errors().len(),
    )
}

fn check(builder: &MapBuilder, input: &str) -> Result<(), WardleyError> {
    let source = fs::read_to_string(input)?;
    let (doc, diagnostics) = builder.parse_with_diagnostics(&source);
    println!("{}", summarize(&doc));

    let (errors, warnings): (Vec<_>, Vec<_>) = diagnostics
        .into_iter()
        .partition(|diag| diag.severity().is_error());
    for warning in &warnings {
        warn!(code:? = warning.code(), line:? = warning.line(); "{}", warning.message());
    }

    if errors.is_empty() {
        info!(input; "Map is well formed");
        Ok(())
    } else {
        Err(WardleyError::new_parse_error(DiagnosticError::new(errors), source))
    }
}

fn render(builder: &MapBuilder, input: &str, output: &str) -> Result<(), WardleyError> {
    let source = fs::read_to_string(input)?;
    let doc = builder.parse(&source);
    if doc.has_errors() {
        warn!(errors = doc.errors().len(); "Skipping malformed lines, run `check` for details");
    }
    builder.export_svg(&doc, output)
}

fn save_edit(session: &MapSession, input: &str, output: Option<&str>) -> Result<(), WardleyError> {
    let target = output.unwrap_or(input);
    session.save(target)?;
    info!(output_file = target; "Map updated");
    Ok(())
}

/// Renders `input` to `output`, then again after every change `watcher`
/// reports, until the watcher drops its callback.
///
/// # Errors
///
/// Returns an error if the initial load or render fails, or if the watcher
/// cannot be started. Failures while re-rendering are logged and skipped.
pub fn watch_with(
    builder: &MapBuilder,
    input: &str,
    output: &str,
    watcher: &mut dyn FileWatcher,
) -> Result<(), WardleyError> {
    let mut session = builder.session(fs::read_to_string(input)?);
    builder.export_svg(session.document(), output)?;

    let (tx, rx) = mpsc::channel();
    watcher.watch(
        Path::new(input),
        Box::new(move |text| {
            // The receiver only goes away once watching is over.
            let _ = tx.send(text);
        }),
    )?;
    info!(input, output; "Watching for changes");

    let started = Instant::now();
    for text in rx {
        if text == session.text() {
            debug!("Content unchanged, skipping render");
            continue;
        }
        session.on_text_changed(text, started.elapsed().as_secs_f64());
        for cue in session.last_cues() {
            info!(name = cue.element_name(), new = cue.is_new(); "Element changed");
        }
        match builder.export_svg(session.document(), output) {
            Ok(()) => info!(output_file = output; "SVG refreshed"),
            Err(err) => error!(err:err; "Failed to render map"),
        }
    }

    watcher.stop();
    Ok(())
}
