// SPDX-License-Identifier: MIT
//
// kilo — a minimal terminal text viewer.
//
// This is the binary that wires the two crates together:
//
//   kilo-term   → raw mode, key decoding, window size, ANSI output
//   kilo-editor → text buffer, cursor, viewport, renderer, editor loop
//
// Startup order matters: raw mode first (the window-size probe needs it
// to read the cursor report unechoed), then size discovery, then the
// optional file. Every failure after that point is fatal and takes the
// same path: release raw mode, clear the screen, print what failed, and
// exit with status 1.
//
// Usage: kilo [FILE]

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use kilo_editor::buffer::TextBuffer;
use kilo_editor::editor::{self, Editor};
use kilo_editor::options::Options;
use kilo_editor::Error;

use kilo_term::input::StdinSource;
use kilo_term::output::FdWriter;
use kilo_term::terminal::{self, RawMode};

/// Install the logger if `KILO_LOG` names a file to write to.
///
/// The terminal belongs to the editor while it runs, so records can't go
/// to stderr. Without `KILO_LOG` no logger is installed at all.
fn init_logging() {
    let Some(path) = env::var_os("KILO_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("kilo: cannot open log file {}: {err}", Path::new(&path).display());
            return;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

/// Run the editor. Raw mode is held for exactly the lifetime of this call:
/// the guard is released on return, including early `?` returns.
fn run(path: Option<&Path>, options: &Options) -> Result<(), Error> {
    let raw = RawMode::enter(options.read_timeout)?;

    let mut input = StdinSource::new();
    // Not `io::stdout()`: its line buffering would split every frame at
    // the last CRLF.
    let mut stdout = FdWriter::stdout();
    let size = terminal::window_size(&mut input, &mut stdout)?;

    let buffer = match path {
        Some(path) => TextBuffer::open(path, options.tab_stop)?,
        None => TextBuffer::new(options.tab_stop),
    };

    let mut editor = Editor::new(buffer, size, options.clone());
    editor.run(&mut input, &mut stdout)?;

    raw.leave()?;
    Ok(())
}

/// Report a fatal error on a clean screen.
fn report_fatal(err: &Error) {
    log::error!("fatal: {err}");

    let _ = editor::clear_screen(&mut FdWriter::stdout());
    eprintln!("{err}");
}

fn main() {
    init_logging();

    let options = Options::from_env();
    let path = env::args_os().nth(1).map(PathBuf::from);
    log::debug!("starting with {options:?}, file {path:?}");

    let code = match run(path.as_deref(), &options) {
        Ok(()) => 0,
        Err(err) => {
            report_fatal(&err);
            1
        }
    };

    log::debug!("exiting with status {code}");
    process::exit(code);
}
