//! Command-line interface for knit
//!
//! Compiles pattern sources (or a saved AST, or a saved session) into an
//! engine and opens the step-through viewer on it.
//!
//! Usage:
//!   knit hat.knit                    - compile and view
//!   knit --dump lines hat.knit       - print a pipeline stage and exit
//!   knit --ast hat.json --no-run a.knit b.knit
//!   knit --inform states hat.states.json

use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use knit::knit::ast::{self, SerializationError};
use knit::knit::engine::{Engine, EngineError};
use knit::knit::lexer::{LexError, TokenKind};
use knit::knit::logging::{self, LoggingError, LOG_LEVEL_ENV};
use knit::knit::parser::ParseError;
use knit::knit::processor::{self, DumpFormat, InputForm, ProcessingError};
use ratatui::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

mod app;
mod model;
mod theme;
mod ui;


use app::App;
use model::Model;

#[derive(Parser, Debug)]
#[command(name = "knit", version)]
#[command(about = "Compile knitting patterns and step through them row by row")]
struct Args {
    /// Pattern sources, concatenated in order; or one AST / snapshot file
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// What the inputs are: knit, ast or states
    #[arg(long, alias = "inf", default_value = "knit", value_parser = InputForm::from_string)]
    inform: InputForm,

    /// Write the parsed pattern as JSON to FILE
    #[arg(long, value_name = "FILE")]
    ast: Option<PathBuf>,

    /// Session snapshot: written after compiling and by the viewer
    #[arg(long, value_name = "FILE")]
    states: Option<PathBuf>,

    /// Stop after writing outputs instead of opening the viewer
    #[arg(long, alias = "norun")]
    no_run: bool,

    /// Print a pipeline stage and exit: tokens, ast-json, ast-yaml, lines or states
    #[arg(long, value_name = "STAGE", value_parser = DumpFormat::from_string)]
    dump: Option<DumpFormat>,

    /// Log filter, e.g. `debug` or `knit::knit::engine=trace`
    #[arg(long, alias = "ll", value_name = "LEVEL", env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    /// Stamp log lines with the time since startup
    #[arg(long)]
    timer: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("viewer failed: {0}")]
    Viewer(#[from] io::Error),
}

impl CliError {
    /// 1 generic, 2 options, 3 filesystem, 4 lexer, 5 parser, 6 run
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Logging(_) => 2,
            CliError::Viewer(_) => 6,
            CliError::Processing(e) => match e {
                ProcessingError::InvalidFormat(_)
                | ProcessingError::InvalidInputForm(_)
                | ProcessingError::Unsupported { .. }
                | ProcessingError::InputCount { .. }
                | ProcessingError::Lex(LexError::NoSources) => 2,
                ProcessingError::Lex(LexError::Unreadable { .. })
                | ProcessingError::Serialization(SerializationError::Io { .. })
                | ProcessingError::Engine(EngineError::Io { .. }) => 3,
                ProcessingError::Parse(ParseError::Unexpected {
                    found: TokenKind::Illegal,
                    ..
                }) => 4,
                ProcessingError::Parse(_) | ProcessingError::Serialization(_) => 5,
                ProcessingError::Engine(EngineError::Json { .. }) => 1,
                ProcessingError::Flatten(_) | ProcessingError::Engine(_) => 6,
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    logging::init(args.log_level.as_deref(), args.timer)?;
    debug!(?args, "starting");
    args.inform.check_inputs(&args.inputs)?;

    if let Some(format) = args.dump {
        print!("{}", processor::dump(format, args.inform, &args.inputs)?);
        return Ok(());
    }

    let engine = compile(&args)?;
    if args.no_run {
        return Ok(());
    }

    let first = &args.inputs[0];
    let engine = if engine.states_file().is_some() {
        engine
    } else {
        engine.with_states_file(processor::default_states_path(args.inform, first))
    };
    let mut app = App::new(Model::new(engine, display_name(first)));
    run_viewer(&mut app)?;

    // Leaving the viewer always saves
    app.model.into_engine().save().map_err(ProcessingError::from)?;
    Ok(())
}

/// Build the engine and write whatever outputs were asked for
fn compile(args: &Args) -> Result<Engine, ProcessingError> {
    let engine = match args.inform {
        InputForm::States => Engine::load(&args.inputs[0])?,
        InputForm::Knit | InputForm::Ast => {
            let block = processor::load_block(args.inform, &args.inputs)?;
            if let Some(path) = &args.ast {
                ast::write_json(&block, path)?;
            }
            processor::compile_block(&block)?
        }
    };
    match &args.states {
        Some(path) => {
            let engine = engine.with_states_file(path);
            engine.save()?;
            Ok(engine)
        }
        None => Ok(engine),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_viewer(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
