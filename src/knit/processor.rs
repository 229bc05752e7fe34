//! Pipeline entry points for the command line
//!
//! Stitches the stages together: sources are lexed and parsed into a
//! [`Block`] (or a block is read back from AST JSON), the block is resolved,
//! flattened and expanded into an [`Engine`], and any stage's output can be
//! dumped as text with a [`DumpFormat`].
//!
//! ```text
//! knit ─▶ tokens ─▶ Block ─▶ Resolutions ─▶ Lines ─▶ States ─▶ Engine
//!          ast json ──┘                               snapshot ──┘
//! ```

use crate::knit::ast::{self, Block, SerializationError};
use crate::knit::engine::{Engine, EngineError};
use crate::knit::lexer::{tokenize, LexError, Lexer, Source, Token, TokenKind};
use crate::knit::parser::{ParseError, Parser};
use crate::knit::semantics::{flatten, render_lines, resolve, FlattenError, Line};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// What the command line inputs are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputForm {
    /// Pattern sources, concatenated in order
    #[default]
    Knit,
    /// A single AST JSON file
    Ast,
    /// A single engine snapshot
    States,
}

impl InputForm {
    /// Parse a form name, ignoring case
    pub fn from_string(form: &str) -> Result<Self, ProcessingError> {
        match form.to_ascii_lowercase().as_str() {
            "knit" => Ok(InputForm::Knit),
            "ast" => Ok(InputForm::Ast),
            "states" => Ok(InputForm::States),
            _ => Err(ProcessingError::InvalidInputForm(form.to_string())),
        }
    }

    /// Forms other than `knit` name exactly one file
    pub fn check_inputs(&self, inputs: &[PathBuf]) -> Result<(), ProcessingError> {
        match self {
            InputForm::Knit if inputs.is_empty() => Err(ProcessingError::Lex(LexError::NoSources)),
            InputForm::Ast | InputForm::States if inputs.len() != 1 => {
                Err(ProcessingError::InputCount {
                    form: *self,
                    count: inputs.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for InputForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputForm::Knit => f.write_str("knit"),
            InputForm::Ast => f.write_str("ast"),
            InputForm::States => f.write_str("states"),
        }
    }
}

/// A pipeline stage rendered as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Tokens,
    AstJson,
    AstYaml,
    Lines,
    States,
}

impl DumpFormat {
    /// Parse a format name like "tokens" or "ast-json"
    pub fn from_string(format: &str) -> Result<Self, ProcessingError> {
        match format {
            "tokens" => Ok(DumpFormat::Tokens),
            "ast-json" => Ok(DumpFormat::AstJson),
            "ast-yaml" => Ok(DumpFormat::AstYaml),
            "lines" => Ok(DumpFormat::Lines),
            "states" => Ok(DumpFormat::States),
            _ => Err(ProcessingError::InvalidFormat(format.to_string())),
        }
    }

    pub fn available() -> &'static [DumpFormat] {
        &[
            DumpFormat::Tokens,
            DumpFormat::AstJson,
            DumpFormat::AstYaml,
            DumpFormat::Lines,
            DumpFormat::States,
        ]
    }

    /// Whether this stage can be reached from the given input form
    pub fn accepts(&self, form: InputForm) -> bool {
        match self {
            DumpFormat::Tokens => form == InputForm::Knit,
            DumpFormat::AstJson | DumpFormat::AstYaml | DumpFormat::Lines => {
                form != InputForm::States
            }
            DumpFormat::States => true,
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DumpFormat::Tokens => "tokens",
            DumpFormat::AstJson => "ast-json",
            DumpFormat::AstYaml => "ast-yaml",
            DumpFormat::Lines => "lines",
            DumpFormat::States => "states",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("invalid dump format {0:?}")]
    InvalidFormat(String),

    #[error("invalid input form {0:?}: expected knit, ast or states")]
    InvalidInputForm(String),

    #[error("cannot dump {format} from {form} input")]
    Unsupported { format: DumpFormat, form: InputForm },

    #[error("{form} input takes exactly one file, got {count}")]
    InputCount { form: InputForm, count: usize },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Flatten(#[from] FlattenError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Lex and parse pattern sources into one tree
pub fn parse_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Block, ProcessingError> {
    let lexer = Lexer::open(paths)?;
    let block = Parser::new(lexer).parse()?;
    info!(statements = block.statements.len(), "parsed pattern");
    Ok(block)
}

/// The tree for a `knit` or `ast` input
pub fn load_block(form: InputForm, inputs: &[PathBuf]) -> Result<Block, ProcessingError> {
    form.check_inputs(inputs)?;
    match form {
        InputForm::Knit => parse_sources(inputs),
        InputForm::Ast => Ok(ast::read_json(&inputs[0])?),
        InputForm::States => Err(ProcessingError::Unsupported {
            format: DumpFormat::AstJson,
            form,
        }),
    }
}

/// Resolve and flatten a tree into line records
pub fn flatten_block(block: &Block) -> Result<Vec<Line>, ProcessingError> {
    let tables = resolve(block);
    debug!(
        aliases = tables.alias_count(),
        assignments = tables.assignment_count(),
        "resolved names"
    );
    Ok(flatten(block, &tables)?)
}

/// Run the semantic passes and expansion over a tree
pub fn compile_block(block: &Block) -> Result<Engine, ProcessingError> {
    let lines = flatten_block(block)?;
    let engine = Engine::from_lines(&lines)?;
    info!(states = engine.len(), "compiled pattern");
    Ok(engine)
}

/// Build the engine for any input form
pub fn build_engine(form: InputForm, inputs: &[PathBuf]) -> Result<Engine, ProcessingError> {
    form.check_inputs(inputs)?;
    match form {
        InputForm::States => Ok(Engine::load(&inputs[0])?),
        InputForm::Knit | InputForm::Ast => compile_block(&load_block(form, inputs)?),
    }
}

/// Where a session's snapshot goes when none is named: next to the first
/// input, as `<stem>.states.json`. A snapshot input is its own states file.
pub fn default_states_path(form: InputForm, first_input: &Path) -> PathBuf {
    if form == InputForm::States {
        return first_input.to_path_buf();
    }
    let stem = first_input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "knit".to_string());
    first_input.with_file_name(format!("{}.states.json", stem))
}

/// Render one pipeline stage for the given inputs
pub fn dump(format: DumpFormat, form: InputForm, inputs: &[PathBuf]) -> Result<String, ProcessingError> {
    if !format.accepts(form) {
        return Err(ProcessingError::Unsupported { format, form });
    }
    match format {
        DumpFormat::Tokens => {
            form.check_inputs(inputs)?;
            let mut out = String::new();
            for path in inputs {
                let source = Source::read(path)?;
                out.push_str(&format!("== {} ==\n", source.name));
                out.push_str(&format_tokens(&tokenize(&source.text)));
            }
            Ok(out)
        }
        DumpFormat::AstJson => Ok(ast::to_json(&load_block(form, inputs)?)?),
        DumpFormat::AstYaml => Ok(ast::to_yaml(&load_block(form, inputs)?)?),
        DumpFormat::Lines => Ok(render_lines(&flatten_block(&load_block(form, inputs)?)?)),
        DumpFormat::States => {
            let engine = build_engine(form, inputs)?;
            Ok(engine
                .states()
                .iter()
                .map(|state| format!("{}\n", state))
                .collect())
        }
    }
}

/// One token per line: position, kind and literal. Whitespace runs are skipped.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|token| token.kind != TokenKind::Whitespace)
        .map(|token| {
            format!(
                "{:<8}{:<12}{:?}\n",
                token.position.to_string(),
                format!("{:?}", token.kind),
                token.literal
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case("tokens", DumpFormat::Tokens)]
    #[case("ast-json", DumpFormat::AstJson)]
    #[case("ast-yaml", DumpFormat::AstYaml)]
    #[case("lines", DumpFormat::Lines)]
    #[case("states", DumpFormat::States)]
    fn test_dump_format_names(#[case] name: &str, #[case] format: DumpFormat) {
        assert_eq!(DumpFormat::from_string(name).unwrap(), format);
        assert_eq!(format.to_string(), name);
    }

    #[rstest]
    #[case("knit", InputForm::Knit)]
    #[case("AST", InputForm::Ast)]
    #[case("States", InputForm::States)]
    fn test_input_form_names_ignore_case(#[case] name: &str, #[case] form: InputForm) {
        assert_eq!(InputForm::from_string(name).unwrap(), form);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(matches!(
            DumpFormat::from_string("xml"),
            Err(ProcessingError::InvalidFormat(_))
        ));
        assert!(matches!(
            InputForm::from_string("yaml"),
            Err(ProcessingError::InvalidInputForm(_))
        ));
    }

    #[test]
    fn test_dump_compatibility() {
        assert!(DumpFormat::Tokens.accepts(InputForm::Knit));
        assert!(!DumpFormat::Tokens.accepts(InputForm::Ast));
        assert!(DumpFormat::Lines.accepts(InputForm::Ast));
        assert!(!DumpFormat::Lines.accepts(InputForm::States));
        assert!(DumpFormat::available()
            .iter()
            .all(|format| format.accepts(InputForm::Knit)));
    }

    #[test]
    fn test_single_file_forms_check_count() {
        let two = vec![PathBuf::from("a"), PathBuf::from("b")];
        assert!(matches!(
            InputForm::Ast.check_inputs(&two),
            Err(ProcessingError::InputCount { count: 2, .. })
        ));
        assert!(InputForm::Knit.check_inputs(&two).is_ok());
        assert!(matches!(
            InputForm::Knit.check_inputs(&[]),
            Err(ProcessingError::Lex(LexError::NoSources))
        ));
    }

    #[test]
    fn test_default_states_path() {
        assert_eq!(
            default_states_path(InputForm::Knit, Path::new("patterns/hat.knit")),
            PathBuf::from("patterns/hat.states.json")
        );
        assert_eq!(
            default_states_path(InputForm::States, Path::new("hat.states.json")),
            PathBuf::from("hat.states.json")
        );
    }

    #[test]
    fn test_format_tokens() {
        let out = format_tokens(&tokenize("k(2)"));
        insta::assert_snapshot!(out.lines().next().unwrap(), @r#"1:1     Identifier  "k""#);
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_compile_and_dump_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.knit");
        let second = dir.path().join("b.knit");
        fs::write(&first, "rib = k p\n").unwrap();
        fs::write(&second, "{\n  rib\n}(2)\n").unwrap();
        let inputs = vec![first, second];

        let engine = build_engine(InputForm::Knit, &inputs).unwrap();
        assert_eq!(engine.len(), 2);

        let lines = dump(DumpFormat::Lines, InputForm::Knit, &inputs).unwrap();
        assert!(lines.starts_with("START: BLOCK\n"));
        assert!(lines.contains("START: GROUP (2)\n"));

        let tokens = dump(DumpFormat::Tokens, InputForm::Knit, &inputs).unwrap();
        assert!(tokens.contains("== "));
        assert!(tokens.contains("b.knit"));
    }

    #[test]
    fn test_ast_input_compiles_like_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("p.knit");
        fs::write(&source, "k p\n").unwrap();
        let json = dir.path().join("p.json");
        fs::write(&json, dump(DumpFormat::AstJson, InputForm::Knit, &[source.clone()]).unwrap())
            .unwrap();

        let from_source = build_engine(InputForm::Knit, &[source]).unwrap();
        let from_ast = build_engine(InputForm::Ast, &[json]).unwrap();
        assert_eq!(from_source.states(), from_ast.states());
    }

    #[test]
    fn test_tokens_need_sources() {
        assert!(matches!(
            dump(DumpFormat::Tokens, InputForm::Ast, &[PathBuf::from("p.json")]),
            Err(ProcessingError::Unsupported { .. })
        ));
    }
}
