//
// argspec.rs
// C3d-Tools-rs
//
// Declarative argument fields and the single routine that validates them and renders the ordered token list handed to a subprocess.
//
// Thales Matheus Mendonça Santos - October 2026

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{Result, ToolError};
use crate::outputs::absolute_in;

/// Placeholder substituted with the field value inside an argument template.
pub const PLACEHOLDER: &str = "%s";

/// Value carried by a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// `true` renders the template's flag tokens without a value, `false` renders nothing.
    Flag(bool),
    Path(PathBuf),
    /// Expands the placeholder into one token per path, in order.
    Paths(Vec<PathBuf>),
}

impl ArgValue {
    fn paths(&self) -> &[PathBuf] {
        match self {
            ArgValue::Flag(_) => &[],
            ArgValue::Path(path) => std::slice::from_ref(path),
            ArgValue::Paths(paths) => paths,
        }
    }

    /// Empty paths (or an empty path list) count as unset.
    fn is_set(&self) -> bool {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
        match self {
            ArgValue::Flag(_) => true,
            ArgValue::Path(path) => non_empty(path),
            ArgValue::Paths(paths) => !paths.is_empty() && paths.iter().all(non_empty),
        }
    }
}

/// Where a field lands relative to the tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Counted from the tool name, ascending.
    Start(usize),
    /// Counted from the end; `End(0)` is the very last argument.
    End(usize),
}

impl Position {
    fn sort_key(self) -> (u8, isize) {
        match self {
            Position::Start(n) => (0, n as isize),
            Position::End(n) => (1, -(n as isize)),
        }
    }
}

/// One declared input of a wrapped tool.
#[derive(Debug, Clone)]
pub struct ArgField {
    pub name: &'static str,
    pub template: &'static str,
    pub position: Position,
    pub mandatory: bool,
    pub must_exist: bool,
    pub value: Option<ArgValue>,
}

impl ArgField {
    pub fn new(name: &'static str, template: &'static str, position: Position) -> Self {
        Self {
            name,
            template,
            position,
            mandatory: false,
            must_exist: false,
            value: None,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Paths in this field must exist when the command line is built.
    pub fn must_exist(mut self) -> Self {
        self.must_exist = true;
        self
    }

    pub fn with_value(mut self, value: Option<ArgValue>) -> Self {
        self.value = value;
        self
    }

    fn render_into(&self, value: &ArgValue, tokens: &mut Vec<OsString>) {
        if matches!(value, ArgValue::Flag(false)) {
            return;
        }
        let values: Vec<&OsStr> = value.paths().iter().map(|p| p.as_os_str()).collect();

        for piece in self.template.split_whitespace() {
            match piece.split_once(PLACEHOLDER) {
                None => tokens.push(piece.into()),
                // Flag-only values drop the placeholder token entirely.
                Some(_) if values.is_empty() => {}
                Some((prefix, suffix)) => {
                    for value in &values {
                        let mut token = OsString::from(prefix);
                        token.push(value);
                        token.push(suffix);
                        tokens.push(token);
                    }
                }
            }
        }
    }
}

/// Validate every field and render them as argument tokens in positional order.
///
/// Relative paths are checked for existence against `base_dir` but rendered as given,
/// so the same inputs always produce the same command line.
pub fn build_args(tool: &'static str, fields: &[ArgField], base_dir: &Path) -> Result<Vec<OsString>> {
    for field in fields {
        let value = field.value.as_ref().filter(|v| v.is_set());
        match value {
            None if field.mandatory => {
                return Err(ToolError::MissingMandatory {
                    tool,
                    field: field.name,
                })
            }
            Some(value) if field.must_exist => {
                if let Some(missing) = value
                    .paths()
                    .iter()
                    .find(|p| !absolute_in(base_dir, p).exists())
                {
                    return Err(ToolError::MissingInput {
                        field: field.name,
                        path: missing.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    let mut ordered: Vec<&ArgField> = fields.iter().collect();
    ordered.sort_by_key(|field| field.position.sort_key());

    let mut tokens = Vec::new();
    for field in ordered {
        if let Some(value) = field.value.as_ref().filter(|v| v.is_set()) {
            field.render_into(value, &mut tokens);
        }
    }
    Ok(tokens)
}
