// src/parse.rs

//! Line tokenizer and pipeline parser.
//!
//! Tokens are whitespace-separated; there is no quoting. Recognised
//! operators (each must be its own token):
//!
//! - `|` splits pipeline stages
//! - `<`, `>`, `>>`, `2>`, `2>>` take the following token as a file name
//! - a final `&` (standalone, or glued to the last token) runs the whole
//!   pipeline in the background

/// An output-side redirection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: String,
    /// `>>` / `2>>` rather than `>` / `2>`.
    pub append: bool,
}

/// Redirections attached to one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub input: Option<String>,
    pub output: Option<OutputTarget>,
    pub error: Option<OutputTarget>,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.error.is_none()
    }
}

/// One parsed command: program, arguments and redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub args: Vec<String>,
    pub redirects: Redirections,
    pub background: bool,
}

impl Command {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The program name (first argument).
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Display text used for job listings: the arguments joined by spaces.
    pub fn display_text(&self) -> String {
        self.args.join(" ")
    }
}

/// A parsed line: one or more commands joined by `|`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
    pub has_pipes: bool,
    pub background: bool,
}

impl Pipeline {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Display text for a multi-stage job: program names joined by `" | "`.
    pub fn display_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(Command::program)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Split a line into whitespace-separated tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Tokenize and parse a whole input line.
pub fn parse_line(line: &str) -> Pipeline {
    parse_tokens(&tokenize(line))
}

/// Parse tokens into a pipeline with redirections.
///
/// A redirection operator with no following token is ignored. Stages that
/// end up with no arguments are dropped.
pub fn parse_tokens(tokens: &[String]) -> Pipeline {
    let mut tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let background = strip_background_marker(&mut tokens);

    let mut result = Pipeline {
        background,
        ..Pipeline::default()
    };
    let mut current = Command::default();

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token {
            "|" => {
                if !current.args.is_empty() {
                    result.commands.push(std::mem::take(&mut current));
                    result.has_pipes = true;
                }
                current = Command::default();
            }
            "<" => {
                if let Some(path) = iter.next() {
                    current.redirects.input = Some(path.to_string());
                }
            }
            ">" | ">>" => {
                if let Some(path) = iter.next() {
                    current.redirects.output = Some(OutputTarget {
                        path: path.to_string(),
                        append: token == ">>",
                    });
                }
            }
            "2>" | "2>>" => {
                if let Some(path) = iter.next() {
                    current.redirects.error = Some(OutputTarget {
                        path: path.to_string(),
                        append: token == "2>>",
                    });
                }
            }
            word => current.args.push(word.to_string()),
        }
    }

    if !current.args.is_empty() {
        result.commands.push(current);
    }

    for command in &mut result.commands {
        command.background = background;
    }

    result
}

/// Remove a trailing `&` (standalone or glued to the last word).
fn strip_background_marker(tokens: &mut Vec<&str>) -> bool {
    let Some(last) = tokens.last_mut() else {
        return false;
    };
    let word: &str = *last;

    if word == "&" {
        tokens.pop();
        return true;
    }

    match word.strip_suffix('&') {
        Some(trimmed) => {
            *last = trimmed;
            true
        }
        None => false,
    }
}
