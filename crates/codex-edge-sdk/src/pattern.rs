//! Route patterns and their compiled matchers
//!
//! A route is declared with one of three pattern kinds:
//!
//! | Kind | Example | Compiled to |
//! |------|---------|-------------|
//! | `Literal` | `/posts` | `^/posts$` |
//! | `Parameterized` | `/posts/:slug` | `^/posts/([a-z0-9.\-]*)$` |
//! | `Expression` | `Regex::new(r"/test")` | used as-is |
//!
//! Literal text is used verbatim as expression source, so it is anchored but
//! not escaped. Parameters only match lowercase letters, digits, dots and
//! hyphens; they never span a `/`.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::RouterError;
use crate::handler::Params;

static PARAM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[a-zA-Z0-9]+").unwrap());

const PARAM_CAPTURE: &str = r"([a-z0-9.\-]*)";

/// A path-matching rule as declared by the caller.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain path with no `:name` tokens
    Literal(String),
    /// Path containing one or more `:name` tokens
    Parameterized(String),
    /// Pre-built expression, used unanchored and without parameters
    Expression(Regex),
}

impl Pattern {
    /// Classify a string pattern by whether it contains parameter tokens.
    pub fn parse(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if PARAM_TOKEN.is_match(&pattern) {
            Pattern::Parameterized(pattern)
        } else {
            Pattern::Literal(pattern)
        }
    }

    /// The route name for this pattern: its string form.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Compile into an anchored matcher plus ordered parameter names.
    pub fn compile(&self) -> Result<CompiledPattern, RouterError> {
        match self {
            Pattern::Expression(re) => Ok(CompiledPattern {
                matcher: re.clone(),
                param_names: Vec::new(),
            }),
            Pattern::Literal(path) => Ok(CompiledPattern {
                matcher: anchored(path, path)?,
                param_names: Vec::new(),
            }),
            Pattern::Parameterized(path) => {
                let mut source = String::with_capacity(path.len() + 16);
                let mut param_names = Vec::new();
                let mut last = 0;

                for token in PARAM_TOKEN.find_iter(path) {
                    source.push_str(&path[last..token.start()]);
                    source.push_str(PARAM_CAPTURE);
                    param_names.push(token.as_str()[1..].to_string());
                    last = token.end();
                }
                source.push_str(&path[last..]);

                if param_names.is_empty() {
                    return Err(RouterError::InvalidPattern {
                        pattern: path.clone(),
                        reason: "parameter tokens detected but none could be extracted".into(),
                    });
                }

                Ok(CompiledPattern {
                    matcher: anchored(path, &source)?,
                    param_names,
                })
            }
        }
    }
}

fn anchored(pattern: &str, source: &str) -> Result<Regex, RouterError> {
    Regex::new(&format!("^{}$", source)).map_err(|e| RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(path) | Pattern::Parameterized(path) => f.write_str(path),
            Pattern::Expression(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::parse(pattern)
    }
}

impl From<String> for Pattern {
    fn from(pattern: String) -> Self {
        Pattern::parse(pattern)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Expression(re)
    }
}

impl From<&Regex> for Pattern {
    fn from(re: &Regex) -> Self {
        Pattern::Expression(re.clone())
    }
}

/// Matcher produced by [`Pattern::compile`].
///
/// `param_names()[i]` names capture group `i + 1` of the matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    matcher: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Test a request path.
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Parameter names in capture order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Expression source the matcher was built from.
    pub fn as_str(&self) -> &str {
        self.matcher.as_str()
    }

    /// Run the matcher and zip its captures with the parameter names.
    ///
    /// Returns `None` when the path does not match.
    pub fn extract(&self, path: &str) -> Option<Params> {
        let caps = self.matcher.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                    (name.clone(), value.to_string())
                })
                .collect(),
        )
    }
}
