//! Source positions and the diagnostics collector.
//!
//! Validation code never aborts on its own. It pushes `(location, message)`
//! pairs into a [`Diagnostics`] collector and hands it back, and the caller
//! decides whether the run can continue.

use std::fmt;

/// A position inside a single source buffer.
///
/// `line` and `column` are 1-based, `column` counts bytes like Go's
/// `token.Position` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Byte offset from the start of the buffer.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
}

impl Position {
    /// A position from its byte offset and 1-based line and column.
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// A position qualified with the name of the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// File name as given on the command line.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// `None` renders as `file:line`, used for whole-file complaints.
    pub column: Option<usize>,
}

impl Location {
    /// `pos` inside `file`.
    pub fn new(file: impl Into<String>, pos: Position) -> Self {
        Self {
            file: file.into(),
            line: pos.line,
            column: Some(pos.column),
        }
    }

    /// Location naming only a line of the file.
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.file, self.line, column),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// A single located message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the problem is.
    pub location: Location,
    /// What is wrong, without the location.
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic with `message` at `location`.
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Ordered collection of diagnostics.
///
/// Keeps insertion order, so reports come out in the order the problems
/// were found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `diagnostic`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Records a message at `location`.
    pub fn error(&mut self, location: Location, message: impl Into<String>) {
        self.push(Diagnostic::new(location, message));
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Recorded diagnostics in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Orders diagnostics by file, line and column. Equal locations keep
    /// their insertion order.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            (&a.location.file, a.location.line, a.location.column).cmp(&(
                &b.location.file,
                b.location.line,
                b.location.column,
            ))
        });
    }

    /// `Ok(value)` when nothing was recorded, the collector itself otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one diagnostic was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::new("node.go", Position::new(10, 3, 6));
        assert_eq!(loc.to_string(), "node.go:3:6");
        assert_eq!(Location::line("node.go", 1).to_string(), "node.go:1");
    }

    #[test]
    fn test_diagnostics_keep_order() {
        let mut diags = Diagnostics::new();
        diags.error(Location::line("a.go", 4), "second problem");
        diags.error(Location::line("a.go", 2), "first problem");

        assert_eq!(diags.len(), 2);
        assert_eq!(
            diags.to_string(),
            "a.go:4: second problem\na.go:2: first problem"
        );
    }

    #[test]
    fn test_sort_by_location() {
        let mut diags = Diagnostics::new();
        diags.error(Location::new("a.go", Position::new(30, 3, 1)), "c");
        diags.error(Location::new("a.go", Position::new(2, 1, 3)), "a");
        diags.error(Location::new("a.go", Position::new(12, 2, 5)), "b");
        diags.sort();

        let order: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Diagnostics::new().into_result(7), Ok(7));

        let mut diags = Diagnostics::new();
        diags.error(Location::line("a.go", 1), "boom");
        let err = diags.into_result(()).unwrap_err();
        assert_eq!(err.len(), 1);
    }
}
