//! User-facing output seam.
//!
//! Everything the user sees goes through [`Reporter`] so alternative front
//! ends can render the conversation their own way instead of relying on a
//! process-wide error hook.

use std::error::Error;

pub trait Reporter: Send + Sync {
    /// Render an assistant reply
    fn assistant(&self, content: &str);

    /// Render an informational line (catalogs, command feedback)
    fn notice(&self, message: &str);

    /// Render a failure in the transcript; the session keeps going
    fn error(&self, error: &dyn Error);
}

/// Render an error with its cause chain on one line.
pub fn render_error(error: &dyn Error) -> String {
    let mut rendered = format!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(&format!(" ({})", cause));
        source = cause.source();
    }
    rendered
}

pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn assistant(&self, content: &str) {
        println!("{}", content);
    }

    fn notice(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, error: &dyn Error) {
        eprintln!("{}", render_error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Leaf;
    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }
    impl Error for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);
    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "generation failed")
        }
    }
    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_render_error_includes_cause_chain() {
        let rendered = render_error(&Wrapper(Leaf));
        assert_eq!(rendered, "Error: generation failed (connection refused)");
    }

    #[test]
    fn test_render_error_without_cause() {
        let rendered = render_error(&Leaf);
        assert_eq!(rendered, "Error: connection refused");
    }
}
