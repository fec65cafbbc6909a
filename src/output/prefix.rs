use std::fmt;

/// Line prefix describing the command (and optionally subtask) currently running.
///
/// Top-level commands render as `[2/3] build: `. A subtask keeps everything
/// before the first `:` and replaces the rest, e.g. `[2/3] compile: [1/3] gcc: `.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix {
    rendered: String,
}

impl Prefix {
    pub fn enter_command(&mut self, index: usize, total: usize, name: &str) {
        self.rendered = format!("[{}/{}] {}: ", index, total, name);
    }

    pub fn enter_subtask(&mut self, name: &str, position: Option<(usize, usize)>) {
        let root = self.root().to_string();
        let label = match position {
            Some((index, total)) => format!("[{}/{}] {}", index, total, name),
            None => name.to_string(),
        };
        self.rendered = format!("{}: {}: ", root, label);
    }

    /// Text before the first colon: the command this prefix belongs to.
    pub fn root(&self) -> &str {
        match self.rendered.split_once(':') {
            Some((root, _)) => root,
            None => &self.rendered,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
