use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// A single command line, split into program, arguments and a background flag.
///
/// Tokens are kept as raw bytes so arguments that are not UTF-8 reach
/// `execvp` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub background: bool,
    /// The command as typed, minus the trailing `&`. Lossy, for notices only.
    pub text: String,
}

impl ParsedCommand {
    /// Returns `None` for blank lines and `#` comments.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let mut tokens: Vec<&[u8]> = line
            .split(|byte| byte.is_ascii_whitespace())
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.first()?.starts_with(b"#") {
            return None;
        }

        let background = tokens.len() > 1 && tokens.last() == Some(&&b"&"[..]);
        if background {
            tokens.pop();
        }

        let text = tokens
            .iter()
            .map(|token| String::from_utf8_lossy(token))
            .collect::<Vec<_>>()
            .join(" ");
        let mut words = tokens.into_iter().map(|token| OsString::from_vec(token.to_vec()));
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
            background,
            text,
        })
    }

    /// Program name followed by its arguments, as handed to `execvp`.
    pub fn argv(&self) -> impl Iterator<Item = &[u8]> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(OsStr::as_bytes)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.program == name
    }
}
