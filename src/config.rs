// Login configuration: server address, username and password, read from a
// properties-style file and overridden by command-line options.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing {0}: specify username, password and server address with options or a config file")]
    Incomplete(String),
}

/// Partially known login data. Every field may be missing until the file
/// and the overrides have been merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Complete login data, ready for `LycheeClient::login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

/// `$HOME/.config/lycheeupload.conf`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("lycheeupload.conf"))
}

impl LoginConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse a file in `java.util.Properties` format. Keys end at the first
    /// unescaped `=`, `:` or blank; lines starting with `#` or `!` are
    /// comments; a line ending in an odd number of backslashes continues on
    /// the next one; backslash escapes are resolved. Unknown keys are
    /// ignored and a repeated key keeps its last value.
    pub fn parse(text: &str) -> Self {
        let mut config = LoginConfig::default();
        for line in logical_lines(text) {
            let (key, value) = split_property(&line);
            let value = Some(value);
            match key.as_str() {
                "server" => config.server = value,
                "username" => config.username = value,
                "password" => config.password = value,
                _ => {}
            }
        }
        config
    }

    /// Fields set in `overrides` replace the ones here.
    pub fn merge(self, overrides: LoginConfig) -> Self {
        LoginConfig {
            server: overrides.server.or(self.server),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
        }
    }

    pub fn into_credentials(self) -> Result<Credentials, ConfigError> {
        match self {
            LoginConfig {
                server: Some(server),
                username: Some(username),
                password: Some(password),
            } => Ok(Credentials {
                server,
                username,
                password,
            }),
            other => {
                let mut missing = Vec::new();
                if other.server.is_none() {
                    missing.push("server");
                }
                if other.username.is_none() {
                    missing.push("username");
                }
                if other.password.is_none() {
                    missing.push("password");
                }
                Err(ConfigError::Incomplete(missing.join(", ")))
            }
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Join continuation lines and drop blanks and comments. Leading blanks of
/// every natural line, continued or not, are skipped.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for natural in text.lines() {
        let line = natural.trim_start_matches(is_blank);
        let mut buf = match pending.take() {
            Some(buf) => buf,
            None if line.is_empty() || line.starts_with('#') || line.starts_with('!') => continue,
            None => String::new(),
        };

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            buf.push_str(&line[..line.len() - 1]);
            pending = Some(buf);
        } else {
            buf.push_str(line);
            lines.push(buf);
        }
    }
    if let Some(buf) = pending {
        lines.push(buf);
    }
    lines
}

/// Split a logical line into unescaped key and value. Blanks around the
/// separator are skipped; one `=` or `:` may follow a blank separator.
fn split_property(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i += 2;
            continue;
        }
        if c == '=' || c == ':' {
            key_end = i;
            value_start = i + 1;
            break;
        }
        if is_blank(c) {
            key_end = i;
            let mut j = i;
            while j < chars.len() && is_blank(chars[j]) {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '=' || chars[j] == ':') {
                j += 1;
            }
            value_start = j;
            break;
        }
        i += 1;
    }

    while value_start < chars.len() && is_blank(chars[value_start]) {
        value_start += 1;
    }
    (unescape(&chars[..key_end]), unescape(&chars[value_start..]))
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut iter = chars.iter().copied();
    while let Some(c) = iter.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match iter.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = iter.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
