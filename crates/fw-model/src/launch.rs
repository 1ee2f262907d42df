use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// Executable path plus the argument vector handed to it.
///
/// The first argument is, by convention, the program name as the child sees it
/// (`argv[0]`). When `args` is empty the path itself is used in that position.
///
/// Values are validated on construction: the path must not be blank and no
/// string may carry an embedded NUL byte, since neither can cross the exec
/// boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLaunchSpec")]
pub struct LaunchSpec {
    /// Executable to run (absolute, relative, or looked up through `PATH`).
    path: String,
    /// Full argument vector, `argv[0]` included.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
}

#[derive(Deserialize)]
struct RawLaunchSpec {
    path: String,
    #[serde(default)]
    args: Vec<String>,
}

impl TryFrom<RawLaunchSpec> for LaunchSpec {
    type Error = ModelError;
    fn try_from(raw: RawLaunchSpec) -> Result<Self, Self::Error> {
        Self::new(raw.path, raw.args)
    }
}

impl LaunchSpec {
    /// Creates a validated launch spec.
    ///
    /// # Examples
    /// ```
    /// use fw_model::LaunchSpec;
    ///
    /// let spec = LaunchSpec::new("/bin/echo", ["echo", "hello"]).unwrap();
    /// assert_eq!(spec.argv0(), "echo");
    /// assert_eq!(spec.tail_args(), ["hello"]);
    /// ```
    pub fn new<P, I, S>(path: P, args: I) -> ModelResult<Self>
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ModelError::EmptyPath);
        }
        check_nul("path", &path)?;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        for arg in &args {
            check_nul("argument", arg)?;
        }
        Ok(Self { path, args })
    }

    /// Creates a spec whose `argv[0]` is the path itself.
    pub fn program<P: Into<String>>(path: P) -> ModelResult<Self> {
        let path = path.into();
        Self::new(path.clone(), [path])
    }

    /// Returns the executable path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the full argument vector, `argv[0]` included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the name the child sees as `argv[0]`.
    pub fn argv0(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or(&self.path)
    }

    /// Returns the arguments following `argv[0]`.
    pub fn tail_args(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

/// Parses a whitespace-separated command line such as `"echo hello world"`.
///
/// The first word is both the path and `argv[0]`.
impl FromStr for LaunchSpec {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Err(ModelError::InvalidTaskLine(s.to_string()));
        };
        Self::new(*first, words)
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for arg in self.tail_args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn check_nul(field: &'static str, value: &str) -> ModelResult<()> {
    if value.contains('\0') {
        return Err(ModelError::EmbeddedNul {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
