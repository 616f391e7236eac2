//! Project name normalization

use std::fmt;

use crate::error::{SfpError, Result};

/// Replace every character that is not an ASCII letter or digit with `_`
pub fn format_project_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// A validated, lowercase project (package) name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Normalize raw user input into a project name
    pub fn parse(raw: &str) -> Result<Self> {
        let formatted = format_project_name(raw.trim()).to_lowercase();
        if formatted.is_empty() {
            return Err(SfpError::EmptyProjectName);
        }
        Ok(Self(formatted))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for ProjectName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
