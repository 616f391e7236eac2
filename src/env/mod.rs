//! Probes of the local Python environment

pub mod pip;
pub mod python;

pub use pip::{InstalledPackages, Pip};
pub use python::PythonEnv;

/// Whether the current platform is treated as unix
pub fn is_unix_os() -> bool {
    is_unix(std::env::consts::OS)
}

fn is_unix(os: &str) -> bool {
    matches!(os, "linux" | "macos")
}

/// Default Python interpreter name for the platform
pub fn python_command(is_unix: bool) -> &'static str {
    if is_unix { "python3" } else { "python" }
}
