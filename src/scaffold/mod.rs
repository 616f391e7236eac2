//! New project scaffolding

pub mod kedro;
pub mod layout;
pub mod name;

pub use kedro::KedroStarter;
pub use layout::create_additional_folders;
pub use name::{format_project_name, ProjectName};
