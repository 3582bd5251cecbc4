pub mod controller;
pub mod resolver;
pub mod setup;

pub use controller::AppController;
pub use resolver::{find_marker_directory, DirectoryResolver, ResolvedDir, WorkingDirSource};
pub use setup::setup_working_directory;
