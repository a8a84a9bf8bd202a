pub mod cli;
pub mod compiler;
pub mod io;

pub use cli::*;
pub use compiler::{CompilerError, Project, ProjectError, SourceLoader, StringLoader};
pub use io::FileLoader;
