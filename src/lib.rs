pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod loader;
pub mod output;
pub mod resolver;
pub mod serialization;
pub mod tree;

pub use api::{build, export, generate, transform, BuildResult, Export};
pub use config::BuildConfig;
pub use error::ThemeError;
pub use tree::{Map, Node};
