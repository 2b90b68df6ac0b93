//! questforge_codegen: turns quest and NPC blueprints into a mod project.
//!
//! The pipeline, leaves first:
//! - [`ident`] and [`escape`] make user text safe as identifiers and literals.
//! - [`triggers`] is the fixed catalog of event hooks a trigger may name.
//! - [`resolve`] settles each quest's objectives and triggers once, for both
//!   the creation and the reload path.
//! - [`methods`] and [`class`] emit C# text through [`emit::CodeWriter`].
//! - [`scaffold`] emits the project, solution, constants and bootstrap files.
//! - [`orchestrator`] drives a whole run against a [`fsys::FileSystem`].

pub mod class;
pub mod cleanup;
pub mod config;
pub mod emit;
pub mod error;
pub mod escape;
pub mod fsys;
pub mod ident;
pub mod methods;
pub mod orchestrator;
pub mod resolve;
pub mod resources;
pub mod scaffold;
pub mod syntax;
pub mod triggers;

pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerateError, SyntaxError, TriggerError};
pub use fsys::{FileSystem, MemoryFs, RealFs};
pub use orchestrator::{CheckReport, GenerationResult, check_project, generate_project};

pub const QUESTFORGE_VERSION: &str = env!("CARGO_PKG_VERSION");
