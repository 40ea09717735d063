//! # starwars - Star Wars movie lookup as an Ansible binary module
//!
//! Maps a movie number (1-9) and an ordering scheme to the film's box office
//! title, its trilogy and its place within that trilogy.
//!
//! ## Core Concepts
//!
//! - **Catalog**: the nine saga films and the two orderings over them
//! - **Modules**: units of work invoked by the automation host; this crate
//!   ships the `movie` module
//! - **Invocation**: the host protocol, an arguments file in and a JSON
//!   result out
//!
//! ## Quick Example
//!
//! ```rust
//! use starwars::catalog::{self, OrderingScheme, Trilogy};
//!
//! let movie = catalog::lookup(1, OrderingScheme::Released).unwrap();
//! assert_eq!(movie.title, "Episode IV – A New Hope");
//! assert_eq!(movie.trilogy, Trilogy::Original);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod invocation;
pub mod modules;

/// Convenient re-exports of commonly used types and traits.
pub mod prelude {
    pub use crate::catalog::{lookup, resolve, MovieLookup, MovieRecord, OrderingScheme, Trilogy};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::invocation::{ModuleInvocation, ModuleResponse};
    pub use crate::modules::{
        Module, ModuleContext, ModuleError, ModuleOutput, ModuleParams, ModuleRegistry,
        ModuleResult, ModuleStatus, ParamExt,
    };
}
