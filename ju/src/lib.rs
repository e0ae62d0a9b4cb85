//! jira-util - support utilities for an issue-tracker command-line client
//!
//! # Modules
//!
//! - [`paths`] - find config files in the current directory and its parents
//! - [`normalize`] - turn decoded YAML into a JSON-safe tree
//! - [`template`] - Handlebars rendering with the tracker function library
//! - [`codec`] - JSON/YAML encode, decode and private file writes
//! - [`fsutil`] - read, copy and mkdir -p
//! - [`prompt`] - yes/no questions on the terminal
//! - [`config`] - layered `.jira.d/config.yml` loading
//!
//! # Example
//!
//! ```ignore
//! use jirautil::{Renderer, find_closest_parent_path};
//!
//! let config_path = find_closest_parent_path(".jira.d/config.yml")?;
//! let out = Renderer::new().render_to_string("{{abbrev 20 summary}}", &issue)?;
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod normalize;
pub mod paths;
pub mod prompt;
pub mod template;

pub use codec::{json_decode, json_encode, json_write, response_to_json, yaml_decode, yaml_write};
pub use config::Config;
pub use error::{Result, UtilError};
pub use fsutil::{copy_file, mkdir, read_file};
pub use normalize::{Normalize, normalize, normalize_json};
pub use paths::{find_closest_parent_path, find_parent_paths};
pub use prompt::prompt_yes_no;
pub use template::{Renderer, render};
