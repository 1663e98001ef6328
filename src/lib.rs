//! # script-lens - run scripts straight from their call sites
//!
//! Script files declare entry points with calls such as
//! `script("build", async () => { ... })`. This crate finds those calls,
//! turns each into one or more code lenses, and runs the chosen script in a
//! terminal rooted at the nearest `package.json`.
//!
//! ## Finding script calls
//!
//! ```
//! use script_lens::config::FunctionConfig;
//! use script_lens::document::TextDocument;
//! use script_lens::scanner::find_script_calls;
//!
//! let document = TextDocument::new(
//!     "/project/src/build.script.ts",
//!     "script(\"build\", async () => {\n  await compile();\n});\n",
//! );
//! let calls = find_script_calls(&document, &FunctionConfig::default()).unwrap();
//! assert_eq!(calls.len(), 1);
//! assert_eq!(calls[0].script_name, "build");
//! assert_eq!(calls[0].range.end.line, 2);
//! ```
//!
//! ## Code lenses
//!
//! ```
//! use script_lens::config::Settings;
//! use script_lens::document::TextDocument;
//! use script_lens::lens::LensProvider;
//!
//! let provider = LensProvider::new(Settings::default());
//! let document = TextDocument::new("/project/src/build.script.ts", "script('build', () => {})");
//! let lenses = provider.provide_code_lenses(&document);
//! assert_eq!(lenses[0].command.title, "Run script");
//! assert_eq!(lenses[0].command.arguments.script_name, "build");
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - tolerant PEG parser for JavaScript/TypeScript call sites
//! - **[`scanner`]** - walks the parse tree for configured script calls
//! - **[`lens`]** - binds calls to run commands
//! - **[`runner`]** - resolves the working directory and drives terminals
//! - **[`config`]** - settings, defaults and the file pattern

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod document;
pub mod error;
pub mod lens;
pub mod logging;
pub mod parser;
pub mod runner;
pub mod scanner;

pub use error::{Error, Result};
