//! gql-minify - Reversible name-substitution codec for GraphQL queries
//!
//! Shrinks GraphQL query documents so they fit URL length limits of
//! GET-based APIs. Every identifier is replaced by a short fixed-width code;
//! names the receiver does not already know are listed in a header line.
//! Expanding gives back a semantically identical query (whitespace, commas
//! and comments are not preserved).
//!
//! # Example
//!
//! ```rust
//! use gql_minify::{expand, minify, names_from_introspection};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "directives": [],
//!     "types": [
//!         {"name": "Query", "fields": [{"name": "user", "args": [{"name": "id"}]}]},
//!         {"name": "User", "fields": [{"name": "name", "args": []}]}
//!     ]
//! });
//! let baseline = names_from_introspection(&schema).unwrap();
//!
//! let query = "query { user(id: 4) { name } }";
//! let minified = minify(query, &baseline).unwrap();
//! assert!(minified.starts_with('\n'));
//!
//! let expanded = expand(&minified, &baseline).unwrap();
//! assert_eq!(expanded, "query{user(id:4){name}}");
//! ```

mod alphabet;
mod codec;
mod dictionary;
mod error;
mod introspection;
mod lexer;
mod names;

pub use alphabet::*;
pub use codec::*;
pub use dictionary::*;
pub use error::*;
pub use introspection::*;
pub use lexer::{tokenize, Token, TokenKind, Tokens};
pub use names::*;
