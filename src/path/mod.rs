// src/path/mod.rs

//! Local path and destination handling.

pub mod translate;

pub use translate::{
    CygpathConverter, IdentityConverter, PathConverter, PathTranslator, is_remote_endpoint,
    relative_to, to_relative,
};
