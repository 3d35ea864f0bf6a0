//! Filter and reshape JSON documents with a small text query language.
//!
//! ```no_run
//! use jstream::JsonStream;
//!
//! let out = JsonStream::from_json_str(r#"[{"age": 45}, {"age": 21}]"#)?
//!     .filter("age > 30")?
//!     .map("senior = true")?
//!     .to_json_string()?;
//! # Ok::<(), jstream::StreamError>(())
//! ```

pub mod error;
pub mod stream;

pub use error::StreamError;
pub use stream::JsonStream;

pub use jstream_query::{
    Engine, EngineConfig, NonFiniteNumbers, Operand, Program, QueryError, Statement, apply,
    apply_all, evaluate, parse_operation, parse_program, resolve, test,
};
