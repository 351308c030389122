//! docblock-syntax — parse tagged `/** ... */` comment blocks into a
//! documentation tree.
//!
//! Data flows one way: raw line → [`line::Line`] → [`block::Block`] →
//! resolved path → [`tree::Node`].
//!
//! ```text
//! /**
//!  * Draws values.
//!  * @method sample
//!  * @memberOf ran.dist.Distribution
//!  * @param {number=} n Number of values.
//!  * @returns {number[]} The values.
//!  */
//! ```

pub mod block;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod line;
pub mod tree;
pub mod types;

pub use block::{Block, BlockKind, Field, NamedTypedDesc, TypedDesc};
pub use driver::{parse_file, parse_source, parse_str, BlockParser, LineSource};
pub use error::{DocError, Result};
pub use grammar::{Category, Tag};
pub use line::{classify, is_block_start, Line};
pub use tree::{DocTree, DuplicatePolicy, Node, Walk};
pub use types::{TypeExpr, TypeOption};
