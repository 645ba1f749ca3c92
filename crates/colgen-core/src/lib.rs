//! Type-directed generator of columnar row encoders and their test oracles.
//!
//! A [`schema::Schema`] is walked once in field order; every field contributes a
//! type alias, optional helpers, wire-format statements to the generated encoder
//! and an oracle expression to the generated test encoder.

pub mod composite;
pub mod diagnostics;
pub mod emit;
pub mod encoding;
pub mod load;
pub mod needs;
pub mod options;
pub mod rs_emit;
pub mod rsir;
pub mod schema;
pub mod testing;
pub mod type_expr;
pub mod variant;

mod util;

pub use emit::{build_module, emit_module, emit_module_to, GeneratedModule};
pub use load::{load_schema_file, parse_schema_json};
pub use options::GenOptions;
