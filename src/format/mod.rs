//! Plan import/export.
//!
//! ## Formats
//!
//! - **Plan JSON**: full-fidelity snapshot (image + markers + paths + areas),
//!   also used for local persistence. Import accepts legacy area shapes.
//! - **Script table**: read-only Lua-style listing of markers and areas.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use planmark::format::{export_json, import_json};
//!
//! let json = export_json(&workspace, &image)?;
//! let plan = import_json(&json, &config)?;
//! ```

mod script;
mod snapshot;
#[cfg(test)]
mod tests;

pub use script::script_table;
pub use snapshot::{ImportedPlan, PlanSnapshot, export_json, import_json};
