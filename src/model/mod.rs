//! Core data structures flowing through `badapple`.
//!
//! - [`molecule`]: Input records: a name, a connection table or SMILES, and data properties.
//! - [`smiles`]: Token-level SMILES scan used for atom and ring counts.
//! - [`scaffold`]: Scaffold records, activity statistics, medians and the pScore.

pub mod molecule;
pub mod scaffold;
pub mod smiles;
