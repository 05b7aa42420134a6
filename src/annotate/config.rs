use crate::db::Chemkit;
use crate::model::scaffold::IdRange;

/// Settings for one [`process_mols`](super::process_mols) run.
///
/// # Examples
///
/// ```
/// use badapple::{IdRange, ProcessConfig};
///
/// let config = ProcessConfig {
///     nskip: 10,
///     nmax: 100,
///     scafid_range: IdRange::new(Some(1), Some(5000)),
///     ..Default::default()
/// };
/// assert_eq!(config.max_atoms, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Database schema holding the Badapple tables.
    pub schema: String,

    pub chemkit: Chemkit,

    /// Number of leading input records to pass over without output.
    pub nskip: usize,

    /// Maximum number of records to process after the skipped ones;
    /// `0` means no limit.
    pub nmax: usize,

    /// Molecules with more heavy atoms are written unannotated.
    pub max_atoms: usize,

    /// Molecules with more rings are written unannotated.
    pub max_rings: usize,

    /// Only scaffolds with ids in this range are used for annotation.
    pub scafid_range: IdRange,

    /// `-v` count; at 2 and above every molecule's result is logged.
    pub verbosity: u8,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            chemkit: Chemkit::Rdkit,
            nskip: 0,
            nmax: 0,
            max_atoms: 50,
            max_rings: 5,
            scafid_range: IdRange::default(),
            verbosity: 0,
        }
    }
}
