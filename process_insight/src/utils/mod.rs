/// Aggregated duration statistics and presentation units
pub mod duration_stats;

#[doc(inline)]
pub use duration_stats::{DurationStats, DurationUnit};

#[cfg(test)]
/// Helpers shared by the unit tests
pub mod test_utils {
    use std::path::PathBuf;

    /// Directory holding the test fixtures (`process_insight/test_data`)
    pub fn get_test_data_path() -> PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data")
    }
}
