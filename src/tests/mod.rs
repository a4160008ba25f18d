//! Scenario tests spanning several modules.
//!
//! These tests run the masking, bounding box, spacing and coordinate
//! operators together on small synthetic storm fields.


/// Route `log` output through the test harness.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
