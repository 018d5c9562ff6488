/*! Integration tests for Flatnest.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - flatten: Tests for flattening values and serializable host types
 * - expand: Tests for rebuilding nested maps from flat mappings
 * - roundtrip: Tests for the laws that connect the two directions
 * - strict: Tests for the opt-in validation layer
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("flatnest=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod expand;
mod flatten;
mod strict;
