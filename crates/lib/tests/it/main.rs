/*! Integration tests for doclens.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - engine: Tests for the Document/Cursor contract and the in-memory engine
 * - lens: Tests for the translation layer (reads, writes, error handling)
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("doclens=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod engine;
mod helpers;
mod lens;
