//! Integration tests exercising the services against live infrastructure.
//!
//! These need a reachable PostgreSQL (set `FLOCK_TEST_DATABASE_URL`) and
//! are `#[ignore]`d so the default test run stays hermetic:
//!
//! ```text
//! FLOCK_TEST_DATABASE_URL=postgres://localhost/flock_test \
//!     cargo test -- --ignored
//! ```

mod helpers;

mod comment_test;
mod feed_test;
mod graph_test;
mod notification_test;
mod post_test;
mod profile_test;
