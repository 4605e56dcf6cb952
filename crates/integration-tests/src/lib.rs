//! Integration tests for Gogn Membership.
//!
//! # Running Tests
//!
//! ```bash
//! # Run migrations and seed a local database
//! cargo run -p gogn-cli -- migrate
//! cargo run -p gogn-cli -- seed
//!
//! # Start the admin server, then run the ignored tests
//! cargo run -p gogn-admin &
//! cargo test -p gogn-integration-tests -- --ignored
//! ```
//!
//! The HTTP tests require `ADMIN_TEST_EMAIL` and `ADMIN_TEST_ACCESS_KEY`
//! for an existing operator (create one with `gogn-cli admin create`).
