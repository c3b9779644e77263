//! Test harness for CLI integration tests.
//!
//! Provides isolated test environments, a builder for note text,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod note;

#[allow(unused_imports)]
pub use command::QuireCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use note::TestNote;
