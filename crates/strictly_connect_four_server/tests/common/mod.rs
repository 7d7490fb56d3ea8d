//! Fake oracle scripts shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use strictly_connect_four_server::OracleConfig;
use tempfile::TempDir;

/// Board dump with a single x at the bottom of column 3.
pub const FIRST_X_DUMP: &str = ".......\n.......\n.......\n.......\n.......\n...x...";

/// Empty board in wire form.
pub const EMPTY_GAME: &str = ".......;.......;.......;.......;.......;.......";

/// Writes `body` as a shell script and returns an oracle config that runs it
/// through `/bin/sh`, so the script itself never needs to be executable.
pub fn script_oracle(dir: &TempDir, body: &str) -> OracleConfig {
    let path = dir.path().join("oracle.sh");
    fs::write(&path, body).expect("Failed to write oracle script");
    OracleConfig::new("/bin/sh").with_args(vec![path.display().to_string()])
}

/// Script that prints `reply` after draining stdin.
pub fn replying_oracle(dir: &TempDir, reply: &str) -> OracleConfig {
    script_oracle(dir, &format!("cat > /dev/null\nprintf '%s\\n' '{}'\n", reply))
}

/// Path of a file inside `dir`.
pub fn path_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
