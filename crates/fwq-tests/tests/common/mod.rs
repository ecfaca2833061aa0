//! Shared fixtures for the integration tests

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Database of a two-model brand
///
/// MODEL_B is listed first so ordering tests catch any sorting by name.
/// The radar and camera sit behind one gateway at 0x750 and need
/// functional addressing.
pub const DATABASE: &str = r#"
[[requests]]
request = ["SHORT_TESTER_PRESENT_REQUEST", "OBD_VERSION_REQUEST"]
response = ["SHORT_TESTER_PRESENT_RESPONSE", "OBD_VERSION_RESPONSE"]
whitelist_ecus = ["engine", "eps", "abs", "hybrid"]
bus = 0
auxiliary = true

[[requests]]
request = ["DEFAULT_DIAGNOSTIC_REQUEST", "22f181"]
response = ["DEFAULT_DIAGNOSTIC_RESPONSE", "62f181"]
whitelist_ecus = ["fwdRadar", "fwdCamera"]
bus = 0

[[requests]]
request = ["MANUFACTURER_SOFTWARE_VERSION_REQUEST"]
response = ["MANUFACTURER_SOFTWARE_VERSION_RESPONSE"]
bus = 1
logging = true
obd_multiplexing = false

[non_essential_ecus]
hybrid = ["MODEL_B"]

[[extra_ecus]]
kind = "adas"
addr = "0x730"

[[models]]
name = "MODEL_B"

[[models.ecus]]
kind = "engine"
addr = "0x700"
versions = ["ENG-B-1.0"]

[[models.ecus]]
kind = "hybrid"
addr = "0x7d2"
versions = ["HYB-B-2.1"]

[[models.ecus]]
kind = "eps"
addr = "0x7a1"
versions = ["EPS-3.0"]

[[models]]
name = "MODEL_A"

[[models.ecus]]
kind = "engine"
addr = 2016
versions = ["ENG-A-1.0", { hex = "f100454e472d412d312e31" }]

[[models.ecus]]
kind = "eps"
addr = "0x7a1"
versions = ["EPS-3.1"]

[[models.ecus]]
kind = "abs"
addr = "0x7b0"
versions = ["ABS-7.4"]

[[models.ecus]]
kind = "fwdRadar"
addr = "0x750"
sub_addr = "0x0f"
versions = ["RAD-1.2"]

[[models.ecus]]
kind = "fwdCamera"
addr = "0x750"
sub_addr = "0x6d"
versions = ["CAM-4.0"]

[[models.ecus]]
kind = "dsu"
addr = "0x791"
versions = ["DSU-0.9"]
"#;

/// A database file in a temporary directory, removed on drop
pub struct TestDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    pub fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("fw_versions.toml");
        std::fs::write(&path, content).expect("write database");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
