use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use treasurykit::{ReqwestTransport, TreasuryDirect, TreasuryDirectConfig};

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

#[allow(dead_code)]
pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn treasury_direct() -> TreasuryDirect {
    TreasuryDirect::new().unwrap()
}

/// Client that talks to a local mock server instead of treasurydirect.gov.
#[allow(dead_code)]
pub fn mock_client(base_url: &str) -> TreasuryDirect {
    let transport = ReqwestTransport::new(&TreasuryDirectConfig::default()).unwrap();
    TreasuryDirect::with_transport(Arc::new(transport), base_url).unwrap()
}
