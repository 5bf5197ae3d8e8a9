pub const LAMPCHECK_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LAMPCHECK_BUILD_N: &str = env!("LAMPCHECK_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "lampcheck {}\nBuild {}\nLAMP primer binding, hairpin and dimer checks",
        LAMPCHECK_VERSION, LAMPCHECK_BUILD_N
    )
}
