/// Resolve a path relative to the crate root, so fixtures load regardless of the working
/// directory the tests are run from
#[macro_export]
macro_rules! relative_file {
    ($f : expr) => {{
        let base = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        base.join($f)
    }};
}

/// Read a fixture relative to the crate root into a [String]
#[macro_export]
macro_rules! fixture_string {
    ($f : expr) => {{
        std::fs::read_to_string($crate::relative_file!($f)).unwrap()
    }};
}
