/// Returns the conda subdir of the running platform, e.g. `linux-64` or `osx-arm64`.
///
/// Platforms conda has no subdir for fall back to `noarch`.
pub fn current_subdir() -> &'static str {
    subdir_for(std::env::consts::OS, std::env::consts::ARCH)
}

fn subdir_for(os: &str, arch: &str) -> &'static str {
    match (os, arch) {
        ("linux", "x86_64") => "linux-64",
        ("linux", "x86") => "linux-32",
        ("linux", "aarch64") => "linux-aarch64",
        ("linux", "powerpc64") => "linux-ppc64le",
        ("linux", "s390x") => "linux-s390x",
        ("linux", "riscv64") => "linux-riscv64",
        ("macos", "x86_64") => "osx-64",
        ("macos", "aarch64") => "osx-arm64",
        ("windows", "x86_64") => "win-64",
        ("windows", "x86") => "win-32",
        ("windows", "aarch64") => "win-arm64",
        ("freebsd", "x86_64") => "freebsd-64",
        _ => "noarch",
    }
}
