use std::process::Command;

/// Whether a JDK can be located the way the `jni` crate looks for libjvm:
/// through `JAVA_HOME` or a `java` launcher on `PATH`.
pub fn java_available() -> bool {
    let found = std::env::var_os("JAVA_HOME").is_some_and(|home| !home.is_empty())
        || Command::new("java")
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success());
    if !found {
        eprintln!("skipping: no JDK found (set JAVA_HOME or put java on PATH)");
    }
    found
}
