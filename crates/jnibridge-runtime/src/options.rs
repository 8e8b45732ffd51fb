//! VM configuration.

use jni::JNIVersion;
use jnibridge_sdk::FailurePolicy;

/// Classpath searched by the embedded VM.
///
/// Fixed at build time; set `JNIBRIDGE_CLASSPATH` while building to point it
/// somewhere else.
pub const DEFAULT_CLASSPATH: &str = match option_env!("JNIBRIDGE_CLASSPATH") {
    Some(path) => path,
    None => "target/indy-obfuscator-1.0-SNAPSHOT.obf.jar",
};

/// JNI interface version requested from the VM
pub const JNI_VERSION: JNIVersion = JNIVersion::V6;

/// Options for creating the embedded VM.
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Value of `-Djava.class.path`
    pub classpath: String,
    /// Additional JVM options passed verbatim, e.g. `-Xmx64m`
    pub extra_options: Vec<String>,
    /// How the host's symbol cache treats failed lookups
    pub failure_policy: FailurePolicy,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            classpath: DEFAULT_CLASSPATH.to_string(),
            extra_options: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl HostOptions {
    /// Replace the classpath
    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = classpath.into();
        self
    }

    /// Append a raw JVM option
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.extra_options.push(option.into());
        self
    }

    /// Set the cache failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// All option strings handed to `JNI_CreateJavaVM`, classpath first
    pub fn vm_options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(1 + self.extra_options.len());
        options.push(format!("-Djava.class.path={}", self.classpath));
        options.extend(self.extra_options.iter().cloned());
        options
    }
}
