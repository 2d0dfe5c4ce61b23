//! Resource configuration
//!
//! Everything the resource reads from its process environment. The CI
//! engine exports build metadata; `RESOURCE_DEBUG` and `TEST` are switches
//! for local debugging and the integration suite.

use anyhow::bail;
use relay_core::template::InterpolationValues;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Turns on console debug logging when set to a non-empty value
pub const DEBUG_VAR: &str = "RESOURCE_DEBUG";

/// Makes `out` echo the response body into its output when set
pub const TEST_VAR: &str = "TEST";

/// Resource configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Log everything to stderr instead of a log file
    pub debug: bool,

    /// Merge the response body into the `out` response
    pub test_mode: bool,

    /// Build metadata available to `{NAME}` placeholders
    pub build_values: InterpolationValues,

    /// Snapshot of the process environment, logged at debug level
    pub environment: BTreeMap<String, String>,

    /// Where the payload copy and log file are written
    pub tmp_dir: PathBuf,
}

impl Config {
    /// Creates configuration from the process environment
    ///
    /// Expected environment variables:
    /// - RESOURCE_DEBUG (optional, any non-empty value enables debug logging)
    /// - TEST (optional, any non-empty value enables test mode)
    /// - BUILD_* and ATC_EXTERNAL_URL (optional, exported by the CI engine)
    /// - TMPDIR (optional, see `std::env::temp_dir`)
    pub fn from_env() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

        Self::from_vars(vars, std::env::temp_dir())
    }

    /// Creates configuration from an explicit variable list
    pub fn from_vars<I>(vars: I, tmp_dir: PathBuf) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let environment: BTreeMap<String, String> = vars.into_iter().collect();

        let flag = |name: &str| environment.get(name).is_some_and(|v| !v.is_empty());
        let debug = flag(DEBUG_VAR);
        let test_mode = flag(TEST_VAR);

        let build_values = InterpolationValues::from_environment(
            environment.iter().map(|(k, v)| (k.clone(), v.clone())),
        );

        Self {
            debug,
            test_mode,
            build_values,
            environment,
            tmp_dir,
        }
    }

    /// Forces debug logging on
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = self.debug || debug;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.tmp_dir.is_dir() {
            bail!(
                "temporary directory `{}` does not exist",
                self.tmp_dir.display()
            );
        }

        Ok(())
    }
}
