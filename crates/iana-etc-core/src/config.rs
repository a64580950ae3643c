//! Pipeline configuration.
//!
//! All knobs of a conversion run live in an explicit [`Config`] value passed
//! into the pipeline, so tests and mirrors can substitute fixture URLs and
//! filenames without touching global state.

/// Canonical URL of the IANA service-names/port-numbers registry
pub const SERVICES_URL: &str =
    "https://www.iana.org/assignments/service-names-port-numbers/service-names-port-numbers.xml";

/// Filename the downloaded services registry XML is stored under
pub const SERVICES_XML: &str = "service-names-port-numbers.xml";

/// Filename of the generated services database
pub const SERVICES_FILE: &str = "services";

/// Comment header emitted at the top of the generated services database
pub const SERVICES_HEADER: &str = "# See also services(5) and IANA offical page :\n\
# https://www.iana.org/assignments/service-names-port-numbers/service-names-port-numbers.xhtml\n";

/// Canonical URL of the IANA protocol-numbers registry
pub const PROTOCOLS_URL: &str =
    "https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xml";

/// Filename the downloaded protocols registry XML is stored under
pub const PROTOCOLS_XML: &str = "protocol-numbers.xml";

/// Filename of the generated protocols database
pub const PROTOCOLS_FILE: &str = "protocols";

/// Comment header emitted at the top of the generated protocols database
pub const PROTOCOLS_HEADER: &str = "# See also protocols(5) and IANA official page :\n\
# https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml\n";

/// Source and output naming for one registry
#[derive(Debug, Clone)]
pub struct RegistrySpec {
    /// URL the registry XML is fetched from
    pub url: String,
    /// Filename the raw XML is stored under in the destination directory
    pub xml_filename: String,
    /// Filename of the generated flat file under `dist/`
    pub output_filename: String,
    /// Comment header written at the top of the generated flat file
    pub header: String,
}

/// Configuration for a full conversion run, covering both registries
#[derive(Debug, Clone)]
pub struct Config {
    /// Service-names/port-numbers registry
    pub services: RegistrySpec,
    /// Protocol-numbers registry
    pub protocols: RegistrySpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: RegistrySpec {
                url: SERVICES_URL.to_string(),
                xml_filename: SERVICES_XML.to_string(),
                output_filename: SERVICES_FILE.to_string(),
                header: SERVICES_HEADER.to_string(),
            },
            protocols: RegistrySpec {
                url: PROTOCOLS_URL.to_string(),
                xml_filename: PROTOCOLS_XML.to_string(),
                output_filename: PROTOCOLS_FILE.to_string(),
                header: PROTOCOLS_HEADER.to_string(),
            },
        }
    }
}

impl Config {
    /// Creates a config with the canonical IANA URLs and filenames
    pub fn new() -> Self {
        Self::default()
    }
}
