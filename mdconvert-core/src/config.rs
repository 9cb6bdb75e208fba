//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownValue {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Declares a closed set of lowercase option names with `FromStr`/`Display`
macro_rules! named_options {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ConfigError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                        expected: concat!($($text, " "),+),
                    }),
                }
            }
        }
    };
}

named_options!(
    /// Which documents a conversion writes
    OutputFormat, "format", default = Pdf,
    { Pdf => "pdf", Docx => "docx", Both => "both", Html => "html" }
);

named_options!(
    /// Named stylesheet for generated documents
    StyleName, "style", default = Default,
    { Default => "default", Professional => "professional", Minimal => "minimal" }
);

named_options!(
    /// How ASCII art is carried into the output
    AsciiMode, "ascii mode", default = Optimize,
    { Image => "image", Optimize => "optimize", Preserve => "preserve" }
);

named_options!(
    /// Image format requested from diagram renderers
    ImageFormat, "image format", default = Png,
    { Png => "png", Svg => "svg" }
);

impl OutputFormat {
    pub fn wants_pdf(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }

    pub fn wants_docx(&self) -> bool {
        matches!(self, OutputFormat::Docx | OutputFormat::Both)
    }

    pub fn wants_html(&self) -> bool {
        matches!(self, OutputFormat::Html)
    }
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// Main configuration struct matching the mdconvert.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diagrams: DiagramConfig,

    #[serde(default)]
    pub pdf: PdfConfig,

    #[serde(default)]
    pub docx: DocxConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub style: StyleName,

    #[serde(default)]
    pub ascii_mode: AsciiMode,

    /// Value of the `lang` attribute on generated HTML documents
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Insert a table of contents after the document header
    #[serde(default)]
    pub toc: bool,
}

fn default_lang() -> String {
    String::from("en")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            style: StyleName::default(),
            ascii_mode: AsciiMode::default(),
            lang: default_lang(),
            toc: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default)]
    pub format: ImageFormat,

    #[serde(default = "default_mermaid_bin")]
    pub mermaid_bin: PathBuf,

    #[serde(default = "default_dot_bin")]
    pub dot_bin: PathBuf,
}

fn default_mermaid_bin() -> PathBuf {
    PathBuf::from("mmdc")
}

fn default_dot_bin() -> PathBuf {
    PathBuf::from("dot")
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            mermaid_bin: default_mermaid_bin(),
            dot_bin: default_dot_bin(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Explicit PDF engine binary (weasyprint or a Chrome build)
    #[serde(default)]
    pub engine: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxConfig {
    #[serde(default)]
    pub pandoc_bin: Option<PathBuf>,

    /// Word document whose styles pandoc copies into the output
    #[serde(default)]
    pub reference_doc: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    crate::markdown::DEFAULT_THEME.to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: default_theme(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Generated files older than this are removed before each conversion
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_retention_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            retention_secs: default_retention_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Server output directory, resolved relative to the config file
    pub fn server_output_dir(&self) -> PathBuf {
        self.resolve_path(&self.server.output_dir)
    }

    /// Reference document for DOCX output, resolved relative to the config file
    pub fn reference_doc(&self) -> Option<PathBuf> {
        self.docx.reference_doc.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.config_path.as_ref().and_then(|p| p.parent()) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::Pdf);
        assert_eq!(config.output.style, StyleName::Default);
        assert_eq!(config.output.ascii_mode, AsciiMode::Optimize);
        assert_eq!(config.diagrams.format, ImageFormat::Png);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_option_names_parse() {
        assert_eq!("both".parse::<OutputFormat>().unwrap(), OutputFormat::Both);
        assert_eq!(" Minimal ".parse::<StyleName>().unwrap(), StyleName::Minimal);
        assert_eq!("image".parse::<AsciiMode>().unwrap(), AsciiMode::Image);

        let err = "fancy".parse::<StyleName>().unwrap_err();
        assert!(err.to_string().contains("Unknown style 'fancy'"));
        assert!(err.to_string().contains("professional"));
    }

    #[test]
    fn test_output_format_selection() {
        assert!(OutputFormat::Both.wants_pdf());
        assert!(OutputFormat::Both.wants_docx());
        assert!(!OutputFormat::Pdf.wants_docx());
        assert!(OutputFormat::Html.wants_html());
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdconvert.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "output:\n  format: both\n  style: professional\ndiagrams:\n  format: svg\nserver:\n  output_dir: generated\n"
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Both);
        assert_eq!(config.output.style, StyleName::Professional);
        assert_eq!(config.output.ascii_mode, AsciiMode::Optimize);
        assert_eq!(config.diagrams.format, ImageFormat::Svg);
        assert_eq!(config.server_output_dir(), dir.path().join("generated"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.server.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_unknown_enum_in_yaml_is_error() {
        let result: Result<Config, _> = serde_yaml::from_str("output:\n  style: gothic\n");
        assert!(result.is_err());
    }
}
