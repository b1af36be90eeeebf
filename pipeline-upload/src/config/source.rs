//! Config file formats and the figment provider that reads them

use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Json, Toml};
use figment::value::{Dict, Map, Tag, Value};
use figment::{Error, Metadata, Profile, Provider, Source};

/// Key-path delimiter shared by dotenv files and environment variables
pub const KEY_DELIMITER: &str = "__";

/// Supported config file formats, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `KEY=VALUE` lines, nested with `__` (e.g. `S3_CONFIG__REGION=eu-west-1`)
    Dotenv,
    /// TOML tables
    Toml,
    /// JSON objects
    Json,
}

impl ConfigFormat {
    /// All formats in the order they are tried within one directory
    pub const ALL: [Self; 3] = [Self::Dotenv, Self::Toml, Self::Json];

    /// File extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Dotenv => "env",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension
    ///
    /// Files without a recognised extension are treated as dotenv.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Dotenv,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A config file that has been located and read into memory
///
/// Reading happens in the loader so I/O failures stay separate from decode
/// failures; parsing happens lazily when figment asks for data. Keys of every
/// format are lowercased so `S3_CONFIG` and `s3_config` address the same
/// section, matching [`EnvOverrides`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    format: ConfigFormat,
    content: String,
}

impl ConfigFile {
    /// Create a provider from already-read file content
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, format: ConfigFormat, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format,
            content: content.into(),
        }
    }

    /// Path the content was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format used to parse the content
    #[must_use]
    pub const fn format(&self) -> ConfigFormat {
        self.format
    }

    fn parse_dotenv(&self) -> Result<Dict, Error> {
        let mut dict = Dict::new();
        for item in dotenvy::from_read_iter(self.content.as_bytes()) {
            let (key, value) =
                item.map_err(|e| Error::from(format!("{}: {e}", self.path.display())))?;
            let key = key.to_ascii_lowercase();
            let segments: Vec<&str> = key
                .split(KEY_DELIMITER)
                .filter(|segment| !segment.is_empty())
                .collect();
            insert_path(&mut dict, &segments, Value::from(value));
        }
        Ok(dict)
    }
}

fn merge_profiles(data: Map<Profile, Dict>) -> Dict {
    data.into_values().fold(Dict::new(), |mut acc, dict| {
        acc.extend(dict);
        acc
    })
}

impl Provider for ConfigFile {
    fn metadata(&self) -> Metadata {
        Metadata::from(
            format!("`{}` config file", self.format),
            Source::File(self.path.clone()),
        )
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let dict = match self.format {
            ConfigFormat::Dotenv => self.parse_dotenv()?,
            ConfigFormat::Toml => lowercase_keys(merge_profiles(Toml::string(&self.content).data()?)),
            ConfigFormat::Json => lowercase_keys(merge_profiles(Json::string(&self.content).data()?)),
        };
        Ok(Profile::Default.collect(dict))
    }
}

/// Environment variables as raw strings, nested on `__`
///
/// Unlike figment's `Env`, values are never type-guessed, so `007` stays
/// `007` and `[a]` stays a string. Only variables accepted by `filter` are
/// read; keys are lowercased. Variables that are not valid UTF-8 are skipped.
#[derive(Debug, Clone, Copy)]
pub struct EnvOverrides {
    filter: fn(&str) -> bool,
}

impl EnvOverrides {
    /// Read only the variables for which `filter` returns true
    #[must_use]
    pub const fn filtered(filter: fn(&str) -> bool) -> Self {
        Self { filter }
    }

    fn dict(&self, vars: impl IntoIterator<Item = (String, String)>) -> Dict {
        let mut dict = Dict::new();
        for (key, value) in vars {
            if !(self.filter)(&key) {
                continue;
            }
            let key = key.to_ascii_lowercase();
            let segments: Vec<&str> = key
                .split(KEY_DELIMITER)
                .filter(|segment| !segment.is_empty())
                .collect();
            insert_path(&mut dict, &segments, Value::from(value));
        }
        dict
    }
}

impl Provider for EnvOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named("environment variable(s)")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        Ok(Profile::Default.collect(self.dict(vars)))
    }
}

/// Insert `value` at a nested key path, creating intermediate dicts
///
/// A scalar sitting where a dict is needed is replaced, so the last line of a
/// dotenv file wins, as with repeated environment variables.
fn insert_path(dict: &mut Dict, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            dict.insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            let entry = dict
                .entry((*first).to_string())
                .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()));
            if !matches!(entry, Value::Dict(..)) {
                *entry = Value::Dict(Tag::Default, Dict::new());
            }
            if let Value::Dict(_, nested) = entry {
                insert_path(nested, rest, value);
            }
        }
    }
}

fn lowercase_keys(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), lowercase_value(value)))
        .collect()
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(tag, lowercase_keys(dict)),
        Value::Array(tag, items) => {
            Value::Array(tag, items.into_iter().map(lowercase_value).collect())
        }
        other => other,
    }
}
