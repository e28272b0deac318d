use crate::prelude::*;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub dump: Dump,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,
}

// Dump {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Dump {
    /// Path of the capture file to replay.
    pub file: String,

    #[serde(default = "Config::default_hex_offset")]
    pub hex_offset: usize,

    #[serde(default = "Config::default_incoming_prefix")]
    pub incoming_prefix: String,
}
impl Dump {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn hex_offset(&self) -> usize {
        self.hex_offset
    }

    pub fn incoming_prefix(&self) -> &str {
        &self.incoming_prefix
    }
} // }}}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;
        let config = serde_yaml::from_str(&content)
            .map_err(|err| anyhow!("error parsing {}: {}", file, err))?;

        Ok(config)
    }

    pub fn dump(&self) -> &Dump {
        &self.dump
    }

    pub fn loglevel(&self) -> String {
        self.loglevel.clone()
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_hex_offset() -> usize {
        crate::sitop::replay::DEFAULT_HEX_OFFSET
    }

    fn default_incoming_prefix() -> String {
        crate::sitop::replay::DEFAULT_INCOMING_PREFIX.to_string()
    }
}
