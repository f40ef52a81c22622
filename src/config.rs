use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "site.toml";

/// Deployment settings. Site identity is compiled in, see `consts`.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String
}

fn default_language() -> String {
    "en-us".to_string()
}

impl Config {
    pub fn load(dir: &Path) -> Result<Self, Box<dyn Error>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(format!("No {} found in {}", CONFIG_FILE, dir.display()).into());
        }
        Ok(toml::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
