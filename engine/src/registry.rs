use util::IndexMap;

use crate::{Error, Result};

/// Symbolic tilesheet names mapped to tilesheet ids on the map.
///
/// Patch data refers to tilesheets by symbolic name so the same layouts work
/// against maps where the sheets have different ids. The `default` name is
/// mandatory and is used for overrides that don't name a sheet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TilesheetRegistry {
    names: IndexMap<String, String>,
}

impl TilesheetRegistry {
    pub const DEFAULT: &'static str = "default";

    pub fn new(names: IndexMap<String, String>) -> Result<Self> {
        if !names.contains_key(Self::DEFAULT) {
            return Err(Error::config(format!(
                "the required {:?} tilesheet isn't specified",
                Self::DEFAULT
            )));
        }
        Ok(TilesheetRegistry { names })
    }

    /// Resolve a symbolic name into a tilesheet id, `None` means the default
    /// sheet.
    pub fn resolve(&self, name: Option<&str>) -> Result<&str> {
        let name = name.unwrap_or(Self::DEFAULT);
        self.names
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::config(format!("unknown tilesheet name {name:?}")))
    }

    pub fn default_id(&self) -> &str {
        &self.names[Self::DEFAULT]
    }
}

impl TryFrom<IndexMap<String, String>> for TilesheetRegistry {
    type Error = Error;

    fn try_from(value: IndexMap<String, String>) -> Result<Self> {
        TilesheetRegistry::new(value)
    }
}
