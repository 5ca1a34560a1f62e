use util::{FlagLookup, FlagTable};

/// Evaluate a named boolean setting.
///
/// Names that aren't boolean settings evaluate to false with a warning.
pub fn config_flag(settings: &impl FlagTable, name: &str) -> bool {
    flag_value(settings, name).unwrap_or_else(|msg| {
        log::warn!("{msg}");
        false
    })
}

/// Flag value or a description of why the name isn't a usable flag.
pub(crate) fn flag_value(
    settings: &impl FlagTable,
    name: &str,
) -> Result<bool, String> {
    match settings.lookup_flag(name) {
        FlagLookup::Value(b) => Ok(b),
        FlagLookup::NotAFlag => {
            Err(format!("setting {name:?} is not a boolean flag"))
        }
        FlagLookup::Unknown => Err(format!("unknown flag {name:?}")),
    }
}
