use crate::StrExt;

/// Result of looking up a named setting as a boolean flag.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FlagLookup {
    Value(bool),
    /// The setting exists but isn't a boolean.
    NotAFlag,
    Unknown,
}

/// Settings types whose boolean fields can be looked up by name.
///
/// Usually implemented with `#[derive(derives::FlagTable)]`, which builds the
/// field table at compile time.
pub trait FlagTable: 'static {
    /// Every setting name paired with a getter if the setting is a boolean
    /// flag.
    fn fields() -> &'static [(&'static str, Option<fn(&Self) -> bool>)];

    /// Look up a flag by name.
    ///
    /// Names match case-insensitively and regardless of `-` and `_`
    /// separators, so `FlipCellarEntrance` finds `flip_cellar_entrance`.
    fn lookup_flag(&self, name: &str) -> FlagLookup {
        let key = name.fold_identifier();
        match Self::fields()
            .iter()
            .find(|(field, _)| field.fold_identifier() == key)
        {
            Some((_, Some(get))) => FlagLookup::Value(get(self)),
            Some((_, None)) => FlagLookup::NotAFlag,
            None => FlagLookup::Unknown,
        }
    }
}
