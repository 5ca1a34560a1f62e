pub trait StrExt {
    /// Fold an identifier into a form where spelling variants compare equal.
    ///
    /// Case is ignored and word separators are dropped, so `RemoveBin`,
    /// `remove-bin` and `remove_bin` all fold to `removebin`.
    ///
    /// ```
    /// # use util::StrExt;
    /// assert_eq!("RemoveShippingBin".fold_identifier(), "removeshippingbin");
    /// assert_eq!(
    ///     "remove-shipping-bin".fold_identifier(),
    ///     "remove_shipping_bin".fold_identifier()
    /// );
    /// ```
    fn fold_identifier(&self) -> String;
}

impl StrExt for str {
    fn fold_identifier(&self) -> String {
        self.chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect()
    }
}
