use derives::FlagTable;
use serde::{Deserialize, Serialize};

/// User settings that patch layouts can be gated on.
///
/// Layout flags name the boolean fields here, matched regardless of case and
/// word separators.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize, FlagTable)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub remove_shipping_bin: bool,
    pub edit_ponds: bool,
    pub show_picnic_table: bool,
    pub show_training_mat: bool,
    pub flip_cellar_entrance: bool,
    pub only_unlock_after_final_house_upgrade: bool,
    pub x_position_offset: i32,
    pub y_position_offset: i32,
}
