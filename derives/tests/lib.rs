use derives::FlagTable;
use util::{FlagLookup, FlagTable};

#[derive(Default, Debug, Eq, PartialEq, serde::Deserialize, FlagTable)]
#[serde(default, rename_all = "kebab-case")]
struct CellarSettings {
    only_unlock_after_final_house_upgrade: bool,
    flip_cellar_entrance: bool,
    x_position_offset: i32,
    y_position_offset: i32,
}

#[test]
fn test_derive_flag_table() {
    let fields = CellarSettings::fields();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].0, "only_unlock_after_final_house_upgrade");
    assert!(fields[1].1.is_some());
    assert!(fields[2].1.is_none());
}

#[test]
fn test_flag_lookup() {
    let settings = CellarSettings {
        flip_cellar_entrance: true,
        x_position_offset: 3,
        ..Default::default()
    };

    assert_eq!(
        settings.lookup_flag("FlipCellarEntrance"),
        FlagLookup::Value(true)
    );
    assert_eq!(
        settings.lookup_flag("flip-cellar-entrance"),
        FlagLookup::Value(true)
    );
    assert_eq!(
        settings.lookup_flag("OnlyUnlockAfterFinalHouseUpgrade"),
        FlagLookup::Value(false)
    );
    assert_eq!(
        settings.lookup_flag("XPositionOffset"),
        FlagLookup::NotAFlag
    );
    assert_eq!(settings.lookup_flag("EnableGarden"), FlagLookup::Unknown);
}

#[test]
fn test_deserialized_settings() {
    let settings: CellarSettings =
        idm::from_str("flip-cellar-entrance true\nx-position-offset 2\n")
            .unwrap();
    assert_eq!(
        settings,
        CellarSettings {
            flip_cellar_entrance: true,
            x_position_offset: 2,
            ..Default::default()
        }
    );
    assert_eq!(
        settings.lookup_flag("flip_cellar_entrance"),
        FlagLookup::Value(true)
    );
}
