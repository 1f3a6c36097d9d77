use cssgrade::css::{PropertyPattern, has_any_property, has_custom_property, has_property};

#[test]
fn color_does_not_match_inside_background_color() {
    assert!(!has_property("background-color: red;", "color"));
    assert!(has_property("background-color: red;", "background-color"));
}

#[test]
fn property_matches_at_start_after_whitespace_and_after_semicolon() {
    assert!(has_property("color: red;", "color"));
    assert!(has_property("  color:red", "color"));
    assert!(has_property("margin: 0;color: red", "color"));
    assert!(has_property("margin: 0; color : red", "color"));
}

#[test]
fn matching_ignores_case() {
    assert!(has_property("COLOR: red", "color"));
    assert!(has_property("color: red", "Color"));
}

#[test]
fn name_without_colon_is_not_a_declaration() {
    assert!(!has_property("transition: color 1s", "color"));
    assert!(!has_property("color red", "color"));
}

#[test]
fn values_are_never_inspected() {
    assert!(has_property("color: ;", "color"));
    assert!(has_property("width: not-a-length", "width"));
}

#[test]
fn any_of_accepts_either_alias_but_not_a_longer_name() {
    let aliases = ["background", "background-color"];

    assert!(has_any_property("background: red", &aliases));
    assert!(has_any_property("background-color: red", &aliases));
    assert!(has_any_property("background: red; background-color: blue", &aliases));
    assert!(!has_any_property("background-image: url(x)", &aliases));
    assert!(!has_any_property("background-image: url(x)", &[] as &[&str]));
}

#[test]
fn custom_properties_need_the_dashes() {
    assert!(has_custom_property("--brand: #000; --card: #fff", "brand"));
    assert!(has_custom_property("--brand: #000", "--brand"));
    assert!(!has_custom_property("brand: #000", "brand"));
    assert!(!has_custom_property("--brand-dark: #000", "brand"));
    assert!(!has_custom_property("x--brand: #000", "brand"));
}

#[test]
fn compiled_pattern_is_reusable() {
    let pattern = PropertyPattern::property("box-shadow");

    assert_eq!(pattern.name(), "box-shadow");
    assert!(pattern.is_declared_in("box-shadow: 0 0 2px black"));
    assert!(!pattern.is_declared_in("text-shadow: 0 0 2px black"));
}
