use ephemera::presentation::Environment;

#[test]
fn given_known_names_when_parsing_then_maps_case_insensitively() {
    assert_eq!(Environment::try_from("Local".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from("TEST".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
}

#[test]
fn given_unknown_name_when_parsing_then_error_lists_choices() {
    let err = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(err.contains("staging"));
    assert!(err.contains("local, test, or prod"));
}

#[test]
fn given_environment_when_naming_settings_file_then_uses_lowercase_name() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
    assert_eq!(Environment::default(), Environment::Local);
}
