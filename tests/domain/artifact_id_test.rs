use ephemera::domain::ArtifactId;

#[test]
fn given_new_id_when_displayed_then_renders_32_lowercase_hex_chars() {
    let id = ArtifactId::new().to_string();

    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn given_artifact_file_name_when_parsing_then_recovers_id() {
    let id = ArtifactId::new();
    let file_name = format!("yt_{}.webm", id);

    assert_eq!(ArtifactId::parse_from_file_name(&file_name), Some(id));
}

#[test]
fn given_fragment_file_name_when_parsing_then_recovers_id() {
    let id = ArtifactId::new();
    let file_name = format!("yt_{}.webm.part", id);

    assert_eq!(ArtifactId::parse_from_file_name(&file_name), Some(id));
}

#[test]
fn given_foreign_file_name_when_parsing_then_returns_none() {
    assert_eq!(ArtifactId::parse_from_file_name("notes.txt"), None);
    assert_eq!(ArtifactId::parse_from_file_name("yt_short.mp4"), None);
}
