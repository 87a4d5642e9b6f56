use ephemera::domain::{FALLBACK_MIME, MediaKind};

#[test]
fn given_audio_extensions_when_mapping_mime_then_matches_known_types() {
    assert_eq!(MediaKind::Audio.mime_for_extension("m4a"), "audio/mp4");
    assert_eq!(MediaKind::Audio.mime_for_extension("webm"), "audio/webm");
    assert_eq!(MediaKind::Audio.mime_for_extension("mp3"), "audio/mpeg");
}

#[test]
fn given_video_extensions_when_mapping_mime_then_matches_known_types() {
    assert_eq!(MediaKind::Video.mime_for_extension("mp4"), "video/mp4");
    assert_eq!(MediaKind::Video.mime_for_extension("webm"), "video/webm");
}

#[test]
fn given_unknown_extension_when_mapping_mime_then_falls_back_to_octet_stream() {
    assert_eq!(MediaKind::Video.mime_for_extension("mkv"), FALLBACK_MIME);
    assert_eq!(MediaKind::Audio.mime_for_extension("mp4"), FALLBACK_MIME);
}

#[test]
fn given_kind_names_when_parsing_then_defaults_and_errors_are_sensible() {
    assert_eq!(MediaKind::default(), MediaKind::Audio);
    assert_eq!("VIDEO".parse::<MediaKind>().unwrap(), MediaKind::Video);
    assert!("podcast".parse::<MediaKind>().is_err());
}

#[test]
fn given_video_kind_when_selecting_format_then_caps_height_at_480() {
    assert!(MediaKind::Video.format_selector().contains("height<=480"));
    assert!(MediaKind::Audio.format_selector().starts_with("bestaudio"));
}
