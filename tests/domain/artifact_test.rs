use std::path::{Path, PathBuf};
use std::time::Duration;

use ephemera::domain::{Artifact, ArtifactState};

#[test]
fn given_prefix_and_extension_when_creating_then_path_follows_naming_scheme() {
    let artifact = Artifact::new(Path::new("/work"), "tts", "mp3");

    let expected = format!("/work/tts_{}.mp3", artifact.id);
    assert_eq!(artifact.path, PathBuf::from(expected));
    assert_eq!(artifact.state, ArtifactState::Creating);
    assert_eq!(artifact.size_bytes, None);
}

#[test]
fn given_hostile_prefix_when_creating_then_path_stays_inside_working_dir() {
    let artifact = Artifact::new(Path::new("/work"), "../../etc", ".PNG");

    assert_eq!(artifact.prefix, "etc");
    assert_eq!(artifact.extension, "png");
    assert_eq!(artifact.path.parent(), Some(Path::new("/work")));
}

#[test]
fn given_empty_extension_when_creating_then_falls_back_to_bin() {
    let artifact = Artifact::new(Path::new("/work"), "yt", "");

    assert_eq!(artifact.extension, "bin");
}

#[test]
fn given_creating_artifact_when_setting_extension_then_path_is_retargeted() {
    let mut artifact = Artifact::new(Path::new("/work"), "genimage", "png");

    artifact.set_extension("webp");

    assert_eq!(artifact.extension, "webp");
    assert_eq!(artifact.file_name(), format!("{}.webp", artifact.stem()));
}

#[test]
fn given_ready_artifact_when_setting_extension_then_nothing_changes() {
    let mut artifact = Artifact::new(Path::new("/work"), "flux", "png");
    artifact.state = ArtifactState::Ready;
    let before = artifact.path.clone();

    artifact.set_extension("jpg");

    assert_eq!(artifact.path, before);
}

#[test]
fn given_orphaned_file_when_recovering_then_id_and_prefix_are_parsed() {
    let original = Artifact::new(Path::new("/work"), "yt", "m4a");

    let recovered = Artifact::recovered(original.path.clone(), Duration::ZERO);

    assert_eq!(recovered.id, original.id);
    assert_eq!(recovered.prefix, "yt");
    assert_eq!(recovered.extension, "m4a");
}

#[test]
fn given_three_mebibytes_when_converting_then_reports_three_mb() {
    let mut artifact = Artifact::new(Path::new("/work"), "tts", "mp3");
    artifact.size_bytes = Some(3 * 1024 * 1024);

    assert_eq!(artifact.size_mb(), Some(3.0));
}

#[test]
fn given_fresh_artifact_when_measuring_age_then_it_is_near_zero() {
    let artifact = Artifact::new(Path::new("/work"), "tts", "mp3");

    assert!(artifact.age() < Duration::from_secs(5));
}

#[test]
fn given_file_modified_two_hours_ago_when_recovering_then_age_reflects_it() {
    let path = Path::new("/work").join(format!("yt_{}.mp4", "0".repeat(32)));

    let recovered = Artifact::recovered(path, Duration::from_secs(2 * 3600));

    assert!(recovered.age() >= Duration::from_secs(2 * 3600));
    assert!(recovered.age() < Duration::from_secs(2 * 3600 + 5));
}
