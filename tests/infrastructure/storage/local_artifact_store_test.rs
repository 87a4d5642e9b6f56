use std::collections::HashSet;
use std::time::{Duration, Instant};

use ephemera::application::ports::{ArtifactStore, ArtifactStoreError, DeleteOutcome};
use ephemera::domain::ArtifactState;
use ephemera::infrastructure::storage::LocalArtifactStore;

use crate::helpers::{MIB, age_file, create_test_store, create_test_store_with_cap, dir_entries};

#[tokio::test]
async fn given_prefix_when_allocating_then_path_lives_in_working_dir_and_nothing_is_written() {
    let (dir, store) = create_test_store();

    let artifact = store.allocate("tts", "mp3").await.unwrap();

    assert_eq!(artifact.state, ArtifactState::Creating);
    assert_eq!(artifact.path.parent().unwrap(), store.working_dir());
    assert!(artifact.file_name().starts_with("tts_"));
    assert!(dir_entries(dir.path()).is_empty());
    assert_eq!(store.live_artifacts(), 1);
}

#[tokio::test]
async fn given_concurrent_allocations_with_same_prefix_when_allocating_then_paths_are_distinct() {
    let (_dir, store) = create_test_store();

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.allocate("yt", "m4a").await.unwrap().path })
        })
        .collect();

    let mut paths = HashSet::new();
    for handle in handles {
        paths.insert(handle.await.unwrap());
    }
    assert_eq!(paths.len(), 64);
}

#[tokio::test]
async fn given_three_mebibytes_written_when_checking_size_then_ok_with_three_mb() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();
    store.write(&mut artifact, &vec![0u8; 3 * MIB]).await.unwrap();

    let check = store.check_size(&mut artifact).await.unwrap();

    assert!(check.ok);
    assert_eq!(check.size_mb, 3.0);
    assert_eq!(artifact.state, ArtifactState::Ready);
}

#[tokio::test]
async fn given_file_over_cap_when_checking_size_then_not_ok() {
    let (_dir, store) = create_test_store_with_cap(MIB as u64);
    let mut artifact = store.allocate("flux", "png").await.unwrap();
    store.write(&mut artifact, &vec![0u8; MIB + 1]).await.unwrap();

    let check = store.check_size(&mut artifact).await.unwrap();

    assert!(!check.ok);
}

#[tokio::test]
async fn given_file_exactly_at_cap_when_checking_size_then_ok() {
    let (_dir, store) = create_test_store_with_cap(MIB as u64);
    let mut artifact = store.allocate("flux", "png").await.unwrap();
    store.write(&mut artifact, &vec![0u8; MIB]).await.unwrap();

    assert!(store.check_size(&mut artifact).await.unwrap().ok);
}

#[tokio::test]
async fn given_written_artifact_when_deleting_twice_then_second_call_is_a_no_op() {
    let (dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();
    store.write(&mut artifact, b"audio").await.unwrap();

    let first = store.delete(&artifact).await;
    let second = store.delete(&artifact).await;

    assert_eq!(first, DeleteOutcome::Removed);
    assert_eq!(second, DeleteOutcome::AlreadyGone);
    assert!(dir_entries(dir.path()).is_empty());
    assert_eq!(store.live_artifacts(), 0);
}

#[tokio::test]
async fn given_concurrent_deletes_of_one_artifact_when_racing_then_exactly_one_removes() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("yt", "mp4").await.unwrap();
    store.write(&mut artifact, b"video").await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let artifact = artifact.clone();
            tokio::spawn(async move { store.delete(&artifact).await })
        })
        .collect();

    let mut removed = 0;
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.is_gone());
        if outcome == DeleteOutcome::Removed {
            removed += 1;
        }
    }
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn given_deleted_artifact_when_writing_then_fails_with_deleted() {
    let (dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();
    store.delete(&artifact).await;

    let result = store.write(&mut artifact, b"late").await;

    assert!(matches!(result, Err(ArtifactStoreError::Deleted(id)) if id == artifact.id));
    assert!(dir_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_ready_artifact_when_writing_again_then_invalid_transition() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();
    store.write(&mut artifact, b"once").await.unwrap();

    let result = store.write(&mut artifact, b"twice").await;

    assert!(matches!(
        result,
        Err(ArtifactStoreError::InvalidTransition {
            from: ArtifactState::Ready,
            to: ArtifactState::Ready
        })
    ));
}

#[tokio::test]
async fn given_creating_artifact_when_marking_serving_then_invalid_transition() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();

    let result = store.mark_serving(&mut artifact).await;

    assert!(matches!(
        result,
        Err(ArtifactStoreError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn given_downloader_output_with_fragment_when_finalizing_then_real_file_is_chosen() {
    let (dir, store) = create_test_store();
    let mut artifact = store.allocate("yt", "bin").await.unwrap();
    let stem = artifact.stem();
    std::fs::write(dir.path().join(format!("{}.m4a.part", stem)), b"frag").unwrap();
    std::fs::write(dir.path().join(format!("{}.m4a", stem)), b"complete").unwrap();

    store.finalize(&mut artifact).await.unwrap();

    assert_eq!(artifact.extension, "m4a");
    assert_eq!(artifact.size_bytes, Some(8));
    assert_eq!(artifact.state, ArtifactState::Ready);
    assert_eq!(artifact.file_name(), format!("{}.m4a", stem));
}

#[tokio::test]
async fn given_only_fragments_when_finalizing_then_not_found() {
    let (dir, store) = create_test_store();
    let mut artifact = store.allocate("yt", "bin").await.unwrap();
    std::fs::write(dir.path().join(format!("{}.webm.ytdl", artifact.stem())), b"x").unwrap();

    let result = store.finalize(&mut artifact).await;

    assert!(matches!(result, Err(ArtifactStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_unfinished_artifact_with_fragments_when_deleting_then_fragments_are_removed() {
    let (dir, store) = create_test_store();
    let artifact = store.allocate("yt", "bin").await.unwrap();
    let stem = artifact.stem();
    std::fs::write(dir.path().join(format!("{}.webm.part", stem)), b"frag").unwrap();
    std::fs::write(dir.path().join(format!("{}.temp.webm", stem)), b"frag").unwrap();
    std::fs::write(dir.path().join("unrelated.txt"), b"keep").unwrap();

    store.delete(&artifact).await;

    assert_eq!(dir_entries(dir.path()), vec!["unrelated.txt".to_string()]);
}

#[tokio::test]
async fn given_old_and_new_files_when_listing_stale_then_only_old_is_listed() {
    let (dir, store) = create_test_store();
    let old = dir.path().join("old.mp3");
    let new = dir.path().join("new.mp3");
    std::fs::write(&old, b"o").unwrap();
    std::fs::write(&new, b"n").unwrap();
    age_file(&old, Duration::from_secs(7200));

    let stale = store.stale_files(Duration::from_secs(3600)).await.unwrap();

    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].path.file_name().unwrap(), "old.mp3");
    assert!(stale[0].age >= Duration::from_secs(7200));
}

#[tokio::test]
async fn given_leftover_files_when_wiping_then_directory_is_emptied() {
    let (dir, store) = create_test_store();
    std::fs::write(dir.path().join("a.bin"), b"a").unwrap();
    std::fs::write(dir.path().join("b.bin"), b"b").unwrap();

    let removed = store.wipe().await.unwrap();

    assert_eq!(removed, 2);
    assert!(dir_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn given_missing_working_dir_when_creating_store_then_it_is_created() {
    let parent = tempfile::TempDir::new().unwrap();
    let nested = parent.path().join("deep").join("temp");

    let store = LocalArtifactStore::with_defaults(nested.clone()).unwrap();

    assert!(nested.is_dir());
    assert_eq!(store.max_size_bytes(), 95 * MIB as u64);
}

#[tokio::test]
async fn given_deleted_artifact_when_checking_size_then_fails_with_deleted() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("flux", "png").await.unwrap();
    store.write(&mut artifact, b"png").await.unwrap();
    store.delete(&artifact).await;

    let err = store.check_size(&mut artifact).await.unwrap_err();

    assert!(matches!(err, ArtifactStoreError::Deleted(id) if id == artifact.id));
}

#[tokio::test]
async fn given_path_replaced_by_directory_when_deleting_then_gives_up_and_releases_artifact() {
    let (_dir, store) = create_test_store();
    let mut artifact = store.allocate("tts", "mp3").await.unwrap();
    store.write(&mut artifact, b"audio").await.unwrap();
    std::fs::remove_file(&artifact.path).unwrap();
    std::fs::create_dir(&artifact.path).unwrap();
    std::fs::write(artifact.path.join("inner"), b"x").unwrap();

    let outcome = store.delete(&artifact).await;

    assert_eq!(outcome, DeleteOutcome::GaveUp);
    assert_eq!(store.live_artifacts(), 0);

    std::fs::remove_dir_all(&artifact.path).unwrap();
    assert_eq!(store.delete(&artifact).await, DeleteOutcome::AlreadyGone);
}

#[cfg(unix)]
#[tokio::test]
async fn given_read_only_working_dir_when_deleting_then_retries_once_and_gives_up() {
    use std::os::unix::fs::PermissionsExt;

    let retry_delay = Duration::from_millis(200);
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalArtifactStore::new(dir.path().to_path_buf(), 95 * MIB as u64, retry_delay)
        .unwrap();
    let mut artifact = store.allocate("yt", "mp4").await.unwrap();
    store.write(&mut artifact, b"video").await.unwrap();

    let set_mode = |mode: u32| {
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(mode)).unwrap();
    };
    set_mode(0o555);
    if std::fs::write(dir.path().join("writable-check"), b"").is_ok() {
        // Permission bits do not bind this user (root); nothing to observe.
        set_mode(0o755);
        return;
    }

    let started = Instant::now();
    let outcome = store.delete(&artifact).await;
    let elapsed = started.elapsed();
    set_mode(0o755);

    assert_eq!(outcome, DeleteOutcome::GaveUp);
    assert!(elapsed >= retry_delay, "gave up after {:?}", elapsed);
    assert_eq!(store.live_artifacts(), 0);
    assert_eq!(dir_entries(dir.path()), vec![artifact.file_name()]);

    assert_eq!(store.delete(&artifact).await, DeleteOutcome::Removed);
    assert!(dir_entries(dir.path()).is_empty());
}
