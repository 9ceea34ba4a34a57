use soundpress::application::ports::{ConversionRepository, ConversionUpdate, RepositoryError};
use soundpress::domain::{ArtifactKey, Conversion, ConversionStatus, SessionId};
use soundpress::infrastructure::persistence::InMemoryConversionRepository;

async fn create_record(repository: &InMemoryConversionRepository) -> Conversion {
    let conversion = Conversion::new(
        SessionId::new("session-1"),
        "https://example.com/watch?v=abc".to_string(),
    );
    repository.create(&conversion).await.unwrap();
    conversion
}

#[tokio::test]
async fn given_pending_record_when_jumping_straight_to_completed_then_rejected() {
    let repository = InMemoryConversionRepository::new();
    let conversion = create_record(&repository).await;

    let result = repository
        .update(
            conversion.id,
            ConversionUpdate::completed_text("never happened".to_string()),
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    // The rejected write must not leave partial changes behind.
    let stored = repository.get_by_id(conversion.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ConversionStatus::Pending);
    assert!(stored.transcript.is_none());
}

#[tokio::test]
async fn given_failed_record_when_writing_completed_then_rejected() {
    let repository = InMemoryConversionRepository::new();
    let conversion = create_record(&repository).await;

    repository.claim_audio_leg(conversion.id).await.unwrap();
    repository
        .update(
            conversion.id,
            ConversionUpdate::failed("transcode error".to_string()),
        )
        .await
        .unwrap();

    let key = ArtifactKey::new(&conversion.id, "late.mp3");
    let result = repository
        .update(
            conversion.id,
            ConversionUpdate::completed_audio("Late Title".to_string(), key),
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let stored = repository.get_by_id(conversion.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ConversionStatus::Failed);
    assert!(stored.audio_artifact.is_none());
}

#[tokio::test]
async fn given_claimed_legs_when_writing_terminal_statuses_then_accepted() {
    let repository = InMemoryConversionRepository::new();
    let conversion = create_record(&repository).await;

    assert!(repository.claim_audio_leg(conversion.id).await.unwrap());
    let key = ArtifactKey::new(&conversion.id, "track.mp3");
    repository
        .update(
            conversion.id,
            ConversionUpdate::completed_audio("Track".to_string(), key),
        )
        .await
        .unwrap();

    assert!(repository.claim_text_leg(conversion.id).await.unwrap());
    repository
        .update(
            conversion.id,
            ConversionUpdate::completed_text("words".to_string()),
        )
        .await
        .unwrap();

    let stored = repository.get_by_id(conversion.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ConversionStatus::Completed);
    assert_eq!(stored.transcript.as_deref(), Some("words"));
}

#[tokio::test]
async fn given_update_without_status_when_applied_then_no_transition_check() {
    let repository = InMemoryConversionRepository::new();
    let conversion = create_record(&repository).await;

    repository
        .update(
            conversion.id,
            ConversionUpdate {
                title: Some("Renamed".to_string()),
                ..ConversionUpdate::default()
            },
        )
        .await
        .unwrap();

    let stored = repository.get_by_id(conversion.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ConversionStatus::Pending);
    assert_eq!(stored.title.as_deref(), Some("Renamed"));
}
