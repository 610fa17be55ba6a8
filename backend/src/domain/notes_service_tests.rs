//! Tests for the notes service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockNoteRepository, MockSummarizeCommand};
use crate::outbound::memory::InMemoryNoteRepository;
use crate::test_support::MutableClock;
use chrono::{DateTime, TimeDelta, Utc};
use mockall::predicate::eq;
use rstest::rstest;

fn make_service(
    repo: MockNoteRepository,
    summarizer: MockSummarizeCommand,
) -> NotesService<MockNoteRepository> {
    NotesService::new(
        Arc::new(repo),
        Arc::new(summarizer),
        Duration::from_secs(300),
        Arc::new(MutableClock::new(Utc::now())),
    )
}

fn service_over<R: NoteRepository>(repo: Arc<R>) -> NotesService<R> {
    NotesService::new(
        repo,
        Arc::new(MockSummarizeCommand::new()),
        Duration::from_secs(300),
        Arc::new(MutableClock::new(Utc::now())),
    )
}

/// In-memory storage that can stall after listing or fail one deletion.
#[derive(Default)]
struct ScriptedRepository {
    inner: InMemoryNoteRepository,
    yield_after_list: bool,
    failing_delete: Option<NoteId>,
}

#[async_trait]
impl NoteRepository for ScriptedRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Note>, NoteRepositoryError> {
        let notes = self.inner.list_for_owner(owner).await?;
        if self.yield_after_list {
            tokio::task::yield_now().await;
        }
        Ok(notes)
    }

    async fn find(&self, owner: &UserId, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        self.inner.find(owner, id).await
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        self.inner.insert(owner, draft, now).await
    }

    async fn update_content(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        self.inner.update_content(owner, id, draft, now).await
    }

    async fn set_summary_if_absent(
        &self,
        owner: &UserId,
        id: &NoteId,
        summary: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        self.inner.set_summary_if_absent(owner, id, summary, now).await
    }

    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<(), NoteRepositoryError> {
        if self.failing_delete == Some(*id) {
            return Err(NoteRepositoryError::query("disk full"));
        }
        self.inner.delete(owner, id).await
    }
}

fn note_for(owner: &UserId, title: &str, content: &str) -> Note {
    let draft = NoteDraft::try_from_parts(title, content).expect("draft");
    Note::from_draft(NoteId::random(), owner.clone(), draft, Utc::now())
}

fn list_request(owner: &UserId, search: Option<&str>) -> ListNotesRequest {
    ListNotesRequest {
        owner: owner.clone(),
        search: search.map(str::to_owned),
    }
}

#[tokio::test]
async fn create_returns_stored_note_without_summary() {
    let owner = UserId::random();
    let mut repo = MockNoteRepository::new();
    repo.expect_insert()
        .times(1)
        .returning(|owner, draft, now| {
            Ok(Note::from_draft(NoteId::random(), owner.clone(), draft.clone(), now))
        });

    let service = make_service(repo, MockSummarizeCommand::new());
    let draft = NoteDraft::try_from_parts("Alpha", "first").expect("draft");
    let outcome = service
        .create_note(&owner, draft)
        .await
        .expect("create succeeds");

    assert_eq!(outcome.value.title.as_ref(), "Alpha");
    assert_eq!(outcome.value.content.as_ref(), "first");
    assert!(outcome.value.summary.is_none());
    assert_eq!(outcome.notice, "Note created successfully");
}

#[tokio::test]
async fn list_is_served_from_cache_until_a_mutation() {
    let owner = UserId::random();
    let existing = note_for(&owner, "Alpha", "first");
    let mut repo = MockNoteRepository::new();
    repo.expect_list_for_owner()
        .times(2)
        .returning(move |_| Ok(vec![existing.clone()]));
    repo.expect_delete().times(1).returning(|_, _| Ok(()));

    let service = make_service(repo, MockSummarizeCommand::new());
    service
        .list_notes(list_request(&owner, None))
        .await
        .expect("first list");
    service
        .list_notes(list_request(&owner, None))
        .await
        .expect("cached list");

    service
        .delete_note(&owner, &NoteId::random())
        .await
        .expect("delete");
    service
        .list_notes(list_request(&owner, None))
        .await
        .expect("refetched list");
}

#[rstest]
#[case(Some("alp"), vec!["Alpha"])]
#[case(Some(""), vec!["Alpha", "Beta"])]
#[case(None, vec!["Alpha", "Beta"])]
#[tokio::test]
async fn list_filters_by_search_term(
    #[case] search: Option<&str>,
    #[case] expected: Vec<&str>,
) {
    let owner = UserId::random();
    let notes = vec![
        note_for(&owner, "Alpha", "first"),
        note_for(&owner, "Beta", "second"),
    ];
    let mut repo = MockNoteRepository::new();
    repo.expect_list_for_owner()
        .times(1)
        .return_once(move |_| Ok(notes));

    let service = make_service(repo, MockSummarizeCommand::new());
    let found = service
        .list_notes(list_request(&owner, search))
        .await
        .expect("list succeeds");
    let titles: Vec<&str> = found.iter().map(|n| n.title.as_ref()).collect();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn get_reports_not_found_for_foreign_notes() {
    let mut repo = MockNoteRepository::new();
    repo.expect_find().times(1).returning(|_, _| Ok(None));

    let service = make_service(repo, MockSummarizeCommand::new());
    let err = service
        .get_note(&UserId::random(), &NoteId::random())
        .await
        .expect_err("missing note");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_of_unknown_note_is_not_found_and_recorded() {
    let owner = UserId::random();
    let mut repo = MockNoteRepository::new();
    repo.expect_update_content()
        .times(1)
        .returning(|_, id, _, _| Err(NoteRepositoryError::not_found(*id)));

    let service = make_service(repo, MockSummarizeCommand::new());
    let draft = NoteDraft::try_from_parts("Title", "Body").expect("draft");
    let err = service
        .update_note(&owner, &NoteId::random(), draft)
        .await
        .expect_err("unknown note");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let activity = service.mutation_activity(&owner);
    assert!(activity.contains(&(
        MutationKind::Update,
        MutationState::Failed {
            notice: "Note not found".into()
        }
    )));
}

#[tokio::test]
async fn delete_all_reports_count() {
    let owner = UserId::random();
    let mut repo = MockNoteRepository::new();
    repo.expect_delete_all_for_owner()
        .with(eq(owner.clone()))
        .times(1)
        .returning(|_| Ok(3));

    let service = make_service(repo, MockSummarizeCommand::new());
    let outcome = service
        .delete_all_notes(&owner)
        .await
        .expect("delete all");

    assert_eq!(outcome.value, 3);
    assert_eq!(outcome.notice, "Successfully deleted 3 note(s)");
}

#[tokio::test]
async fn generate_summary_only_touches_summary() {
    let owner = UserId::random();
    let note = note_for(&owner, "Alpha", "the body to summarize");
    let id = note.id;
    let found = note.clone();

    let mut repo = MockNoteRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(found)));
    repo.expect_set_summary_if_absent()
        .withf(|_, _, summary, _| summary == "short")
        .times(1)
        .return_once(move |_, _, summary, now| {
            let mut updated = note;
            updated.summary = Some(summary.to_owned());
            updated.updated_at = now;
            Ok(updated)
        });

    let mut summarizer = MockSummarizeCommand::new();
    summarizer
        .expect_summarize()
        .with(eq(Some("the body to summarize".to_owned())))
        .times(1)
        .returning(|_| Ok("short".to_owned()));

    let service = make_service(repo, summarizer);
    let outcome = service
        .generate_summary(&owner, &id)
        .await
        .expect("summary generated");

    assert_eq!(outcome.value.summary.as_deref(), Some("short"));
    assert_eq!(outcome.value.title.as_ref(), "Alpha");
    assert_eq!(outcome.value.content.as_ref(), "the body to summarize");
    assert_eq!(outcome.notice, "Summary generated successfully");
}

#[tokio::test]
async fn generate_summary_conflicts_when_summary_exists() {
    let owner = UserId::random();
    let mut note = note_for(&owner, "Alpha", "body");
    note.summary = Some("existing".into());
    let id = note.id;

    let mut repo = MockNoteRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(note)));
    let mut summarizer = MockSummarizeCommand::new();
    summarizer.expect_summarize().never();

    let service = make_service(repo, summarizer);
    let err = service
        .generate_summary(&owner, &id)
        .await
        .expect_err("already summarized");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn losing_the_summary_race_is_a_conflict() {
    let owner = UserId::random();
    let note = note_for(&owner, "Alpha", "body");
    let id = note.id;

    let mut repo = MockNoteRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(note)));
    repo.expect_set_summary_if_absent()
        .times(1)
        .returning(|_, id, _, _| Err(NoteRepositoryError::summary_exists(*id)));
    let mut summarizer = MockSummarizeCommand::new();
    summarizer
        .expect_summarize()
        .times(1)
        .returning(|_| Ok("short".to_owned()));

    let service = make_service(repo, summarizer);
    let err = service
        .generate_summary(&owner, &id)
        .await
        .expect_err("race lost");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut repo = MockNoteRepository::new();
    repo.expect_list_for_owner()
        .times(1)
        .returning(|_| Err(NoteRepositoryError::connection("pool exhausted")));

    let service = make_service(repo, MockSummarizeCommand::new());
    let err = service
        .list_notes(list_request(&UserId::random(), None))
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn list_fetched_across_a_create_is_not_cached() {
    let owner = UserId::random();
    let repo = Arc::new(ScriptedRepository {
        yield_after_list: true,
        ..ScriptedRepository::default()
    });
    let service = service_over(repo);
    let draft = NoteDraft::try_from_parts("Alpha", "first").expect("draft");

    let (listed, created) = tokio::join!(
        service.list_notes(list_request(&owner, None)),
        service.create_note(&owner, draft),
    );
    assert!(listed.expect("list during create").is_empty());
    created.expect("create succeeds");

    let after = service
        .list_notes(list_request(&owner, None))
        .await
        .expect("list after create");
    assert_eq!(after.len(), 1);
}

#[tokio::test]
async fn delete_all_fails_on_one_error_and_keeps_earlier_deletions() {
    let owner = UserId::random();
    let inner = InMemoryNoteRepository::default();
    let start = Utc::now();
    let draft = |title: &str| NoteDraft::try_from_parts(title, "body").expect("draft");
    // Listing is newest first, so the oldest note is deleted last.
    let oldest = inner
        .insert(&owner, &draft("Oldest"), start)
        .await
        .expect("insert oldest");
    for (offset, title) in [(1, "Middle"), (2, "Newest")] {
        inner
            .insert(&owner, &draft(title), start + TimeDelta::seconds(offset))
            .await
            .expect("insert");
    }
    let repo = Arc::new(ScriptedRepository {
        inner,
        failing_delete: Some(oldest.id),
        ..ScriptedRepository::default()
    });
    let service = service_over(repo.clone());

    let err = service
        .delete_all_notes(&owner)
        .await
        .expect_err("one deletion fails");

    assert_eq!(err.code(), ErrorCode::InternalError);
    let remaining = repo.inner.list_for_owner(&owner).await.expect("list");
    let titles: Vec<&str> = remaining.iter().map(|n| n.title.as_ref()).collect();
    assert_eq!(titles, vec!["Oldest"]);
    assert!(matches!(
        service.tracker.state(&owner, MutationKind::DeleteAll),
        MutationState::Failed { .. }
    ));
}
