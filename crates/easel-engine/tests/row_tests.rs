//! Briefing-row behavior against a live (in-memory) board
//!
//! Covers row creation and adoption, version-frame placement against actual
//! (user-resized) extents, badge updates through stored handles and cold
//! rediscovery, and the done overlay.

use std::sync::Arc;

use easel_canvas::{ItemKind, ItemSpec};
use easel_engine::{
    DueDate, Priority, Project, ProjectBriefing, ProjectStatus, SyncEngine, SyncError, SyncOptions,
};
use easel_test_utils::MemoryCanvas;

fn studio() -> (Arc<MemoryCanvas>, SyncEngine) {
    let board = Arc::new(MemoryCanvas::new());
    let engine = SyncEngine::new(board.clone());
    (board, engine)
}

fn project(id: &str, name: &str) -> Project {
    Project::new(id, name).with_client("Acme")
}

#[tokio::test]
async fn row_creation_requires_an_initialized_timeline() {
    let (_board, engine) = studio();
    let err = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NotInitialized));
}

#[tokio::test]
async fn create_project_row_builds_the_full_row() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let briefing = ProjectBriefing::new().with_goals("Launch the new site");
    let row = engine
        .create_project_row(
            &project("p1", "Nova Site").with_priority(Priority::High),
            &briefing,
        )
        .await
        .unwrap();

    // the frame sits right of the timeline, top-aligned with it
    let frame = board.find_by_title("Briefing: Nova Site").unwrap();
    let timeline = board.find_by_title("Project Timeline").unwrap();
    assert_eq!(frame.id, row.briefing_frame_id);
    assert_eq!(frame.top(), timeline.top());
    assert!(frame.left() > timeline.right());

    // header text
    let texts = board.items_of(ItemKind::Text);
    assert!(texts.iter().any(|t| t.content == "Nova Site"));

    // four badges with live values
    let shapes = board.items_of(ItemKind::Shape);
    let badge = |title: &str| shapes.iter().find(|s| s.title == title).unwrap();
    assert_eq!(badge("Priority").content, Priority::High.label());
    assert_eq!(badge("Client").content, "Acme");
    assert_eq!(badge("Status").content, ProjectStatus::Todo.label());
    assert_eq!(badge("Due").content, "No due date");

    // six labelled field cells; the five empty ones show a placeholder
    for label in [
        "Overview",
        "Goals",
        "Deliverables",
        "Audience",
        "Style notes",
        "References",
    ] {
        assert!(texts.iter().any(|t| t.content == label), "missing {label}");
    }
    let placeholders = shapes.iter().filter(|s| s.content == "Needs input").count();
    assert_eq!(placeholders, 5);
    assert!(shapes.iter().any(|s| s.content == "Launch the new site"));

    // collection sections along the bottom edge
    let mood = shapes.iter().find(|s| s.title == "Moodboard").unwrap();
    assert!(mood.content.contains("easel:section:moodboard"));
    assert!(shapes
        .iter()
        .any(|s| s.title == "Assets" && s.content.contains("easel:section:assets")));

    // first version frame, beside the briefing and top-aligned
    let v1 = board.find_by_title("Nova Site / v1").unwrap();
    assert!(v1.left() > frame.right());
    assert_eq!(v1.top(), frame.top());
    assert!(texts.iter().any(|t| t.content == "v1"));

    assert_eq!(row.versions.len(), 1);
    assert_eq!(row.versions[0].number, 1);
    assert_eq!(row.client_name, "Acme");
    assert!(row.status_badge_id.is_some());
    assert!(row.due_badge_id.is_some());
    assert!(row.done_overlay_id.is_none());

    // the new row was brought into view, after the initial timeline focus
    assert_eq!(board.focus_history().len(), 2);
}

#[tokio::test]
async fn creating_the_same_row_twice_adds_nothing() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let first = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();
    let before = board.created_count();
    let again = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    assert_eq!(board.created_count(), before);
    assert_eq!(again.briefing_frame_id, first.briefing_frame_id);
}

#[tokio::test]
async fn briefing_frame_already_on_the_board_is_adopted() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    // a previous run (or another client) left a full row behind
    board.seed(ItemSpec::frame("Briefing: Nova Site", 1800.0, -160.0, 640.0, 760.0));
    board.seed(ItemSpec::frame("Nova Site / v1", 2400.0, -260.0, 480.0, 560.0));
    board.seed(ItemSpec::frame("Nova Site / v2", 2950.0, -260.0, 480.0, 560.0));

    let before = board.created_count();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    assert_eq!(board.created_count(), before);
    assert_eq!(row.versions.len(), 2);
    assert_eq!(row.versions[1].number, 2);
    assert!(row.status_badge_id.is_none());
}

#[tokio::test]
async fn rows_stack_below_the_lowest_briefing_bottom() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let first = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    // user stretches the first briefing frame downward
    let frame = board.get(&first.briefing_frame_id).unwrap();
    assert!(board.resize_item(&first.briefing_frame_id, frame.width, 1200.0));
    let stretched_bottom = board.get(&first.briefing_frame_id).unwrap().bottom();

    let second = engine
        .create_project_row(&project("p2", "Aurora App"), &ProjectBriefing::new())
        .await
        .unwrap();
    let second_frame = board.get(&second.briefing_frame_id).unwrap();
    assert_eq!(
        second_frame.top(),
        stretched_bottom + engine.layout().row_gap
    );
}

#[tokio::test]
async fn versions_append_after_the_actual_right_edge() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();
    let v1_id = row.versions[0].frame_id.clone();

    // stretch v1 wider; v2 must clear the stretched edge, not the default one
    let v1 = board.get(&v1_id).unwrap();
    assert!(board.resize_item(&v1_id, 900.0, v1.height));
    let stretched_right = board.get(&v1_id).unwrap().right();

    let v2 = engine.add_version(&"p1".into(), None).await.unwrap().unwrap();
    assert_eq!(v2.number, 2);
    let frame = board.get(&v2.frame_id).unwrap();
    assert_eq!(frame.left(), stretched_right + engine.layout().version_gap);
    assert_eq!(board.find_by_title("Nova Site / v2").unwrap().id, v2.frame_id);
}

#[tokio::test]
async fn add_version_rebuilds_row_memory_from_titles() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    // a fresh engine with no memory of the row
    let second = SyncEngine::new(board.clone());
    let version = second
        .add_version(&"p1".into(), Some("Nova Site"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(version.number, 2);
    assert!(board.find_by_title("Nova Site / v2").is_some());

    // with neither memory nor a name there is nothing to rebuild from
    assert!(second.add_version(&"p9".into(), None).await.unwrap().is_none());
}

#[tokio::test]
async fn vanished_version_frames_are_pruned() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();
    engine.add_version(&"p1".into(), None).await.unwrap().unwrap();

    // user deletes v2 from the board; the engine must not place v3 after a ghost
    let row = engine.project_row(&"p1".into()).unwrap();
    assert!(board.delete_item(&row.versions[1].frame_id));

    let replacement = engine.add_version(&"p1".into(), None).await.unwrap().unwrap();
    assert_eq!(replacement.number, 2);
    let row = engine.project_row(&"p1".into()).unwrap();
    assert_eq!(row.versions.len(), 2);
}

#[tokio::test]
async fn row_is_dropped_when_the_briefing_frame_is_gone() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    assert!(board.delete_item(&row.briefing_frame_id));
    assert!(engine.add_version(&"p1".into(), None).await.unwrap().is_none());
    assert!(engine.project_row(&"p1".into()).is_none());
}

#[tokio::test]
async fn status_badge_updates_through_the_stored_handle() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    let updated = engine
        .update_briefing_status(&"p1".into(), ProjectStatus::Review, "Nova Site")
        .await
        .unwrap();
    assert!(updated);

    let badge = board.get(row.status_badge_id.as_ref().unwrap()).unwrap();
    assert_eq!(badge.content, ProjectStatus::Review.label());
    assert_eq!(
        badge.style.fill_color.as_deref(),
        Some(ProjectStatus::Review.color())
    );
}

#[tokio::test]
async fn status_badge_is_rediscovered_without_memory() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    // blank the badge title so only geometry can find it, on a cold engine
    let badge_id = row.status_badge_id.unwrap();
    assert!(board.retitle_item(&badge_id, ""));
    let second = SyncEngine::new(board.clone());

    let updated = second
        .update_briefing_status(&"p1".into(), ProjectStatus::Done, "Nova Site")
        .await
        .unwrap();
    assert!(updated);
    assert_eq!(
        board.get(&badge_id).unwrap().content,
        ProjectStatus::Done.label()
    );
}

#[tokio::test]
async fn due_badge_renders_approval_and_overdue_state() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let due = DueDate::parse("2000-01-01").unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site").with_due(due), &ProjectBriefing::new())
        .await
        .unwrap();
    let badge_id = row.due_badge_id.as_ref().unwrap();

    // unapproved and long past due
    let badge = board.get(badge_id).unwrap();
    assert!(badge.content.ends_with("(tbc)"));
    assert_eq!(
        badge.style.fill_color.as_deref(),
        Some(ProjectStatus::Overdue.color())
    );

    // approval drops the suffix
    let updated = engine
        .update_briefing_due_date(&"p1".into(), Some(&due), true, "Nova Site")
        .await
        .unwrap();
    assert!(updated);
    let badge = board.get(badge_id).unwrap();
    assert!(!badge.content.contains("(tbc)"));

    // clearing the date goes neutral
    engine
        .update_briefing_due_date(&"p1".into(), None, false, "Nova Site")
        .await
        .unwrap();
    assert_eq!(board.get(badge_id).unwrap().content, "No due date");
}

#[tokio::test]
async fn done_overlay_covers_and_uncovers_the_briefing() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    // finishing the project veils the briefing frame
    assert!(engine
        .handle_done_overlay(&"p1".into(), "Nova Site", true)
        .await
        .unwrap());
    let overlay = board
        .items_of(ItemKind::Shape)
        .into_iter()
        .find(|s| s.content == "easel:overlay")
        .unwrap();
    let frame = board.get(&row.briefing_frame_id).unwrap();
    assert_eq!((overlay.x, overlay.y), (frame.x, frame.y));
    assert_eq!(overlay.width, frame.width);
    assert_eq!(overlay.style.opacity, Some(0.45));

    // a second pass changes nothing
    assert!(!engine
        .handle_done_overlay(&"p1".into(), "Nova Site", true)
        .await
        .unwrap());

    // reopening removes it
    assert!(engine
        .handle_done_overlay(&"p1".into(), "Nova Site", false)
        .await
        .unwrap());
    assert!(board
        .items_of(ItemKind::Shape)
        .iter()
        .all(|s| s.content != "easel:overlay"));
}

#[tokio::test]
async fn finished_project_gets_an_overlay_at_creation() {
    let (_board, engine) = studio();
    engine.initialize_timeline().await.unwrap();

    let row = engine
        .create_project_row(
            &project("p1", "Nova Site").with_status(ProjectStatus::Done),
            &ProjectBriefing::new(),
        )
        .await
        .unwrap();
    assert!(row.done_overlay_id.is_some());
}

#[tokio::test]
async fn sync_repaints_the_row_badges() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let row = engine
        .create_project_row(&project("p1", "Nova Site"), &ProjectBriefing::new())
        .await
        .unwrap();

    engine
        .sync_project(
            &project("p1", "Nova Site").with_status(ProjectStatus::Review),
            SyncOptions::new(),
        )
        .await
        .unwrap();

    let badge = board.get(row.status_badge_id.as_ref().unwrap()).unwrap();
    assert_eq!(badge.content, ProjectStatus::Review.label());
}

#[tokio::test]
async fn remove_project_tears_down_the_whole_row() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let proj = project("p1", "Nova Site");
    engine
        .create_project_row(&proj, &ProjectBriefing::new())
        .await
        .unwrap();
    engine.add_version(&"p1".into(), None).await.unwrap().unwrap();
    engine.sync_project(&proj, SyncOptions::new()).await.unwrap();

    // an unrelated row must survive the teardown
    engine
        .create_project_row(&project("p2", "Aurora App"), &ProjectBriefing::new())
        .await
        .unwrap();

    engine.remove_project(&"p1".into()).await.unwrap();

    assert!(board.items_of(ItemKind::Card).is_empty());
    assert!(board.find_by_title("Briefing: Nova Site").is_none());
    assert!(board.find_by_title("Nova Site / v1").is_none());
    assert!(board.find_by_title("Nova Site / v2").is_none());
    assert!(engine.project_row(&"p1".into()).is_none());

    // the neighbor kept its frame and badges
    let shapes = board.items_of(ItemKind::Shape);
    assert_eq!(shapes.iter().filter(|s| s.title == "Status").count(), 1);
    assert!(board.find_by_title("Briefing: Aurora App").is_some());
    assert!(engine.project_row(&"p2".into()).is_some());
}

#[tokio::test]
async fn remove_project_finds_the_row_without_memory() {
    let (board, engine) = studio();
    engine.initialize_timeline().await.unwrap();
    let proj = project("p1", "Nova Site");
    engine
        .create_project_row(&proj, &ProjectBriefing::new())
        .await
        .unwrap();
    engine.sync_project(&proj, SyncOptions::new()).await.unwrap();

    // a fresh engine learns the name from the card title, then the row from
    // frame titles
    let second = SyncEngine::new(board.clone());
    second.initialize_timeline().await.unwrap();
    second.remove_project(&"p1".into()).await.unwrap();

    assert!(board.items_of(ItemKind::Card).is_empty());
    assert!(board.find_by_title("Briefing: Nova Site").is_none());
    assert!(board.find_by_title("Nova Site / v1").is_none());
}
