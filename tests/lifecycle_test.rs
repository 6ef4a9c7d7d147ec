mod common;

use argu::error::AppError;
use argu::models::{ArguStatus, OpinionSide};
use argu::services::argu::{delete_scheduled, update_scheduled, ArguService, NewArgu};
use argu::services::auth::AuthService;
use argu::services::category::CategoryService;
use argu::services::lifecycle::{self, ArguChanges};
use argu::services::like::LikeService;
use argu::services::opinion::OpinionService;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

struct Fixture {
    db: DatabaseConnection,
    owner: i32,
    other: i32,
    category: i32,
}

async fn fixture() -> Fixture {
    let db = common::test_db().await;
    let auth = AuthService::new(db.clone());
    let (owner, _) = auth
        .register("owner@test.com", "password_123", "owner", t0())
        .await
        .unwrap();
    let (other, _) = auth
        .register("other@test.com", "password_123", "other", t0())
        .await
        .unwrap();
    let category = CategoryService::new(db.clone())
        .create("Politics", None, None, t0())
        .await
        .unwrap();

    Fixture {
        db,
        owner: owner.id,
        other: other.id,
        category: category.id,
    }
}

fn new_argu(category_id: i32, start: NaiveDateTime, end: NaiveDateTime) -> NewArgu {
    NewArgu {
        category_id,
        title: "Pineapple on pizza".to_string(),
        content: "Yes or no".to_string(),
        start_date: start,
        end_date: end,
    }
}

#[tokio::test]
async fn scheduled_debate_walks_through_its_lifecycle() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());
    let opinions = OpinionService::new(f.db.clone());

    let created = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap();
    assert_eq!(created.argu.status, ArguStatus::Scheduled);
    assert!(!created.argu.is_hidden);
    assert_eq!(created.argu.view_count, 0);
    let id = created.argu.id;

    let mid = t0() + Duration::minutes(90);
    let report = argus.transition_sweep(mid).await.unwrap();
    assert_eq!(report.activated, 1);
    assert_eq!(argus.find(id).await.unwrap().status, ArguStatus::Active);

    opinions
        .create(f.other, id, OpinionSide::For, Some("Absolutely".into()), mid)
        .await
        .unwrap();

    let late = t0() + Duration::minutes(150);
    let report = argus.transition_sweep(late).await.unwrap();
    assert_eq!(report.ended, 1);
    assert_eq!(argus.find(id).await.unwrap().status, ArguStatus::Ended);

    let err = opinions
        .create(f.owner, id, OpinionSide::Against, None, late)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_bad_schedules() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let cases = [
        (t0(), t0() + Duration::hours(1)),
        (t0() - Duration::minutes(1), t0() + Duration::hours(1)),
        (t0() + Duration::hours(2), t0() + Duration::hours(1)),
        (t0() + Duration::hours(1), t0() + Duration::hours(1)),
    ];
    for (start, end) in cases {
        let err = argus
            .create(f.owner, new_argu(f.category, start, end), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{start} .. {end}");
    }
}

#[tokio::test]
async fn create_requires_existing_category() {
    let f = fixture().await;
    let err = ArguService::new(f.db.clone())
        .create(
            f.owner,
            new_argu(9999, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn sweep_ends_elapsed_debate_in_one_call_and_is_idempotent() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    let after = t0() + Duration::hours(3);
    let first = argus.transition_sweep(after).await.unwrap();
    assert_eq!((first.activated, first.ended), (1, 1));
    assert_eq!(argus.find(id).await.unwrap().status, ArguStatus::Ended);

    let second = argus.transition_sweep(after).await.unwrap();
    assert_eq!((second.activated, second.ended), (0, 0));
    assert_eq!(argus.find(id).await.unwrap().status, ArguStatus::Ended);
}

#[tokio::test]
async fn sweep_never_moves_status_backwards() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    let mut seen = vec![argus.find(id).await.unwrap().status];
    for minutes in [30, 90, 60, 150, 10, 200] {
        argus
            .transition_sweep(t0() + Duration::minutes(minutes))
            .await
            .unwrap();
        seen.push(argus.find(id).await.unwrap().status);
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&ArguStatus::Ended));
}

#[tokio::test]
async fn owner_can_retitle_before_start_only() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let created = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu;

    let updated = argus
        .update(
            created.id,
            f.owner,
            ArguChanges {
                title: Some("  Pineapple, revisited  ".into()),
                ..Default::default()
            },
            t0() + Duration::minutes(5),
        )
        .await
        .unwrap()
        .argu;
    assert_eq!(updated.title, "Pineapple, revisited");
    assert_eq!(updated.start_date, created.start_date);
    assert_eq!(updated.end_date, created.end_date);
    assert_eq!(updated.status, ArguStatus::Scheduled);

    argus
        .transition_sweep(t0() + Duration::minutes(90))
        .await
        .unwrap();

    let err = argus
        .update(
            created.id,
            f.owner,
            ArguChanges {
                title: Some("Too late".into()),
                ..Default::default()
            },
            t0() + Duration::minutes(91),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn update_validates_effective_window() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(2), t0() + Duration::hours(3)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    // end before the stored start
    let err = argus
        .update(
            id,
            f.owner,
            ArguChanges {
                end_date: Some(t0() + Duration::hours(1)),
                ..Default::default()
            },
            t0(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let unchanged = argus.find(id).await.unwrap();
    assert_eq!(unchanged.end_date, t0() + Duration::hours(3));

    // blank title keeps the stored one, the rest of the edit still applies
    let edited = argus
        .update(
            id,
            f.owner,
            ArguChanges {
                title: Some("   ".into()),
                content: Some("Now with anchovies".into()),
                end_date: Some(t0() + Duration::hours(4)),
                ..Default::default()
            },
            t0(),
        )
        .await
        .unwrap()
        .argu;
    assert_eq!(edited.title, "Pineapple on pizza");
    assert_eq!(edited.content, "Now with anchovies");
    assert_eq!(edited.end_date, t0() + Duration::hours(4));

    let moved = argus
        .update(
            id,
            f.owner,
            ArguChanges {
                start_date: Some(t0() + Duration::minutes(30)),
                ..Default::default()
            },
            t0(),
        )
        .await
        .unwrap()
        .argu;
    assert_eq!(moved.start_date, t0() + Duration::minutes(30));
    assert!(moved.start_date < moved.end_date);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete_in_any_status() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    for sweep_at in [None, Some(90), Some(180)] {
        if let Some(minutes) = sweep_at {
            argus
                .transition_sweep(t0() + Duration::minutes(minutes))
                .await
                .unwrap();
        }

        let err = argus
            .update(
                id,
                f.other,
                ArguChanges {
                    title: Some("hijack".into()),
                    ..Default::default()
                },
                t0(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = argus.delete(id, f.other).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn owner_cannot_delete_after_start() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;
    argus
        .transition_sweep(t0() + Duration::minutes(90))
        .await
        .unwrap();

    let err = argus.delete(id, f.owner).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(argus.find(id).await.is_ok());
}

#[tokio::test]
async fn debate_that_starts_after_authorization_is_not_written() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());
    let likes = LikeService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;
    likes.toggle(f.other, id, t0()).await.unwrap();

    // authorized against a SCHEDULED snapshot
    let snapshot = argus.find(id).await.unwrap();
    lifecycle::authorize_update(&snapshot, f.owner).unwrap();
    lifecycle::authorize_delete(&snapshot, f.owner).unwrap();
    let resolved = lifecycle::resolve_changes(
        &snapshot,
        ArguChanges {
            title: Some("Late edit".into()),
            ..Default::default()
        },
        t0(),
    )
    .unwrap();

    // the sweep starts it before the write lands
    let report = argus
        .transition_sweep(t0() + Duration::minutes(61))
        .await
        .unwrap();
    assert_eq!(report.activated, 1);

    let err = update_scheduled(&f.db, id, resolved, t0() + Duration::minutes(61))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = delete_scheduled(&f.db, id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let current = argus.find(id).await.unwrap();
    assert_eq!(current.status, ArguStatus::Active);
    assert_eq!(current.title, "Pineapple on pizza");
    assert_eq!(likes.count(id).await.unwrap(), 1);
}

#[tokio::test]
async fn scheduled_writes_report_missing_debate_as_not_found() {
    let f = fixture().await;

    let err = delete_scheduled(&f.db, 9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn owner_may_delete_hidden_scheduled_debate_but_not_edit_it() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;
    argus.toggle_hidden(id, t0()).await.unwrap();

    let err = argus
        .update(
            id,
            f.owner,
            ArguChanges {
                title: Some("edit".into()),
                ..Default::default()
            },
            t0(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    argus.delete(id, f.owner).await.unwrap();
    assert!(matches!(
        argus.find(id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn opinions_require_active_status_and_window() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());
    let opinions = OpinionService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    // still scheduled
    let err = opinions
        .create(f.other, id, OpinionSide::For, None, t0() + Duration::minutes(90))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // forced active by an admin, but the clock is before the window
    argus.set_status(id, ArguStatus::Active, t0()).await.unwrap();
    let err = opinions
        .create(f.other, id, OpinionSide::For, None, t0())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // active and inside the window; exactly one per user
    let inside = t0() + Duration::minutes(90);
    opinions
        .create(f.other, id, OpinionSide::Neutral, None, inside)
        .await
        .unwrap();
    let err = opinions
        .create(f.other, id, OpinionSide::Against, None, inside)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let (all, tally) = opinions.list_by_argu(id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(tally.neutral_count, 1);
    assert_eq!(tally.total(), 1);
}

#[tokio::test]
async fn read_counts_every_view_and_hides_hidden() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    argus.read(id).await.unwrap();
    let second = argus.read(id).await.unwrap();
    assert_eq!(second.argu.view_count, 2);

    argus.toggle_hidden(id, t0()).await.unwrap();
    assert!(matches!(
        argus.read(id).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let admin_view = argus.read_any(id).await.unwrap();
    assert!(admin_view.argu.is_hidden);
    assert_eq!(admin_view.argu.view_count, 2);
}

#[tokio::test]
async fn like_toggle_is_its_own_inverse() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());
    let likes = LikeService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;

    assert!(!likes.is_liked(f.other, id).await.unwrap());
    assert!(likes.toggle(f.other, id, t0()).await.unwrap());
    assert_eq!(likes.count(id).await.unwrap(), 1);
    assert!(!likes.toggle(f.other, id, t0()).await.unwrap());
    assert!(!likes.is_liked(f.other, id).await.unwrap());
    assert_eq!(likes.count(id).await.unwrap(), 0);
}

#[tokio::test]
async fn admin_edit_skips_owner_and_status_gates_but_keeps_window_order() {
    let f = fixture().await;
    let argus = ArguService::new(f.db.clone());

    let id = argus
        .create(
            f.owner,
            new_argu(f.category, t0() + Duration::hours(1), t0() + Duration::hours(2)),
            t0(),
        )
        .await
        .unwrap()
        .argu
        .id;
    argus
        .transition_sweep(t0() + Duration::minutes(90))
        .await
        .unwrap();

    let edited = argus
        .admin_update(
            id,
            ArguChanges {
                end_date: Some(t0() + Duration::hours(4)),
                ..Default::default()
            },
            t0() + Duration::minutes(95),
        )
        .await
        .unwrap()
        .argu;
    assert_eq!(edited.end_date, t0() + Duration::hours(4));
    assert_eq!(edited.status, ArguStatus::Active);

    let err = argus
        .admin_update(
            id,
            ArguChanges {
                end_date: Some(t0()),
                ..Default::default()
            },
            t0() + Duration::minutes(95),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
