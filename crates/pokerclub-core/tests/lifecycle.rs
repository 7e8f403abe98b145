//! Integration tests for the club services.
//!
//! These tests require a live `PostgreSQL` instance. Run with:
//!
//! ```bash
//! docker compose up -d
//! cargo test -p pokerclub-core -- --ignored
//! docker compose down
//! ```
//!
//! Every test works in a fresh semester of its own.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pokerclub_core::config::{ClubConfig, LoggingConfig};
use pokerclub_core::telemetry::init_tracing;
use pokerclub_core::{
    EventLifecycle, EventService, MembershipService, NewMembership, ParticipantService,
    RankingService, SemesterService, ServiceError,
};
use pokerclub_db::{ParticipantStore, PostgresPool};
use pokerclub_types::{
    Event, EventId, EventState, EventUpdate, Membership, MembershipId, NewEvent, NewSemester,
    Participant, ParticipantId, Semester, SemesterId, StructureId, UserId,
};
use rust_decimal::Decimal;

// =============================================================================
// Fixture
// =============================================================================

struct Fixture {
    db: PostgresPool,
    semester: Semester,
}

impl Fixture {
    async fn new() -> Self {
        let _ = init_tracing(&LoggingConfig {
            level: "pokerclub_core=debug,pokerclub_db=debug".to_owned(),
            ..LoggingConfig::default()
        });

        let config = ClubConfig::parse("").expect("default config");
        let db = PostgresPool::connect(&config.database.to_postgres_config())
            .await
            .expect("Failed to connect to PostgreSQL -- is Docker running?");

        let semester = SemesterService::new(db.pool())
            .create_semester(&NewSemester {
                name: "Spring 2026".to_owned(),
                start_date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
                end_date: Utc.with_ymd_and_hms(2026, 6, 30, 0, 0, 0).unwrap(),
                initial_budget: Decimal::new(50_000, 2),
                membership_fee: Decimal::new(2_000, 2),
                membership_fee_discounted: Decimal::new(1_000, 2),
                rebuy_fee: Decimal::new(500, 2),
            })
            .await
            .expect("create semester");

        Self { db, semester }
    }

    async fn member(&self) -> Membership {
        MembershipService::new(self.db.pool())
            .create_membership(NewMembership {
                semester_id: self.semester.id,
                user_id: UserId::new(),
                paid: false,
                discounted: false,
            })
            .await
            .expect("create membership")
    }

    async fn event(&self, multiplier: Decimal) -> Event {
        EventService::new(self.db.pool())
            .create_event(&NewEvent {
                semester_id: self.semester.id,
                structure_id: StructureId::new(),
                name: "Thursday Deepstack".to_owned(),
                location: None,
                start_date: Utc.with_ymd_and_hms(2026, 3, 5, 19, 0, 0).unwrap(),
                points_multiplier: multiplier,
            })
            .await
            .expect("create event")
    }

    async fn enter(&self, event: &Event, member: &Membership) -> Participant {
        ParticipantService::new(self.db.pool())
            .enter_event(event.id, member.id)
            .await
            .expect("enter event")
    }

    async fn sign_out_at(&self, participant: &Participant, at: DateTime<Utc>) {
        let mut conn = self.db.pool().acquire().await.unwrap();
        ParticipantStore::new(&mut conn)
            .set_signed_out_at(participant.id, Some(at))
            .await
            .unwrap();
    }

    async fn points(&self, member: &Membership) -> Option<i64> {
        RankingService::new(self.db.pool())
            .get_ranking(self.semester.id, member.id)
            .await
            .ok()
            .map(|r| r.points)
    }

    async fn budget(&self) -> Decimal {
        SemesterService::new(self.db.pool())
            .get_semester(self.semester.id)
            .await
            .unwrap()
            .current_budget
    }
}

// =============================================================================
// End / undo
// =============================================================================

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn ending_an_event_places_everyone_and_awards_points() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let members = [fx.member().await, fx.member().await, fx.member().await, fx.member().await];
    let mut entries = Vec::new();
    for member in &members {
        entries.push(fx.enter(&event, member).await);
    }
    for (minutes, entry) in (1_i64..).zip(&entries) {
        fx.sign_out_at(entry, event.start_date + Duration::minutes(minutes * 10))
            .await;
    }

    let standings = EventLifecycle::new(fx.db.pool())
        .end_event(event.id)
        .await
        .unwrap();
    assert_eq!(standings.field_size, 4);
    assert_eq!(standings.total_points(), Some(40 + 30 + 20 + 10));

    let mut placements: Vec<u32> = ParticipantService::new(fx.db.pool())
        .list_participants(event.id)
        .await
        .unwrap()
        .iter()
        .map(|p| p.placement)
        .collect();
    placements.sort_unstable();
    assert_eq!(placements, vec![1, 2, 3, 4]);

    // Last to sign out wins.
    assert_eq!(fx.points(&members[3]).await, Some(40));
    assert_eq!(fx.points(&members[0]).await, Some(10));

    let ended = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(ended.state, EventState::Ended);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn stragglers_finish_last_in_sign_out_order() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let (a, b, c) = (fx.member().await, fx.member().await, fx.member().await);
    let pa = fx.enter(&event, &a).await;
    let pb = fx.enter(&event, &b).await;
    let pc = fx.enter(&event, &c).await;
    fx.sign_out_at(&pa, event.start_date + Duration::minutes(10)).await;
    fx.sign_out_at(&pc, event.start_date + Duration::minutes(5)).await;

    let standings = EventLifecycle::new(fx.db.pool())
        .end_event(event.id)
        .await
        .unwrap();

    let order: Vec<ParticipantId> = standings
        .awards
        .iter()
        .map(|award| award.participant_id)
        .collect();
    assert_eq!(order, vec![pa.id, pc.id, pb.id]);

    let participants = ParticipantService::new(fx.db.pool())
        .list_participants(event.id)
        .await
        .unwrap();
    let straggler = participants.iter().find(|p| p.id == pb.id).unwrap();
    assert_eq!(straggler.signed_out_at, Some(event.start_date));
    assert_eq!(straggler.placement, 3);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn undo_restores_points_and_state() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::new(15, 1)).await;
    let (a, b, c) = (fx.member().await, fx.member().await, fx.member().await);
    for member in [&a, &b, &c] {
        fx.enter(&event, member).await;
    }

    // Earlier results for one member must survive the round trip.
    RankingService::new(fx.db.pool())
        .update_ranking(a.id, 17)
        .await
        .unwrap();
    let before = [fx.points(&a).await, fx.points(&b).await, fx.points(&c).await];

    let lifecycle = EventLifecycle::new(fx.db.pool());
    lifecycle.end_event(event.id).await.unwrap();
    lifecycle.undo_end_event(event.id).await.unwrap();

    let after = [fx.points(&a).await, fx.points(&b).await, fx.points(&c).await];
    assert_eq!(after[0], before[0]);
    // Rows created by the end stay, at zero.
    assert_eq!(after[1], Some(0));
    assert_eq!(after[2], Some(0));

    let reopened = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(reopened.state, EventState::Started);

    // Placements and forced sign-outs are kept.
    let participants = ParticipantService::new(fx.db.pool())
        .list_participants(event.id)
        .await
        .unwrap();
    assert!(participants.iter().all(|p| p.placement > 0));
    assert!(participants.iter().all(|p| p.signed_out_at.is_some()));

    // The event can be ended again with the same outcome.
    let again = lifecycle.end_event(event.id).await.unwrap();
    assert_eq!(again.field_size, 3);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn second_end_is_forbidden_and_changes_nothing() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let a = fx.member().await;
    fx.enter(&event, &a).await;

    let lifecycle = EventLifecycle::new(fx.db.pool());
    lifecycle.end_event(event.id).await.unwrap();
    let points = fx.points(&a).await;

    let second = lifecycle.end_event(event.id).await;
    assert!(matches!(second, Err(ServiceError::Forbidden(_))));
    assert_eq!(fx.points(&a).await, points);
    let still = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(still.state, EventState::Ended);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn concurrent_ends_award_points_once() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let (a, b) = (fx.member().await, fx.member().await);
    fx.enter(&event, &a).await;
    fx.enter(&event, &b).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..4 {
        let db = fx.db.clone();
        let event_id = event.id;
        tasks.spawn(async move { EventLifecycle::new(db.pool()).end_event(event_id).await });
    }
    let mut ended = 0;
    let mut forbidden = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => ended += 1,
            Err(ServiceError::Forbidden(_)) => forbidden += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((ended, forbidden), (1, 3));

    let total = fx.points(&a).await.unwrap() + fx.points(&b).await.unwrap();
    assert_eq!(total, 20 + 10);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn events_sharing_members_end_concurrently() {
    let fx = Fixture::new().await;
    let mut members = Vec::new();
    for _ in 0..20 {
        members.push(fx.member().await);
    }

    for round in 1..=10_i64 {
        let (x, y) = (fx.event(Decimal::ONE).await, fx.event(Decimal::ONE).await);
        for (minute, member) in (1_i64..).zip(&members) {
            let px = fx.enter(&x, member).await;
            let py = fx.enter(&y, member).await;
            fx.sign_out_at(&px, x.start_date + Duration::minutes(minute)).await;
            fx.sign_out_at(&py, y.start_date + Duration::minutes(21 - minute))
                .await;
        }

        let mut tasks = tokio::task::JoinSet::new();
        for event_id in [x.id, y.id] {
            let db = fx.db.clone();
            tasks.spawn(async move { EventLifecycle::new(db.pool()).end_event(event_id).await });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined.unwrap() {
                panic!("round {round}: {err}");
            }
        }

        // Placements in X and Y sum to 21, so every member gains 210 per round.
        for member in &members {
            assert_eq!(fx.points(member).await, Some(210 * round));
        }
    }
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn failed_end_leaves_everything_unchanged() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::from(1_000_000_000_000_000_000_i64)).await;
    let (a, b) = (fx.member().await, fx.member().await);
    fx.enter(&event, &a).await;
    fx.enter(&event, &b).await;

    let result = EventLifecycle::new(fx.db.pool()).end_event(event.id).await;
    assert!(matches!(result, Err(ServiceError::Internal(_))));

    let still = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(still.state, EventState::Started);
    let participants = ParticipantService::new(fx.db.pool())
        .list_participants(event.id)
        .await
        .unwrap();
    assert!(participants.iter().all(|p| p.signed_out_at.is_none()));
    assert!(participants.iter().all(|p| p.placement == 0));
    assert_eq!(fx.points(&a).await, None);
    assert_eq!(fx.points(&b).await, None);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn undo_with_broken_placements_names_the_event() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let (a, b, c) = (fx.member().await, fx.member().await, fx.member().await);
    let pa = fx.enter(&event, &a).await;
    let pb = fx.enter(&event, &b).await;
    fx.enter(&event, &c).await;
    fx.sign_out_at(&pa, event.start_date + Duration::minutes(10)).await;
    fx.sign_out_at(&pb, event.start_date + Duration::minutes(20)).await;

    let lifecycle = EventLifecycle::new(fx.db.pool());
    lifecycle.end_event(event.id).await.unwrap();
    let points_a = fx.points(&a).await;

    // The winner's row disappears; placements 2 and 3 no longer fit a field of 2.
    sqlx::query("DELETE FROM participants WHERE id = $1")
        .bind(pb.id.into_inner())
        .execute(fx.db.pool())
        .await
        .unwrap();

    match lifecycle.undo_end_event(event.id).await {
        Err(ServiceError::Internal(message)) => {
            assert!(message.contains(&event.id.to_string()), "{message}");
        }
        other => panic!("expected Internal, got {other:?}"),
    }
    let still = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(still.state, EventState::Ended);
    assert_eq!(fx.points(&a).await, points_a);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn undo_without_end_is_forbidden() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let a = fx.member().await;
    fx.enter(&event, &a).await;

    let result = EventLifecycle::new(fx.db.pool()).undo_end_event(event.id).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    assert_eq!(fx.points(&a).await, None);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn ending_an_empty_event_places_nobody() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;

    let standings = EventLifecycle::new(fx.db.pool())
        .end_event(event.id)
        .await
        .unwrap();
    assert_eq!(standings.field_size, 0);
    assert!(standings.awards.is_empty());
    EventLifecycle::new(fx.db.pool())
        .undo_end_event(event.id)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn lifecycle_on_missing_event_is_not_found() {
    let fx = Fixture::new().await;
    let lifecycle = EventLifecycle::new(fx.db.pool());
    let missing = EventId::new();

    assert!(matches!(
        lifecycle.end_event(missing).await,
        Err(ServiceError::NotFound { entity: "event", .. })
    ));
    assert!(matches!(
        lifecycle.undo_end_event(missing).await,
        Err(ServiceError::NotFound { entity: "event", .. })
    ));
    assert!(matches!(
        lifecycle.new_rebuy(missing).await,
        Err(ServiceError::NotFound { entity: "event", .. })
    ));
}

// =============================================================================
// Rebuys and budget
// =============================================================================

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn concurrent_rebuys_each_add_one_fee() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let before = fx.budget().await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let db = fx.db.clone();
        let event_id = event.id;
        tasks.spawn(async move { EventLifecycle::new(db.pool()).new_rebuy(event_id).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    assert_eq!(fx.budget().await, before + fx.semester.rebuy_fee * Decimal::from(10));
    let reread = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(reread.rebuys, 10);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn rebuy_on_ended_event_is_forbidden() {
    let fx = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let lifecycle = EventLifecycle::new(fx.db.pool());

    let outcome = lifecycle.new_rebuy(event.id).await.unwrap();
    assert_eq!(outcome.rebuys, 1);
    lifecycle.end_event(event.id).await.unwrap();
    let before = fx.budget().await;

    let result = lifecycle.new_rebuy(event.id).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    assert_eq!(fx.budget().await, before);
    let reread = EventService::new(fx.db.pool()).get_event(event.id).await.unwrap();
    assert_eq!(reread.rebuys, 1);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn paid_memberships_add_their_fee_once() {
    let fx = Fixture::new().await;
    let memberships = MembershipService::new(fx.db.pool());
    let start = fx.budget().await;

    let regular = memberships
        .create_membership(NewMembership {
            semester_id: fx.semester.id,
            user_id: UserId::new(),
            paid: true,
            discounted: false,
        })
        .await
        .unwrap();
    assert_eq!(fx.budget().await, start + fx.semester.membership_fee);

    memberships
        .create_membership(NewMembership {
            semester_id: fx.semester.id,
            user_id: UserId::new(),
            paid: true,
            discounted: true,
        })
        .await
        .unwrap();
    let with_discounted = start + fx.semester.membership_fee + fx.semester.membership_fee_discounted;
    assert_eq!(fx.budget().await, with_discounted);

    fx.member().await;
    assert_eq!(fx.budget().await, with_discounted);

    let duplicate = memberships
        .create_membership(NewMembership {
            semester_id: fx.semester.id,
            user_id: regular.user_id,
            paid: true,
            discounted: false,
        })
        .await;
    assert!(matches!(duplicate, Err(ServiceError::InvalidRequest(_))));
    assert_eq!(fx.budget().await, with_discounted);

    assert_eq!(memberships.get_membership(regular.id).await.unwrap(), regular);
}

// =============================================================================
// Rankings
// =============================================================================

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn rankings_use_competition_positions() {
    let fx = Fixture::new().await;
    let (a, b, c) = (fx.member().await, fx.member().await, fx.member().await);
    let rankings = RankingService::new(fx.db.pool());

    let deltas = BTreeMap::from([(a.id, 100), (b.id, 100), (c.id, 50)]);
    assert_eq!(rankings.batch_update_rankings(&deltas).await.unwrap(), 3);

    let pa = rankings.get_ranking(fx.semester.id, a.id).await.unwrap();
    let pb = rankings.get_ranking(fx.semester.id, b.id).await.unwrap();
    let pc = rankings.get_ranking(fx.semester.id, c.id).await.unwrap();
    assert_eq!([pa.position, pb.position, pc.position], [1, 1, 3]);

    let board = rankings.list_rankings(fx.semester.id).await.unwrap();
    let board_positions: Vec<u32> = board.iter().map(|r| r.position).collect();
    assert_eq!(board_positions, vec![1, 1, 3]);
    assert_eq!(board[2].membership_id, c.id);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn empty_batch_is_a_no_op() {
    let fx = Fixture::new().await;
    let written = RankingService::new(fx.db.pool())
        .batch_update_rankings(&BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(written, 0);
    assert!(
        RankingService::new(fx.db.pool())
            .list_rankings(fx.semester.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn ranking_lookups_report_missing_rows() {
    let fx = Fixture::new().await;
    let a = fx.member().await;
    let rankings = RankingService::new(fx.db.pool());

    assert!(matches!(
        rankings.get_ranking(fx.semester.id, a.id).await,
        Err(ServiceError::NotFound { entity: "ranking", .. })
    ));
    assert!(matches!(
        rankings.update_ranking(MembershipId::new(), 5).await,
        Err(ServiceError::NotFound { entity: "membership", .. })
    ));
    let unknown = BTreeMap::from([(MembershipId::new(), 5)]);
    assert!(matches!(
        rankings.batch_update_rankings(&unknown).await,
        Err(ServiceError::InvalidRequest(_))
    ));
}

// =============================================================================
// Participants and event CRUD
// =============================================================================

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn entry_rules_are_enforced() {
    let fx = Fixture::new().await;
    let other = Fixture::new().await;
    let event = fx.event(Decimal::ONE).await;
    let a = fx.member().await;
    let outsider = other.member().await;
    let participants = ParticipantService::new(fx.db.pool());

    let entered = participants.enter_event(event.id, a.id).await.unwrap();
    assert_eq!(entered.placement, 0);
    assert!(entered.is_active());

    assert!(matches!(
        participants.enter_event(event.id, a.id).await,
        Err(ServiceError::InvalidRequest(_))
    ));
    assert!(matches!(
        participants.enter_event(event.id, outsider.id).await,
        Err(ServiceError::InvalidRequest(_))
    ));

    let signed_out = participants.sign_out(entered.id).await.unwrap();
    assert!(signed_out.signed_out_at.is_some());
    let signed_in = participants.sign_in(entered.id).await.unwrap();
    assert!(signed_in.is_active());

    EventLifecycle::new(fx.db.pool())
        .end_event(event.id)
        .await
        .unwrap();
    let late = fx.member().await;
    assert!(matches!(
        participants.enter_event(event.id, late.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        participants.sign_in(entered.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        participants.sign_out(entered.id).await,
        Err(ServiceError::Forbidden(_))
    ));
}

#[tokio::test]
#[ignore = "requires live PostgreSQL instance (docker compose up -d)"]
async fn event_crud_validates_input() {
    let fx = Fixture::new().await;
    let events = EventService::new(fx.db.pool());

    let negative = events
        .create_event(&NewEvent {
            semester_id: fx.semester.id,
            structure_id: StructureId::new(),
            name: "Negative".to_owned(),
            location: None,
            start_date: Utc::now(),
            points_multiplier: Decimal::NEGATIVE_ONE,
        })
        .await;
    assert!(matches!(negative, Err(ServiceError::InvalidRequest(_))));

    let orphan = events
        .create_event(&NewEvent {
            semester_id: SemesterId::new(),
            structure_id: StructureId::new(),
            name: "Orphan".to_owned(),
            location: None,
            start_date: Utc::now(),
            points_multiplier: Decimal::ONE,
        })
        .await;
    assert!(matches!(
        orphan,
        Err(ServiceError::NotFound { entity: "semester", .. })
    ));

    let event = fx.event(Decimal::ONE).await;
    let renamed = events
        .update_event(
            event.id,
            &EventUpdate {
                name: Some("Final Table".to_owned()),
                ..EventUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Final Table");
    assert_eq!(renamed.state, EventState::Started);

    EventLifecycle::new(fx.db.pool())
        .end_event(event.id)
        .await
        .unwrap();
    let frozen = events
        .update_event(
            event.id,
            &EventUpdate {
                points_multiplier: Some(Decimal::TWO),
                ..EventUpdate::default()
            },
        )
        .await;
    assert!(matches!(frozen, Err(ServiceError::Forbidden(_))));

    let listed = events.list_events(fx.semester.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Final Table");
}
