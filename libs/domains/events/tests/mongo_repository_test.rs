//! MongoEventRepository against a real MongoDB container.
//!
//! Needs Docker: `cargo test -p domain_events -- --ignored`

use chrono::{Duration, Utc};
use domain_events::*;
use test_utils::{TestDataBuilder, TestMongo};

fn new_event(title: &str, event_type: EventType, first: f64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: "Container test".into(),
        prize_money: PrizeMoney {
            first,
            second: 20.0,
            third: 10.0,
        },
        date_time: Utc::now() + Duration::days(14),
        venue: "Auditorium".into(),
        event_type,
        max_team_size: 6,
    }
}

async fn repository(mongo: &TestMongo, test_name: &str) -> MongoEventRepository {
    let builder = TestDataBuilder::from_test_name(test_name);
    let db = mongo.database(&builder.name("db", "events").replace('-', "_"));
    let repo = MongoEventRepository::new(&db);
    repo.create_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_crud_cycle() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "mongo_crud_cycle").await;

    let created = repo
        .create(new_event("Alpha", EventType::Technical, 100.0))
        .await
        .unwrap();
    assert_eq!(created.id.len(), 24);

    let fetched = repo.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&created));

    let patched = repo
        .update(
            &created.id,
            EventPatch {
                prize_money: Some(PrizeMoneyPatch {
                    second: Some(55.0),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.prize_money.first, 100.0);
    assert_eq!(patched.prize_money.second, 55.0);
    assert!(patched.updated_at > created.updated_at);

    let replaced = repo
        .replace(&created.id, new_event("Beta", EventType::Music, 1.0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.created_at, created.created_at);
    assert_eq!(replaced.title, "Beta");

    let deleted = repo.delete(&created.id).await.unwrap().unwrap();
    assert_eq!(deleted, replaced);
    assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    assert!(repo.delete(&created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_invalid_object_id() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "mongo_invalid_id").await;

    assert!(matches!(
        repo.get_by_id("abc").await,
        Err(EventError::InvalidId(_))
    ));
    assert!(
        repo.get_by_id("507f1f77bcf86cd799439011")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_stats_and_delete_all() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "mongo_list_stats").await;

    for (title, kind, first) in [
        ("C", EventType::Art, 300.0),
        ("A", EventType::Sports, 100.0),
        ("B", EventType::Art, 200.0),
    ] {
        repo.create(new_event(title, kind, first)).await.unwrap();
    }

    let (page, total) = repo
        .list(EventQuery {
            event_type: Some(EventType::Art),
            sort_by: SortField::Title,
            order: SortOrder::Desc,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    let titles: Vec<_> = page.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["C", "B"]);

    let (page, total) = repo
        .list(EventQuery {
            page: 2,
            limit: 2,
            sort_by: SortField::PrizeFirst,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].prize_money.first, 300.0);

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.total_prize_money, 600.0 + 3.0 * 30.0);
    assert_eq!(stats.event_types, vec![EventType::Art, EventType::Sports]);
    assert_eq!(stats.by_type[0].event_type, EventType::Art);
    assert_eq!(stats.by_type[0].count, 2);

    repo.ping().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 3);
    assert_eq!(repo.delete_all().await.unwrap(), 3);
    assert_eq!(repo.count().await.unwrap(), 0);
    assert_eq!(repo.stats().await.unwrap().average_prize_money, 0.0);
}
