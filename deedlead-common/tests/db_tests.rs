//! Database initialization and query tests
//!
//! On-disk databases live in a tempdir; everything else uses the in-memory
//! database with the full schema.

use chrono::{TimeZone, Utc};
use deedlead_common::db::call_logs::{self, NewCallLog};
use deedlead_common::db::leads::{self, LeadFilter, LeadSort};
use deedlead_common::db::metrics::{lead_metrics, AVG_RESPONSE_TIME_HOURS};
use deedlead_common::db::{init_database, init_memory_database, FieldValue, LeadField, LeadStatus, NewLead};
use deedlead_common::Error;
use sqlx::SqlitePool;

/// Test helper: insert a lead from (field, text) pairs plus optional taxes owed
async fn insert(pool: &SqlitePool, values: &[(LeadField, &str)], taxes: Option<f64>) -> String {
    let mut lead = NewLead::new();
    for (field, value) in values {
        lead.set(*field, FieldValue::Text(value.to_string()));
    }
    if let Some(taxes) = taxes {
        lead.set(LeadField::TaxesOwed, FieldValue::Decimal(taxes));
    }
    leads::insert_lead(pool, &lead).await.expect("Should insert lead")
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("deedlead.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("deedlead.db");

    let pool = init_database(&db_path).await.unwrap();
    insert(&pool, &[(LeadField::ParcelId, "KEEP-1")], None).await;
    pool.close().await;

    let reopened = init_database(&db_path).await.expect("Should reopen existing database");
    let count = leads::count_leads(&reopened, &LeadFilter::default()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_filter_by_status_and_search() {
    let pool = init_memory_database().await.unwrap();
    let first = insert(&pool, &[(LeadField::OwnerName, "Alice Smith"), (LeadField::County, "Polk")], None).await;
    insert(&pool, &[(LeadField::OwnerName, "Bob Jones"), (LeadField::PropertyAddress, "9 Smithfield Rd")], None).await;
    insert(&pool, &[(LeadField::ParcelId, "100-200"), (LeadField::OwnerName, "Carol")], None).await;

    leads::update_status(&pool, &first, LeadStatus::Contacted).await.unwrap();

    let smith = LeadFilter { status: None, search: Some("smith".to_string()) };
    assert_eq!(leads::count_leads(&pool, &smith).await.unwrap(), 2);

    let contacted_smith = LeadFilter {
        status: Some("Contacted".to_string()),
        search: Some("SMITH".to_string()),
    };
    let found = leads::list_leads(&pool, &contacted_smith, LeadSort::Newest, 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, first);

    let by_parcel = LeadFilter { status: None, search: Some("100-2".to_string()) };
    assert_eq!(leads::count_leads(&pool, &by_parcel).await.unwrap(), 1);

    let literal_percent = LeadFilter { status: None, search: Some("%".to_string()) };
    assert_eq!(leads::count_leads(&pool, &literal_percent).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sort_by_taxes_puts_nulls_last() {
    let pool = init_memory_database().await.unwrap();
    insert(&pool, &[(LeadField::OwnerName, "low")], Some(10.0)).await;
    insert(&pool, &[(LeadField::OwnerName, "none")], None).await;
    insert(&pool, &[(LeadField::OwnerName, "high")], Some(500.0)).await;

    let desc = leads::list_leads(&pool, &LeadFilter::default(), LeadSort::TaxesDesc, 10, 0).await.unwrap();
    let names: Vec<_> = desc.iter().map(|l| l.owner_name.clone().unwrap()).collect();
    assert_eq!(names, vec!["high", "low", "none"]);

    let asc = leads::list_leads(&pool, &LeadFilter::default(), LeadSort::TaxesAsc, 10, 0).await.unwrap();
    let names: Vec<_> = asc.iter().map(|l| l.owner_name.clone().unwrap()).collect();
    assert_eq!(names, vec!["low", "high", "none"]);
}

#[tokio::test]
async fn test_limit_and_offset() {
    let pool = init_memory_database().await.unwrap();
    for i in 0..5 {
        insert(&pool, &[(LeadField::ParcelId, &format!("P{}", i))], None).await;
    }

    let page = leads::list_leads(&pool, &LeadFilter::default(), LeadSort::Newest, 2, 4).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_existing_parcel_ids() {
    let pool = init_memory_database().await.unwrap();
    insert(&pool, &[(LeadField::ParcelId, "A")], None).await;
    insert(&pool, &[(LeadField::ParcelId, "B")], None).await;

    let candidates = vec!["A".to_string(), "C".to_string()];
    let existing = leads::existing_parcel_ids(&pool, &candidates).await.unwrap();
    assert!(existing.contains("A"));
    assert!(!existing.contains("B"));
    assert!(!existing.contains("C"));

    assert!(leads::existing_parcel_ids(&pool, &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_status_missing_lead() {
    let pool = init_memory_database().await.unwrap();
    let updated = leads::update_status(&pool, "missing", LeadStatus::Qualified).await.unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_call_log_updates_contact_metadata() {
    let pool = init_memory_database().await.unwrap();
    let lead_id = insert(&pool, &[(LeadField::OwnerName, "Dana"), (LeadField::ParcelId, "CL-1")], None).await;
    let follow_up = Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap();

    for outcome in ["No Answer", "Interested"] {
        call_logs::create_call_log(
            &pool,
            &NewCallLog {
                lead_id: lead_id.clone(),
                user_id: "agent-7".to_string(),
                outcome: outcome.to_string(),
                duration: Some(95),
                notes: None,
                follow_up_date: if outcome == "No Answer" { Some(follow_up) } else { None },
            },
        )
        .await
        .unwrap();
    }

    let lead = leads::get_lead(&pool, &lead_id).await.unwrap().unwrap();
    assert_eq!(lead.contact_attempts, Some(2));
    assert_eq!(lead.last_contact_outcome.as_deref(), Some("Interested"));
    assert!(lead.last_contact_date.is_some());
    // A later call without a follow-up keeps the earlier one
    assert_eq!(lead.next_follow_up, Some(follow_up));

    let logs = call_logs::list_call_logs(&pool, Some(&lead_id), 10).await.unwrap();
    assert_eq!(logs.len(), 2);
    let summary = logs[0].lead.as_ref().unwrap();
    assert_eq!(summary.owner_name.as_deref(), Some("Dana"));
    assert_eq!(summary.parcel_id.as_deref(), Some("CL-1"));
}

#[tokio::test]
async fn test_call_log_for_unknown_lead() {
    let pool = init_memory_database().await.unwrap();

    let result = call_logs::create_call_log(
        &pool,
        &NewCallLog {
            lead_id: "nope".to_string(),
            user_id: "agent".to_string(),
            outcome: "Voicemail".to_string(),
            duration: None,
            notes: None,
            follow_up_date: None,
        },
    )
    .await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(call_logs::list_call_logs(&pool, None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_call_log_limit_and_filter() {
    let pool = init_memory_database().await.unwrap();
    let a = insert(&pool, &[(LeadField::OwnerName, "A")], None).await;
    let b = insert(&pool, &[(LeadField::OwnerName, "B")], None).await;

    for lead_id in [&a, &a, &b] {
        call_logs::create_call_log(
            &pool,
            &NewCallLog {
                lead_id: lead_id.clone(),
                user_id: "u".to_string(),
                outcome: "Left Message".to_string(),
                duration: None,
                notes: Some("n".to_string()),
                follow_up_date: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(call_logs::list_call_logs(&pool, None, 10).await.unwrap().len(), 3);
    assert_eq!(call_logs::list_call_logs(&pool, None, 2).await.unwrap().len(), 2);
    assert_eq!(call_logs::list_call_logs(&pool, Some(&b), 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_metrics_counts_by_status() {
    let pool = init_memory_database().await.unwrap();

    let empty = lead_metrics(&pool).await.unwrap();
    assert_eq!(empty.total_leads, 0);
    assert_eq!(empty.new_leads, 0);

    let a = insert(&pool, &[(LeadField::OwnerName, "a")], None).await;
    let b = insert(&pool, &[(LeadField::OwnerName, "b")], None).await;
    let c = insert(&pool, &[(LeadField::OwnerName, "c")], None).await;
    insert(&pool, &[(LeadField::OwnerName, "d")], None).await;

    leads::update_status(&pool, &a, LeadStatus::Contacted).await.unwrap();
    leads::update_status(&pool, &b, LeadStatus::Qualified).await.unwrap();
    leads::update_status(&pool, &c, LeadStatus::ClosedWon).await.unwrap();

    let metrics = lead_metrics(&pool).await.unwrap();
    assert_eq!(metrics.total_leads, 4);
    assert_eq!(metrics.new_leads, 1);
    assert_eq!(metrics.contacted_leads, 1);
    assert_eq!(metrics.qualified_leads, 1);
    assert_eq!(metrics.closed_deals, 1);
    assert_eq!(metrics.avg_response_time, AVG_RESPONSE_TIME_HOURS);
}
