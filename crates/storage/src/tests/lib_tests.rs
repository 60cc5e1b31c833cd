use super::*;

fn company(id: i64, status: CompanyStatus) -> Company {
    Company {
        id: CompanyId(id),
        symbol: format!("T{id}"),
        name: format!("Test {id}"),
        revenue: None,
        last_sale: None,
        net_change: None,
        percent_change: None,
        market_cap: "1000".to_string(),
        country: "USA".to_string(),
        ipo_year: None,
        volume: None,
        sector: "Technology".to_string(),
        industry: "Various".to_string(),
        status,
        ai_insight: None,
        about: None,
    }
}

fn uniform_store(count: i64, status: CompanyStatus) -> CompanyStore {
    CompanyStore::from_records((1..=count).map(|id| company(id, status)).collect()).expect("store")
}

fn ids(page: &[Company]) -> Vec<i64> {
    page.iter().map(|c| c.id.0).collect()
}

#[test]
fn twenty_five_records_page_as_ten_ten_five() {
    let store = uniform_store(25, CompanyStatus::TopProspect);
    let filter = StatusFilter::Only(CompanyStatus::TopProspect);

    assert_eq!(store.list_companies(0, 10, &filter).len(), 10);
    assert_eq!(store.list_companies(10, 10, &filter).len(), 10);
    assert_eq!(store.list_companies(20, 10, &filter).len(), 5);
    assert!(store.list_companies(30, 10, &filter).is_empty());
}

#[test]
fn pages_concatenate_to_filtered_sequence_without_gaps() {
    let store = CompanyStore::generated(50, 7).expect("store");
    for status in CompanyStatus::ALL {
        let filter = StatusFilter::Only(status);
        let expected = store.list_companies(0, usize::MAX, &filter);

        let mut collected = Vec::new();
        let mut page = 0;
        loop {
            let chunk = store.list_companies(page * 4, 4, &filter);
            assert!(chunk.len() <= 4);
            let last = chunk.len() < 4;
            collected.extend(chunk);
            if last {
                break;
            }
            page += 1;
        }

        assert_eq!(ids(&collected), ids(&expected));
        assert!(collected.iter().all(|c| c.status == status));
    }
}

#[test]
fn unfiltered_listing_returns_every_status_in_insertion_order() {
    let store = CompanyStore::from_records(vec![
        company(3, CompanyStatus::LowPotential),
        company(1, CompanyStatus::TopProspect),
        company(2, CompanyStatus::NeedsReview),
    ])
    .expect("store");

    let all = store.list_companies(0, 10, &StatusFilter::All);
    assert_eq!(ids(&all), vec![3, 1, 2]);
    assert_eq!(ids(&store.list_companies(1, 1, &StatusFilter::All)), vec![1]);
}

#[test]
fn unrecognized_filter_and_zero_limit_yield_empty_pages() {
    let store = CompanyStore::generated(20, 1).expect("store");
    let unknown = StatusFilter::Unrecognized("Moonshot".to_string());
    assert!(store.list_companies(0, 10, &unknown).is_empty());
    assert!(store.list_companies(0, 0, &StatusFilter::All).is_empty());
}

#[test]
fn repeated_queries_are_identical() {
    let store = CompanyStore::generated(50, 99).expect("store");
    let filter = StatusFilter::Only(CompanyStatus::Promising);
    assert_eq!(
        store.list_companies(2, 5, &filter),
        store.list_companies(2, 5, &filter)
    );
}

#[test]
fn lookup_by_id_reports_missing_records() {
    let store = CompanyStore::generated(50, 3).expect("store");
    assert_eq!(
        store.company_by_id(CompanyId(17)).expect("present").symbol,
        "COMP17"
    );
    assert!(store.company_by_id(CompanyId(999)).is_none());
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = CompanyStore::from_records(vec![
        company(1, CompanyStatus::TopProspect),
        company(1, CompanyStatus::LowPotential),
    ])
    .err()
    .expect("duplicate should fail");
    assert!(err.to_string().contains("duplicate company id 1"));
}

#[test]
fn generator_is_deterministic_per_seed() {
    let first = generate_companies(30, 42);
    assert_eq!(first, generate_companies(30, 42));
    assert_ne!(first, generate_companies(30, 43));
    assert_eq!(first.len(), 30);
    assert_eq!(first[0].id, CompanyId(1));
    assert_eq!(first[29].name, "Company 30 Corp");
    assert!(first
        .iter()
        .all(|c| (2000..=2022).contains(&c.ipo_year.expect("ipo year"))));
}

#[test]
fn status_counts_cover_every_record() {
    let store = CompanyStore::generated(DEFAULT_MOCK_COMPANY_COUNT, 5).expect("store");
    let counts = store.status_counts();
    assert_eq!(counts.len(), CompanyStatus::ALL.len());
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), store.len());
}

#[test]
fn dataset_file_round_trips_through_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("companies.json");
    let companies = generate_companies(12, 8);

    write_dataset(&path, &companies).expect("write");
    let store = CompanyStore::load_json(&path).expect("load");

    assert_eq!(store.len(), 12);
    assert_eq!(store.list_companies(0, 12, &StatusFilter::All), companies);
}

#[test]
fn dataset_with_invalid_status_fails_to_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    let mut raw = serde_json::to_value(generate_companies(1, 1)).expect("json");
    raw[0]["status"] = serde_json::Value::String("Hot".to_string());
    fs::write(&path, raw.to_string()).expect("write");

    assert!(CompanyStore::load_json(&path).is_err());
}
