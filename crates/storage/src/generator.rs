use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    domain::{CompanyId, CompanyStatus},
    protocol::Company,
};

pub const DEFAULT_MOCK_COMPANY_COUNT: usize = 50;

const SECTORS: [&str; 5] = ["Technology", "Healthcare", "Finance", "Energy", "Consumer"];
const COUNTRIES: [&str; 5] = ["USA", "UK", "Germany", "Japan", "Canada"];
const MOCK_INSIGHT: &str = "AI generated insight about the company performance and potential.";
const MOCK_ABOUT: &str = "This is a mock company description generated for demonstration purposes.";

/// Builds `count` mock companies with ids `1..=count`.
///
/// Output depends only on `seed`.
pub fn generate_companies(count: usize, seed: u64) -> Vec<Company> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count)
        .map(|n| {
            let revenue = rng.random_range(0..1_000_000_000u64);
            let last_sale = rng.random_range(0..1_000u64);
            let net_change = (rng.random::<f64>() - 0.5) * 10.0;
            let percent_change = (rng.random::<f64>() - 0.5) * 5.0;
            let market_cap = rng.random_range(0..10_000_000_000u64);
            let country = COUNTRIES[rng.random_range(0..COUNTRIES.len())];
            let ipo_year = rng.random_range(2000..=2022);
            let volume = rng.random_range(0..1_000_000i64);
            let sector = SECTORS[rng.random_range(0..SECTORS.len())];
            let status = CompanyStatus::ALL[rng.random_range(0..CompanyStatus::ALL.len())];

            Company {
                id: CompanyId(n as i64),
                symbol: format!("COMP{n}"),
                name: format!("Company {n} Corp"),
                revenue: Some(revenue.to_string()),
                last_sale: Some(last_sale.to_string()),
                net_change: Some(format!("{net_change:.4}")),
                percent_change: Some(format!("{percent_change:.4}")),
                market_cap: market_cap.to_string(),
                country: country.to_string(),
                ipo_year: Some(ipo_year),
                volume: Some(volume),
                sector: sector.to_string(),
                industry: "Various".to_string(),
                status,
                ai_insight: Some(MOCK_INSIGHT.to_string()),
                about: Some(MOCK_ABOUT.to_string()),
            }
        })
        .collect()
}
