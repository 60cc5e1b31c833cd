use serde::{Deserialize, Serialize};

use crate::domain::{CompanyId, CompanyStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub last_sale: Option<String>,
    #[serde(default)]
    pub net_change: Option<String>,
    #[serde(default)]
    pub percent_change: Option<String>,
    pub market_cap: String,
    pub country: String,
    #[serde(default)]
    pub ipo_year: Option<i32>,
    #[serde(default)]
    pub volume: Option<i64>,
    pub sector: String,
    pub industry: String,
    pub status: CompanyStatus,
    #[serde(default)]
    pub ai_insight: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

/// Query string of `GET /api/companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCompaniesQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CompanyStatus>,
}

/// Largest page the listing route serves; longer requests are cut to this.
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn companies_route() -> &'static str {
    "/api/companies"
}

/// Request body of the hosted classification API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub classification: Vec<CompanyStatus>,
    pub limit: u32,
    pub offset: u64,
}

/// `{ "body": { "companies": [...] } }` as returned by the hosted API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub body: Option<ClassificationBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationBody {
    #[serde(default)]
    pub companies: Option<Vec<Company>>,
}

impl ClassificationResponse {
    pub fn into_companies(self) -> Vec<Company> {
        self.body
            .and_then(|body| body.companies)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_uses_camel_case_wire_names() {
        let raw = serde_json::json!({
            "id": 7,
            "symbol": "COMP7",
            "name": "Company 7 Corp",
            "revenue": "1200",
            "lastSale": "31",
            "netChange": "-1.25",
            "percentChange": "0.40",
            "marketCap": "5400000000",
            "country": "UK",
            "ipoYear": 2011,
            "volume": 4200,
            "sector": "Energy",
            "industry": "Various",
            "status": "Low Potential",
            "aiInsight": null,
            "about": "text"
        });
        let company: Company = serde_json::from_value(raw).expect("company");
        assert_eq!(company.id, CompanyId(7));
        assert_eq!(company.last_sale.as_deref(), Some("31"));
        assert_eq!(company.status, CompanyStatus::LowPotential);

        let back = serde_json::to_value(&company).expect("json");
        assert_eq!(back["marketCap"], "5400000000");
        assert!(back["aiInsight"].is_null());
    }

    #[test]
    fn classification_response_without_companies_is_empty() {
        let empty: ClassificationResponse =
            serde_json::from_str(r#"{"body":{}}"#).expect("json");
        assert!(empty.into_companies().is_empty());
        let bare: ClassificationResponse = serde_json::from_str("{}").expect("json");
        assert!(bare.into_companies().is_empty());
    }

    #[test]
    fn list_query_omits_absent_status() {
        let query = ListCompaniesQuery {
            page: 2,
            limit: 10,
            status: None,
        };
        let json = serde_json::to_value(&query).expect("json");
        assert!(json.get("status").is_none());
    }
}
