//! Text rendering of companies for list rows and the detail view.
//!
//! Numeric fields travel as decimal strings and are only parsed here.

use shared::protocol::Company;

const MISSING: &str = "n/a";

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn format_market_cap(raw: &str) -> String {
    match parse_decimal(raw) {
        Some(value) => format!("${:.2}B", value / 1e9),
        None => MISSING.to_string(),
    }
}

pub fn format_price(raw: Option<&str>) -> String {
    match raw.and_then(parse_decimal) {
        Some(value) => format!("${value:.2}"),
        None => MISSING.to_string(),
    }
}

pub fn format_change(raw: Option<&str>) -> String {
    match raw.and_then(parse_decimal) {
        Some(value) if value > 0.0 => format!("+{value:.2}"),
        Some(value) => format!("{value:.2}"),
        None => MISSING.to_string(),
    }
}

pub fn format_volume(volume: Option<i64>) -> String {
    let Some(volume) = volume else {
        return MISSING.to_string();
    };
    let digits = volume.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if volume < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn company_row(company: &Company) -> String {
    format!(
        "{:<8} {:<28} {:<22} {:<8} {:>10}  IPO {}",
        company.symbol,
        company.name,
        company.status,
        company.country,
        format_market_cap(&company.market_cap),
        company
            .ipo_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
    )
}

pub fn company_detail(company: &Company) -> String {
    let mut lines = vec![
        format!("{} ({})", company.name, company.symbol),
        format!("Sector:      {} / {}", company.sector, company.industry),
        format!("Status:      {}", company.status),
        format!("Last sale:   {}", format_price(company.last_sale.as_deref())),
        format!("Net change:  {}", format_change(company.net_change.as_deref())),
        format!("Change %:    {}", format_change(company.percent_change.as_deref())),
        format!("Market cap:  {}", format_market_cap(&company.market_cap)),
        format!("Volume:      {}", format_volume(company.volume)),
        format!("Country:     {}", company.country),
    ];
    if let Some(year) = company.ipo_year {
        lines.push(format!("IPO year:    {year}"));
    }
    if let Some(about) = &company.about {
        lines.push(String::new());
        lines.push(format!("About: {about}"));
    }
    if let Some(insight) = &company.ai_insight {
        lines.push(format!("AI insight: {insight}"));
    }
    lines.join("\n")
}
