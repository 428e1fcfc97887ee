use serde::Serialize;

#[derive(Serialize)]
pub struct QuoteResponse {
    pub base_cents: i64,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct EarningsResponse {
    pub completed_rides: usize,
    pub earnings_cents: i64,
}
