//! Quote DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use core_kernel::{CustomerId, VehicleId};
use domain_rating::{AppliedAdjustment, ApplicantProfile, QuoteRequest, QuoteResult};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub customer_id: Option<CustomerId>,
    #[validate(length(max = 200))]
    pub customer_name: String,
    pub customer_age: i32,
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_year: i32,
    #[validate(length(max = 64))]
    pub vehicle_make: String,
    #[serde(default)]
    pub profile: ApplicantProfile,
}

impl From<CreateQuoteRequest> for QuoteRequest {
    fn from(dto: CreateQuoteRequest) -> Self {
        QuoteRequest {
            customer_id: dto.customer_id,
            customer_name: dto.customer_name,
            customer_age: dto.customer_age,
            vehicle_id: dto.vehicle_id,
            vehicle_year: dto.vehicle_year,
            vehicle_make: dto.vehicle_make,
            profile: dto.profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicantSummary {
    pub customer_id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub vehicle_id: Option<VehicleId>,
    pub year: i32,
    pub make: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: String,
    pub applicant: ApplicantSummary,
    pub vehicle: VehicleSummary,
    /// Flat ledger: coverage lines, `<line>Discount` annotations, `totalPremium`
    pub coverages: BTreeMap<String, Decimal>,
    pub total_premium: Decimal,
    pub currency: String,
    pub discounts_applied: Vec<AppliedAdjustment>,
    pub rating_version: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&QuoteResult> for QuoteResponse {
    fn from(quote: &QuoteResult) -> Self {
        let applicant = quote.applicant();
        let vehicle = quote.vehicle();
        let total = quote.total_premium();

        Self {
            quote_id: quote.quote_id().to_string(),
            applicant: ApplicantSummary {
                customer_id: applicant.customer_id,
                first_name: applicant.first_name.clone(),
                last_name: applicant.last_name.clone(),
                age: applicant.age_on(quote.created_at().date_naive()),
            },
            vehicle: VehicleSummary {
                vehicle_id: vehicle.vehicle_id,
                year: vehicle.model_year,
                make: vehicle.make.clone(),
            },
            coverages: quote.coverages().to_map(),
            total_premium: total.amount(),
            currency: total.currency().code().to_string(),
            discounts_applied: quote.adjustments().to_vec(),
            rating_version: quote.rating_version().to_string(),
            created_at: quote.created_at(),
            expires_at: quote.expires_at(),
        }
    }
}
