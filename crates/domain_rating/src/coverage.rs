//! Coverage lines
//!
//! Each line is rated independently and carries its own premium in the
//! ledger. The wire keys (`liability`, `uninsuredMotorist`, ...) are stable
//! and shared with the discount annotations (`liabilityDiscount`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix for the per-line discount annotation key
pub const DISCOUNT_SUFFIX: &str = "Discount";

/// Ledger key holding the assembled total
pub const TOTAL_PREMIUM_KEY: &str = "totalPremium";

/// Types of auto coverage the engine rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageLine {
    /// Bodily injury and property damage liability
    Liability,
    /// Damage to the insured vehicle from a collision
    Collision,
    /// Theft, fire, weather and other non-collision damage
    Comprehensive,
    /// Losses caused by uninsured or underinsured drivers
    UninsuredMotorist,
    /// Medical expenses regardless of fault
    MedicalPayments,
    /// Rental car while the insured vehicle is repaired
    RentalReimbursement,
    /// Towing, jump starts, lockouts
    RoadsideAssistance,
}

impl CoverageLine {
    /// Every line, in rating order
    pub const ALL: [CoverageLine; 7] = [
        CoverageLine::Liability,
        CoverageLine::Collision,
        CoverageLine::Comprehensive,
        CoverageLine::UninsuredMotorist,
        CoverageLine::MedicalPayments,
        CoverageLine::RentalReimbursement,
        CoverageLine::RoadsideAssistance,
    ];

    /// Returns the ledger key for this line
    pub fn key(&self) -> &'static str {
        match self {
            CoverageLine::Liability => "liability",
            CoverageLine::Collision => "collision",
            CoverageLine::Comprehensive => "comprehensive",
            CoverageLine::UninsuredMotorist => "uninsuredMotorist",
            CoverageLine::MedicalPayments => "medicalPayments",
            CoverageLine::RentalReimbursement => "rentalReimbursement",
            CoverageLine::RoadsideAssistance => "roadsideAssistance",
        }
    }

    /// Returns the ledger key of this line's discount annotation
    pub fn discount_key(&self) -> String {
        format!("{}{}", self.key(), DISCOUNT_SUFFIX)
    }

    /// Looks a line up by its ledger key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|line| line.key() == key)
    }
}

impl fmt::Display for CoverageLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
