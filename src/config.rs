use serde::{Deserialize, Serialize};

use crate::decimal::MONEY_PRECISION;
use crate::errors::{BillingError, Result};

/// loan product configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub product_name: String,
    /// days between consecutive due dates, and from creation to the first one
    pub installment_interval_days: u32,
    /// missed installments needed before a loan counts as delinquent
    pub delinquency_threshold: usize,
    /// decimal places money is settled in
    pub currency_scale: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self::weekly_flat()
    }
}

impl BillingConfig {
    /// the one product on offer: flat interest, weekly installments
    pub fn weekly_flat() -> Self {
        Self {
            product_name: "weekly-flat".to_string(),
            installment_interval_days: 7,
            delinquency_threshold: 2,
            currency_scale: 2,
        }
    }

    /// load from json, filling missing fields from the weekly preset
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: BillingConfig = serde_json::from_str(raw).map_err(|e| {
            BillingError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.installment_interval_days == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "installment_interval_days must be positive".to_string(),
            });
        }
        if self.delinquency_threshold == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "delinquency_threshold must be positive".to_string(),
            });
        }
        if self.currency_scale > MONEY_PRECISION {
            return Err(BillingError::InvalidConfiguration {
                message: format!(
                    "currency_scale {} exceeds money precision {}",
                    self.currency_scale, MONEY_PRECISION
                ),
            });
        }
        Ok(())
    }

    pub fn installment_interval(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.installment_interval_days))
    }
}
