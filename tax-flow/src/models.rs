use serde::{Deserialize, Serialize};

/// Income and deduction figures submitted to the calculation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInputs {
    pub monthly_gross_income: f64,
    pub additional_monthly_income: f64,
    pub annual_pension_contribution: f64,
    #[serde(rename = "annualNHFContributions")]
    pub annual_nhf_contributions: f64,
    pub annual_rent_paid: f64,
    pub life_insurance_premiums: f64,
}

impl TaxInputs {
    /// All six fields paired with their wire names, in form order.
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("monthlyGrossIncome", self.monthly_gross_income),
            ("additionalMonthlyIncome", self.additional_monthly_income),
            ("annualPensionContribution", self.annual_pension_contribution),
            ("annualNHFContributions", self.annual_nhf_contributions),
            ("annualRentPaid", self.annual_rent_paid),
            ("lifeInsurancePremiums", self.life_insurance_premiums),
        ]
    }
}

/// Tax breakdown produced by the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub gross_income: f64,
    pub total_deductions: f64,
    pub taxable_income: f64,
    pub tax_owed: f64,
    pub effective_tax_rate: f64,
    pub after_tax_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub tax_calculation: CalculationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "AIResponse")]
    pub ai_response: String,
}
