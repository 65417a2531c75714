use crate::TwError;

/// Whole currency units. Costs may go negative mid-computation after discounts.
pub type Money = i64;

/// Currency display format, e.g. `"£{}"` or `"{} kr"`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CurrencyFormat {
    template: String,
}

impl CurrencyFormat {
    pub fn new(template: impl Into<String>) -> Result<Self, TwError> {
        let template = template.into();
        if !template.contains("{}") {
            return Err(TwError::config(format!(
                "currency format '{template}' has no '{{}}' placeholder"
            )));
        }
        Ok(Self { template })
    }

    pub fn format(&self, amount: Money) -> String {
        self.template.replacen("{}", &amount.to_string(), 1)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            template: "${}".to_string(),
        }
    }
}

impl TryFrom<String> for CurrencyFormat {
    type Error = TwError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CurrencyFormat::new(s)
    }
}

impl From<CurrencyFormat> for String {
    fn from(c: CurrencyFormat) -> String {
        c.template
    }
}
