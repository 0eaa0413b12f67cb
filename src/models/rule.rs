use rust_decimal::Decimal;

pub const INCOME_CATEGORY: &str = "Income";
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub category: String,
    /// Lower-cased substrings matched against the description.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, description_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| description_lower.contains(keyword.as_str()))
    }
}

/// Ordered keyword table used to categorize transactions that lack a category.
///
/// Rules are tried in order and the first match wins, so a keyword listed in an
/// earlier rule shadows the same text in a later one ("gas" is Transport even
/// when the description says "gas company").
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>, fallback: &str) -> Self {
        Self {
            rules,
            fallback: fallback.to_string(),
        }
    }

    pub fn infer(&self, description: &str, amount: Decimal) -> String {
        if amount > Decimal::ZERO {
            return INCOME_CATEGORY.to_string();
        }

        let description_lower = description.to_lowercase();
        self.rules
            .iter()
            // income keywords never label spending
            .filter(|rule| rule.category != INCOME_CATEGORY)
            .find(|rule| rule.matches(&description_lower))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        let rules = vec![
            CategoryRule::new(
                "Groceries",
                &["grocery", "supermarket", "market", "food lion", "trader joe", "walmart"],
            ),
            CategoryRule::new(
                "Transport",
                &["uber", "lyft", "taxi", "gas", "fuel", "metro", "subway", "bus"],
            ),
            CategoryRule::new(
                "Utilities",
                &["bill", "electricity", "water", "internet", "phone", "gas com"],
            ),
            CategoryRule::new(
                "Dining",
                &["restaurant", "cafe", "dinner", "lunch", "brunch", "starbucks"],
            ),
            CategoryRule::new(
                "Shopping",
                &["amazon", "store", "shop", "clothing", "electronics"],
            ),
            CategoryRule::new("Healthcare", &["pharmacy", "doctor", "hospital", "clinic"]),
            CategoryRule::new("Entertainment", &["movie", "concert", "show", "game"]),
            CategoryRule::new("Travel", &["flight", "hotel", "airbnb", "booking"]),
            CategoryRule::new("Rent/Mortgage", &["rent", "mortgage"]),
            CategoryRule::new(INCOME_CATEGORY, &["salary", "deposit", "paycheck"]),
        ];
        Self::new(rules, FALLBACK_CATEGORY)
    }
}
