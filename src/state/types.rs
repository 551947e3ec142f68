//! Core value types shared by the engine, data sources and UI.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A single cell of an income-statement record.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Any JSON number.
    Number(f64),
    /// A string that parses as a calendar date (`YYYY-MM-DD`, optionally followed by a time).
    Date(String),
    /// Anything else, rendered verbatim.
    Text(String),
}

impl CellValue {
    /// What: Classify a raw JSON value as a cell.
    ///
    /// Inputs:
    /// - `value`: JSON value from a data service payload
    ///
    /// Output:
    /// - `Some(CellValue)` for numbers, strings and booleans; `None` for null, arrays and objects.
    ///
    /// Details:
    /// - Strings are promoted to `Date` when their leading ten characters parse as a date.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => {
                if crate::util::parse_date_prefix(s).is_some() {
                    Some(Self::Date(s.clone()))
                } else {
                    Some(Self::Text(s.clone()))
                }
            }
            serde_json::Value::Bool(b) => Some(Self::Text(b.to_string())),
            _ => None,
        }
    }

    /// Numeric coercion: numbers as-is, strings parsed as `f64`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Date(s) | Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Calendar year of the value, if it carries one.
    #[must_use]
    pub fn as_year(&self) -> Option<i32> {
        match self {
            Self::Date(s) | Self::Text(s) => crate::util::year_of(s),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && (1000.0..=9999.0).contains(n) => Some(*n as i32),
            Self::Number(_) => None,
        }
    }
}

/// One reporting period: column name to value. Immutable once received.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct Record {
    /// Cells keyed by column name; null payload fields are absent.
    fields: BTreeMap<String, CellValue>,
}

impl Record {
    /// Look up the raw cell for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Numeric coercion of `column`.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    /// Calendar year extracted from `column`.
    #[must_use]
    pub fn year(&self, column: &str) -> Option<i32> {
        self.get(column).and_then(CellValue::as_year)
    }

    /// String form of `column` for text cells and dates; `None` for numbers.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            CellValue::Date(s) | CellValue::Text(s) => Some(s.as_str()),
            CellValue::Number(_) => None,
        }
    }

    /// Column names present in this record, in lexical order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Whether the record carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Record {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let fields = raw
            .into_iter()
            .filter_map(|(k, v)| CellValue::from_json(&v).map(|c| (k, c)))
            .collect();
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, CellValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// How a column participates in bounds and range filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric coercion; range filter over values.
    Numeric,
    /// Date or year; range filter over whole calendar years.
    Date,
    /// Opaque text; sortable but never range-filtered.
    Text,
}

impl ColumnKind {
    /// Whether a range filter (and therefore bounds) applies to this kind.
    #[must_use]
    pub const fn is_rangeable(self) -> bool {
        matches!(self, Self::Numeric | Self::Date)
    }
}

/// Column name plus kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Field name as delivered by the data service.
    pub name: String,
    /// Kind driving bounds and filters.
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// What: Resolve the descriptor for `name`.
    ///
    /// Inputs:
    /// - `name`: Column identifier
    /// - `rows`: Dataset used to infer the kind of columns outside the income-statement field set
    ///
    /// Output:
    /// - Descriptor with the known kind, or the kind of the first non-null cell, or `Text`.
    ///
    /// Details:
    /// - Names containing `date` are always date columns, like the range sliders of the browser.
    #[must_use]
    pub fn resolve(name: &str, rows: &[Record]) -> Self {
        let kind = known_kind(name).unwrap_or_else(|| {
            rows.iter()
                .find_map(|r| r.get(name))
                .map_or(ColumnKind::Text, |cell| match cell {
                    CellValue::Number(_) => ColumnKind::Numeric,
                    CellValue::Date(_) => ColumnKind::Date,
                    CellValue::Text(_) => ColumnKind::Text,
                })
        });
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Columns shown in the table when no configuration overrides them.
pub const DEFAULT_TABLE_COLUMNS: &[&str] = &[
    "date",
    "revenue",
    "netIncome",
    "grossProfit",
    "eps",
    "operatingIncome",
];

/// Metrics charted when no configuration overrides them.
pub const DEFAULT_CHART_METRICS: &[&str] = &["revenue", "grossProfit", "netIncome"];

/// The income-statement field set and the kind of each field.
pub const INCOME_STATEMENT_FIELDS: &[(&str, ColumnKind)] = &[
    ("date", ColumnKind::Date),
    ("symbol", ColumnKind::Text),
    ("reportedCurrency", ColumnKind::Text),
    ("cik", ColumnKind::Text),
    ("fillingDate", ColumnKind::Date),
    ("acceptedDate", ColumnKind::Date),
    ("calendarYear", ColumnKind::Date),
    ("period", ColumnKind::Text),
    ("revenue", ColumnKind::Numeric),
    ("costOfRevenue", ColumnKind::Numeric),
    ("grossProfit", ColumnKind::Numeric),
    ("grossProfitRatio", ColumnKind::Numeric),
    ("researchAndDevelopmentExpenses", ColumnKind::Numeric),
    ("generalAndAdministrativeExpenses", ColumnKind::Numeric),
    ("sellingAndMarketingExpenses", ColumnKind::Numeric),
    ("sellingGeneralAndAdministrativeExpenses", ColumnKind::Numeric),
    ("otherExpenses", ColumnKind::Numeric),
    ("operatingExpenses", ColumnKind::Numeric),
    ("costAndExpenses", ColumnKind::Numeric),
    ("interestIncome", ColumnKind::Numeric),
    ("interestExpense", ColumnKind::Numeric),
    ("depreciationAndAmortization", ColumnKind::Numeric),
    ("ebitda", ColumnKind::Numeric),
    ("ebitdaratio", ColumnKind::Numeric),
    ("operatingIncome", ColumnKind::Numeric),
    ("operatingIncomeRatio", ColumnKind::Numeric),
    ("totalOtherIncomeExpensesNet", ColumnKind::Numeric),
    ("incomeBeforeTax", ColumnKind::Numeric),
    ("incomeBeforeTaxRatio", ColumnKind::Numeric),
    ("incomeTaxExpense", ColumnKind::Numeric),
    ("netIncome", ColumnKind::Numeric),
    ("netIncomeRatio", ColumnKind::Numeric),
    ("eps", ColumnKind::Numeric),
    ("epsdiluted", ColumnKind::Numeric),
    ("weightedAverageShsOut", ColumnKind::Numeric),
    ("weightedAverageShsOutDil", ColumnKind::Numeric),
    ("link", ColumnKind::Text),
    ("finalLink", ColumnKind::Text),
];

/// Kind of a column from the income-statement field set or its name.
fn known_kind(name: &str) -> Option<ColumnKind> {
    INCOME_STATEMENT_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
        .or_else(|| name.to_ascii_lowercase().contains("date").then_some(ColumnKind::Date))
}

/// Company profile shown above the table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    /// Ticker including any exchange suffix.
    pub symbol: String,
    /// Display name.
    pub company_name: String,
    /// Industry classification.
    pub industry: String,
    /// Sector classification.
    pub sector: String,
    /// Short exchange code.
    pub exchange: String,
    /// Reporting currency.
    pub currency: String,
    /// Last price.
    #[serde(deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    /// Market capitalisation.
    #[serde(deserialize_with = "lenient_number", alias = "mktCap")]
    pub market_cap: Option<f64>,
    /// Chief executive.
    pub ceo: String,
    /// Company website.
    pub website: String,
    /// Business description.
    pub description: String,
    /// Logo URL.
    pub image: String,
}

/// Accept numbers, numeric strings, or null for profile figures.
fn lenient_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(de)?;
    Ok(raw.as_ref().and_then(CellValue::from_json).and_then(|c| c.as_number()))
}

/// Chart presentation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// One line per metric.
    #[default]
    Line,
    /// Metrics stacked on top of each other, filled.
    #[serde(alias = "stack", alias = "stacked")]
    StackedArea,
    /// Each metric filled down to the axis.
    Area,
}

impl ChartMode {
    /// Next mode in the cycle used by the chart toggle key.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Line => Self::StackedArea,
            Self::StackedArea => Self::Area,
            Self::Area => Self::Line,
        }
    }

    /// Short label shown in the chart title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::StackedArea => "stacked area",
            Self::Area => "area",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Payload fields are classified by JSON type and date shape.
    ///
    /// Inputs:
    /// - A record with a number, a date, an opaque string and a null
    ///
    /// Output:
    /// - Number/Date/Text cells; the null field is absent
    fn record_classifies_payload_fields() {
        let rec: Record = serde_json::from_value(serde_json::json!({
            "revenue": 100,
            "date": "2020-09-26",
            "period": "FY",
            "link": null
        }))
        .unwrap();
        assert_eq!(rec.get("revenue"), Some(&CellValue::Number(100.0)));
        assert_eq!(rec.get("date"), Some(&CellValue::Date("2020-09-26".into())));
        assert_eq!(rec.get("period"), Some(&CellValue::Text("FY".into())));
        assert!(rec.get("link").is_none());
        assert_eq!(rec.year("date"), Some(2020));
    }

    #[test]
    /// What: Numeric coercion parses numeric strings and rejects text.
    fn cell_numeric_coercion() {
        assert_eq!(CellValue::Text("42.5".into()).as_number(), Some(42.5));
        assert_eq!(CellValue::Text("n/a".into()).as_number(), None);
        assert_eq!(CellValue::Text("2021".into()).as_year(), Some(2021));
    }

    #[test]
    /// What: Column kinds come from the field table, the name, or the data.
    ///
    /// Inputs:
    /// - Known numeric field, unknown `*Date` field, unknown numeric field, unknown empty column
    ///
    /// Output:
    /// - Numeric, Date, Numeric (inferred), Text (fallback)
    fn descriptor_kind_resolution() {
        let rows = vec![Record::from_iter([("custom", CellValue::Number(1.0))])];
        assert_eq!(ColumnDescriptor::resolve("revenue", &[]).kind, ColumnKind::Numeric);
        assert_eq!(ColumnDescriptor::resolve("auditDate", &[]).kind, ColumnKind::Date);
        assert_eq!(ColumnDescriptor::resolve("custom", &rows).kind, ColumnKind::Numeric);
        assert_eq!(ColumnDescriptor::resolve("missing", &rows).kind, ColumnKind::Text);
    }

    #[test]
    /// What: Profiles tolerate string-encoded figures and missing fields.
    fn profile_lenient_figures() {
        let p: CompanyProfile = serde_json::from_value(serde_json::json!({
            "symbol": "AAPL.NE",
            "companyName": "Apple Inc.",
            "price": "27.1",
            "mktCap": 3_000_000_000_000_i64
        }))
        .unwrap();
        assert_eq!(p.price, Some(27.1));
        assert_eq!(p.market_cap, Some(3e12));
        assert!(p.industry.is_empty());
    }

    #[test]
    /// What: Chart modes cycle through all three variants and parse config aliases.
    fn chart_mode_cycle_and_aliases() {
        assert_eq!(ChartMode::Line.next().next().next(), ChartMode::Line);
        let m: ChartMode = serde_json::from_value(serde_json::json!("stack")).unwrap();
        assert_eq!(m, ChartMode::StackedArea);
    }
}
