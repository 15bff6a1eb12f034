// src/reports/mod.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::db::{self, Store};
use crate::filter;
use crate::models::{BoundQuery, ResultSet, Scope};

// ───────────────────────────────────────
// Report definitions
// ───────────────────────────────────────

/// How a report reacts to the city selector.
#[derive(Debug, Clone, Copy)]
pub enum ScopeRule {
    /// Always computed over the whole dataset.
    Global,
    /// Filtered on `column` when a city is selected.
    Optional(&'static str),
    /// Only runs with a specific city; otherwise shows `prompt`.
    Required { column: &'static str, prompt: &'static str },
}

#[derive(Debug)]
pub struct ReportDef {
    pub number: u8,
    pub section: &'static str,
    pub title: &'static str,
    pub note: Option<&'static str>,
    select: &'static str,
    /// `(column, value)` equality predicates applied regardless of scope.
    fixed: &'static [(&'static str, &'static str)],
    pub scope: ScopeRule,
    tail: &'static str,
    pub charted: bool,
    /// `{scope}` is replaced with the active scope label.
    empty: &'static str,
}

impl ReportDef {
    /// Assembles the SQL for `scope`. Every value is bound, never spliced.
    /// `None` when the report needs a specific city and none is selected.
    pub fn build(&self, scope: &Scope) -> Option<BoundQuery> {
        let mut predicates: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        for (column, value) in self.fixed {
            predicates.push(format!("{column} = ?"));
            params.push((*value).to_string());
        }

        match (self.scope, scope.city()) {
            (ScopeRule::Global, _) | (ScopeRule::Optional(_), None) => {}
            (ScopeRule::Required { .. }, None) => return None,
            (ScopeRule::Optional(column), Some(city))
            | (ScopeRule::Required { column, .. }, Some(city)) => {
                predicates.push(format!("{column} = ?"));
                params.push(city.to_string());
            }
        }

        let mut sql = self.select.to_string();
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        if !self.tail.is_empty() {
            sql.push(' ');
            sql.push_str(self.tail);
        }
        Some(params.into_iter().fold(BoundQuery::new(sql), BoundQuery::bind))
    }

    pub fn empty_message(&self, scope: &Scope) -> String {
        self.empty.replace("{scope}", scope.label())
    }
}

const PROVIDERS_AND_RECEIVERS: &str = "Food Providers & Receivers";
const LISTINGS: &str = "Food Listings & Availability";
const CLAIMS: &str = "Claims & Distribution";
const INSIGHTS: &str = "Analysis & Insights";

const COMPLETED: &[(&str, &str)] = &[("c.Status", "Completed")];

pub static REPORTS: [ReportDef; 13] = [
    ReportDef {
        number: 1,
        section: PROVIDERS_AND_RECEIVERS,
        title: "Providers & Receivers per City",
        note: None,
        select: "SELECT p.City, COUNT(DISTINCT p.Provider_ID) AS Providers_Count, \
                 COUNT(DISTINCT r.Receiver_ID) AS Receivers_Count \
                 FROM Providers p LEFT JOIN Receivers r ON p.City = r.City",
        fixed: &[],
        scope: ScopeRule::Optional("p.City"),
        tail: "GROUP BY p.City ORDER BY Providers_Count DESC, Receivers_Count DESC, p.City",
        charted: true,
        empty: "No data for selected city: {scope}.",
    },
    ReportDef {
        number: 2,
        section: PROVIDERS_AND_RECEIVERS,
        title: "Provider Type Contribution",
        note: None,
        select: "SELECT Type AS Provider_Type, COUNT(*) AS Total FROM Providers",
        fixed: &[],
        scope: ScopeRule::Optional("City"),
        tail: "GROUP BY Type ORDER BY Total DESC, Provider_Type",
        charted: true,
        empty: "No provider type data for selected city: {scope}.",
    },
    ReportDef {
        number: 3,
        section: PROVIDERS_AND_RECEIVERS,
        title: "Provider Contacts",
        note: None,
        select: "SELECT Name, Contact FROM Providers",
        fixed: &[],
        scope: ScopeRule::Required {
            column: "City",
            prompt: "Select a specific city from the dropdown to view provider contacts.",
        },
        tail: "ORDER BY Name",
        charted: false,
        empty: "No providers found in {scope}.",
    },
    ReportDef {
        number: 4,
        section: PROVIDERS_AND_RECEIVERS,
        title: "Top 5 Receivers by Claims Count",
        note: None,
        select: "SELECT r.Name AS Receiver_Name, COUNT(c.Claim_ID) AS Claims_Count \
                 FROM Claims c JOIN Receivers r ON c.Receiver_ID = r.Receiver_ID",
        fixed: &[],
        scope: ScopeRule::Optional("r.City"),
        tail: "GROUP BY r.Name ORDER BY Claims_Count DESC, Receiver_Name LIMIT 5",
        charted: true,
        empty: "No receiver claims data for selected city: {scope}.",
    },
    ReportDef {
        number: 5,
        section: LISTINGS,
        title: "Total Food Quantity in Listings",
        note: None,
        select: "SELECT SUM(Quantity) AS Total_Food_Quantity FROM Food_Listings",
        fixed: &[],
        scope: ScopeRule::Optional("Location"),
        tail: "",
        charted: false,
        empty: "No food listings quantity data for selected city: {scope}.",
    },
    ReportDef {
        number: 6,
        section: LISTINGS,
        title: "City with Highest Food Listings",
        note: Some("This metric shows the city with the highest listings overall, not filtered by selection."),
        select: "SELECT Location AS City, COUNT(*) AS Listing_Count FROM Food_Listings",
        fixed: &[],
        scope: ScopeRule::Global,
        tail: "GROUP BY Location ORDER BY Listing_Count DESC, City LIMIT 1",
        charted: true,
        empty: "No food listings recorded (selected city: {scope}).",
    },
    ReportDef {
        number: 7,
        section: LISTINGS,
        title: "Most Common Food Types Listed",
        note: None,
        select: "SELECT Food_Type, COUNT(*) AS Count FROM Food_Listings",
        fixed: &[],
        scope: ScopeRule::Optional("Location"),
        tail: "GROUP BY Food_Type ORDER BY Count DESC, Food_Type",
        charted: true,
        empty: "No food type data for selected city: {scope}.",
    },
    ReportDef {
        number: 8,
        section: CLAIMS,
        title: "Claims Count per Food Item (Top 10)",
        note: None,
        select: "SELECT fl.Food_Name, COUNT(c.Claim_ID) AS Total_Claims \
                 FROM Claims c JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID",
        fixed: &[],
        scope: ScopeRule::Optional("fl.Location"),
        tail: "GROUP BY fl.Food_Name ORDER BY Total_Claims DESC, fl.Food_Name LIMIT 10",
        charted: true,
        empty: "No claims per food item data for selected city: {scope}.",
    },
    ReportDef {
        number: 9,
        section: CLAIMS,
        title: "Top Provider by Successful Claims (Top 10)",
        note: None,
        select: "SELECT p.Name AS Provider_Name, COUNT(c.Claim_ID) AS Successful_Claims_Count \
                 FROM Claims c \
                 JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID \
                 JOIN Providers p ON fl.Provider_ID = p.Provider_ID",
        fixed: COMPLETED,
        scope: ScopeRule::Optional("p.City"),
        tail: "GROUP BY p.Name ORDER BY Successful_Claims_Count DESC, Provider_Name LIMIT 10",
        charted: true,
        empty: "No successful claims data for selected city: {scope}.",
    },
    ReportDef {
        number: 10,
        section: CLAIMS,
        title: "Claims Status Distribution (Percentage)",
        note: Some("This shows overall claims status and is not filtered by city selection."),
        select: "SELECT Status, ROUND((COUNT(*) * 100.0) / (SELECT COUNT(*) FROM Claims), 2) AS Percentage \
                 FROM Claims",
        fixed: &[],
        scope: ScopeRule::Global,
        tail: "GROUP BY Status ORDER BY Status",
        charted: true,
        empty: "No claims recorded (selected city: {scope}).",
    },
    ReportDef {
        number: 11,
        section: INSIGHTS,
        title: "Average Quantity Claimed per Receiver (Top 10)",
        note: None,
        select: "SELECT r.Name AS Receiver_Name, ROUND(AVG(fl.Quantity), 2) AS Avg_Quantity_Claimed \
                 FROM Claims c \
                 JOIN Receivers r ON c.Receiver_ID = r.Receiver_ID \
                 JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID",
        fixed: COMPLETED,
        scope: ScopeRule::Optional("r.City"),
        tail: "GROUP BY r.Name ORDER BY Avg_Quantity_Claimed DESC, Receiver_Name LIMIT 10",
        charted: true,
        empty: "No average quantity claimed data for selected city: {scope}.",
    },
    ReportDef {
        number: 12,
        section: INSIGHTS,
        title: "Most Claimed Meal Type",
        note: None,
        select: "SELECT fl.Meal_Type, COUNT(c.Claim_ID) AS Claim_Count \
                 FROM Claims c JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID",
        fixed: &[],
        scope: ScopeRule::Optional("fl.Location"),
        tail: "GROUP BY fl.Meal_Type ORDER BY Claim_Count DESC, fl.Meal_Type LIMIT 1",
        charted: false,
        empty: "No most claimed meal type data for selected city: {scope}.",
    },
    ReportDef {
        number: 13,
        section: INSIGHTS,
        title: "Total Quantity Donated by Each Provider (Top 10)",
        note: None,
        select: "SELECT p.Name AS Provider_Name, SUM(fl.Quantity) AS Total_Quantity_Donated \
                 FROM Providers p JOIN Food_Listings fl ON p.Provider_ID = fl.Provider_ID",
        fixed: &[],
        scope: ScopeRule::Optional("p.City"),
        tail: "GROUP BY p.Name ORDER BY Total_Quantity_Donated DESC, Provider_Name LIMIT 10",
        charted: true,
        empty: "No total quantity donated data for selected city: {scope}.",
    },
];

pub fn find(number: u8) -> Option<&'static ReportDef> {
    REPORTS.iter().find(|r| r.number == number)
}

// ───────────────────────────────────────
// Rendered panels
// ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub category: String,
    pub series: Vec<String>,
}

impl Chart {
    /// First column is the category axis; numeric columns become series.
    fn for_table(table: &ResultSet) -> Option<Chart> {
        let (category, rest) = table.columns.split_first()?;
        let series: Vec<String> = rest
            .iter()
            .enumerate()
            .filter(|(i, _)| table.rows.iter().any(|row| row[i + 1].as_f64().is_some()))
            .map(|(_, name)| name.clone())
            .collect();
        if series.is_empty() {
            return None;
        }
        Some(Chart { category: category.clone(), series })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelBody {
    Table { table: ResultSet, chart: Option<Chart> },
    Placeholder { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub number: u8,
    pub section: &'static str,
    pub title: &'static str,
    pub note: Option<&'static str>,
    /// Query failure message, shown alongside the placeholder.
    pub failure: Option<String>,
    pub body: PanelBody,
}

#[cfg(test)]
impl Panel {
    pub fn table(&self) -> Option<&ResultSet> {
        match &self.body {
            PanelBody::Table { table, .. } => Some(table),
            PanelBody::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub scope: Scope,
    pub options: Vec<String>,
    /// Store-level problem, reported once for the whole page.
    pub banner: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub panels: Vec<Panel>,
}

pub async fn run_report(store: &Store, def: &ReportDef, scope: &Scope) -> Panel {
    let panel = |failure: Option<String>, body: PanelBody| Panel {
        number: def.number,
        section: def.section,
        title: def.title,
        note: def.note,
        failure,
        body,
    };

    let Some(query) = def.build(scope) else {
        let message = match def.scope {
            ScopeRule::Required { prompt, .. } => prompt.to_string(),
            _ => def.empty_message(scope),
        };
        debug!(report = def.number, "no scope selected; query skipped");
        return panel(None, PanelBody::Placeholder { message });
    };

    let fetched = db::run_query(store, &query).await;
    if let Some(failure) = &fetched.failure {
        warn!(report = def.number, error = %failure, "report query failed");
    }

    let table = fetched.value;
    let body = if table.is_vacant() {
        PanelBody::Placeholder { message: def.empty_message(scope) }
    } else {
        let chart = if def.charted { Chart::for_table(&table) } else { None };
        PanelBody::Table { table, chart }
    };
    panel(fetched.failure, body)
}

/// Runs every report in order for one scope. Nothing is cached between
/// calls; each render re-queries from scratch.
pub async fn run_dashboard(store: &Store, scope: &Scope) -> Dashboard {
    let cities = filter::list_cities(store).await;

    let mut panels = Vec::with_capacity(REPORTS.len());
    for def in REPORTS.iter() {
        panels.push(run_report(store, def, scope).await);
    }

    Dashboard {
        scope: scope.clone(),
        options: filter::scope_options(&cities.value),
        banner: store.diagnostic().or(cities.failure),
        generated_at: Utc::now(),
        panels,
    }
}
