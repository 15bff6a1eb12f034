// src/render/mod.rs
//
// Server-side HTML for the dashboard page: one scope selector, then every
// panel grouped under its section heading.

use crate::models::{ResultSet, Scalar};
use crate::reports::{Chart, Dashboard, Panel, PanelBody};

pub fn render_page(dashboard: &Dashboard) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Food Waste Management Insights</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header><h1>Food Waste Management Insights</h1></header>
        {banner}
        {selector}
        {sections}
        <footer>Generated {generated} &middot; scope: {scope}</footer>
    </div>
</body>
</html>"#,
        css = inline_css(),
        banner = dashboard
            .banner
            .as_deref()
            .map(|msg| callout("error", msg))
            .unwrap_or_default(),
        selector = render_selector(&dashboard.options, dashboard.scope.label()),
        sections = render_sections(&dashboard.panels),
        generated = dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        scope = html_escape(dashboard.scope.label()),
    )
}

fn render_selector(options: &[String], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|city| {
            format!(
                r#"<option value="{value}"{sel}>{value}</option>"#,
                value = html_escape(city),
                sel = if city == selected { " selected" } else { "" },
            )
        })
        .collect();

    format!(
        r#"<form class="filters" method="get" action="/">
    <label for="city">Select City to Filter Data:</label>
    <select id="city" name="city" onchange="this.form.submit()">{options}</select>
    <noscript><button type="submit">Apply</button></noscript>
</form>"#
    )
}

fn render_sections(panels: &[Panel]) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for panel in panels {
        if current != Some(panel.section) {
            if current.is_some() {
                out.push_str("</section>\n");
            }
            out.push_str(&format!(
                "<section class=\"section\">\n<h2>{}</h2>\n",
                html_escape(panel.section)
            ));
            current = Some(panel.section);
        }
        out.push_str(&render_panel(panel));
    }
    if current.is_some() {
        out.push_str("</section>\n");
    }
    out
}

fn render_panel(panel: &Panel) -> String {
    let note = panel.note.map(|n| callout("info", n)).unwrap_or_default();
    let failure = panel
        .failure
        .as_deref()
        .map(|f| callout("error", f))
        .unwrap_or_default();
    let body = match &panel.body {
        PanelBody::Placeholder { message } => callout("info", message),
        PanelBody::Table { table, chart } => {
            let chart = chart
                .as_ref()
                .map(|c| render_chart(table, c))
                .unwrap_or_default();
            format!("{}{}", render_table(table), chart)
        }
    };

    format!(
        r#"<article class="panel" id="report-{number}">
    <h3>{number}. {title}</h3>
    {note}{failure}{body}
</article>
"#,
        number = panel.number,
        title = html_escape(panel.title),
    )
}

fn render_table(table: &ResultSet) -> String {
    let head: String = table
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(c)))
        .collect();
    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|v| match v {
                    Scalar::Integer(_) | Scalar::Real(_) => {
                        format!("<td class=\"num\">{}</td>", html_escape(&v.to_string()))
                    }
                    _ => format!("<td>{}</td>", html_escape(&v.to_string())),
                })
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!("<table><thead><tr>{head}</tr></thead><tbody>{rows}</tbody></table>")
}

/// Horizontal bars, one group per row, scaled to the largest value shown.
fn render_chart(table: &ResultSet, chart: &Chart) -> String {
    let Some(category_idx) = table.column_index(&chart.category) else {
        return String::new();
    };
    let series: Vec<(usize, &str)> = chart
        .series
        .iter()
        .filter_map(|name| table.column_index(name).map(|idx| (idx, name.as_str())))
        .collect();

    let max = table
        .rows
        .iter()
        .flat_map(|row| series.iter().filter_map(|(idx, _)| row[*idx].as_f64()))
        .fold(0.0_f64, f64::max);

    let groups: String = table
        .rows
        .iter()
        .map(|row| {
            let bars: String = series
                .iter()
                .enumerate()
                .map(|(n, (idx, name))| {
                    let value = row[*idx].as_f64().unwrap_or(0.0);
                    let pct = if max > 0.0 { (value / max * 100.0).max(0.0) } else { 0.0 };
                    format!(
                        r#"<div class="bar s{series}" style="width:{pct:.1}%" title="{name}: {value}"><span>{value}</span></div>"#,
                        series = n % 4,
                        name = html_escape(name),
                        value = html_escape(&row[*idx].to_string()),
                    )
                })
                .collect();
            format!(
                r#"<div class="bar-group"><div class="bar-label">{label}</div><div class="bars">{bars}</div></div>"#,
                label = html_escape(&row[category_idx].to_string()),
            )
        })
        .collect();

    let legend: String = if series.len() > 1 {
        series
            .iter()
            .enumerate()
            .map(|(n, (_, name))| format!(r#"<span class="key s{}">{}</span>"#, n % 4, html_escape(name)))
            .collect()
    } else {
        String::new()
    };

    format!(r#"<div class="chart"><div class="legend">{legend}</div>{groups}</div>"#)
}

fn callout(kind: &str, message: &str) -> String {
    format!(r#"<div class="callout {kind}">{}</div>"#, html_escape(message))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; line-height: 1.5; color: #111827; background: #f9fafb; }
.container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
header { margin-bottom: 1.5rem; padding-bottom: 1rem; border-bottom: 2px solid #e5e7eb; }
.filters { margin-bottom: 2rem; display: flex; gap: 0.75rem; align-items: center; }
.filters select { padding: 0.35rem 0.5rem; }
.section { margin-bottom: 2.5rem; }
.section h2 { margin-bottom: 1rem; }
.panel { background: #fff; border: 1px solid #e5e7eb; border-radius: 6px; padding: 1rem 1.25rem; margin-bottom: 1.25rem; }
.panel h3 { margin-bottom: 0.75rem; font-size: 1.05rem; }
table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; font-size: 0.9rem; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #e5e7eb; }
th { background: #f3f4f6; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.callout { padding: 0.6rem 0.8rem; border-radius: 4px; margin-bottom: 0.75rem; }
.callout.info { background: #eff6ff; color: #1e3a8a; }
.callout.error { background: #fef2f2; color: #991b1b; }
.chart { display: flex; flex-direction: column; gap: 0.35rem; }
.bar-group { display: grid; grid-template-columns: 12rem 1fr; gap: 0.5rem; align-items: center; }
.bar-label { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; font-size: 0.85rem; }
.bars { display: flex; flex-direction: column; gap: 2px; }
.bar { height: 1.1rem; min-width: 2px; border-radius: 2px; font-size: 0.7rem; color: #fff; padding-left: 0.3rem; white-space: nowrap; }
.s0 { background: #2563eb; } .s1 { background: #f59e0b; } .s2 { background: #10b981; } .s3 { background: #ef4444; }
.legend { display: flex; gap: 1rem; font-size: 0.8rem; }
.key { padding: 0 0.4rem; color: #fff; border-radius: 2px; }
footer { margin-top: 2rem; color: #6b7280; font-size: 0.8rem; }
"#
}
