use serde_json::Value;
use tickerboard_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(envelope)?),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<String, CliError> {
    let mut out = String::new();
    out.push_str(&format!("request_id  : {}\n", envelope.meta.request_id));
    out.push_str(&format!("schema      : {}\n", envelope.meta.schema_version));
    out.push_str(&format!("generated_at: {}\n", envelope.meta.generated_at));
    out.push_str(&format!("latency_ms  : {}\n", envelope.meta.latency_ms));

    if !envelope.meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &envelope.meta.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out.push_str("data:\n");
    match rows(&envelope.data) {
        Some(rows) => {
            for row in rows {
                out.push_str(&format!("  {row}\n"));
            }
        }
        None => {
            for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }

    if !envelope.errors.is_empty() {
        out.push_str("errors:\n");
        for error in &envelope.errors {
            out.push_str(&format!("  - {}: {}\n", error.code, error.message));
        }
    }

    Ok(out)
}

/// One line per record for the list-shaped payloads (`quotes`, `sectors`,
/// `instruments`); `None` for anything else.
fn rows(data: &Value) -> Option<Vec<String>> {
    if let Some(quotes) = data.get("quotes").and_then(Value::as_array) {
        return Some(
            quotes
                .iter()
                .map(|q| {
                    format!(
                        "{:<14} {:>12.2} {:>+10.2} {:>+8.2}%",
                        text(q, "name"),
                        number(q, "value"),
                        number(q, "change"),
                        number(q, "changePercent"),
                    )
                })
                .collect(),
        );
    }

    if let Some(sectors) = data.get("sectors").and_then(Value::as_array) {
        return Some(
            sectors
                .iter()
                .map(|s| format!("{:<24} {:>8}", text(s, "name"), text(s, "formatted")))
                .collect(),
        );
    }

    if let Some(instruments) = data.get("instruments").and_then(Value::as_array) {
        return Some(
            instruments
                .iter()
                .map(|i| {
                    format!(
                        "{:<14} {:<8} {:<10} base={:<8} vol={}",
                        text(i, "name"),
                        text(i, "symbol"),
                        text(i, "asset_class"),
                        number(i, "base_value"),
                        number(i, "volatility"),
                    )
                })
                .collect(),
        );
    }

    None
}

fn text<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("-")
}

fn number(record: &Value, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tickerboard_core::EnvelopeMeta;

    #[test]
    fn table_lists_one_row_per_quote() {
        let envelope = Envelope::success(
            EnvelopeMeta::generate(3),
            json!({"quotes": [
                {"name": "Gold", "value": 184.5, "change": -1.25, "changePercent": -0.67},
                {"name": "Silver", "value": 20.0, "change": 0.0, "changePercent": 0.0}
            ]}),
        );
        let table = render_table(&envelope).expect("renders");

        assert!(table.contains("latency_ms  : 3"));
        let gold = table.lines().find(|l| l.contains("Gold")).expect("gold row");
        assert!(gold.contains("184.50"));
        assert!(gold.contains("-0.67%"));
        assert!(table.lines().any(|l| l.contains("Silver")));
    }

    #[test]
    fn table_falls_back_to_pretty_json() {
        let envelope = Envelope::success(EnvelopeMeta::generate(0), json!({"user": null}));
        let table = render_table(&envelope).expect("renders");
        assert!(table.contains("\"user\": null"));
    }
}
