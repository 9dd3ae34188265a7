use colored::Colorize;
use serde_json::Value;

pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::blocking::Response, String> {
        let url = format!("{}{}", self.base, path);
        self.http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| format!("request failed: {e}"))
    }
}

/// Query pairs for `/predict_fare`; omitted options are left to the gate's
/// defaults.
pub fn predict_query(
    pickup: Option<&str>,
    dropoff: Option<&str>,
    passengers: Option<f64>,
) -> Vec<(&'static str, String)> {
    let mut q = Vec::new();
    if let Some(p) = pickup {
        q.push(("pickup_location", p.trim().to_string()));
    }
    if let Some(d) = dropoff {
        q.push(("dropoff_location", d.trim().to_string()));
    }
    if let Some(n) = passengers {
        q.push(("passenger_count", n.to_string()));
    }
    q
}

// ── predict ─────────────────────────────────────────────────────

pub fn predict(
    client: &Client,
    pickup: Option<&str>,
    dropoff: Option<&str>,
    passengers: Option<f64>,
    raw: bool,
) -> Result<(), String> {
    let resp = client.get("/predict_fare", &predict_query(pickup, dropoff, passengers))?;
    let status = resp.status();
    let json: Value = resp.json().map_err(|e| format!("parse response: {e}"))?;

    if !status.is_success() {
        let detail = json
            .get("message")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        return Err(format!("HTTP {}: {detail}", status.as_u16()));
    }

    if raw {
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    let fare = json.get("fare").map(render_fare).unwrap_or_else(|| "?".into());
    println!("{} {}", "Fare:  ".dimmed(), fare.green().bold());
    if let Some(params) = json.get("params").and_then(|p| p.as_object()) {
        for (k, v) in params {
            println!("  {:<18} {}", k.dimmed(), v);
        }
    }
    Ok(())
}

/// Numbers get two decimals; anything else the model returns is shown as JSON.
pub fn render_fare(v: &Value) -> String {
    match v.as_f64() {
        Some(n) => format!("${n:.2}"),
        None => v.to_string(),
    }
}

// ── health ──────────────────────────────────────────────────────

pub fn health(client: &Client) -> Result<(), String> {
    let resp = client.get("/", &[])?;
    let status = resp.status();
    let body = resp.text().map_err(|e| format!("parse: {e}"))?;

    if status.is_success() && body.trim() == "OK" {
        println!("{} {}", "●".green(), "OK".green().bold());
        Ok(())
    } else {
        println!("{} gate unhealthy (HTTP {})", "●".red(), status.as_u16());
        Err(format!("HTTP {}: {}", status.as_u16(), body.trim()))
    }
}
