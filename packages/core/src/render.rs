//! Locale-aware text rendering for results and history.
//!
//! The engine only ever produces [`Recommendation`] tags; every
//! user-facing string lives here, keyed by [`Locale`].

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{DerivedMetrics, FeeTable, Recommendation};
use crate::store::HistoryEntry;

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    fn texts(self) -> &'static Texts {
        match self {
            Locale::En => &EN,
            Locale::Es => &ES,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

struct Texts {
    analysis_results: &'static str,
    platform_fee: &'static str,
    earnings_after_fee: &'static str,
    total_operating_cost: &'static str,
    net_profit: &'static str,
    effective_hourly_rate: &'static str,
    profit_per_km: &'static str,
    meter_poor: &'static str,
    meter_excellent: &'static str,
    recent_calculations: &'static str,
    no_calculations: &'static str,
    history_cleared: &'static str,
    reject: (&'static str, &'static str),
    poor: (&'static str, &'static str),
    fair: (&'static str, &'static str),
    excellent: (&'static str, &'static str),
    reasoning_lose_money: &'static str,
    reasoning_below_rate: &'static str,
    reasoning_good: &'static str,
    platform_fees: &'static str,
    indrive_fee: &'static str,
    uber_fee: &'static str,
    custom_fee: &'static str,
    caller_supplied: &'static str,
}

static EN: Texts = Texts {
    analysis_results: "Analysis Results",
    platform_fee: "Platform Fee:",
    earnings_after_fee: "Earnings After Fee:",
    total_operating_cost: "Total Operating Cost:",
    net_profit: "Net Profit:",
    effective_hourly_rate: "Effective Hourly Rate:",
    profit_per_km: "Profit per Kilometer:",
    meter_poor: "Poor",
    meter_excellent: "Excellent",
    recent_calculations: "Recent Calculations",
    no_calculations: "No calculations yet",
    history_cleared: "Calculation history cleared",
    reject: ("❌ REJECT", "You will lose money on this ride"),
    poor: ("❌ POOR", "Below your acceptable hourly rate"),
    fair: ("⚠️ FAIR", "Meets your minimum requirements"),
    excellent: ("✅ EXCELLENT", "Highly profitable ride!"),
    reasoning_lose_money:
        "The operating costs exceed the offer amount. You would lose money accepting this ride.",
    reasoning_below_rate: "Your effective hourly rate is below your minimum acceptable rate.",
    reasoning_good:
        "This ride meets or exceeds your profitability criteria with a good hourly rate.",
    platform_fees: "Platform Fees",
    indrive_fee: "inDrive service commission",
    uber_fee: "Uber service fee",
    custom_fee: "Enter your platform's commission manually",
    caller_supplied: "custom",
};

static ES: Texts = Texts {
    analysis_results: "Resultados del Análisis",
    platform_fee: "Comisión de la Plataforma:",
    earnings_after_fee: "Ganancia tras Comisión:",
    total_operating_cost: "Costo Operativo Total:",
    net_profit: "Ganancia Neta:",
    effective_hourly_rate: "Tarifa Horaria Efectiva:",
    profit_per_km: "Ganancia por Kilómetro:",
    meter_poor: "Pobre",
    meter_excellent: "Excelente",
    recent_calculations: "Cálculos Recientes",
    no_calculations: "Aún no hay cálculos",
    history_cleared: "Historial de cálculos borrado",
    reject: ("❌ RECHAZAR", "Perderás dinero en este viaje"),
    poor: ("❌ POBRE", "Por debajo de tu tarifa horaria aceptable"),
    fair: ("⚠️ ACEPTABLE", "Cumple con tus requisitos mínimos"),
    excellent: ("✅ EXCELENTE", "¡Viaje muy rentable!"),
    reasoning_lose_money:
        "Los costos operativos superan el monto de la oferta. Perderías dinero aceptando este viaje.",
    reasoning_below_rate:
        "Tu tarifa horaria efectiva está por debajo de tu tarifa mínima aceptable.",
    reasoning_good:
        "Este viaje cumple o supera tus criterios de rentabilidad con una buena tarifa horaria.",
    platform_fees: "Comisiones de Plataforma",
    indrive_fee: "Comisión de servicio de inDrive",
    uber_fee: "Tarifa de servicio de Uber",
    custom_fee: "Ingresa manualmente la comisión de tu plataforma",
    caller_supplied: "personalizada",
};

fn label_parts(locale: Locale, rec: Recommendation) -> (&'static str, &'static str) {
    let t = locale.texts();
    match rec {
        Recommendation::Reject => t.reject,
        Recommendation::Poor => t.poor,
        Recommendation::Fair => t.fair,
        Recommendation::Excellent => t.excellent,
    }
}

/// `$` followed by two decimals.
pub fn format_money(amount: f64) -> String {
    // Avoid printing "-0.00".
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("${:.2}", amount)
}

/// Full recommendation line, e.g. `✅ EXCELLENT - Highly profitable ride!`.
pub fn recommendation_label(locale: Locale, rec: Recommendation) -> String {
    let (status, detail) = label_parts(locale, rec);
    format!("{} - {}", status, detail)
}

/// Short status head used in history lines.
pub fn status_label(locale: Locale, rec: Recommendation) -> &'static str {
    label_parts(locale, rec).0
}

/// One-sentence explanation of the verdict.
pub fn reasoning(locale: Locale, metrics: &DerivedMetrics, min_hourly_rate: f64) -> String {
    let t = locale.texts();
    if metrics.net_profit <= 0.0 {
        t.reasoning_lose_money.to_string()
    } else if metrics.effective_hourly_rate < min_hourly_rate {
        format!(
            "{} ({})",
            t.reasoning_below_rate,
            format_money(metrics.effective_hourly_rate)
        )
    } else {
        t.reasoning_good.to_string()
    }
}

/// Multi-line result panel.
pub fn render_result(
    locale: Locale,
    metrics: &DerivedMetrics,
    rec: Recommendation,
    min_hourly_rate: f64,
) -> String {
    let t = locale.texts();
    let mut out = String::new();

    let _ = writeln!(out, "{}", t.analysis_results);
    if metrics.platform_fee_amount > 0.0 {
        let _ = writeln!(out, "  {} {}", t.platform_fee, format_money(metrics.platform_fee_amount));
        let _ = writeln!(
            out,
            "  {} {}",
            t.earnings_after_fee,
            format_money(metrics.earnings_after_fee)
        );
    }
    let _ = writeln!(
        out,
        "  {} {}",
        t.total_operating_cost,
        format_money(metrics.total_operating_cost)
    );
    let _ = writeln!(out, "  {} {}", t.net_profit, format_money(metrics.net_profit));
    let _ = writeln!(
        out,
        "  {} {}/hr",
        t.effective_hourly_rate,
        format_money(metrics.effective_hourly_rate)
    );
    let _ = writeln!(
        out,
        "  {} {}/km",
        t.profit_per_km,
        format_money(metrics.profit_per_km)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", recommendation_label(locale, rec));
    let _ = writeln!(out, "{}", reasoning(locale, metrics, min_hourly_rate));
    let _ = writeln!(out, "{}", render_meter(locale, rec.score()));

    out
}

/// Text meter, e.g. `Poor [######----] Excellent 60%`.
pub fn render_meter(locale: Locale, score: u8) -> String {
    const WIDTH: usize = 10;
    let t = locale.texts();
    let filled = (usize::from(score.min(100)) * WIDTH + 50) / 100;
    format!(
        "{} [{}{}] {} {}%",
        t.meter_poor,
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        t.meter_excellent,
        score
    )
}

/// Recommendation behind a full display label such as
/// `❌ REJECT - You will lose money on this ride`, in either locale.
fn recommendation_from_label(label: &str) -> Option<Recommendation> {
    let head = label.split(" - ").next().unwrap_or_default().trim();
    [Locale::En, Locale::Es].into_iter().find_map(|locale| {
        Recommendation::ALL
            .into_iter()
            .find(|rec| status_label(locale, *rec) == head)
    })
}

fn entry_status(locale: Locale, entry: &HistoryEntry) -> String {
    let text = &entry.recommendation.text;
    match entry
        .recommendation
        .recommendation()
        .or_else(|| recommendation_from_label(text))
    {
        Some(rec) => status_label(locale, rec).to_string(),
        // Unrecognized labels keep their own head.
        None => text.split(" - ").next().unwrap_or_default().to_string(),
    }
}

/// One line per entry followed by its timestamp.
pub fn render_history(locale: Locale, entries: &[HistoryEntry]) -> String {
    let t = locale.texts();
    let mut out = String::new();
    let _ = writeln!(out, "{}", t.recent_calculations);

    if entries.is_empty() {
        let _ = writeln!(out, "  {}", t.no_calculations);
        return out;
    }

    for entry in entries {
        let _ = writeln!(
            out,
            "  {} - {}km - {:.2}/hr - {} [{}]",
            format_money(entry.offer_amount),
            entry.distance,
            entry.effective_hourly_rate,
            entry_status(locale, entry),
            entry.recommendation.class.as_str()
        );
        let _ = writeln!(out, "    {}", entry.timestamp);
    }
    out
}

pub fn history_cleared(locale: Locale) -> &'static str {
    locale.texts().history_cleared
}

/// Text for a preset's `description_key`, or the key itself if unknown.
pub fn preset_description(locale: Locale, key: &str) -> &str {
    let t = locale.texts();
    match key {
        "indriveFeeDescription" => t.indrive_fee,
        "uberFeeDescription" => t.uber_fee,
        "customFeeDescription" => t.custom_fee,
        other => other,
    }
}

/// Table of platform presets.
pub fn render_presets(locale: Locale, table: &FeeTable) -> String {
    let t = locale.texts();
    let mut out = String::new();
    let _ = writeln!(out, "{}", t.platform_fees);
    for preset in table.presets() {
        let fee = match preset.fee_percent {
            Some(fee) => format!("{:.2}%", fee),
            None => t.caller_supplied.to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<8} {:>12}  {}",
            preset.platform.as_str(),
            fee,
            preset_description(locale, preset.description_key)
        );
    }
    out
}
