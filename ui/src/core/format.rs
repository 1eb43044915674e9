//! Formatting helpers for values shown in the form, export, and report.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

use super::record::ManualData;

/// Number display without a trailing `.0`: whole values print as
/// integers, everything else as-is.
pub fn fmt_num(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Today's date as `YYYY-MM-DD`.
pub fn today() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Compact timestamp for export filenames.
pub fn timestamp_slug() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

/// `2026-08-06T…` → `2026-08-06`, tolerant of junk.
pub fn date_part(rfc3339: &str) -> String {
    OffsetDateTime::parse(rfc3339, &Rfc3339)
        .ok()
        .and_then(|ts| {
            ts.format(&format_description!("[year]-[month]-[day]"))
                .ok()
        })
        .unwrap_or_else(|| rfc3339.split('T').next().unwrap_or(rfc3339).to_string())
}

/// Derived results for the manual measurement boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualSummary {
    pub title: &'static str,
    pub label: &'static str,
    pub value: String,
}

pub fn manual_summaries(manual: &ManualData) -> Vec<ManualSummary> {
    let srp = manual.srp.force - manual.srp.tare;
    let mpu = manual.mpu.force - manual.mpu.tare;
    vec![
        ManualSummary {
            title: "Static Row Pull",
            label: "Resultat",
            value: format!("{srp:.0} N"),
        },
        ManualSummary {
            title: "Squat Power to Speed",
            label: "Vikt",
            value: format!("{} kg", fmt_num(manual.spts.kg)),
        },
        ManualSummary {
            title: "Max Press Push Up",
            label: "Resultat",
            value: format!("{mpu:.0} N"),
        },
        ManualSummary {
            title: "Blaze Pod Challenge",
            label: "Antal träffar",
            value: format!("{} st", fmt_num(manual.bpc.hits)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{BpcData, MpuData, SptsData, SrpData};

    #[test]
    fn whole_numbers_drop_the_fraction() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-3.0), "-3");
    }

    #[test]
    fn manual_results_subtract_tare() {
        let manual = ManualData {
            srp: SrpData {
                tare: 50.0,
                force: 420.0,
            },
            spts: SptsData { kg: 80.0 },
            mpu: MpuData {
                tare: 30.0,
                force: 210.0,
            },
            bpc: BpcData { hits: 41.0 },
        };
        let summaries = manual_summaries(&manual);
        assert_eq!(summaries[0].value, "370 N");
        assert_eq!(summaries[1].value, "80 kg");
        assert_eq!(summaries[2].value, "180 N");
        assert_eq!(summaries[3].value, "41 st");
    }

    #[test]
    fn date_part_handles_plain_dates() {
        assert_eq!(date_part("2026-08-06"), "2026-08-06");
        assert_eq!(date_part("2026-08-06T09:30:00Z"), "2026-08-06");
    }
}
