//! Spreadsheet export/import.
//!
//! The record flattens to a fixed list of label/value rows; the label
//! strings are the wire format and must match byte-for-byte in both
//! directions. Delivery is CSV: copied to the clipboard and downloaded on
//! web, written to the exports directory on desktop.

use super::format::fmt_num;
use super::record::{AssessmentRecord, AttemptsData, BalanceData, BilateralData, CmjData,
    ManualData, SideHopData, StrengthEntry, TiaData};
use super::side::ReferenceSide;

pub type Row = (String, String);

fn row(label: &str, value: impl Into<String>) -> Row {
    (label.to_string(), value.into())
}

fn num_row(label: &str, value: f64) -> Row {
    row(label, fmt_num(value))
}

/// Flattens a record to the fixed label/value row list. Only sections
/// present in the record contribute rows.
pub fn flatten_record(record: &AssessmentRecord) -> Vec<Row> {
    let mut rows = vec![
        row("Namn", record.patient_info.name.clone()),
        row("Datum", record.patient_info.date.clone()),
        row("Sport/Position", record.patient_info.sport_position.clone()),
        row("Skapad Av", record.patient_info.created_by.clone()),
        row("Referenstyp", record.patient_info.dominant_side_type.clone()),
        row("Referenssida", record.patient_info.dominant_side.label()),
    ];

    if let Some(balance) = &record.page1.balance {
        rows.extend([
            num_row("Balans - VÄ Score", balance.left_score),
            num_row("Balans - HÖ Score", balance.right_score),
            num_row("Balans - VÄ Gen. diff", balance.left_diff),
            num_row("Balans - HÖ Gen. diff", balance.right_diff),
            row("Balans - Kommentar", balance.comment.clone()),
            num_row("Balans - Asymmetri %", balance.asymmetry_percent),
        ]);
    }

    if let Some(cmj) = &record.page1.cmj {
        rows.extend([
            num_row("CMJ - VÄ Hopp 1", cmj.va_jumps[0]),
            num_row("CMJ - VÄ Hopp 2", cmj.va_jumps[1]),
            num_row("CMJ - VÄ Hopp 3", cmj.va_jumps[2]),
            num_row("CMJ - HÖ Hopp 1", cmj.ho_jumps[0]),
            num_row("CMJ - HÖ Hopp 2", cmj.ho_jumps[1]),
            num_row("CMJ - HÖ Hopp 3", cmj.ho_jumps[2]),
            row("CMJ - Kommentar", cmj.comment.clone()),
            num_row("CMJ - Asymmetri %", cmj.asymmetry_percent),
        ]);
    }

    if let Some(tia) = &record.page1.tia {
        rows.extend([
            num_row("TIA - VÄ Hopphöjd", tia.left_jump),
            num_row("TIA - HÖ Hopphöjd", tia.right_jump),
            num_row("TIA - VÄ GCT", tia.left_gct),
            num_row("TIA - HÖ GCT", tia.right_gct),
            row("TIA - Kommentar", tia.comment.clone()),
            num_row("TIA - Asymmetri %", tia.asymmetry_percent),
        ]);
    }

    if let Some(sidehop) = &record.page1.sidehop {
        rows.extend([
            num_row("Sidhopp - VÄ Antal", sidehop.left_count),
            num_row("Sidhopp - HÖ Antal", sidehop.right_count),
            row("Sidhopp - Kommentar", sidehop.comment.clone()),
            num_row("Sidhopp - Asymmetri %", sidehop.asymmetry_percent),
        ]);
    }

    if let Some(squat) = &record.page1.squat_analytics {
        rows.extend([
            num_row("Squat Analytics - Försök 1", squat.attempt1),
            num_row("Squat Analytics - Försök 2", squat.attempt2),
            num_row("Squat Analytics - Försök 3", squat.attempt3),
            row("Squat Analytics - Kommentar", squat.comment.clone()),
        ]);
    }

    if let Some(repeated) = &record.page1.repeated_bilateral {
        rows.extend([
            num_row("Repeated Bilateral - Gen. Hopphöjd", repeated.avg_height),
            num_row("Repeated Bilateral - Gen. GCT", repeated.avg_gct),
            row("Repeated Bilateral - Kommentar", repeated.comment.clone()),
        ]);
    }

    if let Some(cmj2ben) = &record.page1.cmj2ben {
        rows.extend([
            num_row("CMJ Två Ben - Försök 1", cmj2ben.attempt1),
            num_row("CMJ Två Ben - Försök 2", cmj2ben.attempt2),
            num_row("CMJ Två Ben - Försök 3", cmj2ben.attempt3),
            row("CMJ Två Ben - Kommentar", cmj2ben.comment.clone()),
        ]);
    }

    let strength = &record.page2.strength_tests;
    if let Some(hip) = &strength.hip_thrust {
        rows.extend([
            num_row("Styrka - Hip Thrust VÄ", hip.left),
            num_row("Styrka - Hip Thrust HÖ", hip.right),
            num_row("Styrka - Hip Thrust Två ben", hip.tva.unwrap_or(0.0)),
            row("Styrka - Hip Thrust Kommentar", hip.comment.clone()),
            num_row("Styrka - Hip Thrust Asymmetri %", hip.asymmetry_percent),
        ]);
    }

    if let Some(quads) = &strength.quadriceps {
        rows.extend([
            num_row("Styrka - Quadriceps VÄ", quads.left),
            num_row("Styrka - Quadriceps HÖ", quads.right),
            row("Styrka - Quadriceps Kommentar", quads.comment.clone()),
            num_row("Styrka - Quadriceps Asymmetri %", quads.asymmetry_percent),
        ]);
    }

    if let Some(handdrag) = &strength.staticsquat_handdrag {
        rows.extend([
            num_row("Styrka - Squat Handdrag VÄ", handdrag.left),
            num_row("Styrka - Squat Handdrag HÖ", handdrag.right),
            num_row("Styrka - Squat Handdrag Två ben", handdrag.both.unwrap_or(0.0)),
            row("Styrka - Squat Handdrag Kommentar", handdrag.comment.clone()),
            num_row(
                "Styrka - Squat Handdrag Asymmetri %",
                handdrag.asymmetry_percent,
            ),
        ]);
    }

    if let Some(hoftrem) = &strength.staticsquat_hoftrem {
        rows.extend([
            num_row("Styrka - Squat Höftrem VÄ", hoftrem.left),
            num_row("Styrka - Squat Höftrem HÖ", hoftrem.right),
            num_row("Styrka - Squat Höftrem Två ben", hoftrem.both.unwrap_or(0.0)),
            row("Styrka - Squat Höftrem Kommentar", hoftrem.comment.clone()),
            num_row(
                "Styrka - Squat Höftrem Asymmetri %",
                hoftrem.asymmetry_percent,
            ),
        ]);
    }

    if let Some(hamstring) = &strength.hamstring {
        rows.extend([
            num_row("Styrka - Hamstring VÄ", hamstring.left),
            num_row("Styrka - Hamstring HÖ", hamstring.right),
            row("Styrka - Hamstring Kommentar", hamstring.comment.clone()),
            num_row("Styrka - Hamstring Asymmetri %", hamstring.asymmetry_percent),
        ]);
    }

    if let Some(nordic) = &strength.nordic_hamstring {
        rows.extend([
            num_row("Styrka - Nordic Hamstring Försök 1", nordic.attempt1),
            num_row("Styrka - Nordic Hamstring Försök 2", nordic.attempt2),
            num_row("Styrka - Nordic Hamstring Försök 3", nordic.attempt3),
            row("Styrka - Nordic Hamstring Kommentar", nordic.comment.clone()),
        ]);
    }

    if let Some(manual) = &record.page2.manual {
        rows.extend([
            num_row("Manuell - SRP Tare", manual.srp.tare),
            num_row("Manuell - SRP Force", manual.srp.force),
            num_row("Manuell - SPTS kg", manual.spts.kg),
            num_row("Manuell - MPU Tare", manual.mpu.tare),
            num_row("Manuell - MPU Force", manual.mpu.force),
            num_row("Manuell - BPC Hits", manual.bpc.hits),
        ]);
    }

    rows
}

/// Parses rows back into the nested record. Unknown labels are ignored;
/// unparseable numbers default to zero. The imported record carries no
/// `activeTestIds`; population reconstructs the list from the data keys,
/// and every importable section is pre-created so they all render.
pub fn record_from_rows(rows: &[Row]) -> AssessmentRecord {
    let mut record = AssessmentRecord::default();
    record.page1.balance = Some(BalanceData::default());
    record.page1.cmj = Some(CmjData::default());
    record.page1.tia = Some(TiaData::default());
    record.page1.sidehop = Some(SideHopData::default());
    record.page1.squat_analytics = Some(AttemptsData::default());
    record.page1.repeated_bilateral = Some(BilateralData::default());
    record.page1.cmj2ben = Some(AttemptsData::default());
    let strength = &mut record.page2.strength_tests;
    strength.hip_thrust = Some(StrengthEntry::default());
    strength.quadriceps = Some(StrengthEntry::default());
    strength.staticsquat_handdrag = Some(StrengthEntry::default());
    strength.staticsquat_hoftrem = Some(StrengthEntry::default());
    strength.hamstring = Some(StrengthEntry::default());
    strength.nordic_hamstring = Some(AttemptsData::default());
    record.page2.manual = Some(ManualData::default());

    for (label, value) in rows {
        apply_row(&mut record, label, value);
    }

    record
}

fn parse_num(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

#[allow(clippy::too_many_lines)]
fn apply_row(record: &mut AssessmentRecord, label: &str, value: &str) {
    let n = parse_num(value);
    let s = value.to_string();

    // Patient header.
    match label {
        "Namn" => return record.patient_info.name = s,
        "Datum" => return record.patient_info.date = s,
        "Sport/Position" => return record.patient_info.sport_position = s,
        "Skapad Av" => return record.patient_info.created_by = s,
        "Referenstyp" => return record.patient_info.dominant_side_type = s,
        "Referenssida" => {
            return record.patient_info.dominant_side = ReferenceSide::from_label(value)
        }
        _ => {}
    }

    macro_rules! slot {
        ($slot:expr) => {
            if let Some(data) = $slot.as_mut() {
                data
            } else {
                return;
            }
        };
    }

    match label {
        "Balans - VÄ Score" => slot!(record.page1.balance).left_score = n,
        "Balans - HÖ Score" => slot!(record.page1.balance).right_score = n,
        "Balans - VÄ Gen. diff" => slot!(record.page1.balance).left_diff = n,
        "Balans - HÖ Gen. diff" => slot!(record.page1.balance).right_diff = n,
        "Balans - Kommentar" => slot!(record.page1.balance).comment = s,

        "CMJ - VÄ Hopp 1" => slot!(record.page1.cmj).va_jumps[0] = n,
        "CMJ - VÄ Hopp 2" => slot!(record.page1.cmj).va_jumps[1] = n,
        "CMJ - VÄ Hopp 3" => slot!(record.page1.cmj).va_jumps[2] = n,
        "CMJ - HÖ Hopp 1" => slot!(record.page1.cmj).ho_jumps[0] = n,
        "CMJ - HÖ Hopp 2" => slot!(record.page1.cmj).ho_jumps[1] = n,
        "CMJ - HÖ Hopp 3" => slot!(record.page1.cmj).ho_jumps[2] = n,
        "CMJ - Kommentar" => slot!(record.page1.cmj).comment = s,

        "TIA - VÄ Hopphöjd" => slot!(record.page1.tia).left_jump = n,
        "TIA - HÖ Hopphöjd" => slot!(record.page1.tia).right_jump = n,
        "TIA - VÄ GCT" => slot!(record.page1.tia).left_gct = n,
        "TIA - HÖ GCT" => slot!(record.page1.tia).right_gct = n,
        "TIA - Kommentar" => slot!(record.page1.tia).comment = s,

        "Sidhopp - VÄ Antal" => slot!(record.page1.sidehop).left_count = n,
        "Sidhopp - HÖ Antal" => slot!(record.page1.sidehop).right_count = n,
        "Sidhopp - Kommentar" => slot!(record.page1.sidehop).comment = s,

        "Squat Analytics - Försök 1" => slot!(record.page1.squat_analytics).attempt1 = n,
        "Squat Analytics - Försök 2" => slot!(record.page1.squat_analytics).attempt2 = n,
        "Squat Analytics - Försök 3" => slot!(record.page1.squat_analytics).attempt3 = n,
        "Squat Analytics - Kommentar" => slot!(record.page1.squat_analytics).comment = s,

        "Repeated Bilateral - Gen. Hopphöjd" => {
            slot!(record.page1.repeated_bilateral).avg_height = n
        }
        "Repeated Bilateral - Gen. GCT" => slot!(record.page1.repeated_bilateral).avg_gct = n,
        "Repeated Bilateral - Kommentar" => slot!(record.page1.repeated_bilateral).comment = s,

        "CMJ Två Ben - Försök 1" => slot!(record.page1.cmj2ben).attempt1 = n,
        "CMJ Två Ben - Försök 2" => slot!(record.page1.cmj2ben).attempt2 = n,
        "CMJ Två Ben - Försök 3" => slot!(record.page1.cmj2ben).attempt3 = n,
        "CMJ Två Ben - Kommentar" => slot!(record.page1.cmj2ben).comment = s,

        "Styrka - Hip Thrust VÄ" => slot!(record.page2.strength_tests.hip_thrust).left = n,
        "Styrka - Hip Thrust HÖ" => slot!(record.page2.strength_tests.hip_thrust).right = n,
        "Styrka - Hip Thrust Två ben" => {
            slot!(record.page2.strength_tests.hip_thrust).tva = Some(n)
        }
        "Styrka - Hip Thrust Kommentar" => {
            slot!(record.page2.strength_tests.hip_thrust).comment = s
        }
        "Styrka - Hip Thrust Asymmetri %" => {
            slot!(record.page2.strength_tests.hip_thrust).asymmetry_percent = n
        }

        "Styrka - Quadriceps VÄ" => slot!(record.page2.strength_tests.quadriceps).left = n,
        "Styrka - Quadriceps HÖ" => slot!(record.page2.strength_tests.quadriceps).right = n,
        "Styrka - Quadriceps Kommentar" => {
            slot!(record.page2.strength_tests.quadriceps).comment = s
        }

        "Styrka - Squat Handdrag VÄ" => {
            slot!(record.page2.strength_tests.staticsquat_handdrag).left = n
        }
        "Styrka - Squat Handdrag HÖ" => {
            slot!(record.page2.strength_tests.staticsquat_handdrag).right = n
        }
        "Styrka - Squat Handdrag Två ben" => {
            slot!(record.page2.strength_tests.staticsquat_handdrag).both = Some(n)
        }
        "Styrka - Squat Handdrag Kommentar" => {
            slot!(record.page2.strength_tests.staticsquat_handdrag).comment = s
        }

        "Styrka - Squat Höftrem VÄ" => {
            slot!(record.page2.strength_tests.staticsquat_hoftrem).left = n
        }
        "Styrka - Squat Höftrem HÖ" => {
            slot!(record.page2.strength_tests.staticsquat_hoftrem).right = n
        }
        "Styrka - Squat Höftrem Två ben" => {
            slot!(record.page2.strength_tests.staticsquat_hoftrem).both = Some(n)
        }
        "Styrka - Squat Höftrem Kommentar" => {
            slot!(record.page2.strength_tests.staticsquat_hoftrem).comment = s
        }

        "Styrka - Hamstring VÄ" => slot!(record.page2.strength_tests.hamstring).left = n,
        "Styrka - Hamstring HÖ" => slot!(record.page2.strength_tests.hamstring).right = n,
        "Styrka - Hamstring Kommentar" => {
            slot!(record.page2.strength_tests.hamstring).comment = s
        }

        "Styrka - Nordic Hamstring Försök 1" => {
            slot!(record.page2.strength_tests.nordic_hamstring).attempt1 = n
        }
        "Styrka - Nordic Hamstring Försök 2" => {
            slot!(record.page2.strength_tests.nordic_hamstring).attempt2 = n
        }
        "Styrka - Nordic Hamstring Försök 3" => {
            slot!(record.page2.strength_tests.nordic_hamstring).attempt3 = n
        }
        "Styrka - Nordic Hamstring Kommentar" => {
            slot!(record.page2.strength_tests.nordic_hamstring).comment = s
        }

        "Manuell - SRP Tare" => slot!(record.page2.manual).srp.tare = n,
        "Manuell - SRP Force" => slot!(record.page2.manual).srp.force = n,
        "Manuell - SPTS kg" => slot!(record.page2.manual).spts.kg = n,
        "Manuell - MPU Tare" => slot!(record.page2.manual).mpu.tare = n,
        "Manuell - MPU Force" => slot!(record.page2.manual).mpu.force = n,
        "Manuell - BPC Hits" => slot!(record.page2.manual).bpc.hits = n,

        _ => {}
    }
}

/// Rows as CSV with the fixed `Test,Verdi` header.
pub fn to_csv(rows: &[Row]) -> String {
    let mut csv = String::from("Test,Verdi\n");
    for (label, value) in rows {
        csv.push_str(&escape_csv(label));
        csv.push(',');
        csv.push_str(&escape_csv(value));
        csv.push('\n');
    }
    csv
}

fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Inverse of `to_csv`. Tolerates a missing header and quoted fields;
/// rows with fewer than two fields are dropped.
pub fn rows_from_csv(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    for (index, line) in split_csv_records(text).into_iter().enumerate() {
        let fields = split_csv_line(&line);
        if fields.len() < 2 {
            continue;
        }
        if index == 0 && fields[0] == "Test" && fields[1] == "Verdi" {
            continue;
        }
        rows.push((fields[0].clone(), fields[1].clone()));
    }
    rows
}

/// Splits on newlines that are outside quotes (comment fields may span
/// lines).
fn split_csv_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => {
                if !current.trim_end_matches('\r').is_empty() {
                    records.push(current.trim_end_matches('\r').to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim_end_matches('\r').is_empty() {
        records.push(current.trim_end_matches('\r').to_string());
    }
    records
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Suggested filename for an export.
pub fn export_filename(patient_name: &str, date: &str) -> String {
    let name = if patient_name.is_empty() {
        "patient"
    } else {
        patient_name
    };
    let date = if date.is_empty() {
        super::format::timestamp_slug()
    } else {
        date.to_string()
    };
    format!("Fysioscreen_Data_{name}_{date}.csv")
}

pub async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("window unavailable")?;
        let document = window.document().ok_or("document unavailable")?;
        let body = document.body().ok_or("missing body")?;

        let textarea = document
            .create_element("textarea")
            .map_err(|_| "Unable to create textarea")?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| "Textarea cast failed")?;
        textarea.set_value(&payload);
        let style = textarea.style();
        style.set_property("position", "fixed").ok();
        style.set_property("top", "0").ok();
        style.set_property("left", "0").ok();
        style.set_property("opacity", "0").ok();

        body.append_child(&textarea).ok();
        textarea.select();
        if !document.exec_command("copy").unwrap_or(false) {
            textarea.remove();
            return Err("Clipboard copy blocked".into());
        }
        textarea.remove();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use arboard::Clipboard;

        let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
        clipboard.set_text(payload).map_err(|err| err.to_string())
    }
}

/// Starts a download on web; writes into the exports directory on
/// desktop, returning the path.
pub async fn deliver_file(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let mut opts = BlobPropertyBag::new();
        opts.type_(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = std::fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("se", "Fysioscreen", "Fysioscreen")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AssessmentRecord {
        let mut record = AssessmentRecord::default();
        record.patient_info.name = "Alva Berg".into();
        record.patient_info.dominant_side = ReferenceSide::Left;
        record.page1.cmj = Some(CmjData {
            va_jumps: [30.0, 31.5, 29.0],
            ho_jumps: [28.0, 27.5, 28.5],
            comment: "Bra, fin form".into(),
            asymmetry_percent: -7.5,
        });
        record.page2.strength_tests.hip_thrust = Some(StrengthEntry {
            left: 95.0,
            right: 88.0,
            tva: Some(180.0),
            comment: "Stark".into(),
            asymmetry_percent: -7.4,
            active: true,
            ..Default::default()
        });
        record.page2.manual = Some(ManualData::default());
        record
    }

    #[test]
    fn labels_are_byte_exact() {
        let rows = flatten_record(&sample_record());
        let labels: Vec<&str> = rows.iter().map(|(label, _)| label.as_str()).collect();
        assert!(labels.contains(&"Referenssida"));
        assert!(labels.contains(&"CMJ - VÄ Hopp 1"));
        assert!(labels.contains(&"CMJ - Asymmetri %"));
        assert!(labels.contains(&"Styrka - Hip Thrust Två ben"));
        assert!(labels.contains(&"Manuell - BPC Hits"));
        // Sections absent from the record contribute nothing.
        assert!(!labels.contains(&"Balans - VÄ Score"));
    }

    #[test]
    fn export_import_round_trips_values() {
        let record = sample_record();
        let rows = flatten_record(&record);
        let imported = record_from_rows(&rows);

        assert_eq!(imported.patient_info.name, "Alva Berg");
        assert_eq!(imported.patient_info.dominant_side, ReferenceSide::Left);

        let cmj = imported.page1.cmj.unwrap();
        assert_eq!(cmj.va_jumps, [30.0, 31.5, 29.0]);
        assert_eq!(cmj.comment, "Bra, fin form");

        let hip = imported.page2.strength_tests.hip_thrust.unwrap();
        assert_eq!(hip.left, 95.0);
        assert_eq!(hip.tva, Some(180.0));
        assert_eq!(hip.asymmetry_percent, -7.4);
    }

    #[test]
    fn imported_records_pre_create_every_section() {
        let record = record_from_rows(&[]);
        assert!(record.page1.balance.is_some());
        assert!(record.page2.strength_tests.nordic_hamstring.is_some());
        assert!(record.page2.manual.is_some());
        assert!(record.active_test_ids.is_empty());
    }

    #[test]
    fn unknown_labels_and_bad_numbers_are_tolerated() {
        let rows = vec![
            ("Okänd etikett".to_string(), "42".to_string()),
            ("CMJ - VÄ Hopp 1".to_string(), "inte ett tal".to_string()),
        ];
        let record = record_from_rows(&rows);
        assert_eq!(record.page1.cmj.unwrap().va_jumps[0], 0.0);
    }

    #[test]
    fn csv_round_trips_including_quoted_fields() {
        let rows = vec![
            ("CMJ - Kommentar".to_string(), "Hopp, \"fin\" form\nrad två".to_string()),
            ("CMJ - VÄ Hopp 1".to_string(), "30".to_string()),
        ];
        let csv = to_csv(&rows);
        assert!(csv.starts_with("Test,Verdi\n"));
        let back = rows_from_csv(&csv);
        assert_eq!(back, rows);
    }
}
