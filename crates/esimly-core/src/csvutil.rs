// ── CSV helpers for stock upload & template download ──

use esimly_api::types::CsvTemplateDto;

/// Count the data rows of an uploaded CSV to pre-fill "total stock".
///
/// Split on newlines, drop blank lines, subtract the header row, floor
/// at zero. Known limitation: a quoted field containing embedded
/// newlines miscounts -- the server re-validates the true count on
/// import, so this stays a cheap approximation rather than a parser.
pub fn count_data_rows(csv_text: &str) -> u32 {
    let non_empty = csv_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count();
    u32::try_from(non_empty.saturating_sub(1)).unwrap_or(u32::MAX)
}

/// Assemble the server-provided template schema into downloadable CSV
/// text. The server defines the schema; the client only formats it.
pub fn template_to_csv(template: &CsvTemplateDto) -> String {
    let mut out = String::new();
    out.push_str(&join_row(&template.headers));
    out.push('\n');
    for row in &template.example {
        out.push_str(&join_row(row));
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a comma, quote, or newline.
fn join_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') || f.contains('\n') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_data_rows_excluding_header() {
        let csv = "pin,serial\n1111,SN1\n2222,SN2\n3333,SN3\n";
        assert_eq!(count_data_rows(csv), 3);
    }

    #[test]
    fn header_only_yields_zero_not_negative() {
        assert_eq!(count_data_rows("pin,serial\n"), 0);
        assert_eq!(count_data_rows("pin,serial"), 0);
        assert_eq!(count_data_rows(""), 0);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let csv = "pin,serial\n1111,SN1\n\n  \n2222,SN2\n";
        assert_eq!(count_data_rows(csv), 2);
    }

    #[test]
    fn template_round_trips_headers_and_examples() {
        let template = CsvTemplateDto {
            headers: vec!["pin".into(), "serial".into(), "notes".into()],
            example: vec![vec!["1234".into(), "SN001".into(), "batch, March".into()]],
        };
        let csv = template_to_csv(&template);
        assert_eq!(csv, "pin,serial,notes\n1234,SN001,\"batch, March\"\n");
    }
}
