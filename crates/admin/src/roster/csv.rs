//! CSV rendering for the roster export.

use super::RosterRow;

/// Export column headers, in order.
pub const CSV_HEADER: [&str; 4] = ["Member Name", "Current Membership", "Member Code", "Status"];

/// Render roster rows as a CSV document, header included.
#[must_use]
pub fn render(rows: &[RosterRow]) -> String {
    let mut out = String::new();
    write_record(&mut out, CSV_HEADER.iter().copied());

    for row in rows {
        write_record(
            &mut out,
            [
                strip_tags(&row.name).as_str(),
                strip_tags(&row.plan).as_str(),
                row.member_code.as_str(),
                row.status.as_str(),
            ]
            .into_iter(),
        );
    }

    out
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Quote a field when it contains a delimiter, quote, or newline.
/// Embedded quotes are doubled per RFC 4180.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Remove HTML tags from a display value.
///
/// Plan and user names originate in a system that allowed markup in
/// them; the export wants plain text.
fn strip_tags(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_tag = false;
    for c in value.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
