//! # Report Formatting
//!
//! Human-readable renderings of [`SectionProperties`].
//!
//! Numbers use thousands separators with two decimals, right-aligned in a
//! 12-character column:
//!
//! ```text
//! **Basic Properties:**
//! • Area:                      20,000.00 mm²
//! • Perimeter:                    600.00 mm
//! • Centroid (X,Y):         ( 50.00, 100.00) mm
//! ```

use crate::analysis::SectionProperties;
use crate::components::capitalize;

/// Output flavour for [`format_properties`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Bold headings and `•` bullets
    #[default]
    Markdown,
    /// Plain headings and `*` bullets
    Plain,
}

impl ReportStyle {
    fn bullet(self) -> &'static str {
        match self {
            ReportStyle::Markdown => "•",
            ReportStyle::Plain => "*",
        }
    }

    fn heading(self, title: &str) -> String {
        match self {
            ReportStyle::Markdown => format!("**{}:**", title),
            ReportStyle::Plain => format!("{}:", title),
        }
    }
}

/// Format `value` with `decimals` decimals and comma thousands separators.
///
/// ```rust
/// use section_core::report::format_thousands;
///
/// assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_thousands(-950.0, 0), "-950");
/// ```
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn column(value: f64) -> String {
    format!("{:>12}", format_thousands(value, 2))
}

/// Render the full property report.
///
/// `reference_name` is the reference material identifier; it is capitalized
/// in the transformed-properties heading. The principal-axes block is
/// omitted when both principal moments are zero.
pub fn format_properties(props: &SectionProperties, reference_name: &str, style: ReportStyle) -> String {
    let b = style.bullet();
    let mut lines = Vec::with_capacity(24);

    lines.push(style.heading("Basic Properties"));
    lines.push(format!("{} Area:                   {} mm²", b, column(props.area)));
    lines.push(format!("{} Perimeter:              {} mm", b, column(props.perimeter)));
    lines.push(format!(
        "{} Centroid (X,Y):         ({:>6.2}, {:>6.2}) mm",
        b, props.centroid.x, props.centroid.y
    ));
    lines.push(String::new());

    lines.push(style.heading("Modulus-Weighted Properties"));
    lines.push(format!("{} E·Ixx:                  {} N·mm²", b, column(props.e_ixx)));
    lines.push(format!("{} E·Iyy:                  {} N·mm²", b, column(props.e_iyy)));
    lines.push(format!("{} E·Ixy:                  {} N·mm²", b, column(props.e_ixy)));
    lines.push(String::new());

    lines.push(style.heading(&format!(
        "Transformed Properties (Ref: {})",
        capitalize(reference_name)
    )));
    lines.push(format!("{} Transformed Ixx:        {} mm⁴", b, column(props.ixx)));
    lines.push(format!("{} Transformed Iyy:        {} mm⁴", b, column(props.iyy)));
    lines.push(format!("{} Transformed Ixy:        {} mm⁴", b, column(props.ixy)));
    lines.push(String::new());

    lines.push(style.heading("Section Moduli"));
    lines.push(format!("{} Transformed Zxx+ (T):   {} mm³", b, column(props.zxx_plus)));
    lines.push(format!("{} Transformed Zxx- (C):   {} mm³", b, column(props.zxx_minus)));
    lines.push(format!("{} Transformed Zyy+ (T):   {} mm³", b, column(props.zyy_plus)));
    lines.push(format!("{} Transformed Zyy- (C):   {} mm³", b, column(props.zyy_minus)));
    lines.push(String::new());

    if props.i1 != 0.0 || props.i2 != 0.0 {
        lines.push(style.heading("Principal Moments of Inertia"));
        lines.push(format!("{} I1:                     {} mm⁴", b, column(props.i1)));
        lines.push(format!("{} I2:                     {} mm⁴", b, column(props.i2)));
        lines.push(format!("{} Principal Angle:        {} degrees", b, column(props.phi)));
    }

    lines.join("\n")
}

/// Four-line summary: area, Ixx, Iyy and the governing section modulus.
pub fn summary_text(props: &SectionProperties) -> String {
    [
        format!("Area = {} mm²", format_thousands(props.area, 2)),
        format!("Ixx = {} mm⁴", format_thousands(props.ixx, 2)),
        format!("Iyy = {} mm⁴", format_thousands(props.iyy, 2)),
        format!(
            "Section Modulus = {} mm³",
            format_thousands(props.governing_section_modulus(), 2)
        ),
    ]
    .join("\n")
}
