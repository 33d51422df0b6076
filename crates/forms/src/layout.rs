//! The fixed layout of the referral form.
//!
//! The page is split into named sections so that a failure while drawing one of them does
//! not take the rest of the form down with it.

use crate::fields::{codes_text, or_placeholder, ReferralForm, NOT_PROVIDED};
use crate::page::{Element, Font, Rect, Rgb, TextStyle, PAGE_WIDTH_MM};
use crate::text::title_case;
use chrono::NaiveDateTime;

/// A named group of elements drawn as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: &'static str,
    pub elements: Vec<Element>,
}

impl Section {
    pub fn new(name: &'static str, elements: Vec<Element>) -> Self {
        Self { name, elements }
    }
}

/// The moment a form is generated; drives the date, reference number and filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStamp {
    generated_at: NaiveDateTime,
}

impl RenderStamp {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }

    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    fn hhmmss(&self) -> String {
        self.generated_at.format("%H%M%S").to_string()
    }

    /// `REF-<HHMMSS>`
    pub fn reference_number(&self) -> String {
        format!("REF-{}", self.hhmmss())
    }

    /// `medical_referral_<HHMMSS>.pdf`
    pub fn filename(&self) -> String {
        format!("medical_referral_{}.pdf", self.hhmmss())
    }

    /// Date printed on the form, `MM/DD/YYYY`.
    pub fn date(&self) -> String {
        self.generated_at.format("%m/%d/%Y").to_string()
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn form_box(x: f32, y: f32, w: f32, h: f32, label: &str, content: String) -> Element {
    Element::FormBox {
        rect: Rect::new(x, y, w, h),
        label: label.to_string(),
        content,
        multiline: false,
    }
}

fn text_box(x: f32, y: f32, w: f32, h: f32, label: &str, content: String) -> Element {
    Element::TextBox {
        rect: Rect::new(x, y, w, h),
        label: label.to_string(),
        content,
    }
}

fn text(x: f32, y: f32, w: f32, h: f32, content: &str, style: TextStyle) -> Element {
    Element::Text {
        rect: Rect::new(x, y, w, h),
        text: content.to_string(),
        style,
    }
}

/// Build every section of the referral form for `form`.
pub fn referral_sections(form: &ReferralForm, stamp: &RenderStamp) -> Vec<Section> {
    let date = stamp.date();
    let patient = |value: &Option<String>| or_placeholder(value, NOT_PROVIDED);

    vec![
        Section::new(
            "header",
            vec![
                Element::Band {
                    rect: Rect::new(0.0, 0.0, PAGE_WIDTH_MM, 30.0),
                    color: Rgb::LETTERHEAD,
                },
                text(
                    0.0,
                    4.0,
                    PAGE_WIDTH_MM,
                    14.0,
                    "MEDICAL REFERRAL FORM",
                    TextStyle::new(Font::Bold, 18.0)
                        .color(Rgb::WHITE)
                        .centered(),
                ),
                text(
                    0.0,
                    18.0,
                    PAGE_WIDTH_MM,
                    8.0,
                    "Healthcare Provider Network",
                    TextStyle::new(Font::Regular, 10.0)
                        .color(Rgb::WHITE)
                        .centered(),
                ),
            ],
        ),
        Section::new(
            "referral details",
            vec![
                form_box(8.0, 35.0, 88.0, 16.0, "DATE OF REFERRAL", date.clone()),
                form_box(
                    105.0,
                    35.0,
                    88.0,
                    16.0,
                    "REFERENCE NUMBER",
                    stamp.reference_number(),
                ),
            ],
        ),
        Section::new(
            "patient",
            vec![
                form_box(8.0, 54.0, 88.0, 16.0, "PATIENT NAME", patient(&form.patient_name)),
                form_box(105.0, 54.0, 40.0, 16.0, "AGE", patient(&form.age)),
                form_box(150.0, 54.0, 43.0, 16.0, "SEX", patient(&form.sex)),
                form_box(8.0, 73.0, 88.0, 16.0, "DATE OF BIRTH", patient(&form.dob)),
                form_box(
                    105.0,
                    73.0,
                    88.0,
                    16.0,
                    "INSURANCE PLAN",
                    or_placeholder(&form.insurance.plan, "Unknown"),
                ),
            ],
        ),
        Section::new(
            "coverage",
            vec![
                form_box(
                    8.0,
                    92.0,
                    88.0,
                    16.0,
                    "NETWORK STATUS",
                    or_placeholder(&form.insurance.status, "Unknown"),
                ),
                form_box(
                    105.0,
                    92.0,
                    88.0,
                    16.0,
                    "ESTIMATED COPAY",
                    or_placeholder(&form.insurance.copay, "N/A"),
                ),
            ],
        ),
        Section::new(
            "provider",
            vec![
                Element::FormBox {
                    rect: Rect::new(8.0, 111.0, 88.0, 18.0),
                    label: "REFERRING TO SPECIALIST".into(),
                    content: or_placeholder(&form.provider.name, "Unknown Provider"),
                    multiline: true,
                },
                form_box(
                    105.0,
                    111.0,
                    88.0,
                    18.0,
                    "SPECIALTY",
                    title_case(&or_placeholder(&form.specialty, NOT_PROVIDED)),
                ),
                form_box(
                    8.0,
                    132.0,
                    60.0,
                    16.0,
                    "NPI NUMBER",
                    or_placeholder(&form.provider.npi, "N/A"),
                ),
                form_box(
                    75.0,
                    132.0,
                    118.0,
                    16.0,
                    "CLINIC/PRACTICE",
                    or_placeholder(&form.provider.clinic, "Unknown Clinic"),
                ),
            ],
        ),
        Section::new(
            "clinical",
            vec![
                text_box(
                    8.0,
                    151.0,
                    185.0,
                    20.0,
                    "MAJOR COMPLAINT / SYMPTOMS",
                    form.major_complaint(),
                ),
                text_box(
                    8.0,
                    174.0,
                    185.0,
                    22.0,
                    "CLINICAL CONTEXT",
                    or_placeholder(&form.clinical_context, "See complaint above"),
                ),
            ],
        ),
        Section::new(
            "coding",
            vec![
                text_box(
                    8.0,
                    199.0,
                    185.0,
                    18.0,
                    "ANTICIPATED CPT CODES",
                    codes_text(&form.procedure_codes, "To be determined during consultation"),
                ),
                text_box(
                    8.0,
                    220.0,
                    185.0,
                    18.0,
                    "POTENTIAL ICD-10 CODES",
                    codes_text(
                        &form.diagnosis_codes,
                        "To be determined after specialist evaluation",
                    ),
                ),
            ],
        ),
        Section::new(
            "authorization",
            vec![
                form_box(8.0, 241.0, 60.0, 16.0, "URGENCY LEVEL", "Routine".into()),
                form_box(75.0, 241.0, 60.0, 16.0, "AUTHORIZATION", "Pending".into()),
                form_box(140.0, 241.0, 53.0, 16.0, "FOLLOW-UP", "Required".into()),
            ],
        ),
        Section::new(
            "signatures",
            vec![
                text(
                    8.0,
                    260.0,
                    185.0,
                    6.0,
                    "AUTHORIZATION & SIGNATURES",
                    TextStyle::new(Font::Bold, 9.0),
                ),
                form_box(
                    8.0,
                    268.0,
                    88.0,
                    16.0,
                    "REFERRING PROVIDER",
                    "Auto-Generated System".into(),
                ),
                form_box(105.0, 268.0, 88.0, 16.0, "DATE SIGNED", date),
                text(
                    8.0,
                    285.0,
                    185.0,
                    3.5,
                    "This referral was automatically generated by the referral routing system",
                    TextStyle::new(Font::Regular, 7.0),
                ),
                text(
                    8.0,
                    288.5,
                    185.0,
                    3.5,
                    "Requires physician review and authorization before processing",
                    TextStyle::new(Font::Regular, 7.0),
                ),
            ],
        ),
        Section::new(
            "footer",
            vec![text(
                0.0,
                292.0,
                PAGE_WIDTH_MM,
                4.0,
                &format!("Generated: {} | Page 1", stamp.timestamp()),
                TextStyle::new(Font::Italic, 8.0)
                    .color(Rgb::MUTED)
                    .centered(),
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::MedicalCode;
    use chrono::NaiveDate;

    fn stamp() -> RenderStamp {
        let at = NaiveDate::from_ymd_opt(2026, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 7))
            .expect("valid timestamp");
        RenderStamp::new(at)
    }

    fn content_of<'a>(sections: &'a [Section], label: &str) -> &'a str {
        sections
            .iter()
            .flat_map(|s| s.elements.iter())
            .find_map(|e| match e {
                Element::FormBox { label: l, content, .. }
                | Element::TextBox { label: l, content, .. }
                    if l == label =>
                {
                    Some(content.as_str())
                }
                _ => None,
            })
            .unwrap_or_else(|| panic!("no element labelled {label}"))
    }

    #[test]
    fn stamp_formats_reference_and_filename() {
        let stamp = stamp();
        assert_eq!(stamp.reference_number(), "REF-140507");
        assert_eq!(stamp.filename(), "medical_referral_140507.pdf");
        assert_eq!(stamp.date(), "03/09/2026");
        assert_eq!(stamp.timestamp(), "2026-03-09 14:05:07");
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let sections = referral_sections(&ReferralForm::default(), &stamp());
        assert_eq!(content_of(&sections, "PATIENT NAME"), "Not Provided");
        assert_eq!(content_of(&sections, "INSURANCE PLAN"), "Unknown");
        assert_eq!(content_of(&sections, "ESTIMATED COPAY"), "N/A");
        assert_eq!(
            content_of(&sections, "REFERRING TO SPECIALIST"),
            "Unknown Provider"
        );
        assert_eq!(
            content_of(&sections, "ANTICIPATED CPT CODES"),
            "To be determined during consultation"
        );
        assert_eq!(
            content_of(&sections, "POTENTIAL ICD-10 CODES"),
            "To be determined after specialist evaluation"
        );
        assert_eq!(
            content_of(&sections, "MAJOR COMPLAINT / SYMPTOMS"),
            "General consultation requested"
        );
    }

    #[test]
    fn diagnosis_list_is_capped_at_three() {
        let form = ReferralForm {
            diagnosis_codes: vec![
                MedicalCode::new("I25.10", "Atherosclerotic heart disease"),
                MedicalCode::new("R07.9", "Chest pain"),
                MedicalCode::new("R06.02", "Shortness of breath"),
                MedicalCode::new("R00.2", "Palpitations"),
                MedicalCode::new("R42", "Dizziness"),
            ],
            ..Default::default()
        };
        let sections = referral_sections(&form, &stamp());
        let text = content_of(&sections, "POTENTIAL ICD-10 CODES");
        assert!(text.contains("I25.10") && text.contains("R07.9") && text.contains("R06.02"));
        assert!(!text.contains("R00.2"));
        assert!(!text.contains("R42"));
    }

    #[test]
    fn specialty_is_title_cased() {
        let form = ReferralForm {
            specialty: Some("cardiology".into()),
            ..Default::default()
        };
        let sections = referral_sections(&form, &stamp());
        assert_eq!(content_of(&sections, "SPECIALTY"), "Cardiology");
    }

    #[test]
    fn reference_number_and_dates_come_from_stamp() {
        let sections = referral_sections(&ReferralForm::default(), &stamp());
        assert_eq!(content_of(&sections, "REFERENCE NUMBER"), "REF-140507");
        assert_eq!(content_of(&sections, "DATE OF REFERRAL"), "03/09/2026");
        assert_eq!(content_of(&sections, "DATE SIGNED"), "03/09/2026");
    }

    #[test]
    fn section_names_are_unique() {
        let sections = referral_sections(&ReferralForm::default(), &stamp());
        let mut names: Vec<_> = sections.iter().map(|s| s.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
