use chrono::NaiveDate;
use docket_core::{
    cutoff_date, parse_lenient, DocketExtractor, ExtractOptions, Presentation, Shape, Slide,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn extractor(months_back: u32) -> DocketExtractor {
    DocketExtractor::new(
        ExtractOptions::new()
            .with_months_back(months_back)
            .with_today(today()),
    )
    .unwrap()
}

fn family_deck() -> Presentation {
    let mut presentation = Presentation::new("family.pptx");

    let mut slide1 = Slide::new(1);
    slide1.add_shape(Shape::text("LEGEND\nGranted\nPending\nAbandoned"));
    slide1.add_shape(Shape::Group(vec![
        Shape::text("2018-LOW-68327-13\nUS 16/201,375 US\nResponse due 03/15/2027"),
        Shape::Group(vec![
            Shape::Other,
            Shape::text("PCT/US2023/012345\nWO2024/001122\nNational phase 11/30/2026"),
        ]),
    ]));
    slide1.add_shape(Shape::text("Meeting notes 01/10/2027"));
    presentation.add_slide(slide1);

    let mut slide2 = Slide::new(2);
    slide2.add_shape(Shape::text("01330-0004-00US\nIDS due 01/05/2026\nOA due 10/20/2026"));
    slide2.add_shape(Shape::text("0509.003US\nFiled 02/02/2025"));
    slide2.add_shape(Shape::Other);
    presentation.add_slide(slide2);

    presentation
}

#[test]
fn test_full_deck_extraction() {
    let records = extractor(0).extract(&family_deck());

    let summary: Vec<(usize, Option<&str>, &str)> = records
        .iter()
        .map(|r| (r.slide, r.docket_number.as_deref(), r.due_dates.as_str()))
        .collect();

    assert_eq!(
        summary,
        vec![
            (2, Some("01330-0004-00US"), "10/20/2026"),
            (1, None, "11/30/2026"),
            (1, Some("2018-LOW-68327-13"), "03/15/2027"),
        ]
    );

    let pct = &records[1];
    assert_eq!(pct.pct_number.as_deref(), Some("PCT/US2023/012345"));
    assert_eq!(pct.wipo_number.as_deref(), Some("WO2024/001122"));

    let us = &records[2];
    assert_eq!(us.application_number.as_deref(), Some("16/201375 US"));
    assert_eq!(
        us.textbox_content,
        "2018-LOW-68327-13\nUS 16/201,375 US\nResponse due 03/15/2027"
    );
    assert!(records.iter().all(|r| r.filename == "family.pptx"));
}

#[test]
fn test_every_reported_date_respects_cutoff() {
    for months_back in [0, 1, 12, 24] {
        let cutoff = cutoff_date(today(), months_back);
        let records = extractor(months_back).extract(&family_deck());

        for record in &records {
            for date in record.due_dates.split("; ") {
                let parsed = parse_lenient(date, today()).unwrap();
                assert!(parsed >= cutoff, "{} before {}", parsed, cutoff);
            }
        }
    }
}

#[test]
fn test_lookback_adds_past_entries() {
    let records = extractor(24).extract(&family_deck());

    let filed = records
        .iter()
        .find(|r| r.docket_number.as_deref() == Some("0509.003US"))
        .unwrap();
    assert_eq!(filed.due_dates, "02/02/2025");
    assert_eq!(records[0].docket_number.as_deref(), Some("0509.003US"));

    let ids = records
        .iter()
        .find(|r| r.docket_number.as_deref() == Some("01330-0004-00US"))
        .unwrap();
    assert_eq!(ids.due_dates, "01/05/2026; 10/20/2026");
}

#[test]
fn test_textbox_without_identifier_never_appears() {
    let records = extractor(24).extract(&family_deck());

    assert!(records
        .iter()
        .all(|r| !r.textbox_content.contains("Meeting notes")));
}

#[test]
fn test_empty_presentation() {
    let records = extractor(0).extract(&Presentation::new("empty.pptx"));
    assert!(records.is_empty());
}
