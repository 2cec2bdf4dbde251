//! End-to-end tests of the extraction pipeline.

mod common;

use std::fs;

use common::{build_pdf, TestPage, LETTER};
use tategaki::layout::{self, BreakRules, DocumentLeading, FULL_STOP};
use tategaki::render::segments_to_string;
use tategaki::{
    extract_bytes, extract_file, extract_source, Error, ExtractOptions, Extractor, PageSource,
    Result, Segment, TextBlock, Zone,
};

/// Pages held in memory.
#[derive(Default)]
struct MemorySource {
    pages: Vec<MemoryPage>,
}

struct MemoryPage {
    blocks: Vec<TextBlock>,
    annots: Vec<Zone>,
}

impl MemorySource {
    fn page(mut self, blocks: Vec<TextBlock>, annots: Vec<Zone>) -> Self {
        self.pages.push(MemoryPage { blocks, annots });
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn raw_blocks(&self, index: usize) -> Result<Vec<TextBlock>> {
        self.pages
            .get(index)
            .map(|p| p.blocks.clone())
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.pages.len() as u32))
    }

    fn annotation_rects(&self, index: usize) -> Result<Vec<Zone>> {
        self.pages
            .get(index)
            .map(|p| p.annots.clone())
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.pages.len() as u32))
    }
}

fn column(x: f32, text: &str) -> TextBlock {
    TextBlock::new(x, 10.0, x + 12.0, 150.0, text)
}

/// A landscape body zone plus an empty second zone, so the page layout is
/// accepted.
fn body_zones() -> Vec<Zone> {
    vec![
        Zone::new(0.0, 0.0, 300.0, 200.0),
        Zone::new(400.0, 0.0, 700.0, 200.0),
    ]
}

fn evenly_spaced_columns() -> Vec<TextBlock> {
    vec![column(80.0, "い"), column(58.0, "う。"), column(100.0, "あ")]
}

#[test]
fn test_close_columns_stay_in_one_paragraph() {
    let source = MemorySource::default().page(evenly_spaced_columns(), body_zones());

    let mut out = Vec::new();
    let stats = Extractor::default()
        .extract_document(&source, &mut out)
        .unwrap();

    assert!((stats.leading - 23.1).abs() < 1e-4);
    assert_eq!(segments_to_string(&out), "\n***Page 1:\nあいう。\n");
}

#[test]
fn test_wide_gap_breaks_paragraph() {
    // Page 1 fixes the document leading at 23.1; page 2 uses it.
    let source = MemorySource::default()
        .page(evenly_spaced_columns(), body_zones())
        .page(
            vec![column(100.0, "あ"), column(80.0, "い"), column(20.0, "う。")],
            Vec::new(),
        );

    let text = extract_source(&source, ExtractOptions::new().without_page_markers()).unwrap();
    assert_eq!(text, "あいう。\nあい\n\nう。\n");
}

#[test]
fn test_wide_gap_with_known_leading() {
    let blocks = vec![column(100.0, "あ"), column(80.0, "い"), column(20.0, "う。")];
    let zone = Zone::new(0.0, 0.0, 300.0, 200.0);
    let ordered = layout::select_and_order(&blocks, &zone);

    let mut leading = DocumentLeading::new();
    leading.resolve(&layout::select_and_order(&evenly_spaced_columns(), &zone), 0.05);

    let mut out: Vec<Segment> = Vec::new();
    let terminators = [FULL_STOP];
    let rules = BreakRules::new(leading.value(), &terminators);
    layout::emit(&ordered, &zone, &rules, &mut out).unwrap();

    assert_eq!(
        out,
        vec![
            Segment::Text("あ".into()),
            Segment::Text("い".into()),
            Segment::ParagraphBreak,
            Segment::Text("う。".into()),
            Segment::LineBreak,
        ]
    );
}

#[test]
fn test_portrait_zone_trailing_break() {
    let heading = TextBlock::new(105.0, 10.0, 115.0, 50.0, "見出し");
    let source = MemorySource::default().page(
        vec![heading],
        vec![
            Zone::new(100.0, 5.0, 130.0, 55.0),
            Zone::new(0.0, 0.0, 90.0, 40.0),
        ],
    );

    let text = extract_source(&source, ExtractOptions::default()).unwrap();
    assert_eq!(text, "\n***Page 1:\n見出し\n\n");
}

#[test]
fn test_zones_inherited_until_next_layout() {
    let source = MemorySource::default()
        // Cover page: a single annotation is not a layout.
        .page(vec![column(100.0, "表紙")], vec![Zone::new(0.0, 0.0, 300.0, 200.0)])
        .page(vec![column(100.0, "一。")], body_zones())
        .page(vec![column(100.0, "二。")], Vec::new())
        .page(
            vec![column(100.0, "三。"), column(450.0, "四。")],
            vec![
                Zone::new(400.0, 0.0, 700.0, 200.0),
                Zone::new(0.0, 0.0, 300.0, 200.0),
            ],
        );

    let text = extract_source(&source, ExtractOptions::default()).unwrap();
    assert_eq!(
        text,
        "\n***Page 1:\n\n***Page 2:\n一。\n\n***Page 3:\n二。\n\n***Page 4:\n四。\n三。\n"
    );
}

#[test]
fn test_min_zone_update_option() {
    let source = MemorySource::default().page(
        vec![column(100.0, "本文")],
        vec![Zone::new(0.0, 0.0, 300.0, 200.0)],
    );

    let options = ExtractOptions::new()
        .without_page_markers()
        .with_min_zone_update(1);
    assert_eq!(extract_source(&source, options).unwrap(), "本文");
}

#[test]
fn test_custom_sentence_terminators() {
    let source = MemorySource::default().page(
        vec![
            column(100.0, "本当？"),
            column(80.0, "はい。"),
            column(60.0, "そう"),
        ],
        body_zones(),
    );

    let default_text =
        extract_source(&source, ExtractOptions::new().without_page_markers()).unwrap();
    assert_eq!(default_text, "本当？はい。\nそう");

    let options = ExtractOptions::new()
        .without_page_markers()
        .with_sentence_terminators(['。', '？']);
    assert_eq!(extract_source(&source, options).unwrap(), "本当？\nはい。\nそう");
}

#[test]
fn test_newlines_inside_blocks_are_removed() {
    let source = MemorySource::default().page(
        vec![TextBlock::new(100.0, 10.0, 112.0, 150.0, "吾輩は\n猫で\r\nある。\n")],
        body_zones(),
    );

    let text = extract_source(&source, ExtractOptions::new().without_page_markers()).unwrap();
    assert_eq!(text, "吾輩は猫である。\n");
}

#[test]
fn test_extract_file_from_synthetic_pdf() {
    let page = TestPage::new()
        .zone([100.0, 100.0, 550.0, 750.0])
        .zone([20.0, 100.0, 90.0, 750.0])
        .column(500.0, 700.0, 10.0, "あいう。")
        .column(480.0, 700.0, 10.0, "えお");
    let pdf = build_pdf(vec![page], LETTER);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.pdf");
    let output = dir.path().join("novel.txt");
    fs::write(&input, &pdf).unwrap();

    let stats = extract_file(&input, &output).unwrap();
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.zones_written, 1);
    assert_eq!(stats.zones_empty, 1);
    assert_eq!(stats.blocks_written, 2);

    // Two columns leave the leading unknown, so any gap breaks the paragraph.
    // The body zone is taller than wide and gets the trailing blank line.
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, "\n***Page 1:\nあいう。\n\n\nえお\n\n");
    assert_eq!(extract_bytes(&pdf).unwrap(), text);
}

#[test]
fn test_text_under_cm_lands_in_its_zone() {
    let page = TestPage::new()
        .zone([400.0, 100.0, 550.0, 750.0])
        .zone([20.0, 100.0, 90.0, 750.0])
        .column_under_cm(
            [1.0, 0.0, 0.0, 1.0, 300.0, 0.0],
            200.0,
            700.0,
            10.0,
            "本文。",
        );
    let pdf = build_pdf(vec![page], LETTER);

    // The zone is taller than wide, so a blank line follows the text.
    assert_eq!(extract_bytes(&pdf).unwrap(), "\n***Page 1:\n本文。\n\n\n");
}

#[test]
fn test_extract_file_is_idempotent() {
    let page = TestPage::new()
        .zone([100.0, 100.0, 550.0, 750.0])
        .zone([20.0, 100.0, 90.0, 750.0])
        .column(500.0, 700.0, 10.0, "吾輩は猫である。")
        .column(480.0, 700.0, 10.0, "名前はまだ無い。")
        .column(460.0, 700.0, 10.0, "どこで生れたか");
    let pdf = build_pdf(vec![page, TestPage::new()], LETTER);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("novel.pdf");
    let output = dir.path().join("novel.txt");
    fs::write(&input, &pdf).unwrap();

    extract_file(&input, &output).unwrap();
    let first = fs::read(&output).unwrap();
    extract_file(&input, &output).unwrap();
    let second = fs::read(&output).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_output_truncated_on_rerun() {
    let pdf = build_pdf(vec![TestPage::new()], LETTER);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.pdf");
    let output = dir.path().join("out.txt");
    fs::write(&input, &pdf).unwrap();
    fs::write(&output, "stale content that is much longer than the new output").unwrap();

    extract_file(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "\n***Page 1:\n");
}

#[test]
fn test_bad_input_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "Not a PDF file at all").unwrap();

    let result = extract_file(&input, &output);
    assert!(matches!(result, Err(Error::UnknownFormat)));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract_file(dir.path().join("missing.pdf"), dir.path().join("out.txt"));
    assert!(matches!(result, Err(Error::Io(_))));
}
