//! Synthetic PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};

/// US Letter, inherited by pages without their own media box.
pub const LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// One page of a synthetic document.
#[derive(Default)]
pub struct TestPage {
    pub operations: Vec<Operation>,
    /// (Subtype, Rect) of each annotation, in order.
    pub annots: Vec<(&'static str, [f32; 4])>,
    pub media_box: Option<[f32; 4]>,
    /// (Matrix, operators) of each form XObject drawn by the page.
    pub forms: Vec<([f32; 6], Vec<Operation>)>,
}

impl TestPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` as one vertical run starting at (x, y) in user space.
    pub fn column(mut self, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.operations.extend(vertical_run(x, y, size, text));
        self
    }

    /// Show ASCII `text` horizontally with its baseline at (x, y).
    pub fn line(mut self, x: f32, y: f32, size: f32, text: &str) -> Self {
        self.operations.extend(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Real(size)]),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    /// Show a vertical run under a `cm` transformation.
    pub fn column_under_cm(mut self, cm: [f32; 6], x: f32, y: f32, size: f32, text: &str) -> Self {
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new("cm", reals(&cm)));
        self.operations.extend(vertical_run(x, y, size, text));
        self.operations.push(Operation::new("Q", vec![]));
        self
    }

    /// Show a vertical run inside a form XObject with the given /Matrix.
    pub fn column_in_form(mut self, matrix: [f32; 6], x: f32, y: f32, size: f32, text: &str) -> Self {
        let name = format!("Fm{}", self.forms.len());
        self.forms.push((matrix, vertical_run(x, y, size, text)));
        self.operations.extend(vec![
            Operation::new("q", vec![]),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        self
    }

    pub fn annot(mut self, subtype: &'static str, rect: [f32; 4]) -> Self {
        self.annots.push((subtype, rect));
        self
    }

    /// Markup annotation (the kind that marks a zone).
    pub fn zone(self, rect: [f32; 4]) -> Self {
        self.annot("Square", rect)
    }

    pub fn media_box(mut self, media_box: [f32; 4]) -> Self {
        self.media_box = Some(media_box);
        self
    }
}

/// Operators showing `text` in the vertical font, as UTF-16BE with a BOM.
pub fn vertical_run(x: f32, y: f32, size: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["V1".into(), Object::Real(size)]),
        Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(utf16be(text), StringFormat::Hexadecimal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

pub fn utf16be(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn rect_object(rect: [f32; 4]) -> Object {
    Object::Array(reals(&rect))
}

fn font_resources(courier: ObjectId, mincho: ObjectId) -> lopdf::Dictionary {
    dictionary! {
        "F1" => courier,
        "V1" => mincho,
    }
}

/// Build a PDF whose pages inherit `media_box` and share a Courier font
/// (`F1`) and a vertical CJK font (`V1`).
pub fn build_pdf(pages: Vec<TestPage>, media_box: [f32; 4]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let courier = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let mincho = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "HeiseiMin-W3",
        "Encoding" => "UniJIS-UCS2-V",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_resources(courier, mincho),
    });

    let count = pages.len() as i64;
    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content = Content {
            operations: page.operations,
        };
        let content_id = doc.add_object(lopdf::Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let mut annots: Vec<Object> = Vec::new();
        for (subtype, rect) in page.annots {
            let id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => subtype,
                "Rect" => rect_object(rect),
            });
            annots.push(id.into());
        }

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        if !page.forms.is_empty() {
            let mut xobjects = lopdf::Dictionary::new();
            for (i, (matrix, operations)) in page.forms.into_iter().enumerate() {
                let form = lopdf::Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Form",
                        "BBox" => rect_object(media_box),
                        "Matrix" => reals(&matrix),
                        "Resources" => dictionary! {
                            "Font" => font_resources(courier, mincho),
                        },
                    },
                    Content { operations }.encode().unwrap(),
                );
                xobjects.set(format!("Fm{}", i), doc.add_object(form));
            }
            page_dict.set(
                "Resources",
                dictionary! {
                    "Font" => font_resources(courier, mincho),
                    "XObject" => xobjects,
                },
            );
        }
        if let Some(own) = page.media_box {
            page_dict.set("MediaBox", rect_object(own));
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => rect_object(media_box),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
