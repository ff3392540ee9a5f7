//! Small in-memory documents for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Maps two-byte codes 0x0020..0x007E to the same ASCII code points.
const IDENTITY_TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0020> <007E> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

#[derive(Clone, Copy)]
enum Font {
    /// Simple Type1 font with WinAnsi encoding.
    Helvetica,
    /// Type0 font with Identity-H encoding and a ToUnicode map.
    IdentityH { descriptor: bool },
}

impl Font {
    fn add_to(self, doc: &mut Document) -> ObjectId {
        match self {
            Font::Helvetica => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            }),
            Font::IdentityH { descriptor } => {
                let to_unicode_id = doc.add_object(Stream::new(
                    dictionary! {},
                    IDENTITY_TO_UNICODE.as_bytes().to_vec(),
                ));
                let mut cid_font = dictionary! {
                    "Type" => "Font",
                    "Subtype" => "CIDFontType2",
                    "BaseFont" => "Helvetica",
                    "CIDSystemInfo" => dictionary! {
                        "Registry" => Object::string_literal("Adobe"),
                        "Ordering" => Object::string_literal("Identity"),
                        "Supplement" => 0,
                    },
                    "DW" => 500,
                };
                if descriptor {
                    cid_font.set(
                        "FontDescriptor",
                        dictionary! {
                            "Type" => "FontDescriptor",
                            "FontName" => "Helvetica",
                            "Flags" => 32,
                            "FontBBox" => vec![(-166).into(), (-225).into(), 1000.into(), 931.into()],
                            "ItalicAngle" => 0,
                            "Ascent" => 718,
                            "Descent" => -207,
                            "CapHeight" => 718,
                            "StemV" => 88,
                        },
                    );
                }
                doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type0",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "Identity-H",
                    "DescendantFonts" => vec![Object::Dictionary(cid_font)],
                    "ToUnicode" => to_unicode_id,
                })
            }
        }
    }

    fn encode(self, text: &str) -> Object {
        match self {
            Font::Helvetica => Object::string_literal(text),
            Font::IdentityH { .. } => Object::String(
                text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
                StringFormat::Hexadecimal,
            ),
        }
    }
}

/// Build a PDF with one page per entry. Each `(x, y, text)` is drawn in
/// 10pt Helvetica.
pub(crate) fn pdf_with_pages(pages: &[&[(i64, i64, &str)]]) -> Vec<u8> {
    build_pdf(pages, Font::Helvetica)
}

/// One page drawn with a composite (Identity-H) font, text as two-byte codes.
pub(crate) fn identity_h_pdf(texts: &[(i64, i64, &str)]) -> Vec<u8> {
    build_pdf(&[texts], Font::IdentityH { descriptor: true })
}

/// Like [`identity_h_pdf`], but the descendant font has no FontDescriptor.
pub(crate) fn broken_cid_font_pdf(texts: &[(i64, i64, &str)]) -> Vec<u8> {
    build_pdf(&[texts], Font::IdentityH { descriptor: false })
}

fn build_pdf(pages: &[&[(i64, i64, &str)]], font: Font) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = font.add_to(&mut doc);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for texts in pages {
        let mut operations = Vec::new();
        for (x, y, text) in texts.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![font.encode(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("save pdf");
    data
}

/// Header fields, an item table and a footer, top to bottom.
pub(crate) const SAMPLE_INVOICE: &[(i64, i64, &str)] = &[
    (50, 760, "Invoice #: INV-1001"),
    (50, 745, "Date: 03/15/2024"),
    (50, 700, "Item"),
    (110, 700, "Description"),
    (300, 700, "Size"),
    (360, 700, "Qty"),
    (420, 700, "Unit Price"),
    (50, 685, "A-100"),
    (110, 685, "Widget A"),
    (300, 685, "750ML"),
    (360, 685, "2"),
    (420, 685, "9.99"),
    (50, 670, "B-200"),
    (110, 670, "Gizmo Deluxe"),
    (300, 670, "1.75L"),
    (360, 670, "1"),
    (420, 670, "24.50"),
    (50, 600, "Thank you for your business"),
];

/// A one-page vendor invoice with header fields and an item table.
pub(crate) fn sample_invoice_pdf() -> Vec<u8> {
    pdf_with_pages(&[SAMPLE_INVOICE])
}
