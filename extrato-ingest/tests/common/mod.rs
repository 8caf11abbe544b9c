//! In-memory statement PDFs for the integration tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// One piece of text placed at an absolute position on the page.
pub struct Placed<'a> {
    pub x: i64,
    pub y: i64,
    pub text: &'a str,
}

pub fn at(x: i64, y: i64, text: &str) -> Placed<'_> {
    Placed { x, y, text }
}

/// How the page text is stored in the content stream.
#[derive(Clone, Copy)]
enum Font {
    /// Courier without an `/Encoding`; strings are the plain bytes.
    Courier,
    /// Two-byte glyph ids behind an Identity-H font with a `/ToUnicode`
    /// map, as embedded subset fonts are written.
    Identity,
}

/// Glyph id `n` maps to `U+0020 + (n - FIRST_GLYPH)`.
const FIRST_GLYPH: u16 = 3;

const TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0003> <0061> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

impl Font {
    fn show(self, text: &str) -> Object {
        match self {
            Font::Courier => Object::string_literal(text),
            Font::Identity => {
                let glyphs = text
                    .chars()
                    .flat_map(|c| (c as u16 - 0x20 + FIRST_GLYPH).to_be_bytes())
                    .collect();
                Object::String(glyphs, StringFormat::Hexadecimal)
            }
        }
    }
}

/// Build a PDF with one page per entry of `pages`, Courier 9pt.
pub fn statement_pdf(pages: &[Vec<Placed<'_>>]) -> Vec<u8> {
    render(pages, Font::Courier)
}

/// Like [`statement_pdf`], but the text is only readable through the
/// font's `/ToUnicode` map.
pub fn identity_font_pdf(pages: &[Vec<Placed<'_>>]) -> Vec<u8> {
    render(pages, Font::Identity)
}

fn render(pages: &[Vec<Placed<'_>>], font: Font) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = match font {
        Font::Courier => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        }),
        Font::Identity => {
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE.as_bytes().to_vec()));
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "ArialMT",
                "Encoding" => "Identity-H",
                "ToUnicode" => cmap_id,
            })
        }
    };
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for placed in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
        ];
        for p in placed {
            operations.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), p.x.into(), p.y.into()],
            ));
            operations.push(Operation::new("Tj", vec![font.show(p.text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
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
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A statement laid out as a table: one text run per cell.
pub fn table_statement() -> Vec<u8> {
    statement_pdf(&[table_page()])
}

/// [`table_statement`] drawn with an Identity-H font.
pub fn identity_font_table_statement() -> Vec<u8> {
    identity_font_pdf(&[table_page()])
}

fn table_page() -> Vec<Placed<'static>> {
    vec![
        at(40, 800, "Extrato de conta corrente"),
        at(40, 760, "Data"),
        at(110, 760, "Descricao"),
        at(330, 760, "Credito"),
        at(410, 760, "Debito"),
        at(490, 760, "Saldo"),
        at(40, 745, "15/12/2025"),
        at(110, 745, "CREDITO DE SALARIO ACME LTDA"),
        at(330, 745, "1.350,00"),
        at(490, 745, "1.350,00"),
        at(40, 730, "17/12/2025"),
        at(110, 730, "PIX ENVIADO STRIPE BRASIL"),
        at(410, 730, "119,90"),
        at(490, 730, "1.230,10"),
    ]
}

/// The table of [`table_statement`] continued over two more pages that
/// do not repeat the header and leave the credit column empty.
pub fn continued_table_statement() -> Vec<u8> {
    statement_pdf(&[
        vec![
            at(40, 800, "Extrato de conta corrente"),
            at(40, 760, "Data"),
            at(110, 760, "Descricao"),
            at(330, 760, "Credito"),
            at(410, 760, "Debito"),
            at(490, 760, "Saldo"),
            at(40, 745, "15/12/2025"),
            at(110, 745, "CREDITO DE SALARIO ACME LTDA"),
            at(330, 745, "1.350,00"),
            at(490, 745, "1.350,00"),
            at(40, 730, "17/12/2025"),
            at(110, 730, "PIX ENVIADO STRIPE BRASIL"),
            at(410, 730, "119,90"),
            at(490, 730, "1.230,10"),
            at(40, 60, "Pagina 1 de 3"),
        ],
        vec![
            at(40, 800, "Extrato de conta corrente (continuacao)"),
            at(40, 760, "18/12/2025"),
            at(110, 760, "COMPRA CARTAO PADARIA PAO QUENTE"),
            at(410, 760, "12,50"),
            at(490, 760, "1.217,60"),
            at(40, 745, "19/12/2025"),
            at(110, 745, "PAGAMENTO BOLETO ENERGIA"),
            at(410, 745, "230,00"),
            at(490, 745, "987,60"),
            at(40, 60, "Pagina 2 de 3"),
        ],
        vec![
            at(40, 800, "Extrato de conta corrente (continuacao)"),
            at(40, 760, "20/12/2025"),
            at(110, 760, "PIX ENVIADO MERCADO CENTRAL"),
            at(410, 760, "80,00"),
            at(490, 760, "907,60"),
            at(40, 60, "Pagina 3 de 3"),
        ],
    ])
}

/// A statement whose lines are single runs, so no table can be detected.
pub fn line_statement() -> Vec<u8> {
    statement_pdf(&[
        vec![
            at(40, 800, "Extrato de conta corrente"),
            at(
                40,
                760,
                "15/12/2025 CREDITO DE SALARIO ACME LTDA        000000    000000      1.350,00      0,00   1.350,00",
            ),
        ],
        vec![at(
            40,
            760,
            "17/12/2025 PIX ENVIADO STRIPE BRASIL SOLUCOES DE 000000  000000      0,00      119,90  -2.636,87",
        )],
    ])
}
