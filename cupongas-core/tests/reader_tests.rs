use cupongas_core::error::SourceError;
use cupongas_core::locator;
use cupongas_core::reader::{read_workbook_bytes, CellValue};
use cupongas_core::source::{BytesSource, WorkbookSource};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Cell content for the mock workbook
enum MockCell {
    Text(&'static str),
    Number(f64),
    Blank,
}

use MockCell::{Blank, Number, Text};

fn col_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

// Helper to create a minimal valid XLSX payload for testing
fn create_mock_xlsx(sheets: &[(&str, Vec<Vec<MockCell>>)]) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    // 1. [Content_Types].xml
    zip.start_file("[Content_Types].xml", options)?;
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
    );
    for (i, _) in sheets.iter().enumerate() {
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }
    content_types.push_str("</Types>");
    zip.write_all(content_types.as_bytes())?;

    // 2. _rels/.rels
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

    // 3. xl/workbook.xml
    zip.start_file("xl/workbook.xml", options)?;
    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name,
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    zip.write_all(workbook_xml.as_bytes())?;

    // 4. xl/_rels/workbook.xml.rels
    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    let mut rels_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for (i, _) in sheets.iter().enumerate() {
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    rels_xml.push_str("</Relationships>");
    zip.write_all(rels_xml.as_bytes())?;

    // 5. sheets with inline-string and numeric cells
    for (i, (_name, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        let mut sheet_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row_idx, row) in rows.iter().enumerate() {
            sheet_xml.push_str(&format!(r#"<row r="{}">"#, row_idx + 1));
            for (col_idx, cell) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", col_letter(col_idx as u32), row_idx + 1);
                match cell {
                    Text(s) => sheet_xml.push_str(&format!(
                        r#"<c r="{cell_ref}" t="inlineStr"><is><t>{s}</t></is></c>"#
                    )),
                    Number(n) => {
                        sheet_xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#))
                    }
                    Blank => {}
                }
            }
            sheet_xml.push_str("</row>");
        }
        sheet_xml.push_str("</sheetData></worksheet>");
        zip.write_all(sheet_xml.as_bytes())?;
    }

    zip.finish()?;
    Ok(buffer.into_inner())
}

#[test]
fn test_read_workbook_from_bytes() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[(
        "GENERAL",
        vec![
            vec![Text("SISTEMA DE CUPONES DE GAS")],
            vec![],
            vec![Text("RUT AFILIADO"), Text("NOMBRES"), Text("05 KILOS")],
            vec![Text("12345678-5"), Text("ANA"), Number(2.0)],
        ],
    )])?;

    let workbook = read_workbook_bytes(&bytes, "mock")?;
    assert_eq!(workbook.sheet_names(), vec!["GENERAL"]);

    let sheet = workbook.sheet("GENERAL").unwrap();
    assert_eq!(
        sheet.cell(2, 0),
        Some(&CellValue::Text("RUT AFILIADO".to_string()))
    );
    assert_eq!(sheet.cell(3, 2), Some(&CellValue::Number(2.0)));
    assert!(sheet.cell(1, 0).is_none());

    Ok(())
}

#[test]
fn test_lookup_through_real_ingestion() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[(
        "GENERAL",
        vec![
            vec![Text("SISTEMA DE CUPONES DE GAS")],
            vec![],
            vec![
                Text("FECHA"),
                Text("RUT AFILIADO"),
                Text("NOMBRES"),
                Text("APELLIDOS"),
                Text("05 KILOS"),
                Text("11 KILOS"),
                Text("USADO EN EL MES"),
                Text("DISPONIBLE"),
            ],
            vec![
                Text("01-06-2025"),
                Text("12345678-5"),
                Text("ANA"),
                Text("SOLIS"),
                Number(2.0),
                Blank,
                Number(1.0),
                Number(3.0),
            ],
            vec![
                Text("05-06-2025"),
                Text("12.345.678-5"),
                Blank,
                Blank,
                Number(1.0),
                Number(1.0),
            ],
        ],
    )])?;

    let workbook = read_workbook_bytes(&bytes, "mock")?;

    let record = locator::find_coupons(&workbook, "12345678-5").unwrap();
    assert_eq!(record.nombres, "ANA");
    assert_eq!(record.apellidos, "SOLIS");
    assert_eq!(record.lipigas.kg5, 3.0);
    assert_eq!(record.lipigas.kg11, 1.0);
    assert_eq!(record.usado_en_el_mes, 1.0);
    assert_eq!(record.disponible, 3.0);

    assert!(locator::find_coupons(&workbook, "99999999-9").is_none());
    Ok(())
}

#[test]
fn test_zero_sheet_payload_is_rejected() -> anyhow::Result<()> {
    let bytes = create_mock_xlsx(&[])?;

    let source = BytesSource::new(bytes, "upload");
    match source.acquire() {
        // calamine may also reject the empty shell outright
        Err(SourceError::NoSheets) | Err(SourceError::Ingest(_)) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("sheetless payload should not be accepted"),
    }
    Ok(())
}
