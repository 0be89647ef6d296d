//! End-to-end parsing tests against synthetic documents.

use psdfonts::psd::{fonts_in_document, Document, PsdError, Version};

use super::fixtures;

#[test]
fn parses_document_with_one_text_layer() {
    let bytes = fixtures::psd_with_fonts(&[&["MyriadPro-Regular"]]);
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(doc.header.version, Version::Psd);
    assert_eq!(doc.layer_count, 1);
    assert_eq!(doc.text_layers.len(), 1);
    assert_eq!(doc.text_layers[0].name, "text layer");

    let fonts = fonts_in_document(&doc).unwrap();
    assert_eq!(fonts, vec!["MyriadPro-Regular"]);
}

#[test]
fn parses_psb_document() {
    let engine = fixtures::engine_data_text(&["FuturaPT-Bold"], &[0]);
    let bytes = fixtures::document(true, &[("headline", Some(engine))]);
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(doc.header.version, Version::Psb);
    assert_eq!(
        fonts_in_document(&doc).unwrap(),
        vec!["FuturaPT-Bold"]
    );
}

#[test]
fn psb_wide_length_info_blocks_are_skipped() {
    // `Mtrn` is one of the keys whose block length widens to 64 bits in
    // PSB files; the type tool block after it must still be found.
    let block = fixtures::info_block(b"Mtrn", &[0u8; 9], true);
    let bytes = fixtures::document_with_info_blocks(true, &block, &["ArnoPro-Display"]);
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(doc.header.version, Version::Psb);
    assert_eq!(doc.text_layers.len(), 1);
    assert_eq!(fonts_in_document(&doc).unwrap(), vec!["ArnoPro-Display"]);
}

#[test]
fn odd_length_info_blocks_are_padded_to_even() {
    // A 3-byte payload is written with a pad byte; the next block must be
    // read from the padded offset, not one byte early.
    let block = fixtures::info_block(b"lclr", &[1, 2, 3], false);
    let bytes = fixtures::document_with_info_blocks(false, &block, &["Garamond"]);
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(fonts_in_document(&doc).unwrap(), vec!["Garamond"]);
}

#[test]
fn non_text_layers_are_ignored() {
    let engine = fixtures::engine_data_text(&["Helvetica"], &[0]);
    let bytes = fixtures::document(
        false,
        &[
            ("background", None),
            ("headline", Some(engine)),
            ("border", None),
        ],
    );
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(doc.layer_count, 3);
    assert_eq!(doc.text_layers.len(), 1);
    assert_eq!(doc.text_layers[0].name, "headline");
}

#[test]
fn fonts_across_layers_deduplicate() {
    let bytes = fixtures::psd_with_fonts(&[
        &["Helvetica", "Garamond"],
        &["Helvetica"],
    ]);
    let doc = Document::parse(&bytes).unwrap();

    assert_eq!(
        fonts_in_document(&doc).unwrap(),
        vec!["Helvetica", "Garamond"]
    );
}

#[test]
fn empty_document_has_no_fonts() {
    let doc = Document::parse(&fixtures::empty_psd()).unwrap();
    assert_eq!(doc.layer_count, 0);
    assert!(fonts_in_document(&doc).unwrap().is_empty());
}

#[test]
fn quoted_font_names_are_sanitized() {
    let bytes = fixtures::psd_with_fonts(&[&["'AdobeInvisFont'"]]);
    let doc = Document::parse(&bytes).unwrap();
    assert_eq!(fonts_in_document(&doc).unwrap(), vec!["AdobeInvisFont"]);
}

#[test]
fn truncated_document_fails_cleanly() {
    let mut bytes = fixtures::psd_with_fonts(&[&["Helvetica"]]);
    bytes.truncate(bytes.len() / 2);
    assert!(matches!(
        Document::parse(&bytes),
        Err(PsdError::UnexpectedEof { .. })
    ));
}

#[test]
fn garbage_is_rejected_at_the_signature() {
    assert!(matches!(
        Document::parse(b"GIF89a not a psd at all"),
        Err(PsdError::BadSignature(_))
    ));
}
