use std::sync::Arc;

use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use super::pdf::{PageBox, PageGeometry, page_media_box, page_visible_box};
use super::*;
use crate::document::test_support::pdf_with_pages;
use crate::editor::coords::PercentRect;
use crate::masks::{CropMargins, EdgeDirection, EdgeSnapshot, FillType, Mask, MaskId};

fn solid(id: u64, page: Option<usize>, color: &str) -> Mask {
    Mask::solid(MaskId(id), PercentRect::new(10.0, 10.0, 20.0, 5.0), color, page)
}

fn clone_top(id: u64, page: Option<usize>, with_snapshot: bool) -> Mask {
    let mut mask = solid(id, page, "#000000");
    mask.fill_type = FillType::CloneTop;
    if with_snapshot {
        mask.image_snapshot = Some(Arc::new(EdgeSnapshot {
            direction: EdgeDirection::Top,
            strip: RgbaImage::from_pixel(8, 1, Rgba([40, 80, 120, 255])),
        }));
    }
    mask
}

/// Content stream text of each page, in page order
fn page_contents(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// A one-page document (MediaBox 0 0 595 842) after `edit` has changed its page
fn pdf_with_edited_page(edit: impl FnOnce(&mut Document, ObjectId)) -> Vec<u8> {
    let mut doc = Document::load_mem(&pdf_with_pages(1)).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    edit(&mut doc, page_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn set_page_entry(doc: &mut Document, page_id: ObjectId, key: &str, value: Object) {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set(key, value);
}

fn box_object(values: [i64; 4]) -> Object {
    Object::Array(values.into_iter().map(Object::Integer).collect())
}

fn page_box_values(doc: &Document, page_id: ObjectId, key: &[u8]) -> Vec<f32> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .and_then(|d| d.get(key))
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|o| match o {
            Object::Real(f) => *f,
            Object::Integer(i) => *i as f32,
            other => panic!("unexpected {:?}", other),
        })
        .collect()
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-2, "{:?} != {:?}", actual, expected);
    }
}

fn upright(visible: PageBox) -> PageGeometry {
    PageGeometry {
        visible,
        rotation: 0,
    }
}

#[test]
fn test_global_and_page_masks_grouped_per_page() {
    let masks = vec![solid(1, None, "#FF0000"), clone_top(2, Some(1), true)];
    let out = export_with_masks(&pdf_with_pages(3), &masks).unwrap();
    let pages = page_contents(&out);

    assert_eq!(pages.len(), 3);
    for (index, content) in pages.iter().enumerate() {
        assert_eq!(count(content, " re\n"), 1, "page {}", index + 1);
    }
    assert_eq!(count(&pages[0], " Do\n"), 0);
    assert_eq!(count(&pages[1], " Do\n"), 1);
    assert_eq!(count(&pages[2], " Do\n"), 0);
}

#[test]
fn test_solid_fill_uses_mask_color() {
    let out = export_with_masks(&pdf_with_pages(1), &[solid(1, None, "#FF0000")]).unwrap();
    let content = &page_contents(&out)[0];
    assert!(content.contains("1.0000 0.0000 0.0000 rg"));
}

#[test]
fn test_malformed_color_exports_white() {
    let out = export_with_masks(&pdf_with_pages(1), &[solid(1, None, "not-a-color")]).unwrap();
    let content = &page_contents(&out)[0];
    assert!(content.contains("1.0000 1.0000 1.0000 rg"));
}

#[test]
fn test_clone_without_snapshot_falls_back_to_solid() {
    let out = export_with_masks(&pdf_with_pages(2), &[clone_top(1, Some(0), false)]).unwrap();
    let pages = page_contents(&out);
    assert_eq!(count(&pages[0], " re\n"), 1);
    assert_eq!(count(&pages[0], " Do\n"), 0);
    assert_eq!(count(&pages[1], " re\n"), 0);
}

#[test]
fn test_mask_rect_maps_top_left_percent_to_user_space() {
    let media = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 200.0,
        ury: 100.0,
    };
    let (x, y, w, h) = upright(media).mask_rect(&solid(1, None, "#000000"));
    assert_eq!((x, w, h), (20.0, 40.0, 5.0));
    // Top edge 10% down from the top: 100 - 10 - 5
    assert_eq!(y, 85.0);
}

#[test]
fn test_snapshot_image_registered_with_inherited_resources() {
    // Put shared resources on the page tree root so pages inherit them
    let mut doc = Document::load_mem(&pdf_with_pages(2)).unwrap();
    let first_page = *doc.get_pages().values().next().unwrap();
    let pages_id = doc
        .get_object(first_page)
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Parent"))
        .and_then(Object::as_reference)
        .unwrap();
    doc.get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Resources", dictionary! { "Font" => dictionary! {} });
    let mut source = Vec::new();
    doc.save_to(&mut source).unwrap();

    let out = export_with_masks(&source, &[clone_top(7, Some(0), true)]).unwrap();
    let exported = Document::load_mem(&out).unwrap();
    let page_id = *exported.get_pages().values().next().unwrap();
    let resources = exported
        .get_object(page_id)
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Resources"))
        .and_then(Object::as_dict)
        .unwrap();

    assert!(resources.get(b"Font").is_ok());
    let xobjects = resources.get(b"XObject").and_then(Object::as_dict).unwrap();
    assert!(xobjects.get(b"SlideMask7").is_ok());
}

#[test]
fn test_margin_export_shrinks_boxes() {
    let margins = CropMargins::clamped(10.0, 0.0, 0.0, 20.0);
    let out = export_with_margins(&pdf_with_pages(2), &margins).unwrap();
    let doc = Document::load_mem(&out).unwrap();

    for page_id in doc.get_pages().into_values() {
        let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
        for key in [b"CropBox".as_slice(), b"MediaBox".as_slice()] {
            let values: Vec<f32> = page
                .get(key)
                .and_then(Object::as_array)
                .unwrap()
                .iter()
                .map(|o| match o {
                    Object::Real(f) => *f,
                    Object::Integer(i) => *i as f32,
                    other => panic!("unexpected {:?}", other),
                })
                .collect();
            assert!((values[0] - 0.0).abs() < 1e-3);
            assert!((values[1] - 0.0).abs() < 1e-3);
            assert!((values[2] - 476.0).abs() < 1e-3);
            assert!((values[3] - 757.8).abs() < 1e-2);
        }
    }
}

#[test]
fn test_zero_margins_keep_page_size() {
    let out = export_with_margins(&pdf_with_pages(1), &CropMargins::default()).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    assert_eq!(
        page_media_box(&doc, page_id),
        PageBox {
            llx: 0.0,
            lly: 0.0,
            urx: 595.0,
            ury: 842.0
        }
    );
}

#[test]
fn test_source_transform_does_not_leak_into_masks() {
    let source = pdf_with_edited_page(|doc, page_id| {
        // Scales everything after it and never restores the state
        let stream = Stream::new(dictionary! {}, b"0.5 0 0 0.5 0 0 cm\n0 0 1 rg\n".to_vec());
        let content_id = doc.add_object(stream);
        set_page_entry(doc, page_id, "Contents", Object::Reference(content_id));
    });
    let out = export_with_masks(&source, &[solid(1, None, "#FF0000")]).unwrap();
    let content = &page_contents(&out)[0];

    assert!(content.starts_with("q\n"), "{}", content);
    let scale = content.find("0.5 0 0 0.5 0 0 cm").unwrap();
    let restore = content.find("\nQ\n").unwrap();
    let fill = content.find(" re\n").unwrap();
    assert!(scale < restore && restore < fill, "{}", content);
    assert_eq!(count(content, "q\n"), count(content, "Q\n"));
}

#[test]
fn test_existing_content_array_kept_in_order() {
    let source = pdf_with_edited_page(|doc, page_id| {
        let first = doc.add_object(Stream::new(dictionary! {}, b"% first\n".to_vec()));
        let second = doc.add_object(Stream::new(dictionary! {}, b"% second\n".to_vec()));
        let contents = vec![Object::Reference(first), Object::Reference(second)];
        set_page_entry(doc, page_id, "Contents", Object::Array(contents));
    });
    let out = export_with_masks(&source, &[solid(1, None, "#FF0000")]).unwrap();
    let content = &page_contents(&out)[0];

    let first = content.find("% first").unwrap();
    let second = content.find("% second").unwrap();
    let fill = content.find(" re\n").unwrap();
    assert!(content.starts_with("q\n"));
    assert!(first < second && second < fill);
}

#[test]
fn test_masks_measured_against_crop_box() {
    let source = pdf_with_edited_page(|doc, page_id| {
        set_page_entry(doc, page_id, "CropBox", box_object([100, 100, 500, 700]));
    });
    let right_half_top = Mask::solid(
        MaskId(1),
        PercentRect::new(50.0, 0.0, 50.0, 50.0),
        "#000000",
        None,
    );
    let out = export_with_masks(&source, &[right_half_top]).unwrap();
    let content = &page_contents(&out)[0];

    assert!(content.contains("300.000 400.000 200.000 300.000 re"), "{}", content);
}

#[test]
fn test_crop_box_clipped_to_media_box() {
    let source = pdf_with_edited_page(|doc, page_id| {
        set_page_entry(doc, page_id, "CropBox", box_object([-50, 100, 300, 1000]));
    });
    let doc = Document::load_mem(&source).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    assert_eq!(
        page_visible_box(&doc, page_id),
        PageBox {
            llx: 0.0,
            lly: 100.0,
            urx: 300.0,
            ury: 842.0
        }
    );
}

#[test]
fn test_margins_trim_from_crop_box() {
    let source = pdf_with_edited_page(|doc, page_id| {
        set_page_entry(doc, page_id, "CropBox", box_object([100, 100, 500, 700]));
    });
    let margins = CropMargins::clamped(10.0, 0.0, 25.0, 0.0);
    let out = export_with_margins(&source, &margins).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();

    for key in [b"CropBox".as_slice(), b"MediaBox".as_slice()] {
        assert_close(&page_box_values(&doc, page_id, key), &[200.0, 100.0, 500.0, 640.0]);
    }
}

#[test]
fn test_rotated_page_maps_displayed_rect() {
    let visible = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 100.0,
        ury: 200.0,
    };
    // Top-left tenth across, fifth down, as displayed
    let corner = PercentRect::new(0.0, 0.0, 10.0, 20.0);
    let mask = Mask::solid(MaskId(1), corner, "#000000", None);
    let rect = |rotation| {
        let (x, y, w, h) = PageGeometry { visible, rotation }.mask_rect(&mask);
        [x, y, w, h]
    };

    assert_close(&rect(0), &[0.0, 160.0, 10.0, 40.0]);
    // Displayed top-left is the bottom-left corner of the page turned clockwise
    assert_close(&rect(90), &[0.0, 0.0, 20.0, 20.0]);
    assert_close(&rect(180), &[90.0, 0.0, 10.0, 40.0]);
    assert_close(&rect(270), &[80.0, 180.0, 20.0, 20.0]);
}

#[test]
fn test_rotated_page_margin_export() {
    let source = pdf_with_edited_page(|doc, page_id| {
        set_page_entry(doc, page_id, "Rotate", Object::Integer(90));
    });
    // The displayed top edge is the left edge of the unrotated page
    let margins = CropMargins::clamped(10.0, 0.0, 0.0, 0.0);
    let out = export_with_margins(&source, &margins).unwrap();
    let doc = Document::load_mem(&out).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();

    assert_close(&page_box_values(&doc, page_id, b"MediaBox"), &[59.5, 0.0, 595.0, 842.0]);
}

#[test]
fn test_negative_rotation_normalized() {
    let source = pdf_with_edited_page(|doc, page_id| {
        set_page_entry(doc, page_id, "Rotate", Object::Integer(-90));
    });
    let doc = Document::load_mem(&source).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    assert_eq!(PageGeometry::of(&doc, page_id).rotation, 270);
}

#[test]
fn test_clone_strip_upright_on_rotated_page() {
    let geometry = PageGeometry {
        visible: PageBox {
            llx: 0.0,
            lly: 0.0,
            urx: 100.0,
            ury: 200.0,
        },
        rotation: 90,
    };
    let full = PercentRect::new(0.0, 0.0, 100.0, 100.0);
    let whole_page = Mask::solid(MaskId(1), full, "#000000", None);
    // Image rows run up the page so they read left to right once displayed
    assert_close(&geometry.image_matrix(&whole_page), &[0.0, 200.0, -100.0, 0.0, 100.0, 0.0]);
    assert_close(
        &upright(geometry.visible).image_matrix(&whole_page),
        &[100.0, 0.0, 0.0, 200.0, 0.0, 0.0],
    );
}

#[test]
fn test_unparseable_document_fails_loudly() {
    assert!(export_with_masks(b"garbage", &[]).is_err());
    assert!(export_with_margins(b"garbage", &CropMargins::default()).is_err());
}
