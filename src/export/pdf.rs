//! Byte-level PDF export: crop boxes and mask overlays.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::editor::coords::PercentRect;
use crate::error::ExportError;
use crate::masks::{CropMargins, Mask};

use super::color::pdf_rgb;

/// US Letter, used when a page carries no MediaBox anywhere in its ancestry
const FALLBACK_MEDIA_BOX: PageBox = PageBox {
    llx: 0.0,
    lly: 0.0,
    urx: 612.0,
    ury: 792.0,
};

/// A page rectangle in PDF user space (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageBox {
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    /// Overlap of two boxes, `None` when they do not share any area
    pub fn intersect(&self, other: &PageBox) -> Option<PageBox> {
        let overlap = PageBox {
            llx: self.llx.max(other.llx),
            lly: self.lly.max(other.lly),
            urx: self.urx.min(other.urx),
            ury: self.ury.min(other.ury),
        };
        (overlap.width() > 0.0 && overlap.height() > 0.0).then_some(overlap)
    }

    fn from_array(values: &[f32]) -> PageBox {
        PageBox {
            llx: values[0].min(values[2]),
            lly: values[1].min(values[3]),
            urx: values[0].max(values[2]),
            ury: values[1].max(values[3]),
        }
    }

    fn to_object(self) -> Object {
        Object::Array(vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.urx),
            Object::Real(self.ury),
        ])
    }
}

/// A page as a viewer shows it: the visible box turned clockwise by `rotation` degrees.
///
/// Masks and margins are measured in top-left percent of this displayed page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub visible: PageBox,
    /// One of 0, 90, 180 or 270
    pub rotation: u32,
}

impl PageGeometry {
    pub fn of(doc: &Document, page_id: ObjectId) -> Self {
        Self {
            visible: page_visible_box(doc, page_id),
            rotation: page_rotation(doc, page_id),
        }
    }

    /// User-space point under a fraction of the displayed page (0,0 is top-left)
    fn view_to_user(&self, u: f32, v: f32) -> (f32, f32) {
        let b = &self.visible;
        let (w, h) = (b.width(), b.height());
        match self.rotation {
            90 => (b.llx + v * w, b.lly + u * h),
            180 => (b.urx - u * w, b.lly + v * h),
            270 => (b.urx - v * w, b.ury - u * h),
            _ => (b.llx + u * w, b.ury - v * h),
        }
    }

    /// The user-space box under a top-left percent rectangle of the displayed page
    pub fn user_box(&self, rect: &PercentRect) -> PageBox {
        let (x0, y0) = self.view_to_user(rect.x / 100.0, rect.y / 100.0);
        let (x1, y1) = self.view_to_user(rect.right() / 100.0, rect.bottom() / 100.0);
        PageBox::from_array(&[x0, y0, x1, y1])
    }

    /// The box left after trimming percentage strips from each displayed edge
    pub fn cropped(&self, margins: &CropMargins) -> PageBox {
        self.user_box(&margins.kept_area())
    }

    /// Mask rectangle as (x, y, width, height) in user space
    pub fn mask_rect(&self, mask: &Mask) -> (f32, f32, f32, f32) {
        let b = self.user_box(&mask.rect());
        (b.llx, b.lly, b.width(), b.height())
    }

    /// `cm` operands that place a unit image square over the mask, upright as displayed
    pub fn image_matrix(&self, mask: &Mask) -> [f32; 6] {
        let rect = mask.rect();
        let (left, top) = (rect.x / 100.0, rect.y / 100.0);
        let (right, bottom) = (rect.right() / 100.0, rect.bottom() / 100.0);
        let origin = self.view_to_user(left, bottom);
        let across = self.view_to_user(right, bottom);
        let up = self.view_to_user(left, top);
        [
            across.0 - origin.0,
            across.1 - origin.1,
            up.0 - origin.0,
            up.1 - origin.1,
            origin.0,
            origin.1,
        ]
    }
}

fn obj_to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up an inheritable page attribute, walking up the page tree
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    let mut depth = 0;
    while let Some(id) = current {
        // Cycles in broken page trees
        if depth > 64 {
            return None;
        }
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

fn inherited_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<PageBox> {
    inherited(doc, page_id, key)
        .and_then(|obj| obj.as_array().ok())
        .filter(|arr| arr.len() == 4)
        .and_then(|arr| arr.iter().map(obj_to_f32).collect::<Option<Vec<f32>>>())
        .map(|values| PageBox::from_array(&values))
}

pub fn page_media_box(doc: &Document, page_id: ObjectId) -> PageBox {
    inherited_box(doc, page_id, b"MediaBox").unwrap_or(FALLBACK_MEDIA_BOX)
}

/// The region a viewer shows: the CropBox clipped to the MediaBox, or the whole
/// MediaBox when the page has no usable CropBox.
pub fn page_visible_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let media = page_media_box(doc, page_id);
    inherited_box(doc, page_id, b"CropBox")
        .and_then(|crop| crop.intersect(&media))
        .unwrap_or(media)
}

/// Clockwise display rotation, normalized to a quarter turn
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> u32 {
    let degrees = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360);
    match degrees {
        90 | 180 | 270 => degrees as u32,
        _ => 0,
    }
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, ExportError> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| ExportError::MalformedPage(page_id))
}

fn load(document: &[u8]) -> Result<Document, ExportError> {
    Document::load_mem(document).map_err(ExportError::Load)
}

fn save(mut doc: Document) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| ExportError::Save {
        message: e.to_string(),
    })?;
    Ok(out)
}

/// Shrinks every page's visible area by the margins, measured on the page as displayed.
/// MediaBox and CropBox are both set to the result.
pub fn export_with_margins(document: &[u8], margins: &CropMargins) -> Result<Vec<u8>, ExportError> {
    let mut doc = load(document)?;

    for page_id in doc.get_pages().into_values() {
        let cropped = PageGeometry::of(&doc, page_id).cropped(margins);
        let page = page_dict_mut(&mut doc, page_id)?;
        page.set("MediaBox", cropped.to_object());
        page.set("CropBox", cropped.to_object());
    }

    save(doc)
}

fn solid_ops(mask: &Mask, rect: (f32, f32, f32, f32)) -> String {
    let [r, g, b] = pdf_rgb(&mask.color);
    let (x, y, w, h) = rect;
    format!(
        "q\n{:.4} {:.4} {:.4} rg\n{:.3} {:.3} {:.3} {:.3} re\nf\nQ\n",
        r, g, b, x, y, w, h
    )
}

fn image_ops(name: &str, matrix: [f32; 6]) -> String {
    let [a, b, c, d, e, f] = matrix;
    format!(
        "q\n{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} cm\n/{} Do\nQ\n",
        a, b, c, d, e, f, name
    )
}

/// Current content stream references of a page, in drawing order
fn content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, ExportError> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|_| ExportError::MalformedPage(page_id))?;
    let refs = match page.get(b"Contents") {
        Err(_) => Vec::new(),
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Stream(_)) => vec![Object::Reference(*id)],
            _ => return Err(ExportError::MalformedPage(page_id)),
        },
        Ok(_) => return Err(ExportError::MalformedPage(page_id)),
    };
    Ok(refs)
}

/// Draws `overlay` on top of the page. The existing content runs inside its own
/// q/Q pair so graphics state it leaves behind does not reach the overlay.
fn append_isolated(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: String,
) -> Result<(), ExportError> {
    let existing = content_refs(doc, page_id)?;
    let mut contents = Vec::with_capacity(existing.len() + 2);
    if !existing.is_empty() {
        let open = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        contents.push(Object::Reference(open));
        contents.extend(existing);
    }
    let mut tail = if contents.is_empty() {
        String::new()
    } else {
        "\nQ\n".to_string()
    };
    tail.push_str(&overlay);
    let tail_id = doc.add_object(Stream::new(dictionary! {}, tail.into_bytes()));
    contents.push(Object::Reference(tail_id));

    page_dict_mut(doc, page_id)?.set("Contents", Object::Array(contents));
    Ok(())
}

/// Adds the mask's snapshot strip as an RGB image XObject
fn snapshot_stream(mask: &Mask) -> Option<Stream> {
    let snapshot = mask.image_snapshot.as_ref()?;
    let (width, height) = snapshot.strip.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let rgb: Vec<u8> = snapshot
        .strip
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();
    Some(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Interpolate" => false,
        },
        rgb,
    ))
}

/// The page's effective Resources (own or inherited) as an owned dictionary with its
/// XObject entry resolved inline.
fn resolved_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut resources = match inherited(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(_) => return None,
        None => Dictionary::new(),
    };
    let xobjects = match resources.get(b"XObject").ok().and_then(|o| resolve(doc, o)) {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(_) => return None,
        None => Dictionary::new(),
    };
    resources.set("XObject", Object::Dictionary(xobjects));
    Some(resources)
}

/// Draws each mask on the pages it applies to. Global masks land on every page.
/// Mask percentages are read against the page as displayed, with its CropBox and
/// /Rotate applied.
///
/// Clone masks with a snapshot become stretched image overlays; if the image cannot be
/// embedded the mask is drawn as a solid fill instead.
pub fn export_with_masks(document: &[u8], masks: &[Mask]) -> Result<Vec<u8>, ExportError> {
    let mut doc = load(document)?;

    for (page_number, page_id) in doc.get_pages() {
        let page_index = page_number.saturating_sub(1) as usize;
        let page_masks: Vec<&Mask> = masks.iter().filter(|m| m.applies_to_page(page_index)).collect();
        if page_masks.is_empty() {
            continue;
        }

        let geometry = PageGeometry::of(&doc, page_id);
        let mut resources = resolved_resources(&doc, page_id);
        let mut content = String::new();

        for mask in page_masks {
            let embedded = if mask.fill_type.is_clone() {
                match (resources.as_mut(), snapshot_stream(mask)) {
                    (Some(resources), Some(stream)) => {
                        let image_id = doc.add_object(stream);
                        let name = format!("SlideMask{}", mask.id.0);
                        if let Ok(Object::Dictionary(xobjects)) = resources.get_mut(b"XObject") {
                            xobjects.set(name.as_bytes(), Object::Reference(image_id));
                            Some(name)
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            } else {
                None
            };

            match embedded {
                Some(name) => content.push_str(&image_ops(&name, geometry.image_matrix(mask))),
                None => content.push_str(&solid_ops(mask, geometry.mask_rect(mask))),
            }
        }

        if let Some(resources) = resources {
            page_dict_mut(&mut doc, page_id)?.set("Resources", Object::Dictionary(resources));
        }
        append_isolated(&mut doc, page_id, content)?;
    }

    save(doc)
}
