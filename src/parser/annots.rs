//! Annotation rectangles.

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Zone;

use super::backend::{number_quad, resolve, PageSpace};

/// Annotation subtypes that never describe a zone.
const IGNORED_SUBTYPES: &[&[u8]] = &[b"Link", b"Widget", b"Popup"];

/// Rectangles of the markup annotations of a page, in annotation order.
///
/// Annotations without a usable `/Rect` are skipped with a warning.
pub(crate) fn annotation_rects(
    doc: &LopdfDocument,
    page_id: ObjectId,
    space: PageSpace,
) -> Result<Vec<Zone>> {
    let page = doc.get_dictionary(page_id)?;
    let annots = match page.get(b"Annots") {
        Ok(obj) => resolve(doc, obj)?,
        Err(_) => return Ok(Vec::new()),
    };
    let entries = annots
        .as_array()
        .map_err(|e| Error::Annotation(format!("/Annots is not an array: {}", e)))?;

    let mut zones = Vec::with_capacity(entries.len());
    for entry in entries {
        let dict = match resolve(doc, entry) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => {
                log::warn!("Skipping annotation that is not a dictionary");
                continue;
            }
        };

        let subtype = dict.get(b"Subtype").and_then(Object::as_name).ok();
        if subtype.is_some_and(|s| IGNORED_SUBTYPES.contains(&s)) {
            continue;
        }

        let rect = dict
            .get(b"Rect")
            .ok()
            .and_then(|obj| resolve(doc, obj).ok())
            .and_then(number_quad);
        match rect {
            Some([x0, y0, x1, y1]) => zones.push(Zone::from(space.rect(x0, y0, x1, y1))),
            None => log::warn!(
                "Skipping {} annotation without a valid /Rect",
                subtype
                    .map(|s| String::from_utf8_lossy(s).to_string())
                    .unwrap_or_else(|| "untyped".to_string())
            ),
        }
    }

    Ok(zones)
}
