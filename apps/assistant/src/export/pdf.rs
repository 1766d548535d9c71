//! Writes a paginated bitmap as an A4 PDF with lopdf.
//!
//! The bitmap is embedded once as an image XObject and drawn on every page, shifted
//! up by the page's offset so each page shows the next 295mm slice.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::export::pagination::{PagePlacement, MEDIA_HEIGHT_UNITS, PAGE_WIDTH_UNITS};
use crate::export::rasterizer::Bitmap;
use crate::export::ExportError;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

fn pt(mm: f64) -> Object {
    Object::Real((mm * POINTS_PER_MM) as f32)
}

/// Builds the PDF bytes. `image_height` is the capture height in page units (mm).
pub fn write_pdf(
    bitmap: &Bitmap,
    image_height: f64,
    placements: &[PagePlacement],
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(bitmap.width)),
            "Height" => Object::Integer(i64::from(bitmap.height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        bitmap.pixels.clone(),
    );
    // Flate; the capture is mostly flat background.
    image
        .compress()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    let image_id = doc.add_object(image);
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im0" => image_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(placements.len());
    for placement in placements {
        // PDF space is y-up from the page bottom; offset_y is measured down from the top.
        let lower_left_y = MEDIA_HEIGHT_UNITS + placement.offset_y - image_height;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        pt(PAGE_WIDTH_UNITS),
                        Object::Integer(0),
                        Object::Integer(0),
                        pt(image_height),
                        Object::Integer(0),
                        pt(lower_left_y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(kids.len() as i64),
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            pt(PAGE_WIDTH_UNITS),
            pt(MEDIA_HEIGHT_UNITS),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pagination::paginate;

    fn small_bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, [255, 255, 255])
    }

    #[test]
    fn test_single_page_pdf_loads() {
        let bitmap = small_bitmap(21, 10);
        let bytes = write_pdf(&bitmap, 100.0, &paginate(100.0)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_count_matches_placements() {
        let bitmap = small_bitmap(21, 80);
        let placements = paginate(800.0);
        let bytes = write_pdf(&bitmap, 800.0, &placements).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_image_stream_is_flate_compressed() {
        let bitmap = small_bitmap(210, 700);
        let raw_len = bitmap.pixels.len();
        let bytes = write_pdf(&bitmap, 700.0, &paginate(700.0)).unwrap();
        assert!(bytes.len() < raw_len / 10);

        let doc = Document::load_mem(&bytes).unwrap();
        let image = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| matches!(s.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Image")))
            .unwrap();
        assert_eq!(image.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
        assert!(image.content.len() < raw_len);
    }

    #[test]
    fn test_each_page_draws_shared_image() {
        let bitmap = small_bitmap(21, 80);
        let bytes = write_pdf(&bitmap, 800.0, &paginate(800.0)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        for (_, page_id) in doc.get_pages() {
            let content = doc.get_and_decode_page_content(page_id).unwrap();
            let operators: Vec<&str> = content
                .operations
                .iter()
                .map(|op| op.operator.as_str())
                .collect();
            assert_eq!(operators, vec!["q", "cm", "Do", "Q"]);
        }
    }
}
