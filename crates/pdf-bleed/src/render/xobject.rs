//! XObject creation for page composition
//!
//! Source pages become Form XObjects (resources deep-copied into the
//! output document) and decoded rasters become Image XObjects; both
//! can then be placed any number of times with different transforms.

use crate::assets::SourceRect;
use crate::types::Result;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Create a Form XObject from a source page, bounded to `bbox`.
///
/// The BBox doubles as the content cut: regions of the page outside it
/// never show, whatever transform a placement applies.
pub fn create_form_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    bbox: &SourceRect,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let content_data = page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(bbox.x0),
            Object::Real(bbox.y0),
            Object::Real(bbox.x1),
            Object::Real(bbox.y1),
        ]),
    );

    if let Ok(resources) = page_dict.get(b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

/// Create an Image XObject from a decoded raster as 8-bit RGB samples
pub fn create_image_xobject(output: &mut Document, image: &DynamicImage) -> Result<ObjectId> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    Ok(output.add_object(Stream::new(dict, rgb.into_raw())))
}

/// Concatenated, decompressed content of a page. Pages without a
/// Contents entry yield an empty stream.
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };

    let mut data = Vec::new();
    match contents {
        Object::Reference(id) => append_stream(doc, *id, &mut data)?,
        Object::Array(refs) => {
            for obj in refs {
                if let Object::Reference(id) = obj {
                    append_stream(doc, *id, &mut data)?;
                    data.push(b'\n');
                }
            }
        }
        _ => {}
    }
    Ok(data)
}

fn append_stream(doc: &Document, id: ObjectId, out: &mut Vec<u8>) -> Result<()> {
    if let Ok(stream) = doc.get_object(id)?.as_stream() {
        match stream.decompressed_content() {
            Ok(content) => out.extend_from_slice(&content),
            Err(_) => out.extend_from_slice(&stream.content),
        }
    }
    Ok(())
}

/// Deep copy an object from source to output document, following
/// references. A cache keeps shared resources from being copied twice.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;

            let new_id = output.add_object(copied);
            cache.insert(*id, new_id);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}
