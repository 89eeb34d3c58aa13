use crate::layout::placements;
use crate::pipeline::{ConvertOutput, ConvertedCubemap};
use serde_json::{Value, json};

/// Face rectangles of a converted grid cubemap, keyed by face name.
/// None for panoramas and custom layouts.
pub fn face_rects_json(converted: &ConvertedCubemap, face_size: u32) -> Option<Value> {
    let layout = converted.layout.filter(|l| l.is_grid())?;
    let places = placements(layout, face_size).ok()?;
    let mut faces = serde_json::Map::new();
    for (face, _) in places.iter() {
        let r = places.rect(face);
        faces.insert(
            face.as_str().to_string(),
            json!({"x": r.x, "y": r.y, "w": r.w, "h": r.h}),
        );
    }
    Some(Value::Object(faces))
}

/// Serialize a conversion as `{ source, outputs, meta }`.
/// Each output lists its layout, size and, for grid layouts, where every face sits.
pub fn to_json_manifest(out: &ConvertOutput) -> Value {
    let face_size = out.faces.face_size();
    let outputs: Vec<Value> = out
        .outputs
        .iter()
        .map(|c| {
            let mut entry = json!({
                "layout": c.layout.map(|l| l.as_str()).unwrap_or("custom"),
                "label": c.layout.map(|l| l.label()).unwrap_or("Custom"),
                "width": c.width,
                "height": c.height,
            });
            if let (Some(faces), Some(obj)) = (face_rects_json(c, face_size), entry.as_object_mut()) {
                obj.insert("faces".into(), faces);
            }
            entry
        })
        .collect();
    json!({
        "source": &out.source,
        "outputs": outputs,
        "meta": {
            "app": "cubeshift",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
        },
    })
}
